//! Ordered route table.
//!
//! A flat list scanned in registration order — the first structurally
//! matching pattern wins. That makes precedence the caller's choice: register
//! specific patterns before general ones that could also match. No tree, no
//! per-method dimension; an edge function decides what to do with the method
//! itself (see [`validate_request`](crate::validate_request)).
//!
//! Registering the same pattern twice appends a second entry. The earlier
//! one keeps winning under first-match — a documented quirk, kept rather
//! than silently corrected.

use tracing::warn;

use crate::handler::{BoxedHandler, Handler};
use crate::pattern::{PathParams, Pattern};
use crate::request::Request;
use crate::response::Response;

struct Route {
    pattern: Pattern,
    handler: BoxedHandler,
}

/// The route table: ordered (pattern, handler) pairs plus one fallback.
///
/// Build it once at startup; pass it to [`Server::serve`]. Each
/// [`Routes::on`] call returns `self` so registrations chain naturally.
/// After serving starts the table is shared read-only across requests — no
/// locking on the lookup path.
///
/// ```rust,no_run
/// use skiff::{PathParams, Request, Response, Routes};
///
/// let routes = Routes::new()
///     .on("/", |_req: Request, _params: PathParams| async { "Hello World!" })
///     .not_found(|_req: Request, _params: PathParams| async {
///         Response::html("<h1 align=center>page not found</h1>")
///     });
/// ```
///
/// [`Server::serve`]: crate::Server::serve
pub struct Routes {
    entries: Vec<Route>,
    fallback: BoxedHandler,
}

impl Routes {
    /// An empty table with the default "page not found" fallback installed.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            fallback: default_not_found.into_boxed_handler(),
        }
    }

    /// Registers `handler` for `pattern`, appending to the scan order.
    /// Returns `self` for chaining.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` does not compile (e.g. a catch-all segment that is
    /// not in final position). Route tables are built once at startup, so a
    /// bad template is a programming error, not a runtime condition.
    pub fn on(mut self, pattern: &str, handler: impl Handler) -> Self {
        let compiled = Pattern::compile(pattern)
            .unwrap_or_else(|e| panic!("invalid route `{pattern}`: {e}"));
        if self.entries.iter().any(|r| r.pattern.as_str() == pattern) {
            warn!(pattern, "duplicate route registered; the earlier entry still wins");
        }
        self.entries.push(Route { pattern: compiled, handler: handler.into_boxed_handler() });
        self
    }

    /// Replaces the fallback ("not found") handler. The most recent
    /// assignment wins. The fallback is looked up directly, never matched
    /// against request paths.
    pub fn not_found(mut self, handler: impl Handler) -> Self {
        self.fallback = handler.into_boxed_handler();
        self
    }

    /// First-match-wins resolution over the registration order.
    pub(crate) fn resolve(&self, path: &str) -> Option<(BoxedHandler, PathParams)> {
        self.entries.iter().find_map(|route| {
            route
                .pattern
                .extract(path)
                .map(|params| (route.handler.clone(), params))
        })
    }

    pub(crate) fn fallback(&self) -> BoxedHandler {
        self.fallback.clone()
    }
}

impl Default for Routes {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide default "not found" page, used until a caller installs
/// their own via [`Routes::not_found`].
pub(crate) async fn default_not_found(_req: Request, _params: PathParams) -> Response {
    Response::builder()
        .status(http::StatusCode::NOT_FOUND)
        .html("<h1 align=center>page not found</h1>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::ErasedHandler as _;
    use crate::pattern::ParamValue;

    async fn named_a(_req: Request, _params: PathParams) -> Response {
        Response::text("a")
    }

    async fn named_b(_req: Request, _params: PathParams) -> Response {
        Response::text("b")
    }

    #[test]
    fn resolve_returns_extracted_params() {
        let routes = Routes::new().on("/blog/:slug", named_a);
        let (_, params) = routes.resolve("/blog/hello-world").unwrap();
        assert_eq!(params["slug"], ParamValue::Single("hello-world".to_owned()));
    }

    #[test]
    fn resolve_misses_unregistered_paths() {
        let routes = Routes::new().on("/blog/:slug", named_a);
        assert!(routes.resolve("/shop/item").is_none());
    }

    #[tokio::test]
    async fn first_match_wins_across_overlapping_patterns() {
        // Both patterns match /blog/x; registration order decides.
        let routes = Routes::new().on("/blog/:slug", named_a).on("/:anything", named_b);
        let (handler, _) = routes.resolve("/blog/x").unwrap();
        let req = crate::request::test_request(http::Method::GET, "/blog/x", "");
        let response = handler.call(req, PathParams::new()).await.unwrap();
        assert_eq!(&response.body()[..], b"a");

        // Reverse the order and the general pattern shadows the specific one.
        let routes = Routes::new().on("/:anything", named_b).on("/blog/:slug", named_a);
        let (handler, _) = routes.resolve("/blog/x").unwrap();
        let req = crate::request::test_request(http::Method::GET, "/blog/x", "");
        let response = handler.call(req, PathParams::new()).await.unwrap();
        assert_eq!(&response.body()[..], b"b");
    }

    #[tokio::test]
    async fn duplicate_registration_keeps_earlier_winner() {
        let routes = Routes::new().on("/page", named_a).on("/page", named_b);
        let (handler, _) = routes.resolve("/page").unwrap();
        let req = crate::request::test_request(http::Method::GET, "/page", "");
        let response = handler.call(req, PathParams::new()).await.unwrap();
        assert_eq!(&response.body()[..], b"a");
    }

    #[tokio::test]
    async fn default_fallback_renders_not_found_page() {
        let routes = Routes::new();
        let req = crate::request::test_request(http::Method::GET, "/missing", "");
        let response = routes.fallback().call(req, PathParams::new()).await.unwrap();
        assert_eq!(response.status_code(), http::StatusCode::NOT_FOUND);
        assert!(std::str::from_utf8(response.body()).unwrap().contains("page not found"));
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn invalid_pattern_panics_at_registration() {
        let _ = Routes::new().on("/:rest+/more", named_a);
    }
}
