//! Static asset handler.
//!
//! [`serve_static`] builds an ordinary [`Handler`] that resolves request
//! paths to files under a base location, infers the Content-Type from the
//! file extension, and memoizes small responses in the shared
//! [`ResponseCache`](crate::ResponseCache).
//!
//! Register it under a catch-all pattern; the captured `filename` segments
//! select the file. Without a `filename` parameter the base location itself
//! is served, which is how a fixed route maps to a single file:
//!
//! ```rust,no_run
//! use skiff::{serve_static, Routes, StaticOptions};
//!
//! let routes = Routes::new()
//!     .on("/static/:filename+", serve_static("public", StaticOptions::default()))
//!     .on("/about", serve_static("public/readme.md", StaticOptions::default()));
//! ```
//!
//! A missing file is answered by the registered "not found" handler — the
//! one place the core invokes another handler directly instead of returning
//! to the dispatcher.

use std::path::{Component, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::error::Error;
use crate::handler::{ErasedHandler as _, Handler};
use crate::mime;
use crate::pattern::PathParams;
use crate::request::Request;
use crate::response::Response;

/// Post-processing hook applied to a freshly built asset response before it
/// is cached and returned.
pub type Intervene = Arc<dyn Fn(&Request, Response) -> Response + Send + Sync + 'static>;

/// Options for [`serve_static`].
pub struct StaticOptions {
    intervene: Option<Intervene>,
    cache: bool,
}

impl StaticOptions {
    pub fn new() -> Self {
        Self { intervene: None, cache: true }
    }

    /// Installs a post-processing hook, e.g. to override headers on
    /// particular assets.
    pub fn intervene(
        mut self,
        f: impl Fn(&Request, Response) -> Response + Send + Sync + 'static,
    ) -> Self {
        self.intervene = Some(Arc::new(f));
        self
    }

    /// Disables response caching for this handler. Caching is on by default;
    /// admission is still gated on body size either way.
    pub fn no_cache(mut self) -> Self {
        self.cache = false;
        self
    }
}

impl Default for StaticOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a handler serving files relative to `base`.
///
/// When the matched route captured a `filename` catch-all parameter, its
/// segments are joined onto `base`; otherwise `base` itself is read. Path
/// segments that try to climb out of `base` are treated as not found.
pub fn serve_static(base: impl Into<PathBuf>, options: StaticOptions) -> impl Handler {
    let base: Arc<PathBuf> = Arc::new(base.into());
    let options = Arc::new(options);

    move |req: Request, params: PathParams| {
        let base = Arc::clone(&base);
        let options = Arc::clone(&options);
        async move { serve_one(&base, &options, req, &params).await }
    }
}

async fn serve_one(
    base: &PathBuf,
    options: &StaticOptions,
    req: Request,
    params: &PathParams,
) -> Result<Response, Error> {
    let Some(target) = resolve_target(base, params) else {
        warn!(path = req.path(), "path traversal attempt blocked");
        return not_found(req).await;
    };

    let key = req.path().to_owned();
    if options.cache {
        if let Some(hit) = req.cache.lookup(&key) {
            return Ok(hit.to_response());
        }
    }

    let bytes = match tokio::fs::read(&target).await {
        Ok(bytes) => bytes,
        // Missing or unreadable assets are a routing outcome, not a failure:
        // delegate to the registered fallback handler.
        Err(_) => return not_found(req).await,
    };

    let content_type =
        mime::content_type(target.extension().and_then(|e| e.to_str()));
    let mut response = Response::with_content_type(content_type, bytes);

    if let Some(intervene) = &options.intervene {
        response = intervene(&req, response);
    }

    if options.cache {
        // `put` applies the body-size admission gate itself.
        req.cache.put(&key, &response);
    }

    Ok(response)
}

/// Joins the captured `filename` segments onto the base location, refusing
/// anything that would escape it.
fn resolve_target(base: &PathBuf, params: &PathParams) -> Option<PathBuf> {
    let Some(filename) = params.get("filename") else {
        return Some(base.clone());
    };

    let relative = PathBuf::from(filename.joined());
    let climbs = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if climbs {
        return None;
    }
    Some(base.join(relative))
}

/// Delegates to the registered fallback handler. Same status policy as the
/// dispatcher's no-match path: a success-class status is forced to 404 so a
/// missing asset never reads as a success.
async fn not_found(req: Request) -> Result<Response, Error> {
    let fallback = req.fallback.clone();
    let mut response = fallback.call(req, PathParams::new()).await?;
    if response.status_code().is_success() {
        response.set_status(http::StatusCode::NOT_FOUND);
    }
    Ok(response)
}
