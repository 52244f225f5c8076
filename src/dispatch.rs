//! Request dispatch.
//!
//! One call per request: consult the response cache, else walk the route
//! table, invoke the matched handler, normalize whatever comes back, and
//! guarantee a well-formed response on every path. Failure capture is
//! double-layered on purpose: handler errors are converted to a JSON 500
//! right where the handler was invoked, and anything escaping the rest of
//! the pipeline (unreadable body, malformed request) is converted once more
//! at the outer boundary. A client never sees a connection die because of
//! an internal error.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use tracing::{error, info};

use crate::cache::ResponseCache;
use crate::error::Error;
use crate::handler::ErasedHandler as _;
use crate::pattern::PathParams;
use crate::request::Request;
use crate::response::Response;
use crate::routes::Routes;

/// Header marking a response as served from the cache rather than freshly
/// computed. Test harnesses key off its presence; treat the name as a
/// stable contract.
pub const CACHE_HIT_HEADER: &str = "x-function-cache-hit";

/// Routes one request at a time through cache, table, and handler.
///
/// Cheap to share: the route table is read-only after construction and the
/// cache handles its own locking, so one `Dispatcher` serves every
/// connection concurrently.
pub struct Dispatcher {
    routes: Arc<Routes>,
    cache: Arc<ResponseCache>,
}

impl Dispatcher {
    /// A dispatcher over `routes` with a default-capacity response cache.
    pub fn new(routes: Routes) -> Self {
        Self::with_cache(routes, ResponseCache::new())
    }

    pub fn with_cache(routes: Routes, cache: ResponseCache) -> Self {
        Self { routes: Arc::new(routes), cache: Arc::new(cache) }
    }

    /// Handles one request, start to finish.
    ///
    /// Infallible by contract: every failure mode inside is translated to a
    /// response, so the transport layer never sees an error from us.
    pub async fn dispatch<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: hyper::body::Body,
        B::Error: fmt::Display,
    {
        let start = Instant::now();
        let (parts, body) = req.into_parts();
        let method = parts.method.clone();
        let path = parts.uri.path().to_owned();
        let query = parts.uri.query().unwrap_or("").to_owned();

        // Outer capture: body collection is the only fallible step before
        // the per-route handling, which does its own capturing.
        let response = match body.collect().await {
            Ok(collected) => {
                let request = Request::new(
                    method.clone(),
                    path.clone(),
                    query.clone(),
                    parts.headers,
                    collected.to_bytes(),
                    self.routes.fallback(),
                    Arc::clone(&self.cache),
                );
                self.handle(request).await
            }
            Err(e) => {
                error!(%method, path, "failed to read request body: {e}");
                error_response(&format!("failed to read request body: {e}"))
            }
        };

        let cache_hit = response.headers().contains_key(CACHE_HIT_HEADER);
        let marker = if cache_hit { "\u{26a1}" } else { "" };
        let path_and_query =
            if query.is_empty() { path } else { format!("{path}?{query}") };
        // method path+query marker elapsed status — one line per request,
        // stable format.
        info!(
            "{method} {path_and_query} {marker}{}ms {}",
            start.elapsed().as_millis(),
            response.status_code().as_u16(),
        );

        response.into_http()
    }

    async fn handle(&self, request: Request) -> Response {
        let path = request.path().to_owned();
        let method = request.method().clone();

        if let Some(hit) = self.cache.lookup(&path) {
            let mut response = hit.to_response();
            response.headers_mut().insert(
                http::header::HeaderName::from_static(CACHE_HIT_HEADER),
                http::header::HeaderValue::from_static("true"),
            );
            return response;
        }

        match self.routes.resolve(&path) {
            Some((handler, params)) => {
                // Inner capture: a failing handler becomes a JSON 500 here,
                // leaving every other in-flight request untouched.
                match handler.call(request, params).await {
                    Ok(response) => response,
                    Err(e) => {
                        error!(%method, path, "error serving request: {e}");
                        error_response(&e.to_string())
                    }
                }
            }
            None => {
                let fallback = self.routes.fallback();
                let mut response =
                    match fallback.call(request, PathParams::new()).await {
                        Ok(response) => response,
                        Err(e) => {
                            error!(%method, path, "error serving fallback: {e}");
                            error_response(&e.to_string())
                        }
                    };
                // Policy: falling back means "not found". A fallback that
                // reports success gets its status forced so observers see
                // the miss; explicit error statuses are left alone.
                if response.status_code().is_success() {
                    response.set_status(StatusCode::NOT_FOUND);
                }
                response
            }
        }
    }

    pub(crate) fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}

/// The uniform `{"error": <message>}` 500 body.
fn error_response(message: &str) -> Response {
    let body = serde_json::to_vec(&serde_json::json!({ "error": message }))
        .unwrap_or_else(|_| br#"{"error":"internal error"}"#.to_vec());
    let mut response =
        Response::with_content_type("application/json; charset=utf-8", body);
    response.set_status(StatusCode::INTERNAL_SERVER_ERROR);
    response
}
