//! Incoming HTTP request type.
//!
//! The dispatcher collects the body up front, so handlers see a fully
//! buffered request. Alongside the usual method/path/header accessors the
//! request carries two crate-internal handles: the registered fallback
//! handler and the shared response cache. That is how [`serve_static`]
//! delegates a missing file to the "not found" handler and shares the
//! process-wide cache without any ambient globals.
//!
//! [`serve_static`]: crate::serve_static

use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Method};

use crate::cache::ResponseCache;
use crate::error::Error;
use crate::handler::BoxedHandler;

/// An incoming HTTP request.
pub struct Request {
    method: Method,
    path: String,
    query: String,
    headers: HeaderMap,
    body: Bytes,
    pub(crate) fallback: BoxedHandler,
    pub(crate) cache: Arc<ResponseCache>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        query: String,
        headers: HeaderMap,
        body: Bytes,
        fallback: BoxedHandler,
        cache: Arc<ResponseCache>,
    ) -> Self {
        Self { method, path, query, headers, body, fallback, cache }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path component of the request URL, query string excluded.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query string, without the leading `?`. Empty when absent.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Iterates the query string as decoded-enough `(key, value)` pairs.
    /// Keys without `=` yield an empty value.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Case-insensitive header lookup; non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Deserializes the collected body as JSON.
    pub fn body_json<T: serde::de::DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Builds a bare request for in-crate unit tests, wired to the default
/// fallback handler and a fresh cache.
#[cfg(test)]
pub(crate) fn test_request(method: Method, path: &str, query: &str) -> Request {
    use crate::handler::Handler;

    Request::new(
        method,
        path.to_owned(),
        query.to_owned(),
        HeaderMap::new(),
        Bytes::new(),
        crate::routes::default_not_found.into_boxed_handler(),
        Arc::new(ResponseCache::new()),
    )
}
