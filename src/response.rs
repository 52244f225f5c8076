//! Outgoing HTTP response type and the [`IntoReply`] conversion trait.
//!
//! Handlers can return a [`Response`] directly, a [`Render`]-wrapped markup
//! value, plain text, a bare status, or a `Result` of any of those. The
//! dispatcher resolves whichever it gets through `IntoReply` — one explicit
//! conversion, no runtime type sniffing.

use std::fmt;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use serde::Serialize;

use crate::error::Error;

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK, no custom headers needed)
///
/// ```rust
/// use skiff::{json, Response};
///
/// Response::text("hello");
/// Response::html("<h1>hello</h1>");
/// json(&serde_json::json!({ "id": 1 })).unwrap();
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use http::StatusCode;
/// use skiff::Response;
///
/// Response::builder()
///     .status(StatusCode::CREATED)
///     .header("location", "/users/42")
///     .json(br#"{"id":42}"#.to_vec());
/// ```
#[derive(Clone, Debug)]
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

impl Response {
    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_content_type("text/plain; charset=utf-8", body.into().into_bytes())
    }

    /// `200 OK` — `text/html; charset=utf-8`.
    pub fn html(body: impl Into<String>) -> Self {
        Self::with_content_type("text/html; charset=utf-8", body.into().into_bytes())
    }

    /// Response with the given status and no body.
    pub fn status(code: StatusCode) -> Self {
        Self { status: code, headers: HeaderMap::new(), body: Bytes::new() }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { status: StatusCode::OK, headers: HeaderMap::new() }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable header access. Cached responses are copied on read, so
    /// mutating a response you were handed never corrupts shared state.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub(crate) fn set_status(&mut self, code: StatusCode) {
        self.status = code;
    }

    pub(crate) fn with_content_type(content_type: &str, body: Vec<u8>) -> Self {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(content_type) {
            headers.insert(CONTENT_TYPE, value);
        }
        Self { status: StatusCode::OK, headers, body: Bytes::from(body) }
    }

    /// Lowers to the hyper-compatible representation the server writes out.
    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut out = http::Response::new(Full::new(self.body));
        *out.status_mut() = self.status;
        *out.headers_mut() = self.headers;
        out
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to 200 OK. Terminated by a
/// typed body method — you always know what you're sending.
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HeaderMap,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    /// Appends a header. Invalid names or values are dropped silently rather
    /// than poisoning the whole response.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) =
            (name.parse::<HeaderName>(), HeaderValue::from_str(value))
        {
            self.headers.append(name, value);
        }
        self
    }

    /// Terminate with a raw JSON body (`application/json; charset=utf-8`).
    pub fn json(self, body: Vec<u8>) -> Response {
        self.finish("application/json; charset=utf-8", body)
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish("text/plain; charset=utf-8", body.into().into_bytes())
    }

    /// Terminate with an HTML body (`text/html; charset=utf-8`).
    pub fn html(self, body: impl Into<String>) -> Response {
        self.finish("text/html; charset=utf-8", body.into().into_bytes())
    }

    /// Terminate with a typed body. Use this for binary, XML, etc.
    pub fn bytes(self, content_type: &str, body: Vec<u8>) -> Response {
        self.finish(content_type, body)
    }

    /// Terminate with no body.
    pub fn no_body(self) -> Response {
        Response { status: self.status, headers: self.headers, body: Bytes::new() }
    }

    fn finish(mut self, content_type: &str, body: Vec<u8>) -> Response {
        if let Ok(value) = HeaderValue::from_str(content_type) {
            self.headers.entry(CONTENT_TYPE).or_insert(value);
        }
        Response { status: self.status, headers: self.headers, body: Bytes::from(body) }
    }
}

// ── JSON helper ───────────────────────────────────────────────────────────────

/// Serializes `value` and returns a `200 OK` response with
/// `application/json; charset=utf-8`, newline-terminated.
///
/// ```rust
/// use serde::Serialize;
/// use skiff::json;
///
/// #[derive(Serialize)]
/// struct Greeting { message: &'static str }
///
/// let response = json(&Greeting { message: "hello world" }).unwrap();
/// ```
pub fn json<T: Serialize>(value: &T) -> Result<Response, Error> {
    let mut body = serde_json::to_vec(value)?;
    body.push(b'\n');
    Ok(Response::with_content_type("application/json; charset=utf-8", body))
}

// ── Render ────────────────────────────────────────────────────────────────────

/// Marks a handler return value as markup to be rendered to HTML.
///
/// The wrapped value is opaque to the dispatcher; anything that can display
/// itself as markup works, from `format!`ed strings to a template engine's
/// output type.
///
/// ```rust
/// use skiff::Render;
///
/// let page = Render(format!("<h1>Hello, {}!</h1>", "world"));
/// ```
pub struct Render<T: fmt::Display>(pub T);

// ── IntoReply ─────────────────────────────────────────────────────────────────

/// Conversion from a handler's return value into the dispatcher's
/// `Result<Response, Error>`.
///
/// Implemented for [`Response`], strings (plain text), [`StatusCode`]
/// (status-only), [`Render`] (HTML), and `Result<T, Error>` for any of the
/// above — so handlers can use `?` freely and still return a bare value on
/// the happy path.
pub trait IntoReply {
    fn into_reply(self) -> Result<Response, Error>;
}

impl IntoReply for Response {
    fn into_reply(self) -> Result<Response, Error> {
        Ok(self)
    }
}

impl IntoReply for &'static str {
    fn into_reply(self) -> Result<Response, Error> {
        Ok(Response::text(self))
    }
}

impl IntoReply for String {
    fn into_reply(self) -> Result<Response, Error> {
        Ok(Response::text(self))
    }
}

/// Return a [`StatusCode`] directly from a handler.
impl IntoReply for StatusCode {
    fn into_reply(self) -> Result<Response, Error> {
        Ok(Response::status(self))
    }
}

/// Markup values go through the HTML render path.
impl<T: fmt::Display> IntoReply for Render<T> {
    fn into_reply(self) -> Result<Response, Error> {
        Ok(Response::html(self.0.to_string()))
    }
}

impl<T: IntoReply> IntoReply for Result<T, Error> {
    fn into_reply(self) -> Result<Response, Error> {
        self.and_then(IntoReply::into_reply)
    }
}
