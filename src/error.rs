//! Unified error type.
//!
//! Application-level outcomes (404, 400, etc.) are expressed as HTTP
//! [`Response`](crate::Response) values, not as `Error`s. This type carries
//! the failures the dispatcher has to absorb: I/O, serialization, and
//! whatever a handler chooses to bail out with. No handler error ever
//! reaches the client as anything other than a JSON 500 body.

use thiserror::Error;

/// The error type returned by skiff's fallible operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("http: {0}")]
    Http(#[from] http::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// A handler-reported failure. The message is what ends up in the
    /// `{"error": …}` body of the 500 response.
    #[error("{0}")]
    Handler(String),
}

impl Error {
    /// Shorthand for failing out of a handler with a message.
    pub fn handler(msg: impl Into<String>) -> Self {
        Self::Handler(msg.into())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Self::Handler(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Self::Handler(msg.to_owned())
    }
}
