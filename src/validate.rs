//! Request validation helper.
//!
//! Naive by intent: given a per-method schema of required query parameters,
//! headers, and body fields, it checks field *presence* only — no type
//! checks — and hands back the parsed JSON body on success. Handlers call
//! it as their first line and turn the error straight into a response.
//!
//! ```rust,no_run
//! use http::Method;
//! use skiff::{json, PathParams, Request, RequestTerms, Response, Terms};
//!
//! async fn create_user(req: Request, _params: PathParams) -> Result<Response, skiff::Error> {
//!     let terms = RequestTerms::new()
//!         .method(Method::POST, Terms::new().body(&["name", "age"]));
//!     let body = match skiff::validate_request(&req, &terms) {
//!         Ok(body) => body,
//!         Err(e) => {
//!             return Ok(skiff::Response::builder()
//!                 .status(e.status)
//!                 .json(format!(r#"{{"error":"{}"}}"#, e.message).into_bytes()));
//!         }
//!     };
//!     json(&body)
//! }
//! ```

use std::collections::HashMap;

use http::{Method, StatusCode};
use serde_json::{Map, Value};

/// Requirements for a single method.
#[derive(Clone, Debug, Default)]
pub struct Terms {
    headers: Vec<String>,
    params: Vec<String>,
    body: Vec<String>,
}

impl Terms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required header names (case-insensitive at check time).
    pub fn headers(mut self, names: &[&str]) -> Self {
        self.headers = names.iter().map(|s| (*s).to_owned()).collect();
        self
    }

    /// Required query-string parameter names.
    pub fn params(mut self, names: &[&str]) -> Self {
        self.params = names.iter().map(|s| (*s).to_owned()).collect();
        self
    }

    /// Required top-level fields in the JSON body.
    pub fn body(mut self, names: &[&str]) -> Self {
        self.body = names.iter().map(|s| (*s).to_owned()).collect();
        self
    }
}

/// Per-method validation schema. A method absent from the schema is not
/// allowed for the URL at all.
#[derive(Clone, Debug, Default)]
pub struct RequestTerms {
    methods: HashMap<Method, Terms>,
}

impl RequestTerms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method, terms: Terms) -> Self {
        self.methods.insert(method, terms);
        self
    }
}

/// A failed validation: the message and status to answer the client with.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub status: StatusCode,
}

impl ValidationError {
    fn bad_request(message: String) -> Self {
        Self { message, status: StatusCode::BAD_REQUEST }
    }
}

/// Validates `req` against `terms`.
///
/// On success returns the parsed JSON body object (empty when the schema
/// required no body fields). The checks run in a fixed order — method, query
/// params, headers, body — and report the first thing missing.
pub fn validate_request(
    req: &crate::Request,
    terms: &RequestTerms,
) -> Result<Map<String, Value>, ValidationError> {
    let Some(method_terms) = terms.methods.get(req.method()) else {
        return Err(ValidationError {
            message: format!("method {} is not allowed for the URL", req.method()),
            status: StatusCode::METHOD_NOT_ALLOWED,
        });
    };

    for param in &method_terms.params {
        let present = req.query_pairs().any(|(key, _)| key == param);
        if !present {
            return Err(ValidationError::bad_request(format!(
                "param '{param}' is required to process the request"
            )));
        }
    }

    for header in &method_terms.headers {
        if req.header(header).is_none() {
            return Err(ValidationError::bad_request(format!(
                "header '{header}' not available"
            )));
        }
    }

    let mut body = Map::new();
    if !method_terms.body.is_empty() {
        let parsed: Value = serde_json::from_slice(req.body()).map_err(|_| {
            ValidationError::bad_request("body is not valid JSON".to_owned())
        })?;
        let Value::Object(object) = parsed else {
            return Err(ValidationError::bad_request(
                "body is not a JSON object".to_owned(),
            ));
        };
        for field in &method_terms.body {
            if !object.contains_key(field) {
                return Err(ValidationError::bad_request(format!(
                    "field '{field}' is not available in the body"
                )));
            }
        }
        body = object;
    }

    Ok(body)
}
