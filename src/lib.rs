//! # skiff
//!
//! A tiny route dispatcher and response cache for short-lived, stateless
//! edge handlers. Nothing more. Nothing less.
//!
//! ## The contract
//!
//! The platform in front of this process handles TLS, connection limits,
//! timeouts, and slow clients. skiff does not — by design. What's left is
//! the only part that changes between deployments:
//!
//! - **Declarative routing** — ordered path templates with `:name`,
//!   `:name?`, and `:name+` segments; first structural match wins
//! - **Uniform failure translation** — every handler error becomes a JSON
//!   500; a client always gets exactly one well-formed response
//! - **A really dumb response cache** — 20 entries, FIFO, nothing over
//!   10 MiB, shared across requests
//! - **Static assets** — file bytes with extension-derived content types,
//!   memoized through the same cache
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use skiff::{json, serve_static, PathParams, Request, Response, Routes, Server, StaticOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let routes = Routes::new()
//!         .on("/", |_req: Request, _params: PathParams| async { "Hello World!" })
//!         .on("/blog/:slug", |_req: Request, params: PathParams| async move {
//!             format!("You visited /{}", params["slug"].joined())
//!         })
//!         .on("/static/:filename+", serve_static("public", StaticOptions::default()))
//!         .not_found(|_req: Request, _params: PathParams| async {
//!             Response::html("<h1 align=center>page not found</h1>")
//!         });
//!
//!     Server::bind("0.0.0.0:8000").serve(routes).await.unwrap();
//! }
//! ```
//!
//! Handlers are plain `async fn(Request, PathParams)` returning anything
//! that converts into a reply: a [`Response`], text, a status code,
//! [`Render`]-wrapped markup, or a `Result` of any of those.

mod assets;
mod cache;
mod dispatch;
mod error;
mod handler;
mod mime;
mod pattern;
mod request;
mod response;
mod routes;
mod server;
mod validate;

pub use assets::{serve_static, Intervene, StaticOptions};
pub use cache::{CachedResponse, ResponseCache, DEFAULT_CAPACITY, MAX_CACHEABLE_BYTES};
pub use dispatch::{Dispatcher, CACHE_HIT_HEADER};
pub use error::Error;
pub use handler::Handler;
pub use mime::content_type;
pub use pattern::{ParamValue, PathParams, Pattern, PatternError};
pub use request::Request;
pub use response::{json, IntoReply, Render, Response, ResponseBuilder};
pub use routes::Routes;
pub use server::Server;
pub use validate::{validate_request, RequestTerms, Terms, ValidationError};
