//! Minimal skiff example — JSON routes, route params, and static assets.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:8000/
//!   curl http://localhost:8000/blog/hello-world
//!   curl http://localhost:8000/static/readme.md
//!   curl http://localhost:8000/static/readme.md   # second hit comes from cache
//!   curl http://localhost:8000/nope

use serde_json::json;
use skiff::{serve_static, PathParams, Render, Request, Response, Routes, Server, StaticOptions};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let routes = Routes::new()
        .on("/", hello)
        .on("/blog/:slug", blog_post)
        .on("/static/:filename+", serve_static(".", StaticOptions::default()))
        .not_found(not_found);

    Server::bind("0.0.0.0:8000")
        .serve(routes)
        .await
        .expect("server error");
}

// GET /
async fn hello(_req: Request, _params: PathParams) -> Result<Response, skiff::Error> {
    skiff::json(&json!({ "message": "Hello World!" }))
}

// GET /blog/:slug — markup goes through the HTML render path.
async fn blog_post(_req: Request, params: PathParams) -> Render<String> {
    Render(format!("<h1>You visited /{}</h1>", params["slug"].joined()))
}

// Any unmatched path.
async fn not_found(_req: Request, _params: PathParams) -> Response {
    Response::html("<h1 align=center>page not found</h1>")
}
