//! End-to-end dispatch tests: real route tables, real files on disk, no
//! sockets. Requests are fed straight into the `Dispatcher`, which is
//! everything the server's accept loop does minus the transport.

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use serde_json::json;
use skiff::{
    serve_static, validate_request, Dispatcher, PathParams, Request, RequestTerms,
    Response, Routes, StaticOptions, Terms, CACHE_HIT_HEADER,
};

fn get(path_and_query: &str) -> http::Request<Full<Bytes>> {
    http::Request::builder()
        .method(http::Method::GET)
        .uri(path_and_query)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn post_json(path: &str, body: serde_json::Value) -> http::Request<Full<Bytes>> {
    http::Request::builder()
        .method(http::Method::POST)
        .uri(path)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

async fn body_of(response: http::Response<Full<Bytes>>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// A scratch directory seeded with one markdown fixture.
struct FixtureDir {
    root: std::path::PathBuf,
}

impl FixtureDir {
    const README: &'static str = "# skiff\n\nA tiny route dispatcher.\n";

    fn new(test: &str) -> Self {
        let root = std::env::temp_dir()
            .join(format!("skiff-e2e-{}-{test}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("readme.md"), Self::README).unwrap();
        Self { root }
    }

    fn path(&self) -> &std::path::Path {
        &self.root
    }
}

impl Drop for FixtureDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

fn static_routes(dir: &FixtureDir) -> Routes {
    Routes::new()
        .on(
            "/static/:filename+",
            serve_static(dir.path().to_path_buf(), StaticOptions::default()),
        )
        .on(
            "/about",
            serve_static(dir.path().join("readme.md"), StaticOptions::default()),
        )
        .not_found(|_req: Request, _params: PathParams| async {
            Response::text("Custom 404")
        })
}

#[tokio::test]
async fn static_asset_served_with_markdown_content_type() {
    let dir = FixtureDir::new("markdown");
    let dispatcher = Dispatcher::new(static_routes(&dir));

    let response = dispatcher.dispatch(get("/static/readme.md")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/markdown; charset=utf-8"
    );
    assert!(response.headers().get(CACHE_HIT_HEADER).is_none());
    assert_eq!(body_of(response).await, FixtureDir::README);
}

#[tokio::test]
async fn second_static_request_is_a_cache_hit() {
    let dir = FixtureDir::new("cache-hit");
    let dispatcher = Dispatcher::new(static_routes(&dir));

    let first = dispatcher.dispatch(get("/static/readme.md")).await;
    assert!(first.headers().get(CACHE_HIT_HEADER).is_none());

    let second = dispatcher.dispatch(get("/static/readme.md")).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.headers().get(CACHE_HIT_HEADER).unwrap(), "true");
    assert_eq!(body_of(second).await, FixtureDir::README);
}

#[tokio::test]
async fn missing_asset_delegates_to_fallback() {
    let dir = FixtureDir::new("missing");
    let dispatcher = Dispatcher::new(static_routes(&dir));

    let response = dispatcher.dispatch(get("/static/missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(CACHE_HIT_HEADER).is_none());
    assert_eq!(body_of(response).await, "Custom 404");
}

#[tokio::test]
async fn fixed_route_serves_single_file() {
    let dir = FixtureDir::new("single-file");
    let dispatcher = Dispatcher::new(static_routes(&dir));

    let response = dispatcher.dispatch(get("/about")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/markdown; charset=utf-8"
    );
    assert_eq!(body_of(response).await, FixtureDir::README);
}

#[tokio::test]
async fn traversal_attempt_is_not_found() {
    let dir = FixtureDir::new("traversal");
    let dispatcher = Dispatcher::new(static_routes(&dir));

    let response = dispatcher.dispatch(get("/static/../readme.md")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_of(response).await, "Custom 404");
}

#[tokio::test]
async fn no_cache_option_disables_memoization() {
    let dir = FixtureDir::new("no-cache");
    let dispatcher = Dispatcher::new(
        Routes::new().on(
            "/static/:filename+",
            serve_static(dir.path().to_path_buf(), StaticOptions::new().no_cache()),
        ),
    );

    let _ = dispatcher.dispatch(get("/static/readme.md")).await;
    let second = dispatcher.dispatch(get("/static/readme.md")).await;
    assert!(second.headers().get(CACHE_HIT_HEADER).is_none());
}

#[tokio::test]
async fn intervene_hook_runs_before_caching() {
    let dir = FixtureDir::new("intervene");
    let options = StaticOptions::new().intervene(|_req, mut response| {
        response.headers_mut().insert(
            http::header::HeaderName::from_static("x-frame-options"),
            http::header::HeaderValue::from_static("DENY"),
        );
        response
    });
    let dispatcher = Dispatcher::new(
        Routes::new().on(
            "/static/:filename+",
            serve_static(dir.path().to_path_buf(), options),
        ),
    );

    let first = dispatcher.dispatch(get("/static/readme.md")).await;
    assert_eq!(first.headers().get("x-frame-options").unwrap(), "DENY");

    // The cached copy was snapshotted after intervention.
    let second = dispatcher.dispatch(get("/static/readme.md")).await;
    assert_eq!(second.headers().get("x-frame-options").unwrap(), "DENY");
    assert_eq!(second.headers().get(CACHE_HIT_HEADER).unwrap(), "true");
}

#[tokio::test]
async fn validation_flow_through_a_handler() {
    async fn create_user(
        req: Request,
        _params: PathParams,
    ) -> Result<Response, skiff::Error> {
        let terms = RequestTerms::new()
            .method(http::Method::POST, Terms::new().body(&["name", "age"]));
        match validate_request(&req, &terms) {
            Ok(body) => skiff::json(&json!({ "created": body["name"] })),
            Err(e) => Ok(Response::builder()
                .status(e.status)
                .json(serde_json::to_vec(&json!({ "error": e.message })).unwrap())),
        }
    }

    let dispatcher = Dispatcher::new(Routes::new().on("/users", create_user));

    let response = dispatcher
        .dispatch(post_json("/users", json!({ "name": "Satya" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body_of(response).await).unwrap();
    assert_eq!(body["error"], "field 'age' is not available in the body");

    let response = dispatcher
        .dispatch(post_json("/users", json!({ "name": "Satya", "age": 98 })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_of(response).await).unwrap();
    assert_eq!(body["created"], "Satya");
}

#[tokio::test]
async fn catch_all_params_join_nested_paths() {
    let dir = FixtureDir::new("nested");
    std::fs::create_dir_all(dir.path().join("docs")).unwrap();
    std::fs::write(dir.path().join("docs/guide.md"), "guide").unwrap();

    let dispatcher = Dispatcher::new(static_routes(&dir));
    let response = dispatcher.dispatch(get("/static/docs/guide.md")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_of(response).await, "guide");
}
