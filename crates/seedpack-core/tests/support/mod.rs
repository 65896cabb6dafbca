#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Json;
use axum::Router;
use axum::extract::Request;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::middleware::Next;
use axum::routing::{delete, get, post};
use serde_json::{Value, json};

pub const INIT_MANIFEST: &str = r#"{
    "path": "/packages/zarf-init-amd64.tar.zst",
    "zarfPackage": {
        "kind": "ZarfInitConfig",
        "metadata": {
            "name": "init",
            "description": "Used to establish a new Zarf cluster"
        },
        "components": [
            { "name": "zarf-injector", "required": true, "default": true },
            { "name": "k3s", "description": "*** REQUIRES ROOT *** Install K3s" },
            { "name": "logging", "default": true }
        ]
    }
}"#;

/// In-process backend bound to an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    /// Number of requests that reached the server.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub async fn spawn(router: Router) -> TestServer {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = router.layer(axum::middleware::from_fn(
        move |req: Request, next: Next| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                next.run(req).await
            }
        },
    ));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        hits,
    }
}

/// Backend with the routes the client tests exercise.
pub fn backend() -> Router {
    Router::new()
        .route("/api/whoami", get(echo_headers))
        .route("/api/echo", post(echo_body).put(echo_body).patch(echo_body))
        .route(
            "/api/fail",
            get(failure_text).post(failure_text).put(failure_text),
        )
        .route("/api/boom", delete(boom))
        .route("/api/items/1", delete(|| async { Json(true) }))
        .route("/api/items/2", delete(|| async { Json(false) }))
        .route("/api/health", get(|| async { Json(true) }))
        .route("/api/not-json", get(|| async { "plain text" }))
        .route(
            "/api/cluster/summary",
            get(|| async { Json(json!({"reachable": true, "hasZarf": false, "distro": "k3s"})) }),
        )
        .route(
            "/api/packages/find-init",
            get(|| async { Json(vec!["/packages/zarf-init-amd64.tar.zst"]) }),
        )
        .route("/api/packages/read/{path}", get(read_package))
        .route("/api/packages/deploy", axum::routing::put(deploy))
        .route(
            "/api/components/deployed",
            get(|| async { Json(json!([{"name": "logging", "packageName": "init"}])) }),
        )
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "authorization": header_str(&headers, AUTHORIZATION),
        "contentType": header_str(&headers, CONTENT_TYPE),
    }))
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn echo_body(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

async fn failure_text() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "failure text")
}

async fn boom() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn read_package(
    axum::extract::Path(path): axum::extract::Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    if path == "/packages/zarf-init-amd64.tar.zst" {
        Ok(Json(serde_json::from_str(INIT_MANIFEST).unwrap()))
    } else {
        Err((StatusCode::NOT_FOUND, format!("package not found: {path}")))
    }
}

async fn deploy(Json(body): Json<Value>) -> Result<Json<bool>, (StatusCode, String)> {
    match body["components"].as_str() {
        Some(_) if body["packagePath"].is_string() => Ok(Json(true)),
        _ => Err((StatusCode::BAD_REQUEST, "invalid deploy request".to_string())),
    }
}
