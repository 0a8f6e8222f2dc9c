#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use asmakam_api::config::ServerConfig;
use asmakam_api::router::build_app_router;
use asmakam_api::state::AppState;
use asmakam_core::contact::OrderContact;
use asmakam_db::FeedbackStore;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

/// Admin password configured on every test app built by [`build_test_app`].
pub const ADMIN_PASSWORD: &str = "test-admin-secret";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:3000` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(feedback_file: PathBuf, admin_password: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        feedback_file,
        admin_password: admin_password.map(str::to_string),
        order_contact: OrderContact::default(),
    }
}

/// A router over a store in its own temp directory.
///
/// Keep the value alive for the duration of the test; dropping it removes
/// the directory.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<FeedbackStore>,
    pub dir: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Full application router with [`ADMIN_PASSWORD`] configured.
pub async fn build_test_app() -> TestApp {
    build_test_app_with_secret(Some(ADMIN_PASSWORD)).await
}

/// Full application router with the given (or no) admin secret.
///
/// Mirrors `main.rs` through `build_app_router`, so tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery).
pub async fn build_test_app_with_secret(admin_password: Option<&str>) -> TestApp {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = test_config(dir.path().join("data").join("feedback.json"), admin_password);
    let store = Arc::new(
        FeedbackStore::open(&config.feedback_file)
            .await
            .expect("open feedback store"),
    );

    let state = AppState {
        store: Arc::clone(&store),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_admin(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(ADMIN_PASSWORD), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn patch_admin(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(ADMIN_PASSWORD), Some(body)).await
}

pub async fn delete_admin(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(ADMIN_PASSWORD), Some(body)).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// POST a valid submission and return the created record's id.
pub async fn submit(app: Router, body: serde_json::Value) -> String {
    let response = post_json(app, "/api/feedback", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}
