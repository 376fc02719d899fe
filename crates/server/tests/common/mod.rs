//! Shared helpers for router-level tests.
//!
//! Tests drive the full router against the in-memory store; no database or
//! network is involved.

// Not every test binary uses every helper
#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use serde_json::Value;
use tower::ServiceExt;

use bazaar_server::config::AppConfig;
use bazaar_server::routes;
use bazaar_server::state::AppState;

/// Build the application router over a fresh in-memory store.
#[must_use]
pub fn build_app() -> Router {
    routes::app(AppState::in_memory(AppConfig::default()))
}

/// Send a request without a body.
pub async fn send(app: &Router, method: &str, uri: &str) -> Response<Body> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

/// Send a request with a JSON body.
pub async fn send_json(app: &Router, method: &str, uri: &str, body: &Value) -> Response<Body> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as text.
pub async fn body_text(resp: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Create a product through the API, returning its id.
pub async fn seed_product(app: &Router, fields: &Value) -> String {
    let resp = send_json(app, "POST", "/api/products", fields).await;
    assert_eq!(resp.status(), axum::http::StatusCode::CREATED);
    let json = body_json(resp).await;
    json["payload"]["id"].as_str().unwrap().to_string()
}

/// Create an empty cart through the API, returning its id.
pub async fn seed_cart(app: &Router) -> String {
    let resp = send_json(app, "POST", "/api/carts", &serde_json::json!({})).await;
    assert_eq!(resp.status(), axum::http::StatusCode::CREATED);
    let json = body_json(resp).await;
    json["payload"]["id"].as_str().unwrap().to_string()
}
