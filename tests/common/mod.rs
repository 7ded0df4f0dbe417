//! Shared helpers for driving the application router in-process.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use shelf_kernel::settings::{Environment, Settings};
use tower::util::ServiceExt; // for `oneshot`

/// Settings with cheap bcrypt and terse error bodies
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.environment = Environment::Test;
    settings.auth.bcrypt_cost = 4;
    settings
}

pub fn setup_app() -> Router {
    shelf_app::build_app(&test_settings()).expect("app should build")
}

pub fn setup_app_in(environment: Environment) -> Router {
    let mut settings = test_settings();
    settings.environment = environment;
    shelf_app::build_app(&settings).expect("app should build")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send one request through a clone of `app`, returning status and raw body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("should read body");
    (status, bytes.to_vec())
}

/// Like [`send`], parsing the body as JSON.
pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, request).await;
    let body = serde_json::from_slice(&bytes).expect("should parse JSON");
    (status, body)
}
