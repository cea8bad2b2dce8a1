//! Shared fixtures for router tests.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header::AUTHORIZATION, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use larder_core::ratelimit::{RateLimitConfig, SlidingWindowLimiter};
use larder_shared::{JwtConfig, JwtService};

use crate::{AppState, create_router};

/// State over a fresh in-memory database with the default limiter.
pub async fn test_state() -> AppState {
    test_state_with_limit(RateLimitConfig::default().max_requests).await
}

/// State whose limiter admits `max_requests` per client.
pub async fn test_state_with_limit(max_requests: usize) -> AppState {
    let db = larder_db::connect_in_memory()
        .await
        .expect("Failed to open database");
    let jwt_service = JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        token_expires_days: 7,
    });
    let limiter = SlidingWindowLimiter::new(RateLimitConfig {
        max_requests,
        window: Duration::from_secs(900),
    });
    AppState::new(db, jwt_service, Arc::new(limiter))
}

/// Full router over a fresh state.
pub async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    (create_router(state.clone()), state)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Sends one request through a clone of the router.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Registers an account and returns a bearer token for it.
pub async fn register_and_login(app: &Router, email: &str, password: &str, role: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "email": email, "password": password, "role": role }),
        ),
    )
    .await;
    assert!(response.status().is_success(), "register {email} failed");

    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": email, "password": password }),
        ),
    )
    .await;
    assert!(response.status().is_success(), "login {email} failed");
    body_json(response).await["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}
