//! Per-client rate limiting for abuse-prone public endpoints.
//!
//! The client is identified by the first `X-Forwarded-For` entry, then
//! `X-Real-IP`, then the socket peer address. Proxy headers are trusted as-is.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::AppState;
use crate::error::ApiError;
use larder_core::ratelimit::RateLimitDecision;

/// Key used when no client address can be determined.
const UNKNOWN_CLIENT: &str = "unknown";

/// Derives the rate-limit key for a request.
pub fn client_key<B>(request: &axum::http::Request<B>) -> String {
    let headers = request.headers();

    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return ip.to_string();
    }

    if let Some(ip) = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| UNKNOWN_CLIENT.to_string(), |ConnectInfo(addr)| addr.ip().to_string())
}

/// Rejects the request with 429 once the client has used up its window.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);

    match state.rate_limiter.check(&key) {
        RateLimitDecision::Allowed { .. } => next.run(request).await,
        RateLimitDecision::Limited { retry_after } => {
            warn!(client = %key, path = %request.uri().path(), "Rate limit exceeded");

            let secs = retry_after.as_secs().max(1);
            let mut response = ApiError::new(
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests, please try again later",
            )
            .into_response();
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
            response
        }
    }
}
