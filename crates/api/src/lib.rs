//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication and rate-limit middleware
//! - Error-to-response mapping

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod test_support;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use larder_core::ratelimit::SlidingWindowLimiter;
use larder_shared::JwtService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Per-client limiter for login and lead capture.
    pub rate_limiter: Arc<SlidingWindowLimiter>,
    /// Serializes homepage publishes within this process.
    pub publish_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Builds the state from its services.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        jwt_service: JwtService,
        rate_limiter: Arc<SlidingWindowLimiter>,
    ) -> Self {
        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            rate_limiter,
            publish_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(&state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
