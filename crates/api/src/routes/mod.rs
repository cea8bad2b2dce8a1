//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod analytics;
pub mod audit;
pub mod auth;
pub mod health;
pub mod homepage;
pub mod leads;

/// Creates the API router.
///
/// Lead routes apply their own per-method guards since `/leads` mixes a
/// public, rate-limited `POST` with an authenticated `GET`.
pub fn api_routes_with_state(state: &AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(homepage::protected_routes())
        .merge(analytics::routes())
        .merge(audit::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes(state))
        .merge(homepage::public_routes())
        .merge(leads::routes(state))
        .merge(protected_routes)
}
