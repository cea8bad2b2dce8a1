//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;
use crate::error::ApiError;
use larder_shared::{Claims, JwtError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
///
/// No database lookup happens here: the signed claims are trusted until they expire.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError::new(
            StatusCode::UNAUTHORIZED,
            "missing_token",
            "Authorization header with Bearer token is required",
        )
        .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let (error, message) = match e {
                JwtError::Expired => ("token_expired", "Token has expired"),
                _ => ("invalid_token", "Invalid or malformed token"),
            };
            ApiError::new(StatusCode::UNAUTHORIZED, error, message).into_response()
        }
    }
}

/// Extractor for authenticated user claims.
///
/// Use this in handlers to get the authenticated user's claims:
///
/// ```ignore
/// async fn handler(user: AuthUser) -> impl IntoResponse {
///     let user_id = user.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.0.user_id()
    }

    /// Returns the email the token was issued for.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.0.email
    }

    /// Returns the user's role.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.0.role
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, middleware::from_fn_with_state, routing::get};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    use crate::test_support::{body_json, test_state};

    async fn whoami(user: AuthUser) -> Json<serde_json::Value> {
        Json(json!({ "id": user.user_id(), "email": user.email(), "role": user.role() }))
    }

    async fn app() -> (Router, AppState) {
        let state = test_state().await;
        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state.clone());
        (app, state)
    }

    fn request(auth: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (app, _) = app().await;

        let response = app.oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "missing_token");
    }

    #[tokio::test]
    async fn test_malformed_token_is_unauthorized() {
        let (app, _) = app().await;

        let response = app
            .oneshot(request(Some("Bearer not.a.jwt".into())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "invalid_token");
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let (app, state) = app().await;
        let claims = Claims::new(1, "a@x.com", "MASTER", Utc::now() - Duration::seconds(1));
        let token = state.jwt_service.encode_claims(&claims).unwrap();

        let response = app
            .oneshot(request(Some(format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "token_expired");
    }

    #[tokio::test]
    async fn test_valid_token_exposes_claims() {
        let (app, state) = app().await;
        let token = state.jwt_service.generate_token(7, "s@x.com", "STAFF").unwrap();

        let response = app
            .oneshot(request(Some(format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], 7);
        assert_eq!(body["email"], "s@x.com");
        assert_eq!(body["role"], "STAFF");
    }
}
