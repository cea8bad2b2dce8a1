//! Authentication routes for register, login, and the current account.

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::task;
use tracing::{info, warn};

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::Json;
use crate::middleware::{auth::AuthUser, rate_limit::rate_limit_middleware};
use larder_core::auth::{
    AuthError, UserRole, dummy_verify, hash_password, normalize_email, requested_role,
    validate_registration, verify_password,
};
use larder_db::UserRepository;
use larder_shared::AppError;
use larder_shared::auth::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

/// Creates the public auth router. Login is rate limited per client.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/auth/login",
            post(login).layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_middleware,
            )),
        )
        .route("/auth/register", post(register))
}

/// Creates the auth routes that require a token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// Current account as stored.
#[derive(Debug, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// POST /auth/register - Register a new account.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Json<Value>> {
    let email = validate_registration(&payload.email, &payload.password)?;
    let role = requested_role(payload.role.as_deref())?;

    let password = payload.password;
    let password_hash = task::spawn_blocking(move || hash_password(&password)).await??;

    let user = UserRepository::new((*state.db).clone())
        .register(&email, &password_hash, role)
        .await?;

    Ok(Json(json!({
        "message": "User registered successfully",
        "id": user.id,
    })))
}

/// POST /auth/login - Authenticate and return a bearer token.
///
/// Unknown email and wrong password produce the same response; a dummy
/// verification keeps both paths equally slow.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let email = normalize_email(&payload.email);
    let user = UserRepository::new((*state.db).clone())
        .find_by_email(&email)
        .await?;

    let password = payload.password;
    let Some(user) = user else {
        task::spawn_blocking(move || dummy_verify(&password)).await?;
        info!("Login attempt for unknown email");
        return Err(AuthError::InvalidCredentials.into());
    };

    let hash = user.password_hash.clone();
    let verified = task::spawn_blocking(move || verify_password(&password, &hash)).await?;
    match verified {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return Err(AuthError::InvalidCredentials.into());
        }
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
            return Err(AuthError::InvalidCredentials.into());
        }
    }

    let role = UserRole::from(user.role);
    let token = state
        .jwt_service
        .generate_token(user.id, &user.email, role.as_str())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(user_id = %user.id, "User logged in successfully");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user.id,
            email: user.email,
            role: role.as_str().to_string(),
        },
    }))
}

/// GET /me - The account behind the token.
async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<CurrentUser>> {
    let account = UserRepository::new((*state.db).clone())
        .find_by_id(user.user_id())
        .await?
        .ok_or(AuthError::UserNotFound(user.user_id()))?;

    Ok(Json(CurrentUser {
        id: account.id,
        email: account.email,
        role: account.role.into(),
        created_at: account.created_at,
    }))
}
