//! Audit log route.

use axum::{Router, extract::State, routing::get};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::{Json, Query};
use larder_core::audit::list_limit;
use larder_db::{AuditRecord, AuditRepository};

/// Creates the audit router. Mounted behind the auth middleware.
pub fn routes() -> Router<AppState> {
    Router::new().route("/audit", get(list_entries))
}

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<u64>,
}

/// GET /audit - Newest entries first.
async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> ApiResult<Json<Vec<AuditRecord>>> {
    let entries = AuditRepository::new((*state.db).clone())
        .list(list_limit(query.limit))
        .await?;
    Ok(Json(entries))
}
