//! Lead routes: public capture plus the staff workflow and CSV export.

use axum::{
    Router,
    body::{Body, Bytes},
    extract::State,
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use futures::{StreamExt, TryStreamExt, stream};
use sea_orm::DbErr;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::{Json, Path, Query};
use crate::middleware::{
    auth::{AuthUser, auth_middleware},
    rate_limit::rate_limit_middleware,
};
use larder_core::audit::{AuditAction, AuditEntity};
use larder_core::leads::{LeadFilter, LeadQuery, LeadStatus, LeadUpdate, NewLead, csv};
use larder_db::entities::leads;
use larder_db::{
    AuditRepository, EXPORT_BATCH_SIZE, LeadDetail, LeadRecord, LeadRepository, NewAuditEntry,
};

/// Creates the lead router.
///
/// `POST /leads` is public and rate limited; every other route requires a token.
pub fn routes(state: &AppState) -> Router<AppState> {
    let rate_limited = middleware::from_fn_with_state(state.clone(), rate_limit_middleware);
    let authenticated = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let staff = Router::new()
        .route("/leads/export.csv", get(export_csv))
        .route("/leads/{id}", get(get_lead).put(update_lead))
        .route("/leads/{id}/notes", post(add_note))
        .route_layer(authenticated.clone());

    Router::new()
        .route(
            "/leads",
            post(create_lead)
                .route_layer(rate_limited)
                .merge(get(list_leads).route_layer(authenticated)),
        )
        .merge(staff)
}

/// Body of a lead update.
#[derive(Debug, Deserialize)]
pub struct UpdateLeadRequest {
    pub status: Option<String>,
    pub tags: Option<Value>,
}

/// Body of a new note.
#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub note: String,
}

fn repo(state: &AppState) -> LeadRepository {
    LeadRepository::new((*state.db).clone())
}

/// POST /leads - Capture a contact form submission.
async fn create_lead(
    State(state): State<AppState>,
    Json(payload): Json<NewLead>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let lead = repo(&state).create(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": lead.id, "message": "Lead created successfully" })),
    ))
}

/// GET /leads - Filtered, paginated lead list.
async fn list_leads(
    State(state): State<AppState>,
    Query(query): Query<LeadQuery>,
) -> ApiResult<Json<Vec<LeadRecord>>> {
    let filter = LeadFilter::try_from(query)?;
    Ok(Json(repo(&state).list(&filter).await?))
}

/// GET /leads/{id} - One lead with its notes.
async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<LeadDetail>> {
    Ok(Json(repo(&state).find_with_notes(id).await?))
}

/// PUT /leads/{id} - Change status and/or tags.
async fn update_lead(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateLeadRequest>,
) -> ApiResult<Json<Value>> {
    let update = LeadUpdate::parse(payload.status.as_deref(), payload.tags.as_ref())?;
    repo(&state).update(id, &update).await?;

    let entry = NewAuditEntry::new(user.user_id(), AuditAction::UpdateLead, AuditEntity::Lead, id)
        .with_meta(update.audit_meta());
    AuditRepository::new((*state.db).clone()).record(entry).await;

    info!(lead_id = %id, user_id = %user.user_id(), "Lead updated");
    Ok(Json(json!({ "message": "Lead updated successfully", "id": id })))
}

/// POST /leads/{id}/notes - Append a note as the calling user.
async fn add_note(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<NoteRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let note = repo(&state)
        .add_note(id, user.user_id(), &payload.note)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": note.id, "message": "Note added successfully" })),
    ))
}

/// GET /leads/export.csv - Every lead as CSV, newest first.
///
/// Rows are fetched in keyset batches and written to the body as they arrive.
async fn export_csv(State(state): State<AppState>, user: AuthUser) -> Response {
    let leads_repo = repo(&state);
    info!(user_id = %user.user_id(), "Lead export started");

    let header = stream::once(async { Ok::<_, DbErr>(Bytes::from(csv::header_line())) });

    // `None` once the last batch has been sent.
    let rows = stream::try_unfold(Some(None), move |cursor| {
        next_chunk(leads_repo.clone(), cursor)
    })
    .inspect_err(|e| error!(error = %e, "Lead export aborted"));

    (
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"leads.csv\""),
        ],
        Body::from_stream(header.chain(rows)),
    )
        .into_response()
}

/// Renders the batch below `cursor` and returns the cursor for the next one.
async fn next_chunk(
    repo: LeadRepository,
    cursor: Option<Option<i64>>,
) -> Result<Option<(Bytes, Option<Option<i64>>)>, DbErr> {
    let Some(before_id) = cursor else {
        return Ok(None);
    };
    let batch = repo.export_batch(before_id, EXPORT_BATCH_SIZE).await?;
    if batch.is_empty() {
        return Ok(None);
    }

    let next = if u64::try_from(batch.len()).is_ok_and(|n| n == EXPORT_BATCH_SIZE) {
        batch.last().map(|lead| Some(lead.id))
    } else {
        None
    };
    Ok(Some((Bytes::from(render_rows(&batch)), next)))
}

fn render_rows(batch: &[leads::Model]) -> String {
    let mut out = String::new();
    for lead in batch {
        csv::write_row(
            &mut out,
            &csv::CsvLead {
                id: lead.id,
                full_name: lead.full_name.as_deref(),
                email: lead.email.as_deref(),
                phone: lead.phone.as_deref(),
                source: Some(lead.source.as_str()),
                status: LeadStatus::from(lead.status).as_str(),
                created_at: lead.created_at,
            },
        );
    }
    out
}
