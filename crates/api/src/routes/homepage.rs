//! Homepage content routes: public read, draft editing, and publishing.

use axum::{
    Router,
    extract::State,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::{Json, Path};
use crate::middleware::auth::AuthUser;
use larder_core::homepage::{HomepageService, VersionStatus};
use larder_db::{HomepageRepository, VersionSummary, payload_of};

/// Creates the public homepage routes.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/homepage/current", get(current))
}

/// Creates the homepage routes that require a token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/homepage/draft", post(create_draft))
        .route("/homepage/draft/{id}", put(update_draft))
        .route("/homepage/{id}/publish", post(publish))
        .route("/homepage/versions", get(list_versions))
}

/// Draft as returned on creation.
#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub id: i64,
    pub version: i64,
    pub status: VersionStatus,
    pub data: Value,
}

/// Body of a draft update.
#[derive(Debug, Deserialize)]
pub struct UpdateDraftRequest {
    pub data: Option<Value>,
}

fn repo(state: &AppState) -> HomepageRepository {
    HomepageRepository::new((*state.db).clone())
}

/// GET /homepage/current - Published payload, or `null` when nothing is published.
async fn current(State(state): State<AppState>) -> ApiResult<Json<Option<Value>>> {
    Ok(Json(repo(&state).current_payload().await?))
}

/// POST /homepage/draft - Start a draft from the published payload.
async fn create_draft(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<DraftResponse>> {
    let draft = repo(&state).create_draft(user.user_id()).await?;
    let data = payload_of(&draft)?;

    Ok(Json(DraftResponse {
        id: draft.id,
        version: draft.version,
        status: draft.status.into(),
        data,
    }))
}

/// PUT /homepage/draft/{id} - Replace a draft's payload.
async fn update_draft(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateDraftRequest>,
) -> ApiResult<Json<Value>> {
    let data = HomepageService::require_payload(payload.data.as_ref())?;
    repo(&state).update_draft(id, data).await?;

    Ok(Json(json!({ "message": "Draft updated successfully", "id": id })))
}

/// POST /homepage/{id}/publish - Publish a version (MASTER only).
async fn publish(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let _guard = state.publish_lock.lock().await;
    let published = repo(&state)
        .publish(id, user.user_id(), user.role())
        .await?;

    Ok(Json(json!({
        "message": "Published successfully",
        "id": published.id,
        "version": published.version,
    })))
}

/// GET /homepage/versions - Version history, newest first.
async fn list_versions(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<VersionSummary>>> {
    Ok(Json(repo(&state).list_versions().await?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::test_support::{
        body_json, get_request, json_request, register_and_login, send, test_app,
    };

    #[tokio::test]
    async fn test_current_is_null_before_any_publish() {
        let (app, _) = test_app().await;

        let response = send(&app, get_request("/api/homepage/current", None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, Value::Null);
    }

    #[tokio::test]
    async fn test_master_publish_scenario() {
        let (app, _) = test_app().await;

        let first = send(
            &app,
            json_request(
                "POST",
                "/api/auth/register",
                None,
                &json!({"email": "a@x.com", "password": "secret1", "role": "MASTER"}),
            ),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = send(
            &app,
            json_request(
                "POST",
                "/api/auth/register",
                None,
                &json!({"email": "b@x.com", "password": "secret2", "role": "MASTER"}),
            ),
        )
        .await;
        assert_eq!(second.status(), StatusCode::FORBIDDEN);

        let login = send(
            &app,
            json_request(
                "POST",
                "/api/auth/login",
                None,
                &json!({"email": "a@x.com", "password": "secret1"}),
            ),
        )
        .await;
        assert_eq!(login.status(), StatusCode::OK);
        let token = body_json(login).await["token"].as_str().unwrap().to_string();

        let draft = send(
            &app,
            json_request("POST", "/api/homepage/draft", Some(&token), &json!({})),
        )
        .await;
        assert_eq!(draft.status(), StatusCode::OK);
        let draft = body_json(draft).await;
        assert_eq!(draft["id"], 1);
        assert_eq!(draft["status"], "draft");
        assert_eq!(draft["data"], json!({}));

        let update = send(
            &app,
            json_request(
                "PUT",
                "/api/homepage/draft/1",
                Some(&token),
                &json!({"data": {"hero": {"title": "T"}}}),
            ),
        )
        .await;
        assert_eq!(update.status(), StatusCode::OK);

        let publish = send(
            &app,
            json_request("POST", "/api/homepage/1/publish", Some(&token), &json!({})),
        )
        .await;
        assert_eq!(publish.status(), StatusCode::OK);

        let current = send(&app, get_request("/api/homepage/current", None)).await;
        assert_eq!(body_json(current).await, json!({"hero": {"title": "T"}}));

        let versions = send(&app, get_request("/api/homepage/versions", Some(&token))).await;
        let versions = body_json(versions).await;
        assert_eq!(versions[0]["status"], "published");
        assert_eq!(versions[0]["is_current"], true);

        let audit = send(&app, get_request("/api/audit", Some(&token))).await;
        let audit = body_json(audit).await;
        assert_eq!(audit[0]["action"], "publish_homepage");
        assert_eq!(audit[0]["entity_id"], 1);
        assert_eq!(audit[0]["user_email"], "a@x.com");
    }

    #[tokio::test]
    async fn test_staff_cannot_publish() {
        let (app, _) = test_app().await;
        register_and_login(&app, "a@x.com", "secret1", "MASTER").await;
        let staff = register_and_login(&app, "s@x.com", "secret1", "STAFF").await;

        send(&app, json_request("POST", "/api/homepage/draft", Some(&staff), &json!({}))).await;
        let publish = send(
            &app,
            json_request("POST", "/api/homepage/1/publish", Some(&staff), &json!({})),
        )
        .await;

        assert_eq!(publish.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(publish).await["error"], "publish_forbidden");

        let current = send(&app, get_request("/api/homepage/current", None)).await;
        assert_eq!(body_json(current).await, Value::Null);
    }

    #[tokio::test]
    async fn test_draft_update_errors() {
        let (app, _) = test_app().await;
        let master = register_and_login(&app, "a@x.com", "secret1", "MASTER").await;
        send(&app, json_request("POST", "/api/homepage/draft", Some(&master), &json!({}))).await;

        let missing = send(
            &app,
            json_request("PUT", "/api/homepage/draft/1", Some(&master), &json!({})),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let unknown = send(
            &app,
            json_request("PUT", "/api/homepage/draft/9", Some(&master), &json!({"data": {}})),
        )
        .await;
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        send(&app, json_request("POST", "/api/homepage/1/publish", Some(&master), &json!({}))).await;
        let frozen = send(
            &app,
            json_request("PUT", "/api/homepage/draft/1", Some(&master), &json!({"data": {"x": 1}})),
        )
        .await;
        assert_eq!(frozen.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(frozen).await["error"], "version_published");
    }

    #[tokio::test]
    async fn test_second_draft_starts_from_published() {
        let (app, _) = test_app().await;
        let master = register_and_login(&app, "a@x.com", "secret1", "MASTER").await;
        let payload = json!({"hero": {"title": "Summer"}, "products": [{"id": 1}]});

        send(&app, json_request("POST", "/api/homepage/draft", Some(&master), &json!({}))).await;
        send(
            &app,
            json_request("PUT", "/api/homepage/draft/1", Some(&master), &json!({"data": payload})),
        )
        .await;
        send(&app, json_request("POST", "/api/homepage/1/publish", Some(&master), &json!({}))).await;

        let second = send(&app, json_request("POST", "/api/homepage/draft", Some(&master), &json!({}))).await;
        let second = body_json(second).await;
        assert_eq!(second["version"], 2);
        assert_eq!(second["data"], payload);
    }

    #[tokio::test]
    async fn test_publish_unknown_version_is_not_found() {
        let (app, _) = test_app().await;
        let master = register_and_login(&app, "a@x.com", "secret1", "MASTER").await;

        let response = send(
            &app,
            json_request("POST", "/api/homepage/5/publish", Some(&master), &json!({})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
