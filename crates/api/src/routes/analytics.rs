//! Lead analytics route.

use axum::{Router, extract::State, routing::get};
use chrono::Utc;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::{Json, Query};
use larder_core::leads::SummaryWindow;
use larder_db::{LeadRepository, LeadSummary};

/// Creates the analytics router. Mounted behind the auth middleware.
pub fn routes() -> Router<AppState> {
    Router::new().route("/analytics/leads-summary", get(leads_summary))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub days: Option<u32>,
}

/// GET /analytics/leads-summary - Lead counts by day, source, and status.
async fn leads_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<LeadSummary>> {
    let window = SummaryWindow::from_query(query.days);
    let summary = LeadRepository::new((*state.db).clone())
        .summary(window, Utc::now())
        .await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::Utc;
    use serde_json::json;

    use crate::test_support::{
        body_json, get_request, json_request, register_and_login, send, test_app,
    };

    #[tokio::test]
    async fn test_summary_requires_token() {
        let (app, _) = test_app().await;

        let response = send(&app, get_request("/api/analytics/leads-summary", None)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_summary_counts() {
        let (app, _) = test_app().await;
        let token = register_and_login(&app, "a@x.com", "secret1", "STAFF").await;
        for source in ["ads", "ads", "referral"] {
            send(&app, json_request("POST", "/api/leads", None, &json!({"source": source}))).await;
        }
        send(&app, json_request("PUT", "/api/leads/1", Some(&token), &json!({"status": "won"}))).await;

        let response = send(
            &app,
            get_request("/api/analytics/leads-summary?days=7", Some(&token)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let summary = body_json(response).await;

        let today = Utc::now().format("%Y-%m-%d").to_string();
        assert_eq!(summary["byDay"], json!([{"date": today, "count": 3}]));
        assert_eq!(
            summary["bySource"],
            json!([{"source": "ads", "count": 2}, {"source": "referral", "count": 1}])
        );
        assert_eq!(
            summary["byStatus"],
            json!([{"status": "new", "count": 2}, {"status": "won", "count": 1}])
        );
    }

    #[tokio::test]
    async fn test_empty_summary() {
        let (app, _) = test_app().await;
        let token = register_and_login(&app, "a@x.com", "secret1", "STAFF").await;

        let summary = body_json(
            send(&app, get_request("/api/analytics/leads-summary?days=0", Some(&token))).await,
        )
        .await;

        assert_eq!(summary, json!({"byDay": [], "bySource": [], "byStatus": []}));
    }
}
