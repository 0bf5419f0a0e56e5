use super::{AppJson, AppState};
use crate::core::dashboard::{self, DashboardSummary};
use crate::errors::AppResult;
use crate::models::activity::{ActivityEntry, NewActivity};
use axum::extract::State;
use axum::response::Json;

/// GET /api/dashboard
pub async fn dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardSummary>> {
    let summary = dashboard::aggregate(state.store.clone()).await?;
    Ok(Json(summary))
}

/// GET /api/activities, newest first and capped.
pub async fn list_recent(State(state): State<AppState>) -> AppResult<Json<Vec<ActivityEntry>>> {
    let limit = state.activity_limit;
    let entries = state.run(move |s| s.recent_activities(limit)).await?;
    Ok(Json(entries))
}

/// POST /api/activities
pub async fn record(
    State(state): State<AppState>,
    AppJson(draft): AppJson<NewActivity>,
) -> AppResult<Json<ActivityEntry>> {
    let entry = state.run(move |s| s.record_activity(draft)).await?;
    Ok(Json(entry))
}
