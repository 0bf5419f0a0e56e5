//! `/api/data`, `/api/bulk`, `/api/reindex` and `/api/next-no` handlers.
//!
//! Every handler resolves the category first, so an unknown category is a
//! 400 regardless of the id or body.

use super::{AppJson, AppState, MessageResponse};
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::record::WireRecord;
use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A non-numeric id can never match a row.
fn parse_id(raw: &str) -> AppResult<i64> {
    raw.trim().parse().map_err(|_| AppError::NotFound)
}

/// GET /api/data/{category}
pub async fn list(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<Vec<WireRecord>>> {
    let category = Category::parse(&category)?;
    let rows = state.run(move |s| s.list(category)).await?;
    Ok(Json(rows))
}

/// GET /api/data/{category}/{id}
pub async fn get_one(
    State(state): State<AppState>,
    Path((category, id)): Path<(String, String)>,
) -> AppResult<Json<WireRecord>> {
    let category = Category::parse(&category)?;
    let id = parse_id(&id)?;
    let row = state.run(move |s| s.get(category, id)).await?;
    Ok(Json(row))
}

/// POST /api/data/{category}
pub async fn create(
    State(state): State<AppState>,
    Path(category): Path<String>,
    AppJson(body): AppJson<WireRecord>,
) -> AppResult<Json<WireRecord>> {
    let category = Category::parse(&category)?;
    let row = state.run(move |s| s.insert(category, &body)).await?;
    info!(category = %category, id = ?row.get("id"), "record created");
    Ok(Json(row))
}

/// PUT /api/data/{category}/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((category, id)): Path<(String, String)>,
    AppJson(body): AppJson<WireRecord>,
) -> AppResult<Json<WireRecord>> {
    let category = Category::parse(&category)?;
    let id = parse_id(&id)?;
    let row = state.run(move |s| s.update(category, id, &body)).await?;
    Ok(Json(row))
}

/// DELETE /api/data/{category}/{id}
pub async fn delete_one(
    State(state): State<AppState>,
    Path((category, id)): Path<(String, String)>,
) -> AppResult<Json<MessageResponse>> {
    let category = Category::parse(&category)?;
    let id = parse_id(&id)?;
    state.run(move |s| s.delete_one(category, id)).await?;
    info!(category = %category, id, "record deleted");
    Ok(Json(MessageResponse {
        message: "Item deleted successfully",
    }))
}

/// DELETE /api/data/{category}
pub async fn delete_all(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let category = Category::parse(&category)?;
    state.run(move |s| s.delete_all(category)).await?;
    info!(category = %category, "all records deleted");
    Ok(Json(MessageResponse {
        message: "All data deleted successfully",
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    #[serde(default)]
    pub items: Vec<WireRecord>,
    #[serde(default)]
    pub clear_first: bool,
}

#[derive(Serialize)]
pub struct BulkResponse {
    pub message: &'static str,
    pub count: usize,
}

/// POST /api/bulk/{category}
pub async fn bulk(
    State(state): State<AppState>,
    Path(category): Path<String>,
    AppJson(req): AppJson<BulkRequest>,
) -> AppResult<Json<BulkResponse>> {
    let category = Category::parse(&category)?;
    let clear_first = req.clear_first;
    let count = state
        .run(move |s| s.bulk_upsert(category, &req.items, clear_first))
        .await?;
    info!(category = %category, count, clear_first, "bulk operation completed");
    Ok(Json(BulkResponse {
        message: "Bulk operation completed",
        count,
    }))
}

/// POST /api/reindex/{category}
pub async fn reindex(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let category = Category::parse(&category)?;
    state.run(move |s| s.renumber(category)).await?;
    info!(category = %category, "reindexing completed");
    Ok(Json(MessageResponse {
        message: "Reindexing completed",
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextNoResponse {
    pub next_no: i64,
}

/// GET /api/next-no/{category}
pub async fn next_no(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<NextNoResponse>> {
    let category = Category::parse(&category)?;
    let next_no = state.run(move |s| s.next_no(category)).await?;
    Ok(Json(NextNoResponse { next_no }))
}
