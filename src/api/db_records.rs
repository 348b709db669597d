//! SQLite record store endpoints.
//!
//! - `POST /api/db/records` - recognizer callback after a successful match
//! - `GET /api/db/records?limit=N` - newest stored records

use super::{ApiError, AppState};
use crate::store::{list_limit, NewRecord, StoredRecord};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

pub async fn post_record(
    State(state): State<AppState>,
    payload: Result<Json<NewRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(record) = payload.map_err(|e| {
        debug!("rejected record body: {}", e);
        ApiError::BadRequest("bad json".to_string())
    })?;

    let store = state.store.clone();
    let id = tokio::task::spawn_blocking(move || store.insert(&record))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("insert task failed: {}", e)))?
        .map_err(|e| {
            error!("insert error: {:#}", e);
            ApiError::Internal(e)
        })?;

    debug!(id, "record stored");
    Ok((StatusCode::CREATED, Json(json!({ "ok": true }))))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
}

pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    let limit = list_limit(query.limit.as_deref().and_then(|s| s.trim().parse().ok()));

    let store = state.store.clone();
    let records = tokio::task::spawn_blocking(move || store.list(limit))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("list task failed: {}", e)))??;

    Ok(Json(records))
}
