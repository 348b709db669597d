//! Dashboard endpoints backed by the CSV recognition log.
//!
//! - `GET /api/stats` - deduplicated attendance statistics
//! - `GET /api/records` - raw rows with status filter, search and paging
//! - `GET /image?path=...` - snapshot preview, restricted to the image root

use super::{ApiError, AppState};
use crate::{
    attendance::compute_stats,
    models::{RecordsPage, StatsResponse},
    records::{filter_records, load_records_from_csv, paginate, RecordsQuery},
};
use axum::{
    body::Body,
    extract::{Query, State},
    http::Request,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::path::{Component, Path};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::warn;

/// Every call re-reads the log and recomputes from scratch. An unreadable
/// log yields all-zero stats instead of an error.
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let path = state.config.records_csv_path.clone();
    let window = state.window;

    let stats = tokio::task::spawn_blocking(move || {
        let records = load_records_from_csv(&path).unwrap_or_else(|e| {
            warn!(error = %e, "records unavailable, reporting empty stats");
            Vec::new()
        });
        compute_stats(&records, &window)
    })
    .await
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("stats task failed: {}", e)))?;

    Ok(Json(stats))
}

pub async fn get_records(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<RecordsPage>, ApiError> {
    let path = state.config.records_csv_path.clone();

    let page = tokio::task::spawn_blocking(move || match load_records_from_csv(&path) {
        Ok(records) => {
            let filtered = filter_records(records, &query);
            paginate(filtered, query.page(), query.page_size())
        }
        Err(e) => {
            warn!(error = %e, "records unavailable, returning empty page");
            RecordsPage::empty()
        }
    })
    .await
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("records task failed: {}", e)))?;

    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub path: Option<String>,
}

/// Whether `path` may be served from below `root`.
pub fn is_servable_image_path(path: &str, root: &str) -> bool {
    path.starts_with(root)
        && !Path::new(path)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
}

pub async fn get_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    let path = query.path.as_deref().map(str::trim).unwrap_or_default();
    if path.is_empty() {
        return Err(ApiError::BadRequest("missing path".to_string()));
    }
    if !is_servable_image_path(path, &state.config.image_root) {
        return Err(ApiError::Forbidden("forbidden".to_string()));
    }

    let response = ServeFile::new(path)
        .oneshot(request)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("image serve failed: {}", e)))?;
    Ok(response.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_path_must_be_under_root() {
        assert!(is_servable_image_path("/data/unknow/a.jpg", "/data/"));
        assert!(!is_servable_image_path("/etc/passwd", "/data/"));
        assert!(!is_servable_image_path("/data", "/data/"));
    }

    #[test]
    fn test_image_path_rejects_parent_components() {
        assert!(!is_servable_image_path("/data/../etc/passwd", "/data/"));
        assert!(!is_servable_image_path("/data/a/../../etc/shadow", "/data/"));
        assert!(is_servable_image_path("/data/a..b.jpg", "/data/"));
    }
}
