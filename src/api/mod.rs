pub mod attendance;
pub mod db_records;
pub mod proxy;
pub mod routes;

pub use routes::create_router;

use crate::{
    attendance::DedupWindow, config::Config, recognizer::RecognizerClient, store::RecordStore,
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<RecordStore>,
    pub recognizer: RecognizerClient,
    pub window: DedupWindow,
}

impl AppState {
    pub fn new(config: Config, store: RecordStore, recognizer: RecognizerClient) -> Self {
        let window = DedupWindow::from_secs(config.dedup_window_secs).unwrap_or_default();
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            recognizer,
            window,
        }
    }
}

// ===== Error Handling =====

#[derive(Debug)]
pub enum ApiError {
    Internal(anyhow::Error),
    BadGateway(anyhow::Error),
    BadRequest(String),
    Forbidden(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ApiError::BadGateway(err) => {
                tracing::warn!("Upstream error: {:#}", err);
                (StatusCode::BAD_GATEWAY, "Recognizer unavailable".to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
