//! Pass-through endpoints to the recognizer.
//!
//! - `GET /api/py/last` -> `{PY_BASE}/api/last`
//! - `GET /video_feed` -> `{PY_BASE}/video_feed` (MJPEG, streamed)

use super::{ApiError, AppState};
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};

fn relay(status: u16, content_type: Option<String>, body: Body) -> Result<Response, ApiError> {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = Response::builder().status(status);
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    builder
        .body(body)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("failed to build proxy response: {}", e)))
}

pub async fn get_last_result(State(state): State<AppState>) -> Result<Response, ApiError> {
    let reply = state
        .recognizer
        .last_result()
        .await
        .map_err(ApiError::BadGateway)?;
    relay(reply.status, reply.content_type, Body::from(reply.body))
}

pub async fn get_video_feed(State(state): State<AppState>) -> Result<Response, ApiError> {
    let reply = state
        .recognizer
        .video_feed()
        .await
        .map_err(ApiError::BadGateway)?;
    relay(reply.status, reply.content_type, Body::from_stream(reply.body))
}
