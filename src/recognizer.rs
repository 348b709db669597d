//! Client for the external face recognizer.
//!
//! The recognizer exposes its latest result and an MJPEG camera stream; the
//! dashboard reaches both through this backend so it only talks to one
//! origin.

use anyhow::{Context, Result};
use axum::body::Bytes;
use futures_util::{Stream, TryStreamExt};
use std::time::Duration;
use tracing::debug;

const LAST_RESULT_PATH: &str = "/api/last";
const VIDEO_FEED_PATH: &str = "/video_feed";

/// Upstream reply relayed to the dashboard as-is.
#[derive(Debug)]
pub struct UpstreamReply<B> {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: B,
}

#[derive(Clone)]
pub struct RecognizerClient {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl RecognizerClient {
    /// `request_timeout` bounds one-shot calls; the video stream is only
    /// bounded while connecting.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("attendance-backend/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the recognizer's most recent result.
    pub async fn last_result(&self) -> Result<UpstreamReply<Bytes>> {
        let url = self.url(LAST_RESULT_PATH);
        let response = self
            .client
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
            .with_context(|| format!("Recognizer unreachable at {}", url))?;

        let status = response.status().as_u16();
        let content_type = content_type(&response);
        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read recognizer reply from {}", url))?;

        debug!(status, bytes = body.len(), "recognizer last result fetched");
        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }

    /// Open the camera stream. Status and body are passed through as the
    /// recognizer sent them, the body chunk by chunk.
    pub async fn video_feed(
        &self,
    ) -> Result<UpstreamReply<impl Stream<Item = std::io::Result<Bytes>> + Send + 'static>> {
        let url = self.url(VIDEO_FEED_PATH);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Recognizer unreachable at {}", url))?;

        let status = response.status().as_u16();
        let content_type = content_type(&response);
        debug!(status, "recognizer video feed opened");
        let body = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));

        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }
}

fn content_type(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
