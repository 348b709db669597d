use super::{attendance, db_records, proxy, AppState};
use crate::middleware::request_logging;
use axum::{
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir};

/// Create the application router.
///
/// Anything not matched by an API route is served from the static
/// dashboard directory.
pub fn create_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/health", get(health_check))
        .route("/api/stats", get(attendance::get_stats))
        .route("/api/records", get(attendance::get_records))
        .route("/image", get(attendance::get_image))
        .route(
            "/api/db/records",
            get(db_records::list_records).post(db_records::post_record),
        )
        .route("/api/py/last", get(proxy::get_last_result))
        .route("/video_feed", get(proxy::get_video_feed))
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ===== Route Handlers =====

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, recognizer::RecognizerClient, store::RecordStore};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state(config: Config) -> AppState {
        let recognizer =
            RecognizerClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        AppState::new(config, RecordStore::in_memory().unwrap(), recognizer)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(test_state(Config::default()));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_stats_with_missing_log_is_all_zero() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            records_csv_path: dir.path().join("missing.csv"),
            ..Config::default()
        };
        let app = create_router(test_state(config));

        let response = app
            .oneshot(Request::builder().uri("/api/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total"], 0);
        assert_eq!(json["valid"], 0);
        assert!(json["person_day"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_image_requires_path_under_root() {
        let app = create_router(test_state(Config::default()));

        let missing = app
            .clone()
            .oneshot(Request::builder().uri("/image").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let outside = app
            .oneshot(
                Request::builder()
                    .uri("/image?path=/etc/passwd")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(outside.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_image_served_from_root() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("snap.jpg");
        std::fs::write(&image, b"\xff\xd8\xff").unwrap();
        let config = Config {
            image_root: format!("{}/", dir.path().display()),
            ..Config::default()
        };
        let app = create_router(test_state(config));

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/image?path={}", image.display()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"\xff\xd8\xff");
    }

    #[tokio::test]
    async fn test_db_records_roundtrip_through_http() {
        let app = create_router(test_state(Config::default()));

        let created = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/db/records")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"alice","confidence":0.93}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        assert_eq!(body_json(created).await["ok"], true);

        let listed = app
            .oneshot(
                Request::builder()
                    .uri("/api/db/records?limit=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(listed.status(), StatusCode::OK);
        let json = body_json(listed).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["name"], "alice");
    }

    #[tokio::test]
    async fn test_db_records_bad_json() {
        let app = create_router(test_state(Config::default()));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/db/records")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_proxy_unreachable_is_bad_gateway() {
        let app = create_router(test_state(Config::default()));
        let response = app
            .oneshot(Request::builder().uri("/api/py/last").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_video_feed_relays_upstream_status() {
        let upstream = Router::new().route(
            "/video_feed",
            get(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    [("content-type", "text/plain")],
                    "camera offline",
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, upstream).await.unwrap();
        });

        let recognizer =
            RecognizerClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
        let state = AppState::new(Config::default(), RecordStore::in_memory().unwrap(), recognizer);
        let response = create_router(state)
            .oneshot(Request::builder().uri("/video_feed").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()["content-type"], "text/plain");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"camera offline");
    }
}
