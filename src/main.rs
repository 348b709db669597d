//! Attendance dashboard server.
//!
//! Serves the dashboard assets, attendance statistics computed from the
//! recognizer's CSV log, the SQLite record store and a pass-through to the
//! recognizer itself.

use anyhow::{Context, Result};
use attendance_backend::{
    api::{create_router, AppState},
    config::Config,
    recognizer::RecognizerClient,
    store::RecordStore,
};
use dotenv::dotenv;
use std::path::Path;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let config = Config::from_env();
    info!(path = %config.records_csv_path.display(), "Using records log");
    if !config.records_csv_path.exists() {
        warn!(
            path = %config.records_csv_path.display(),
            "Records log does not exist yet; stats will be empty until it is written"
        );
    }

    let store = RecordStore::open(&config.records_db_path)?;
    let recognizer = RecognizerClient::new(&config.py_base, config.proxy_timeout)?;
    info!(py_base = recognizer.base_url(), "Recognizer proxy configured");
    info!(
        window_secs = config.dedup_window_secs,
        "Visit dedup window configured"
    );

    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(config, store, recognizer));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("API server listening on {}", bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing with an env-configurable filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance_backend=debug,attendance=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // Also try the crate directory when launched from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
