//! Runtime configuration from environment variables (and `.env`).

use crate::attendance::{DedupWindow, DEFAULT_MIN_GAP_SECS};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RECORDS_CSV_PATH: &str = "/data/logs/records.csv";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_STATIC_DIR: &str = "./static";
pub const DEFAULT_IMAGE_ROOT: &str = "/data/";
pub const DEFAULT_RECORDS_DB_PATH: &str = "data/face.db";
pub const DEFAULT_PY_BASE: &str = "http://127.0.0.1:5000";
const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Recognition log read on every stats/records request
    pub records_csv_path: PathBuf,
    pub bind_addr: String,
    /// Dashboard assets
    pub static_dir: PathBuf,
    /// Only files below this prefix are served by `/image`
    pub image_root: String,
    pub records_db_path: String,
    /// Recognizer base URL
    pub py_base: String,
    pub dedup_window_secs: i64,
    pub proxy_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            records_csv_path: PathBuf::from(DEFAULT_RECORDS_CSV_PATH),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            image_root: DEFAULT_IMAGE_ROOT.to_string(),
            records_db_path: DEFAULT_RECORDS_DB_PATH.to_string(),
            py_base: DEFAULT_PY_BASE.to_string(),
            dedup_window_secs: DEFAULT_MIN_GAP_SECS,
            proxy_timeout: Duration::from_secs(DEFAULT_PROXY_TIMEOUT_SECS),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Read configuration, falling back to defaults for unset, empty or
    /// invalid values.
    pub fn from_env() -> Self {
        Self::from_lookup(non_empty_var)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let dedup_window_secs = lookup("DEDUP_WINDOW_SECS")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|&v| DedupWindow::from_secs(v).is_some())
            .unwrap_or(defaults.dedup_window_secs);

        let proxy_timeout = lookup("PROXY_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&v| v > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.proxy_timeout);

        Self {
            records_csv_path: lookup("RECORDS_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.records_csv_path),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            image_root: lookup("IMAGE_ROOT").unwrap_or(defaults.image_root),
            records_db_path: lookup("RECORDS_DB_PATH").unwrap_or(defaults.records_db_path),
            py_base: lookup("PY_BASE").unwrap_or(defaults.py_base),
            dedup_window_secs,
            proxy_timeout,
        }
    }
}
