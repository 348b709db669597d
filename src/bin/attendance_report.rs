//! Attendance Report Tool
//!
//! Computes the dashboard statistics for a recognition log offline and
//! prints them as JSON.
//!
//! Usage:
//!   cargo run --release --bin attendance-report -- --csv /data/logs/records.csv
//!   cargo run --release --bin attendance-report -- --csv ./records.csv --window-secs 1800 --pretty

use anyhow::{Context, Result};
use attendance_backend::{
    attendance::{compute_stats, DedupWindow, DEFAULT_MIN_GAP_SECS},
    records::load_records_from_csv,
};
use clap::Parser;
use std::path::PathBuf;

/// Offline attendance statistics for a recognition log
#[derive(Parser, Debug)]
#[command(name = "attendance-report")]
#[command(about = "Compute deduplicated attendance statistics from a recognition CSV log")]
struct Cli {
    /// Path to the CSV log
    #[arg(short, long, env = "RECORDS_CSV_PATH")]
    csv: PathBuf,

    /// Minimum gap between two visits of the same person, in seconds
    #[arg(short, long, env = "DEDUP_WINDOW_SECS", default_value_t = DEFAULT_MIN_GAP_SECS)]
    window_secs: i64,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let window = DedupWindow::from_secs(cli.window_secs).ok_or_else(|| {
        anyhow::anyhow!("--window-secs must be positive and at most {}", i64::MAX / 1000)
    })?;

    let records = load_records_from_csv(&cli.csv)
        .with_context(|| format!("Failed to load records from {:?}", cli.csv))?;
    let stats = compute_stats(&records, &window);

    let json = if cli.pretty {
        serde_json::to_string_pretty(&stats)?
    } else {
        serde_json::to_string(&stats)?
    };
    println!("{}", json);

    Ok(())
}
