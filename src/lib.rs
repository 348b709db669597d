//! Attendance Backend Library
//!
//! Reads the face-recognition CSV log, deduplicates successful matches into
//! visits and serves the derived statistics to the dashboard.

pub mod api;
pub mod attendance;
pub mod config;
pub mod middleware;
pub mod models;
pub mod recognizer;
pub mod records;
pub mod store;
