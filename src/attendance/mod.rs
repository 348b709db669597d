//! Attendance engine.
//!
//! Turns the raw recognition log into deduplicated visit statistics:
//!
//! - [`classify`]: status buckets and identity normalization
//! - [`timestamp`]: tolerant timestamp parsing
//! - [`dedup`]: per-person minimum-gap window
//! - [`aggregate`]: person/day, day/people and month/person/days tables
//! - [`ordering`]: deterministic table order
//!
//! [`compute_stats`] is a pure function of its input snapshot; nothing is
//! cached between calls.

pub mod aggregate;
pub mod classify;
pub mod dedup;
pub mod ordering;
pub mod timestamp;

pub use aggregate::{aggregate, AttendanceTables};
pub use classify::{classify, Classification, Identity, StatusKind, UNKNOWN_IDENTITY};
pub use dedup::{DedupWindow, TimedMatch, ValidVisit, DEFAULT_MIN_GAP_SECS};
pub use timestamp::{parse_timestamp, Instant, TimestampError};

use crate::models::{Record, StatsResponse};
use tracing::debug;

/// Compute dashboard statistics for one snapshot of the log.
pub fn compute_stats(records: &[Record], window: &DedupWindow) -> StatsResponse {
    let mut stats = StatsResponse {
        total: records.len(),
        ..Default::default()
    };

    let mut matches = Vec::new();
    let mut unparsed = 0usize;

    for (seq, record) in records.iter().enumerate() {
        match classify(record) {
            Classification::Match(identity) => {
                stats.match_raw += 1;
                match parse_timestamp(&record.timestamp) {
                    Ok(at) => matches.push(TimedMatch { identity, at, seq }),
                    Err(_) => unparsed += 1,
                }
            }
            Classification::Error => stats.error += 1,
            Classification::NoFace => stats.no_face += 1,
            Classification::Other => stats.other_invalid += 1,
            Classification::Blank => {}
        }
    }

    let visits = window.collapse(matches);
    stats.valid = visits.len();

    let tables = aggregate(&visits);
    stats.person_day = tables.person_day;
    stats.day_people = tables.day_people;
    stats.month_person = tables.month_person;

    debug!(
        total = stats.total,
        match_raw = stats.match_raw,
        valid = stats.valid,
        unparsed_timestamps = unparsed,
        "attendance stats computed"
    );

    stats
}
