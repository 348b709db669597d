//! Status classification for log rows.

use crate::models::Record;
use serde::Serialize;

/// Bucket used when a successful match carries no name.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Canonical kind of a non-blank status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Match,
    Error,
    NoFace,
}

/// Every accepted status spelling, upper-case. Older log generations wrote
/// `OK` where newer ones write `MATCH`.
const STATUS_TABLE: &[(&str, StatusKind)] = &[
    ("MATCH", StatusKind::Match),
    ("OK", StatusKind::Match),
    ("ERROR", StatusKind::Error),
    ("NO_FACE", StatusKind::NoFace),
];

/// Normalized name of a matched person.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn from_match_name(raw: &str) -> Self {
        let name = raw.trim();
        if name.is_empty() {
            Self(UNKNOWN_IDENTITY.to_string())
        } else {
            Self(name.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Match(Identity),
    Error,
    NoFace,
    /// Non-empty status outside the table
    Other,
    /// Empty status; counts toward the raw total only
    Blank,
}

/// Look up a status string in the table, ignoring case and padding.
pub fn status_kind(status: &str) -> Option<StatusKind> {
    let upper = status.trim().to_ascii_uppercase();
    STATUS_TABLE
        .iter()
        .find(|(spelling, _)| *spelling == upper)
        .map(|(_, kind)| *kind)
}

pub fn classify(record: &Record) -> Classification {
    if record.status.trim().is_empty() {
        return Classification::Blank;
    }
    match status_kind(&record.status) {
        Some(StatusKind::Match) => {
            Classification::Match(Identity::from_match_name(&record.match_name))
        }
        Some(StatusKind::Error) => Classification::Error,
        Some(StatusKind::NoFace) => Classification::NoFace,
        None => Classification::Other,
    }
}
