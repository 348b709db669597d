//! Recognition log access.
//!
//! The recognizer appends to a CSV file; every request re-reads it so the
//! dashboard always sees the latest rows. Columns are located by header
//! name, so column order and extra columns do not matter.

pub mod query;

pub use query::{filter_records, paginate, RecordsQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use crate::models::Record;
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub enum RecordsError {
    Open { path: PathBuf, source: std::io::Error },
    Csv(csv::Error),
}

impl std::fmt::Display for RecordsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "failed to open records file {}: {}", path.display(), source)
            }
            Self::Csv(e) => write!(f, "malformed records file: {}", e),
        }
    }
}

impl std::error::Error for RecordsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Csv(e) => Some(e),
        }
    }
}

impl From<csv::Error> for RecordsError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

/// Header name -> column index.
struct Columns(HashMap<String, usize>);

impl Columns {
    fn from_header(header: &StringRecord) -> Self {
        Self(
            header
                .iter()
                .enumerate()
                .map(|(i, name)| (name.trim().to_string(), i))
                .collect(),
        )
    }

    /// Trimmed field value, or empty when the column is absent.
    fn get(&self, row: &StringRecord, key: &str) -> String {
        self.0
            .get(key)
            .and_then(|&i| row.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }
}

/// Read all rows from CSV text. Ids are 1-based row numbers.
///
/// An input without a header line yields no rows. A row whose field count
/// differs from the header fails the whole read.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>, RecordsError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let header = rdr.headers()?.clone();
    if header.is_empty() {
        return Ok(Vec::new());
    }
    let columns = Columns::from_header(&header);

    let mut records = Vec::new();
    for (idx, row) in rdr.records().enumerate() {
        let row = row?;
        records.push(Record {
            id: idx + 1,
            timestamp: columns.get(&row, "timestamp"),
            image_path: columns.get(&row, "image_path"),
            match_name: columns.get(&row, "match_name"),
            similarity: columns.get(&row, "similarity"),
            threshold: columns.get(&row, "threshold"),
            status: columns.get(&row, "status"),
            message: columns.get(&row, "message"),
        });
    }

    Ok(records)
}

/// Open and read the log file at `path`.
pub fn load_records_from_csv(path: impl AsRef<Path>) -> Result<Vec<Record>, RecordsError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| RecordsError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records(file)?;
    debug!(path = %path.display(), rows = records.len(), "records loaded");
    Ok(records)
}
