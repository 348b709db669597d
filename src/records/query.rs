//! Filtering and paging for the raw records listing.
//!
//! The listing shows raw rows (no dedup) so operators can inspect exactly
//! what the recognizer logged.

use crate::models::{Record, RecordsPage};
use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 500;

/// Query string of `GET /api/records`.
///
/// Numbers arrive as strings so that garbage falls back to defaults instead
/// of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RecordsQuery {
    pub status: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

impl RecordsQuery {
    pub fn page(&self) -> usize {
        match parse_int(self.page.as_deref()) {
            Some(p) if p >= 1 => p as usize,
            _ => 1,
        }
    }

    pub fn page_size(&self) -> usize {
        match parse_int(self.page_size.as_deref()) {
            Some(n) if n > 0 && n as usize <= MAX_PAGE_SIZE => n as usize,
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    fn status_filter(&self) -> Option<&str> {
        self.status.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn search(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty())
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

fn contains_fold(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Apply the status filter and free-text search, keeping file order.
pub fn filter_records(records: Vec<Record>, query: &RecordsQuery) -> Vec<Record> {
    let status = query.status_filter().map(str::to_lowercase);
    let search = query.search();

    records
        .into_iter()
        .filter(|rec| match &status {
            Some(wanted) => rec.status.trim().to_lowercase() == *wanted,
            None => true,
        })
        .filter(|rec| match &search {
            Some(needle) => {
                contains_fold(&rec.match_name, needle)
                    || contains_fold(&rec.image_path, needle)
                    || contains_fold(&rec.message, needle)
                    || contains_fold(&rec.status, needle)
            }
            None => true,
        })
        .collect()
}

/// Slice one page out of already-filtered rows.
pub fn paginate(filtered: Vec<Record>, page: usize, page_size: usize) -> RecordsPage {
    let total = filtered.len();
    let start = page.saturating_sub(1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);

    RecordsPage {
        data: filtered.into_iter().skip(start).take(end - start).collect(),
        total,
        page,
        page_size,
    }
}
