use serde::{Deserialize, Serialize};

/// One row of the recognition log.
///
/// Fields are kept as the raw (trimmed) strings the recognizer wrote;
/// interpretation happens in [`crate::attendance`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: usize,
    pub timestamp: String,
    pub image_path: String,
    pub match_name: String,
    pub similarity: String,
    pub threshold: String,
    pub status: String,
    pub message: String,
}

/// Valid visits of one person on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDayCount {
    pub person: String,
    pub date: String,
    pub count: usize,
}

/// Distinct people seen on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPeopleCount {
    pub date: String,
    pub people: usize,
}

/// Distinct dates one person was seen within a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthPersonDays {
    pub month: String,
    pub person: String,
    pub days: usize,
}

/// Flat payload behind `GET /api/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Raw row count
    pub total: usize,
    /// Successful matches before dedup
    pub match_raw: usize,
    /// Matches surviving the dedup window
    pub valid: usize,
    pub error: usize,
    pub no_face: usize,
    /// Non-empty statuses that are none of the above
    pub other_invalid: usize,
    pub person_day: Vec<PersonDayCount>,
    pub day_people: Vec<DayPeopleCount>,
    #[serde(rename = "month_person_days")]
    pub month_person: Vec<MonthPersonDays>,
}

/// Page of raw log rows behind `GET /api/records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsPage {
    pub data: Vec<Record>,
    pub total: usize,
    pub page: usize,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
}

impl RecordsPage {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: 1,
            page_size: crate::records::DEFAULT_PAGE_SIZE,
        }
    }
}
