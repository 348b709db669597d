//! Timestamp parsing for the recognition log.
//!
//! The recognizer has written several timestamp shapes over time, so parsing
//! walks a fixed list of layouts and takes the first that fits. Layouts with
//! seconds accept an optional fraction, which is kept. Anything else with a
//! `.` in it gets one more try, truncated at the first `.`.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// A parsed point in time. Naive timestamps are pinned to `+00:00`.
pub type Instant = DateTime<FixedOffset>;

#[derive(Debug, Clone, Copy)]
enum Layout {
    Rfc3339,
    /// Naive layout, interpreted as UTC.
    Naive(&'static str),
    /// Naive layout followed by `Z` or a `±HH:MM` offset.
    WithOffset(&'static str),
}

/// Tried in order; the first layout that parses wins.
const LAYOUTS: &[Layout] = &[
    Layout::Rfc3339,
    Layout::Naive("%Y-%m-%d %H:%M:%S%.f"),
    Layout::WithOffset("%Y-%m-%d %H:%M:%S%.f"),
    Layout::Naive("%Y-%m-%dT%H:%M:%S%.f"),
    Layout::WithOffset("%Y-%m-%dT%H:%M:%S%.f"),
    Layout::Naive("%Y-%m-%d %H:%M"),
];

/// Errors from [`parse_timestamp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    Empty,
    Unrecognized(String),
}

impl std::fmt::Display for TimestampError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty timestamp"),
            Self::Unrecognized(s) => write!(f, "cannot parse timestamp: {:?}", s),
        }
    }
}

impl std::error::Error for TimestampError {}

/// Parse a log timestamp into an [`Instant`].
pub fn parse_timestamp(raw: &str) -> Result<Instant, TimestampError> {
    let ts = raw.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    if let Some(instant) = parse_with_layouts(ts) {
        return Ok(instant);
    }

    // Retry once without whatever follows the first '.'
    if let Some(dot) = ts.find('.') {
        if let Some(instant) = parse_with_layouts(&ts[..dot]) {
            return Ok(instant);
        }
    }

    Err(TimestampError::Unrecognized(ts.to_string()))
}

fn parse_with_layouts(ts: &str) -> Option<Instant> {
    LAYOUTS.iter().find_map(|layout| parse_layout(ts, *layout))
}

fn parse_layout(ts: &str, layout: Layout) -> Option<Instant> {
    match layout {
        Layout::Rfc3339 => DateTime::parse_from_rfc3339(ts).ok(),
        Layout::Naive(fmt) => NaiveDateTime::parse_from_str(ts, fmt)
            .ok()
            .map(|naive| pin_utc(&naive)),
        Layout::WithOffset(fmt) => {
            if let Some(prefix) = ts.strip_suffix('Z') {
                NaiveDateTime::parse_from_str(prefix, fmt)
                    .ok()
                    .map(|naive| pin_utc(&naive))
            } else {
                DateTime::parse_from_str(ts, &format!("{}%:z", fmt)).ok()
            }
        }
    }
}

fn pin_utc(naive: &NaiveDateTime) -> Instant {
    Utc.from_utc_datetime(naive).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_clock(instant: &Instant) -> String {
        instant.format("%Y-%m-%d %H:%M:%S %:z").to_string()
    }

    #[test]
    fn test_rfc3339_keeps_offset() {
        let t = parse_timestamp("2024-01-01T09:00:00+08:00").unwrap();
        assert_eq!(wall_clock(&t), "2024-01-01 09:00:00 +08:00");
    }

    #[test]
    fn test_space_separated_naive_is_utc() {
        let t = parse_timestamp("2024-03-05 23:59:59").unwrap();
        assert_eq!(wall_clock(&t), "2024-03-05 23:59:59 +00:00");
    }

    #[test]
    fn test_space_separated_with_offset() {
        let t = parse_timestamp("2024-03-05 08:15:00+05:30").unwrap();
        assert_eq!(wall_clock(&t), "2024-03-05 08:15:00 +05:30");

        let z = parse_timestamp("2024-03-05 08:15:00Z").unwrap();
        assert_eq!(wall_clock(&z), "2024-03-05 08:15:00 +00:00");
    }

    #[test]
    fn test_t_separated_naive() {
        let t = parse_timestamp("2024-01-01T09:30:00").unwrap();
        assert_eq!(wall_clock(&t), "2024-01-01 09:30:00 +00:00");
    }

    #[test]
    fn test_minute_precision() {
        let t = parse_timestamp("2024-01-01 09:30").unwrap();
        assert_eq!(wall_clock(&t), "2024-01-01 09:30:00 +00:00");
    }

    #[test]
    fn test_naive_fraction_is_kept() {
        let space = parse_timestamp("2024-01-01 09:30:15.123456").unwrap();
        assert_eq!(wall_clock(&space), "2024-01-01 09:30:15 +00:00");
        assert_eq!(space.timestamp_subsec_micros(), 123_456);

        let t_sep = parse_timestamp("2024-01-01T09:00:00.5").unwrap();
        assert_eq!(t_sep.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_naive_and_rfc3339_fractions_agree() {
        let naive = parse_timestamp("2024-01-01 10:00:00.500").unwrap();
        let zulu = parse_timestamp("2024-01-01T10:00:00.500Z").unwrap();
        let offset = parse_timestamp("2024-01-01 12:00:00.500+02:00").unwrap();
        let zulu_space = parse_timestamp("2024-01-01 10:00:00.500Z").unwrap();
        assert_eq!(naive, zulu);
        assert_eq!(offset, zulu);
        assert_eq!(zulu_space, zulu);
    }

    #[test]
    fn test_truncation_retry_still_applies() {
        // Minute precision has no seconds field to hang a fraction on.
        let t = parse_timestamp("2024-01-01 09:30.75").unwrap();
        assert_eq!(wall_clock(&t), "2024-01-01 09:30:00 +00:00");
    }

    #[test]
    fn test_rfc3339_fraction_parses_directly() {
        let t = parse_timestamp("2024-01-01T09:30:15.250+08:00").unwrap();
        assert_eq!(t.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert!(parse_timestamp("  2024-01-01 09:30:00 \t").is_ok());
    }

    #[test]
    fn test_empty_and_garbage() {
        assert_eq!(parse_timestamp("   "), Err(TimestampError::Empty));
        assert_eq!(
            parse_timestamp("yesterday"),
            Err(TimestampError::Unrecognized("yesterday".to_string()))
        );
        assert!(parse_timestamp("2024-13-01 09:00:00").is_err());
        assert!(parse_timestamp("2024/01/01 09:00:00.5").is_err());
    }
}
