//! Per-person dedup window.
//!
//! A person standing in front of the camera produces a burst of matches. The
//! window collapses those into single visits: a match counts only when it is
//! strictly more than `min_gap` after the last *accepted* visit of the same
//! person. Skipped matches never move the anchor, so a long burst cannot
//! extend itself. The window is elapsed time only and does not reset at
//! midnight.

use super::classify::Identity;
use super::timestamp::Instant;
use chrono::Duration;
use std::collections::HashMap;

/// Default minimum gap between two visits of the same person.
pub const DEFAULT_MIN_GAP_SECS: i64 = 3600;

/// A successful, timestamped match as fed into the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedMatch {
    pub identity: Identity,
    pub at: Instant,
    /// Position in the input; breaks ties between equal instants.
    pub seq: usize,
}

/// A match that survived the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidVisit {
    pub identity: Identity,
    pub at: Instant,
}

#[derive(Debug, Clone, Copy)]
pub struct DedupWindow {
    min_gap: Duration,
}

impl Default for DedupWindow {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_MIN_GAP_SECS))
    }
}

impl DedupWindow {
    pub fn new(min_gap: Duration) -> Self {
        Self { min_gap }
    }

    /// `None` unless `secs` is positive and fits in a `Duration`.
    pub fn from_secs(secs: i64) -> Option<Self> {
        Duration::try_seconds(secs)
            .filter(|gap| *gap > Duration::zero())
            .map(Self::new)
    }

    pub fn min_gap(&self) -> Duration {
        self.min_gap
    }

    /// Filter one person's instants, already sorted ascending, down to the
    /// accepted visit instants.
    pub fn dedupe(&self, sorted: &[Instant]) -> Vec<Instant> {
        let mut accepted = Vec::new();
        let mut last_valid: Option<Instant> = None;

        for &at in sorted {
            let is_new_visit = match last_valid {
                None => true,
                Some(anchor) => at.signed_duration_since(anchor) > self.min_gap,
            };
            if is_new_visit {
                accepted.push(at);
                last_valid = Some(at);
            }
        }

        accepted
    }

    /// Group matches by identity, order each group by time (input order on
    /// ties) and run the window over every group.
    ///
    /// The result is grouped by identity in ascending name order, each group
    /// chronological.
    pub fn collapse(&self, matches: Vec<TimedMatch>) -> Vec<ValidVisit> {
        let mut by_person: HashMap<Identity, Vec<(Instant, usize)>> = HashMap::new();
        for m in matches {
            by_person.entry(m.identity).or_default().push((m.at, m.seq));
        }

        let mut people: Vec<_> = by_person.into_iter().collect();
        people.sort_by(|a, b| a.0.cmp(&b.0));

        let mut visits = Vec::new();
        for (identity, mut events) in people {
            events.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
            let instants: Vec<Instant> = events.into_iter().map(|(at, _)| at).collect();
            for at in self.dedupe(&instants) {
                visits.push(ValidVisit {
                    identity: identity.clone(),
                    at,
                });
            }
        }

        visits
    }
}
