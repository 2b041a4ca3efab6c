//! Aggregate counts over joined events.

use serde::Serialize;

use super::event::JoinedEvent;

/// Event counts for a symbol and period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub total: usize,
    pub manual: usize,
    pub ml: usize,
    pub valid: usize,
}

impl EventSummary {
    #[must_use]
    pub fn from_events(events: &[JoinedEvent]) -> Self {
        events.iter().fold(Self::default(), |mut acc, event| {
            acc.total += 1;
            if event.is_manual() {
                acc.manual += 1;
            } else {
                acc.ml += 1;
            }
            if event.is_valid() {
                acc.valid += 1;
            }
            acc
        })
    }

    /// Share of events marked valid, as a percentage.
    #[must_use]
    pub fn valid_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.valid as f64 / self.total as f64 * 100.0)
        }
    }
}
