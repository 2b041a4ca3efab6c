//! OHLCV bars and series validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// One time interval of market data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Name of the first non-finite field, if any.
    fn missing_field(&self) -> Option<&'static str> {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// Check that a series is usable by the indicator engine.
///
/// Timestamps must be strictly increasing and every price/volume field must
/// be a finite number. A NaN is a missing value and is never filled in.
///
/// # Errors
/// Returns the first [`DataError`] found, scanning from bar 0.
pub fn validate_series(bars: &[Bar]) -> Result<(), DataError> {
    if bars.is_empty() {
        return Err(DataError::EmptySeries);
    }
    for (index, bar) in bars.iter().enumerate() {
        if let Some(field) = bar.missing_field() {
            return Err(DataError::MissingValue { field, index });
        }
        if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
            return Err(DataError::NonMonotonic {
                index,
                timestamp: bar.timestamp.to_rfc3339(),
            });
        }
    }
    Ok(())
}

/// Index of the bar closest in time to `instant`. Ties go to the earlier bar.
///
/// # Errors
/// Returns [`DataError::EmptySeries`] for an empty slice.
pub fn nearest_index(bars: &[Bar], instant: DateTime<Utc>) -> Result<usize, DataError> {
    if bars.is_empty() {
        return Err(DataError::EmptySeries);
    }
    let after = bars.partition_point(|bar| bar.timestamp < instant);
    if after == 0 {
        return Ok(0);
    }
    if after == bars.len() {
        return Ok(bars.len() - 1);
    }
    let before_gap = instant - bars[after - 1].timestamp;
    let after_gap = bars[after].timestamp - instant;
    Ok(if after_gap < before_gap { after } else { after - 1 })
}
