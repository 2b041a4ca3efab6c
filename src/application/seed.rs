//! Sample data for a fresh database.

use chrono::{TimeZone, Utc};
use tracing::info;

use crate::domain::{Detection, EventKind, TrendLabel, Validation};
use crate::error::{DataError, Result};
use crate::port::outbound::store::EventStore;

type Sample = (&'static str, u32, EventKind, f64, f64, bool, TrendLabel);

const SAMPLES: [Sample; 4] = [
    ("BTC", 10, EventKind::Peak, 45000.0, 0.95, true, TrendLabel::Uptrend),
    ("BTC", 14, EventKind::Dip, 44000.0, 0.85, true, TrendLabel::Downtrend),
    ("ETH", 11, EventKind::Peak, 2800.0, 0.90, true, TrendLabel::Uptrend),
    ("ETH", 15, EventKind::Dip, 2700.0, 0.88, false, TrendLabel::Sideways),
];

/// Four ML detections on 2024-01-01 with their validations.
///
/// # Errors
/// Never fails for the built-in samples; the `Result` carries domain checks.
pub fn seed_samples() -> std::result::Result<Vec<(Detection, Validation)>, DataError> {
    SAMPLES
        .iter()
        .map(|&(symbol, hour, kind, price, confidence, valid, trend)| {
            let at = Utc
                .with_ymd_and_hms(2024, 1, 1, hour, 0, 0)
                .single()
                .ok_or_else(|| DataError::InvalidField {
                    field: "detect_time",
                    reason: format!("hour {hour} is not a valid time"),
                })?;
            let detection = Detection::try_new(symbol, at, kind, price)?.with_confidence(confidence)?;
            let validation = Validation::try_new(symbol, at, Some(valid), Some(trend))?;
            Ok((detection, validation))
        })
        .collect()
}

/// Write the samples in one transaction unless the store already holds
/// detections. Returns how many detections were written.
///
/// # Errors
/// Returns a store error if the write fails; nothing is kept in that case.
pub fn seed_store<S: EventStore>(store: &S) -> Result<usize> {
    if !store.symbols()?.is_empty() {
        info!("Store already has detections, skipping seed");
        return Ok(0);
    }

    let samples = seed_samples()?;
    store.atomically(|writer| {
        for (detection, validation) in &samples {
            writer.record_detection(detection)?;
            writer.upsert_validation(validation)?;
        }
        Ok(())
    })?;

    info!(count = samples.len(), "Seeded sample events");
    Ok(samples.len())
}
