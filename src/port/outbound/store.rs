//! Persistence ports for detections, validations and feature snapshots.

use crate::domain::{
    Detection, EventSource, FeatureSnapshot, JoinedEvent, LabeledSample, TimeRange, Validation,
};
use crate::error::Result;

/// Write operations available inside one storage transaction.
pub trait EventWriter {
    /// Insert a detection. Returns the new row id.
    ///
    /// # Errors
    /// Returns [`Error::Conflict`](crate::error::Error::Conflict) when the
    /// (symbol, detect_time, source) triple exists and duplicates are rejected.
    fn record_detection(&mut self, detection: &Detection) -> Result<i32>;

    /// Insert or replace the validation for (symbol, detect_time).
    fn upsert_validation(&mut self, validation: &Validation) -> Result<()>;

    /// Append a feature snapshot. Returns the new row id.
    fn append_feature_snapshot(&mut self, snapshot: &FeatureSnapshot) -> Result<i32>;
}

/// Durable store for labeled events.
pub trait EventStore {
    /// Run `f` inside one transaction: committed if `f` returns `Ok`,
    /// rolled back on `Err` or panic.
    ///
    /// # Errors
    /// Returns the error from `f`, or a persistence error from the
    /// transaction itself.
    fn atomically<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn EventWriter) -> Result<T>;

    /// Insert one detection.
    fn record_detection(&self, detection: &Detection) -> Result<i32> {
        self.atomically(|writer| writer.record_detection(detection))
    }

    /// Insert or replace one validation.
    fn upsert_validation(&self, validation: &Validation) -> Result<()> {
        self.atomically(|writer| writer.upsert_validation(validation))
    }

    /// Append one feature snapshot.
    fn append_feature_snapshot(&self, snapshot: &FeatureSnapshot) -> Result<i32> {
        self.atomically(|writer| writer.append_feature_snapshot(snapshot))
    }

    /// Detections for `symbol` within `range`, newest first, each with its
    /// validation if one exists.
    fn query_joined(&self, symbol: &str, range: TimeRange) -> Result<Vec<JoinedEvent>>;

    /// Feature snapshots for `symbol` within `range`, oldest first.
    fn feature_snapshots(&self, symbol: &str, range: TimeRange) -> Result<Vec<FeatureSnapshot>>;

    /// Detections from `source` joined with their validation and snapshots.
    fn labeled_dataset(&self, source: EventSource) -> Result<Vec<LabeledSample>>;

    /// Distinct detection symbols, sorted.
    fn symbols(&self) -> Result<Vec<String>>;
}
