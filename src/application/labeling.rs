//! Labeling gateway.
//!
//! Turns one manual labeling action into three related records: a manual
//! detection, its validation and the feature snapshot computed at the chosen
//! bar. The three writes share one store transaction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::indicator::IndicatorEngine;
use crate::domain::{
    Bar, Detection, EventKind, EventSource, EventSummary, FeatureSnapshot, FeatureVector,
    JoinedEvent, TimeRange, TrendLabel, Validation,
};
use crate::error::{DataError, Result};
use crate::port::outbound::store::EventStore;

/// One manual labeling action.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRequest {
    pub symbol: String,
    pub instant: DateTime<Utc>,
    pub price: f64,
    pub kind: EventKind,
    pub is_valid: Option<bool>,
    pub trend_label: Option<TrendLabel>,
}

impl LabelRequest {
    fn detection(&self) -> std::result::Result<Detection, DataError> {
        Ok(
            Detection::try_new(self.symbol.clone(), self.instant, self.kind, self.price)?
                .with_source(EventSource::ManualLabel),
        )
    }

    fn validation(&self) -> std::result::Result<Validation, DataError> {
        Validation::try_new(
            self.symbol.clone(),
            self.instant,
            self.is_valid,
            self.trend_label,
        )
    }

    fn snapshot(&self, features: FeatureVector) -> FeatureSnapshot {
        FeatureSnapshot {
            symbol: self.symbol.clone(),
            timestamp: self.instant,
            price: self.price,
            features,
        }
    }
}

/// What a successful submission wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelReceipt {
    pub detection_id: i32,
    pub snapshot_id: i32,
    pub features: FeatureVector,
}

/// Records manual labels against an [`EventStore`].
pub struct LabelingGateway<S> {
    store: S,
    engine: IndicatorEngine,
}

impl<S: EventStore> LabelingGateway<S> {
    #[must_use]
    pub const fn new(store: S, engine: IndicatorEngine) -> Self {
        Self { store, engine }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn engine(&self) -> &IndicatorEngine {
        &self.engine
    }

    /// Record one label: detection, validation and feature snapshot are all
    /// written or none are.
    ///
    /// The request is validated and features are extracted before the store
    /// is touched, so input errors never open a transaction.
    ///
    /// # Errors
    /// Returns [`DataError`] for a malformed request or series, or a store
    /// error from the write. In every error case nothing is persisted.
    pub fn submit_label(
        &self,
        request: &LabelRequest,
        series: &[Bar],
        target_index: usize,
    ) -> Result<LabelReceipt> {
        let result = self.record(request, series, target_index);
        match &result {
            Ok(receipt) => info!(
                symbol = %request.symbol,
                instant = %request.instant,
                kind = %request.kind,
                detection_id = receipt.detection_id,
                snapshot_id = receipt.snapshot_id,
                features = receipt.features.present_count(),
                "Label recorded"
            ),
            Err(e) => warn!(
                symbol = %request.symbol,
                instant = %request.instant,
                error = %e,
                "Label rejected"
            ),
        }
        result
    }

    fn record(
        &self,
        request: &LabelRequest,
        series: &[Bar],
        target_index: usize,
    ) -> Result<LabelReceipt> {
        let detection = request.detection()?;
        let validation = request.validation()?;
        let features = self.engine.extract(series, target_index)?;
        let snapshot = request.snapshot(features);

        let (detection_id, snapshot_id) = self.store.atomically(|writer| {
            let detection_id = writer.record_detection(&detection)?;
            writer.upsert_validation(&validation)?;
            let snapshot_id = writer.append_feature_snapshot(&snapshot)?;
            Ok((detection_id, snapshot_id))
        })?;

        Ok(LabelReceipt {
            detection_id,
            snapshot_id,
            features,
        })
    }

    /// Joined events for `symbol` within `range`, newest first.
    ///
    /// # Errors
    /// Returns a store error if the query fails.
    pub fn events(&self, symbol: &str, range: TimeRange) -> Result<Vec<JoinedEvent>> {
        self.store.query_joined(symbol, range)
    }

    /// Event counts for `symbol` within `range`.
    ///
    /// # Errors
    /// Returns a store error if the query fails.
    pub fn summary(&self, symbol: &str, range: TimeRange) -> Result<EventSummary> {
        Ok(EventSummary::from_events(&self.events(symbol, range)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::{SqliteEventStore, StoreConfig};
    use crate::error::Error;
    use chrono::{Duration, TimeZone};

    fn series(len: usize) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..len)
            .map(|i| {
                let x = i as f64;
                let close = 100.0 + (x * 0.4).sin() * 5.0 + x * 0.1;
                Bar::new(
                    start + Duration::hours(i as i64),
                    close - 0.5,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1000.0 + x,
                )
            })
            .collect()
    }

    fn gateway() -> LabelingGateway<SqliteEventStore> {
        let store = SqliteEventStore::open(":memory:", &StoreConfig::default()).unwrap();
        LabelingGateway::new(store, IndicatorEngine::default())
    }

    fn request(bars: &[Bar], index: usize) -> LabelRequest {
        LabelRequest {
            symbol: "BTC".into(),
            instant: bars[index].timestamp,
            price: bars[index].close,
            kind: EventKind::Peak,
            is_valid: Some(true),
            trend_label: Some(TrendLabel::Uptrend),
        }
    }

    #[test]
    fn submit_writes_all_three_records() {
        let gateway = gateway();
        let bars = series(80);
        let receipt = gateway.submit_label(&request(&bars, 60), &bars, 60).unwrap();

        assert_eq!(receipt.features.present_count(), 15);

        let events = gateway.events("BTC", TimeRange::all()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, receipt.detection_id);
        assert!(events[0].is_manual());
        assert!(events[0].is_valid());

        let snapshots = gateway
            .store()
            .feature_snapshots("BTC", TimeRange::all())
            .unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].features, receipt.features);
    }

    #[test]
    fn short_series_still_records_with_empty_features() {
        let gateway = gateway();
        let bars = series(30);
        let receipt = gateway.submit_label(&request(&bars, 20), &bars, 20).unwrap();

        assert!(receipt.features.is_empty());
        assert_eq!(gateway.summary("BTC", TimeRange::all()).unwrap().total, 1);
    }

    #[test]
    fn engine_error_writes_nothing() {
        let gateway = gateway();
        let bars = series(80);
        let err = gateway.submit_label(&request(&bars, 0), &bars, 500).unwrap_err();

        assert!(matches!(err, Error::Data(DataError::IndexOutOfRange { .. })));
        assert!(gateway.events("BTC", TimeRange::all()).unwrap().is_empty());
    }

    #[test]
    fn invalid_request_writes_nothing() {
        let gateway = gateway();
        let bars = series(80);
        let mut bad = request(&bars, 60);
        bad.symbol = "  ".into();

        assert!(gateway.submit_label(&bad, &bars, 60).is_err());
        assert!(gateway.store().symbols().unwrap().is_empty());
    }

    #[test]
    fn relabel_replaces_validation() {
        let gateway = gateway();
        let bars = series(80);
        let first = request(&bars, 60);
        let mut second = first.clone();
        second.is_valid = Some(false);
        second.trend_label = Some(TrendLabel::Sideways);

        gateway.submit_label(&first, &bars, 60).unwrap();
        gateway.submit_label(&second, &bars, 60).unwrap();

        let events = gateway.events("BTC", TimeRange::all()).unwrap();
        assert_eq!(events.len(), 2);
        for event in &events {
            let validation = event.validation.as_ref().unwrap();
            assert_eq!(validation.trend_label, Some(TrendLabel::Sideways));
        }
        let summary = gateway.summary("BTC", TimeRange::all()).unwrap();
        assert_eq!(summary.valid, 0);
        assert_eq!(summary.manual, 2);
    }
}
