//! Database model types for Diesel ORM.
//!
//! Instants are stored as RFC 3339 UTC text with fixed microsecond precision,
//! so string comparison in SQL orders them chronologically.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;

use super::schema::{events, labeling_features, peak_dip_events};
use crate::domain::{Detection, FeatureSnapshot, FeatureVector, TrendLabel, Validation};
use crate::error::{Error, Result};

/// Storage text for an instant.
#[must_use]
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an instant column written by [`format_instant`].
///
/// # Errors
/// Returns a persistence error for text that is not RFC 3339.
pub fn parse_instant_column(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Persistence(format!("bad instant '{text}': {e}")))
}

fn parse_column<T: std::str::FromStr>(text: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    text.parse()
        .map_err(|e: T::Err| Error::Persistence(e.to_string()))
}

/// Database row for a detection (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = peak_dip_events)]
pub struct NewDetectionRow {
    pub symbol: String,
    pub detect_time: String,
    pub kind: String,
    pub price: f64,
    pub confidence: f64,
    pub source: String,
}

impl From<&Detection> for NewDetectionRow {
    fn from(detection: &Detection) -> Self {
        Self {
            symbol: detection.symbol.clone(),
            detect_time: format_instant(detection.detect_time),
            kind: detection.kind.as_str().to_string(),
            price: detection.price,
            confidence: detection.confidence,
            source: detection.source.as_str().to_string(),
        }
    }
}

/// Database row for a detection (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = peak_dip_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DetectionRow {
    pub id: i32,
    pub symbol: String,
    pub detect_time: String,
    pub kind: String,
    pub price: f64,
    pub confidence: f64,
    pub source: String,
    pub created_at: String,
}

impl DetectionRow {
    pub fn into_domain(self) -> Result<Detection> {
        Ok(Detection {
            symbol: self.symbol,
            detect_time: parse_instant_column(&self.detect_time)?,
            kind: parse_column(&self.kind)?,
            price: self.price,
            confidence: self.confidence,
            source: parse_column(&self.source)?,
        })
    }
}

/// Database row for a validation (insertable; written with `REPLACE`).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = events)]
pub struct NewValidationRow {
    pub symbol: String,
    pub detect_time: String,
    pub is_valid_peak_dip: Option<bool>,
    pub trend_label: Option<String>,
}

impl From<&Validation> for NewValidationRow {
    fn from(validation: &Validation) -> Self {
        Self {
            symbol: validation.symbol.clone(),
            detect_time: format_instant(validation.detect_time),
            is_valid_peak_dip: validation.is_valid,
            trend_label: validation.trend_label.map(|t| t.as_str().to_string()),
        }
    }
}

/// Database row for a validation (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ValidationRow {
    pub id: i32,
    pub symbol: String,
    pub detect_time: String,
    pub is_valid_peak_dip: Option<bool>,
    pub trend_label: Option<String>,
    pub created_at: String,
}

impl ValidationRow {
    pub fn into_domain(self) -> Result<Validation> {
        Ok(Validation {
            symbol: self.symbol,
            detect_time: parse_instant_column(&self.detect_time)?,
            is_valid: self.is_valid_peak_dip,
            trend_label: self
                .trend_label
                .as_deref()
                .map(parse_column::<TrendLabel>)
                .transpose()?,
        })
    }
}

/// Database row for a feature snapshot (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = labeling_features)]
pub struct NewFeatureRow {
    pub symbol: String,
    pub timestamp: String,
    pub price: f64,
    pub rsi_14: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub volume_sma_20: Option<f64>,
    pub price_sma_20: Option<f64>,
    pub price_ema_12: Option<f64>,
    pub price_ema_26: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub atr_14: Option<f64>,
    pub williams_r: Option<f64>,
}

impl From<&FeatureSnapshot> for NewFeatureRow {
    fn from(snapshot: &FeatureSnapshot) -> Self {
        let f = snapshot.features;
        Self {
            symbol: snapshot.symbol.clone(),
            timestamp: format_instant(snapshot.timestamp),
            price: snapshot.price,
            rsi_14: f.rsi_14,
            macd_line: f.macd_line,
            macd_signal: f.macd_signal,
            macd_histogram: f.macd_histogram,
            bb_upper: f.bb_upper,
            bb_middle: f.bb_middle,
            bb_lower: f.bb_lower,
            volume_sma_20: f.volume_sma_20,
            price_sma_20: f.price_sma_20,
            price_ema_12: f.price_ema_12,
            price_ema_26: f.price_ema_26,
            stoch_k: f.stoch_k,
            stoch_d: f.stoch_d,
            atr_14: f.atr_14,
            williams_r: f.williams_r,
        }
    }
}

/// Database row for a feature snapshot (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = labeling_features)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FeatureRow {
    pub id: i32,
    pub symbol: String,
    pub timestamp: String,
    pub price: f64,
    pub rsi_14: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub volume_sma_20: Option<f64>,
    pub price_sma_20: Option<f64>,
    pub price_ema_12: Option<f64>,
    pub price_ema_26: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub atr_14: Option<f64>,
    pub williams_r: Option<f64>,
    pub created_at: String,
}

impl FeatureRow {
    #[must_use]
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            rsi_14: self.rsi_14,
            macd_line: self.macd_line,
            macd_signal: self.macd_signal,
            macd_histogram: self.macd_histogram,
            bb_upper: self.bb_upper,
            bb_middle: self.bb_middle,
            bb_lower: self.bb_lower,
            volume_sma_20: self.volume_sma_20,
            price_sma_20: self.price_sma_20,
            price_ema_12: self.price_ema_12,
            price_ema_26: self.price_ema_26,
            stoch_k: self.stoch_k,
            stoch_d: self.stoch_d,
            atr_14: self.atr_14,
            williams_r: self.williams_r,
        }
    }

    pub fn into_domain(self) -> Result<FeatureSnapshot> {
        Ok(FeatureSnapshot {
            features: self.features(),
            timestamp: parse_instant_column(&self.timestamp)?,
            price: self.price,
            symbol: self.symbol,
        })
    }
}
