//! Indicator feature vectors and the records that carry them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::{check_symbol, Detection, Validation};
use crate::error::DataError;

/// Number of indicators in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 15;

/// Canonical feature order, shared by storage, display and export.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "rsi_14",
    "macd_line",
    "macd_signal",
    "macd_histogram",
    "bb_upper",
    "bb_middle",
    "bb_lower",
    "volume_sma_20",
    "price_sma_20",
    "price_ema_12",
    "price_ema_26",
    "stoch_k",
    "stoch_d",
    "atr_14",
    "williams_r",
];

/// Point-in-time indicator values. `None` means "not computable here" and is
/// distinct from a computed zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
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

impl FeatureVector {
    /// The "insufficient data" result: every field absent.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            rsi_14: None,
            macd_line: None,
            macd_signal: None,
            macd_histogram: None,
            bb_upper: None,
            bb_middle: None,
            bb_lower: None,
            volume_sma_20: None,
            price_sma_20: None,
            price_ema_12: None,
            price_ema_26: None,
            stoch_k: None,
            stoch_d: None,
            atr_14: None,
            williams_r: None,
        }
    }

    /// Values in [`FEATURE_NAMES`] order.
    #[must_use]
    pub fn values(&self) -> [Option<f64>; FEATURE_COUNT] {
        // Destructured so a new field cannot be silently left out.
        let Self {
            rsi_14,
            macd_line,
            macd_signal,
            macd_histogram,
            bb_upper,
            bb_middle,
            bb_lower,
            volume_sma_20,
            price_sma_20,
            price_ema_12,
            price_ema_26,
            stoch_k,
            stoch_d,
            atr_14,
            williams_r,
        } = *self;
        [
            rsi_14,
            macd_line,
            macd_signal,
            macd_histogram,
            bb_upper,
            bb_middle,
            bb_lower,
            volume_sma_20,
            price_sma_20,
            price_ema_12,
            price_ema_26,
            stoch_k,
            stoch_d,
            atr_14,
            williams_r,
        ]
    }

    /// `(name, value)` pairs in canonical order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, Option<f64>)> {
        FEATURE_NAMES.into_iter().zip(self.values())
    }

    #[must_use]
    pub fn present_count(&self) -> usize {
        self.values().iter().filter(|v| v.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }
}

/// Indicator vector captured for one (symbol, instant).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSnapshot {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    #[serde(flatten)]
    pub features: FeatureVector,
}

impl FeatureSnapshot {
    /// # Errors
    /// Returns [`DataError`] for an empty symbol or a non-finite price.
    pub fn validate(&self) -> Result<(), DataError> {
        check_symbol(&self.symbol)?;
        if !self.price.is_finite() {
            return Err(DataError::InvalidField {
                field: "price",
                reason: "must be a finite number".to_string(),
            });
        }
        Ok(())
    }
}

/// One training row: a detection with its validation and a feature snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledSample {
    pub detection: Detection,
    pub validation: Validation,
    pub features: FeatureVector,
}
