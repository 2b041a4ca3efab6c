//! Peak/dip detections and their validations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DataError;

/// Extremum type of a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Peak,
    Dip,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Peak => "peak",
            Self::Dip => "dip",
        }
    }
}

/// Producer of a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventSource {
    /// Automated predictor output.
    #[serde(rename = "ml_prediction")]
    MlPrediction,
    /// Human entry through the labeling gateway.
    #[serde(rename = "manual_labeling")]
    ManualLabel,
}

impl EventSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MlPrediction => "ml_prediction",
            Self::ManualLabel => "manual_labeling",
        }
    }
}

/// Market context around a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Uptrend,
    Downtrend,
    Sideways,
}

impl TrendLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uptrend => "uptrend",
            Self::Downtrend => "downtrend",
            Self::Sideways => "sideways",
        }
    }
}

macro_rules! text_enum {
    ($ty:ty, $field:literal, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = DataError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|v: &$ty| v.as_str() == wanted)
                    .ok_or_else(|| DataError::InvalidField {
                        field: $field,
                        reason: format!("unknown value '{s}'"),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(EventKind, "kind", [EventKind::Peak, EventKind::Dip]);
text_enum!(
    EventSource,
    "source",
    [EventSource::MlPrediction, EventSource::ManualLabel]
);
text_enum!(
    TrendLabel,
    "trend_label",
    [TrendLabel::Uptrend, TrendLabel::Downtrend, TrendLabel::Sideways]
);

pub(crate) fn check_symbol(symbol: &str) -> Result<(), DataError> {
    if symbol.trim().is_empty() {
        return Err(DataError::InvalidField {
            field: "symbol",
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// One detected extremum. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub symbol: String,
    pub detect_time: DateTime<Utc>,
    pub kind: EventKind,
    pub price: f64,
    pub confidence: f64,
    pub source: EventSource,
}

impl Detection {
    /// Build a detection with full confidence from the ML producer.
    ///
    /// # Errors
    /// Returns [`DataError`] for an empty symbol or a non-finite price.
    pub fn try_new(
        symbol: impl Into<String>,
        detect_time: DateTime<Utc>,
        kind: EventKind,
        price: f64,
    ) -> Result<Self, DataError> {
        let detection = Self {
            symbol: symbol.into(),
            detect_time,
            kind,
            price,
            confidence: 1.0,
            source: EventSource::MlPrediction,
        };
        detection.validate()?;
        Ok(detection)
    }

    /// # Errors
    /// Returns [`DataError`] unless `confidence` lies in `[0, 1]`.
    pub fn with_confidence(mut self, confidence: f64) -> Result<Self, DataError> {
        self.confidence = confidence;
        self.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = source;
        self
    }

    /// Re-check field invariants; the store calls this before writing.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), DataError> {
        check_symbol(&self.symbol)?;
        if !self.price.is_finite() {
            return Err(DataError::InvalidField {
                field: "price",
                reason: "must be a finite number".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(DataError::InvalidField {
                field: "confidence",
                reason: format!("{} is outside [0, 1]", self.confidence),
            });
        }
        Ok(())
    }
}

/// Judgment on a detection, unique per (symbol, detect_time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub symbol: String,
    pub detect_time: DateTime<Utc>,
    pub is_valid: Option<bool>,
    pub trend_label: Option<TrendLabel>,
}

impl Validation {
    /// # Errors
    /// Returns [`DataError`] for an empty symbol.
    pub fn try_new(
        symbol: impl Into<String>,
        detect_time: DateTime<Utc>,
        is_valid: Option<bool>,
        trend_label: Option<TrendLabel>,
    ) -> Result<Self, DataError> {
        let validation = Self {
            symbol: symbol.into(),
            detect_time,
            is_valid,
            trend_label,
        };
        validation.validate()?;
        Ok(validation)
    }

    /// # Errors
    /// Returns [`DataError`] for an empty symbol.
    pub fn validate(&self) -> Result<(), DataError> {
        check_symbol(&self.symbol)
    }
}

/// A stored detection left-joined with its validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedEvent {
    pub id: i32,
    #[serde(flatten)]
    pub detection: Detection,
    pub validation: Option<Validation>,
}

impl JoinedEvent {
    #[must_use]
    pub fn is_manual(&self) -> bool {
        self.detection.source == EventSource::ManualLabel
    }

    /// True only when a validation exists and marks the event valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation
            .as_ref()
            .and_then(|v| v.is_valid)
            .unwrap_or(false)
    }
}
