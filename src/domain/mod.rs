//! Storage-agnostic domain types.

pub mod event;
pub mod feature;
pub mod ohlcv;
pub mod summary;
pub mod time;

pub use event::{Detection, EventKind, EventSource, JoinedEvent, TrendLabel, Validation};
pub use feature::{FeatureSnapshot, FeatureVector, LabeledSample, FEATURE_COUNT, FEATURE_NAMES};
pub use ohlcv::{nearest_index, validate_series, Bar};
pub use summary::EventSummary;
pub use time::{parse_instant, TimeRange};
