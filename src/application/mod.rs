//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod indicator;
pub mod labeling;
pub mod seed;

pub use indicator::{extract_features, IndicatorEngine, DEFAULT_WARMUP_BARS};
pub use labeling::{LabelReceipt, LabelRequest, LabelingGateway};
pub use seed::{seed_samples, seed_store};
