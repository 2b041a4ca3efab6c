//! Peaklabel - peak/dip event labeling with point-in-time indicator features.
//!
//! Peaks and dips come from an automated detector or from a human labeler.
//! Each manual label is stored together with the fifteen technical
//! indicators computed at the labeled bar from that bar and earlier bars
//! only, so the stored rows can feed a training pipeline without lookahead.
//!
//! # Architecture
//!
//! - [`domain`] - Bars, detections, validations, feature vectors
//! - [`application`] - Indicator engine, labeling gateway, sample seeding
//! - [`port`] - Store and series traits
//! - [`adapter`] - SQLite store, CSV series source, CLI
//! - [`infrastructure`] - Configuration, logging, wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use peaklabel::adapter::outbound::sqlite::{SqliteEventStore, StoreConfig};
//! use peaklabel::application::{IndicatorEngine, LabelingGateway};
//!
//! let store = SqliteEventStore::open("sqlite:///tmp/labels.db", &StoreConfig::default())?;
//! let gateway = LabelingGateway::new(store, IndicatorEngine::default());
//! # Ok::<(), peaklabel::error::Error>(())
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
