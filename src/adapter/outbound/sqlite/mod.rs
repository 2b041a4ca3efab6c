//! SQLite persistence adapter.
//!
//! Provides the SQLite-backed [`EventStore`](crate::port::outbound::store::EventStore)
//! implementation using Diesel ORM.

pub mod database;
pub mod settings;
pub mod store;

pub use settings::StoreConfig;
pub use store::{SqliteEventStore, SqliteEventWriter};
