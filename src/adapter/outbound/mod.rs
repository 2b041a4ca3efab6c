//! Outbound adapters (driven side).

pub mod csv_source;
pub mod sqlite;
