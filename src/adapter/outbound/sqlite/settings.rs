//! SQLite store settings (`[store]` section).

use serde::Deserialize;

use super::database::connection::DEFAULT_BUSY_TIMEOUT_MS;

/// Settings for the SQLite event store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file. Defaults to `~/.peaklabel/peaklabel.db`
    /// when unset.
    #[serde(default)]
    pub database: Option<String>,

    /// Reject a detection whose (symbol, detect_time, source) already exists.
    #[serde(default)]
    pub reject_duplicate_detections: bool,

    /// SQLite `busy_timeout` applied to every connection.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,
}

fn default_busy_timeout_ms() -> u32 {
    DEFAULT_BUSY_TIMEOUT_MS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: None,
            reject_duplicate_detections: false,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}
