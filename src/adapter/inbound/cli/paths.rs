//! Path utilities for peaklabel.
//!
//! All data lives under `~/.peaklabel/`:
//! - `~/.peaklabel/config.toml` - main configuration
//! - `~/.peaklabel/peaklabel.db` - event database

use std::path::PathBuf;

/// Returns the peaklabel home directory (`~/.peaklabel/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".peaklabel")
}

/// Returns the default config file path (`~/.peaklabel/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default database path (`~/.peaklabel/peaklabel.db`).
pub fn default_database() -> PathBuf {
    home_dir().join("peaklabel.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_peaklabel_home() {
        let config = default_config();
        let db = default_database();

        assert!(home_dir().ends_with(".peaklabel"));
        assert!(config.starts_with(home_dir()));
        assert_eq!(db.file_name().unwrap(), "peaklabel.db");
    }
}
