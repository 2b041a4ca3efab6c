//! Composition root: turns configuration into a ready store and gateway.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::adapter::outbound::sqlite::database::connection::sqlite_database_url;
use crate::adapter::outbound::sqlite::SqliteEventStore;
use crate::application::labeling::LabelingGateway;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Database path: explicit override, then `[store] database`, then `fallback`.
#[must_use]
pub fn resolve_database_path(config: &Config, explicit: Option<&Path>, fallback: &Path) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| config.database_path())
        .unwrap_or_else(|| fallback.to_path_buf())
}

/// Open (and migrate) the event store at `path`, creating parent directories.
///
/// # Errors
/// Returns an error if the directory cannot be created or the database fails
/// to open or migrate.
pub fn open_store(config: &Config, path: &Path) -> Result<SqliteEventStore> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteEventStore::open(&sqlite_database_url(path), &config.store)?;
    info!(path = %path.display(), "Opened event store");
    Ok(store)
}

/// Gateway over the store at `path` with the configured engine.
///
/// # Errors
/// See [`open_store`].
pub fn build_gateway(config: &Config, path: &Path) -> Result<LabelingGateway<SqliteEventStore>> {
    let store = open_store(config, path)?;
    Ok(LabelingGateway::new(store, config.engine.build()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::outbound::store::EventStore;

    #[test]
    fn explicit_path_wins() {
        let mut config = Config::default();
        config.store.database = Some("/from/config.db".into());
        let fallback = Path::new("/fallback.db");

        assert_eq!(
            resolve_database_path(&config, Some(Path::new("/cli.db")), fallback),
            PathBuf::from("/cli.db")
        );
        assert_eq!(
            resolve_database_path(&config, None, fallback),
            PathBuf::from("/from/config.db")
        );
        config.store.database = None;
        assert_eq!(resolve_database_path(&config, None, fallback), fallback);
    }

    #[test]
    fn open_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("labels.db");

        let store = open_store(&Config::default(), &path).unwrap();
        assert!(path.exists());
        assert!(store.symbols().unwrap().is_empty());
    }
}
