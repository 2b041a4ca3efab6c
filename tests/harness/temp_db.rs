#![allow(dead_code)]

use std::path::{Path, PathBuf};

use diesel::prelude::*;
use peaklabel::adapter::outbound::sqlite::database::connection::sqlite_database_url;
use peaklabel::adapter::outbound::sqlite::{SqliteEventStore, StoreConfig};
use tempfile::TempDir;

/// Temporary file-backed SQLite database for integration tests.
///
/// The directory (and the database in it) is removed on drop.
pub struct TempDb {
    _dir: TempDir,
    path: PathBuf,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix(&format!("peaklabel-{name}-"))
            .tempdir()
            .expect("create temp dir");
        let path = dir.path().join("events.db");
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn url(&self) -> String {
        sqlite_database_url(&self.path)
    }

    /// Open a store with `config`, switching the file to WAL mode.
    pub fn store_with(&self, config: &StoreConfig) -> SqliteEventStore {
        let store = SqliteEventStore::open(&self.url(), config).expect("open store");

        // WAL mode improves concurrent writer behavior in tests.
        let mut conn = diesel::SqliteConnection::establish(&self.url()).expect("connect");
        diesel::sql_query("PRAGMA journal_mode=WAL")
            .execute(&mut conn)
            .expect("enable WAL mode");

        store
    }

    pub fn store(&self) -> SqliteEventStore {
        self.store_with(&StoreConfig::default())
    }
}
