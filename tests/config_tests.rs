//! Configuration loading from files.

use peaklabel::error::{ConfigError, Error};
use peaklabel::infrastructure::config::settings::Config;

#[test]
fn example_config_parses() {
    let config = Config::parse_toml(include_str!("../config.toml.example")).unwrap();
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.store.busy_timeout_ms, 5000);
    assert_eq!(config.engine.warmup_bars, 50);
    assert!(config.store.database.is_none());
}

#[test]
fn load_reads_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[store]\ndatabase = \"labels.db\"\nreject_duplicate_detections = true\n",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert!(config.store.reject_duplicate_detections);
    assert_eq!(config.database_path().unwrap().to_str(), Some("labels.db"));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn invalid_format_is_rejected() {
    let err = Config::parse_toml("[logging]\nformat = \"xml\"\n").unwrap_err();
    assert!(err.to_string().contains("logging.format"));
}

#[test]
fn empty_database_path_is_rejected() {
    let err = Config::parse_toml("[store]\ndatabase = \"  \"\n").unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::MissingField {
            field: "store.database"
        })
    ));
}
