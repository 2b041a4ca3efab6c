//! CLI module graph and dispatch.

pub mod command;
pub mod dataset;
pub mod detect;
pub mod events;
pub mod features;
pub mod init;
pub mod label;
pub mod output;
pub mod paths;

use command::{Cli, Commands};

use crate::error::Result;
use crate::infrastructure::bootstrap::resolve_database_path;
use crate::infrastructure::config::settings::Config;

/// Log level implied by `-q` / `-v` flags, if any.
#[must_use]
pub fn log_level_override(quiet: bool, verbose: u8) -> Option<&'static str> {
    match (quiet, verbose) {
        (true, _) => Some("error"),
        (false, 0) => None,
        (false, 1) => Some("info"),
        (false, 2) => Some("debug"),
        (false, _) => Some("trace"),
    }
}

/// Run the parsed command against a loaded configuration.
///
/// # Errors
/// Returns the first error raised by the command.
pub fn execute(cli: &Cli, config: &Config) -> Result<()> {
    let db = resolve_database_path(config, cli.db.as_deref(), &paths::default_database());
    match &cli.command {
        Commands::Init(args) => init::execute(config, &db, args),
        Commands::Detect(args) => detect::execute(config, &db, args),
        Commands::Label(args) => label::execute(config, &db, args),
        Commands::Features(args) => features::execute(config, args),
        Commands::Events(args) => events::execute(config, &db, args),
        Commands::Dataset(args) => dataset::execute(config, &db, args),
    }
}
