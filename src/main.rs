use clap::Parser;
use tracing::debug;

use peaklabel::adapter::inbound::cli::command::Cli;
use peaklabel::adapter::inbound::cli::output::{self, OutputConfig};
use peaklabel::adapter::inbound::cli::{execute, log_level_override};
use peaklabel::infrastructure::config::settings::Config;

fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };

    match log_level_override(cli.quiet, cli.verbose) {
        Some(level) => config.logging.with_level(level).init(),
        None => config.init_logging(),
    }
    debug!(config = %cli.config.display(), "peaklabel starting");

    if let Err(e) = execute(&cli, &config) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
