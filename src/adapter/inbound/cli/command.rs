//! Command-line interface definitions.
//!
//! Defines the CLI structure for the peaklabel application using `clap`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use super::paths;
use crate::domain::{parse_instant, EventKind, EventSource, TrendLabel};

/// Peak/dip event labeling with point-in-time indicator features
#[derive(Parser, Debug)]
#[command(name = "peaklabel")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Path to the SQLite database (overrides `[store] database`)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the peaklabel CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or migrate the database
    Init(InitArgs),

    /// Record one detection
    Detect(DetectArgs),

    /// Label an event and store its feature snapshot
    Label(LabelArgs),

    /// Print indicator features at a bar without writing
    Features(FeaturesArgs),

    /// List stored events with their validations
    Events(EventsArgs),

    /// Export labeled samples as CSV
    Dataset(DatasetArgs),
}

/// Event kind as typed on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Peak,
    Dip,
}

impl From<KindArg> for EventKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Peak => Self::Peak,
            KindArg::Dip => Self::Dip,
        }
    }
}

/// Detection source as typed on the command line.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum SourceArg {
    #[default]
    Ml,
    Manual,
}

impl From<SourceArg> for EventSource {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Ml => Self::MlPrediction,
            SourceArg::Manual => Self::ManualLabel,
        }
    }
}

/// Trend label as typed on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TrendArg {
    Uptrend,
    Downtrend,
    Sideways,
}

impl From<TrendArg> for TrendLabel {
    fn from(trend: TrendArg) -> Self {
        match trend {
            TrendArg::Uptrend => Self::Uptrend,
            TrendArg::Downtrend => Self::Downtrend,
            TrendArg::Sideways => Self::Sideways,
        }
    }
}

fn parse_time(text: &str) -> Result<DateTime<Utc>, String> {
    parse_instant("time", text).map_err(|e| e.to_string())
}

/// Arguments for `init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Insert sample events when the database is empty
    #[arg(long)]
    pub seed: bool,
}

/// Arguments for `detect`.
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Asset symbol (e.g. BTC)
    #[arg(long)]
    pub symbol: String,

    /// Detection instant (RFC 3339 or `YYYY-MM-DD HH:MM:SS` UTC)
    #[arg(long, value_parser = parse_time)]
    pub time: DateTime<Utc>,

    #[arg(long, value_enum)]
    pub kind: KindArg,

    #[arg(long)]
    pub price: f64,

    /// Confidence in [0, 1]
    #[arg(long, default_value_t = 1.0)]
    pub confidence: f64,

    #[arg(long, value_enum, default_value_t = SourceArg::Ml)]
    pub source: SourceArg,
}

/// Arguments for `label`.
#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Asset symbol (e.g. BTC)
    #[arg(long)]
    pub symbol: String,

    /// Chosen instant; the nearest bar in the series is used for features
    #[arg(long, value_parser = parse_time)]
    pub time: DateTime<Utc>,

    #[arg(long, value_enum)]
    pub kind: KindArg,

    /// Mark the event valid
    #[arg(long, conflicts_with = "invalid")]
    pub valid: bool,

    /// Mark the event invalid
    #[arg(long)]
    pub invalid: bool,

    #[arg(long, value_enum)]
    pub trend: Option<TrendArg>,

    /// Event price (defaults to the nearest bar's close)
    #[arg(long)]
    pub price: Option<f64>,

    /// OHLCV CSV file
    #[arg(long)]
    pub ohlcv: PathBuf,
}

impl LabelArgs {
    /// `Some(true)` for `--valid`, `Some(false)` for `--invalid`, else unset.
    #[must_use]
    pub const fn validity(&self) -> Option<bool> {
        match (self.valid, self.invalid) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Arguments for `features`.
#[derive(Args, Debug)]
pub struct FeaturesArgs {
    /// OHLCV CSV file
    #[arg(long)]
    pub ohlcv: PathBuf,

    /// Instant; the nearest bar is used
    #[arg(long, value_parser = parse_time)]
    pub time: DateTime<Utc>,
}

/// Arguments for `events`.
#[derive(Args, Debug)]
pub struct EventsArgs {
    #[arg(long)]
    pub symbol: String,

    /// Inclusive lower bound
    #[arg(long, value_parser = parse_time)]
    pub from: Option<DateTime<Utc>>,

    /// Exclusive upper bound
    #[arg(long, value_parser = parse_time)]
    pub to: Option<DateTime<Utc>>,
}

/// Arguments for `dataset`.
#[derive(Args, Debug)]
pub struct DatasetArgs {
    #[arg(long, value_enum, default_value_t = SourceArg::Manual)]
    pub source: SourceArg,

    /// Output file path (writes to stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
