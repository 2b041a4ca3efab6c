use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Malformed or unusable input data.
///
/// Raised for structurally invalid OHLCV series and for domain values that
/// cannot be persisted. Single-indicator edge cases (a zero denominator, an
/// unfilled window) never produce this error; they yield absent values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("series is empty")]
    EmptySeries,

    #[error("target index {index} out of range for series of {len} bars")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("timestamps must be strictly increasing (bar {index} at {timestamp})")]
    NonMonotonic { index: usize, timestamp: String },

    #[error("missing value for {field} at bar {index}")]
    MissingValue { field: &'static str, index: usize },

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("duplicate detection for {symbol} at {detect_time} from {source_kind}")]
    Conflict {
        symbol: String,
        detect_time: String,
        source_kind: String,
    },

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl Error {
    /// True when a duplicate detection was rejected by the store.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }
}
