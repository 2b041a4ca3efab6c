//! CSV-backed OHLCV provider.
//!
//! Expects a header row naming `timestamp, open, high, low, close, volume`
//! in any order and any letter case. Extra columns are ignored.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::domain::{parse_instant, Bar};
use crate::error::{DataError, Result};
use crate::port::outbound::series::SeriesSource;

const COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// Reads bars from a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvSeriesSource {
    path: PathBuf,
}

impl CsvSeriesSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SeriesSource for CsvSeriesSource {
    fn load(&self) -> Result<Vec<Bar>> {
        let file = std::fs::File::open(&self.path)?;
        let bars = read_bars(file)?;
        debug!(path = %self.path.display(), bars = bars.len(), "Loaded OHLCV series");
        Ok(bars)
    }
}

/// Parse bars from any CSV reader.
///
/// # Errors
/// Returns [`DataError::MissingColumn`] when a required header is absent and
/// [`DataError::InvalidField`] for a cell that does not parse.
pub fn read_bars<R: Read>(input: R) -> Result<Vec<Bar>> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let positions = column_positions(reader.headers()?)?;

    let mut bars = Vec::new();
    for record in reader.records() {
        let record = record?;
        bars.push(parse_record(&record, &positions)?);
    }
    Ok(bars)
}

fn column_positions(headers: &StringRecord) -> std::result::Result<[usize; 6], DataError> {
    let mut positions = [0; 6];
    for (slot, name) in positions.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(DataError::MissingColumn(name))?;
    }
    Ok(positions)
}

fn parse_record(
    record: &StringRecord,
    positions: &[usize; 6],
) -> std::result::Result<Bar, DataError> {
    let cell = |i: usize| record.get(positions[i]).unwrap_or("");
    let number = |i: usize| -> std::result::Result<f64, DataError> {
        let text = cell(i);
        text.parse::<f64>().map_err(|_| DataError::InvalidField {
            field: COLUMNS[i],
            reason: format!("'{text}' is not a number"),
        })
    };

    Ok(Bar::new(
        parse_timestamp(cell(0))?,
        number(1)?,
        number(2)?,
        number(3)?,
        number(4)?,
        number(5)?,
    ))
}

/// RFC 3339, naive UTC, or Unix epoch milliseconds.
fn parse_timestamp(text: &str) -> std::result::Result<DateTime<Utc>, DataError> {
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        return text
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| DataError::InvalidField {
                field: "timestamp",
                reason: format!("'{text}' is out of range for epoch milliseconds"),
            });
    }
    parse_instant("timestamp", text)
}
