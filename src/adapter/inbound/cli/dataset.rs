//! `peaklabel dataset`: export labeled samples as CSV.

use std::io::Write;
use std::path::Path;

use serde_json::json;

use super::command::DatasetArgs;
use super::output;
use crate::adapter::outbound::sqlite::database::model::format_instant;
use crate::domain::{EventSource, LabeledSample, FEATURE_NAMES};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::store::EventStore;

const LEADING_COLUMNS: [&str; 8] = [
    "symbol",
    "detect_time",
    "type",
    "price",
    "confidence",
    "source",
    "is_valid_peak_dip",
    "trend_label",
];

/// Write samples as CSV: event columns, then features in canonical order.
/// Absent values are empty cells.
pub fn write_dataset<W: Write>(writer: W, samples: &[LabeledSample]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(LEADING_COLUMNS.iter().chain(FEATURE_NAMES.iter()))?;

    for sample in samples {
        let detection = &sample.detection;
        let validation = &sample.validation;
        let mut record = vec![
            detection.symbol.clone(),
            format_instant(detection.detect_time),
            detection.kind.to_string(),
            detection.price.to_string(),
            detection.confidence.to_string(),
            detection.source.to_string(),
            validation
                .is_valid
                .map_or_else(String::new, |v| u8::from(v).to_string()),
            validation
                .trend_label
                .map_or_else(String::new, |t| t.to_string()),
        ];
        record.extend(
            sample
                .features
                .values()
                .iter()
                .map(|v| v.map_or_else(String::new, |x| x.to_string())),
        );
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn execute(config: &Config, db: &Path, args: &DatasetArgs) -> Result<()> {
    let source = EventSource::from(args.source);
    let store = bootstrap::open_store(config, db)?;
    let samples = store.labeled_dataset(source)?;

    let Some(path) = &args.output else {
        return write_dataset(std::io::stdout().lock(), &samples);
    };

    write_dataset(std::fs::File::create(path)?, &samples)?;
    if output::is_json() {
        output::json_output(json!({
            "command": "dataset",
            "source": source,
            "rows": samples.len(),
            "output": path.display().to_string(),
        }));
        return Ok(());
    }
    output::success(&format!("Exported {} samples", samples.len()));
    output::field("Output", path.display());
    Ok(())
}
