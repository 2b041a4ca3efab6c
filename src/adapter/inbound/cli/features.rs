//! `peaklabel features`: indicator values at a bar, read-only.

use std::path::Path;

use serde_json::json;
use tabled::{Table, Tabled};

use super::command::FeaturesArgs;
use super::output;
use crate::adapter::outbound::csv_source::CsvSeriesSource;
use crate::domain::{nearest_index, Bar, FeatureVector, FEATURE_COUNT};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::series::SeriesSource;

#[derive(Tabled)]
struct FeatureLine {
    #[tabled(rename = "Indicator")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Load an OHLCV file behind a spinner.
pub(super) fn load_series(path: &Path) -> Result<Vec<Bar>> {
    let pb = output::spinner(&format!("Loading {}", path.display()));
    match CsvSeriesSource::new(path).load() {
        Ok(bars) => {
            output::spinner_success(&pb, &format!("Loaded {} bars", bars.len()));
            Ok(bars)
        }
        Err(e) => {
            output::spinner_fail(&pb, "Failed to load series");
            Err(e)
        }
    }
}

/// Print a feature vector as a two-column table.
pub(super) fn print_features(features: &FeatureVector) {
    let rows: Vec<FeatureLine> = features
        .entries()
        .map(|(name, value)| FeatureLine {
            name,
            value: output::optional(value),
        })
        .collect();
    output::lines(&Table::new(rows).to_string());
}

pub fn execute(config: &Config, args: &FeaturesArgs) -> Result<()> {
    let series = load_series(&args.ohlcv)?;
    let index = nearest_index(&series, args.time)?;
    let bar = series[index];
    let features = config.engine.build().extract(&series, index)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "features",
            "index": index,
            "timestamp": bar.timestamp,
            "close": bar.close,
            "features": features,
        }));
        return Ok(());
    }

    output::section(&format!("Features at bar {index} ({})", bar.timestamp));
    output::field("Close", bar.close);
    output::field("Present", format!("{}/{FEATURE_COUNT}", features.present_count()));
    print_features(&features);
    if features.is_empty() {
        output::warning(&format!(
            "series has {} bars; at least {} are needed for indicators",
            series.len(),
            config.engine.warmup_bars
        ));
    }
    Ok(())
}
