//! `peaklabel label`: record a manual label with its feature snapshot.

use std::path::Path;

use serde_json::json;

use super::command::LabelArgs;
use super::features::{load_series, print_features};
use super::output;
use crate::application::labeling::LabelRequest;
use crate::domain::nearest_index;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Snap the chosen instant to the nearest bar and submit the label there.
///
/// The event keeps the chosen instant; the price defaults to the bar's close.
pub fn execute(config: &Config, db: &Path, args: &LabelArgs) -> Result<()> {
    let series = load_series(&args.ohlcv)?;
    let index = nearest_index(&series, args.time)?;
    let bar = series[index];

    let request = LabelRequest {
        symbol: args.symbol.trim().to_string(),
        instant: args.time,
        price: args.price.unwrap_or(bar.close),
        kind: args.kind.into(),
        is_valid: args.validity(),
        trend_label: args.trend.map(Into::into),
    };

    let gateway = bootstrap::build_gateway(config, db)?;
    let receipt = gateway.submit_label(&request, &series, index)?;

    if receipt.features.is_empty() {
        output::warning(&format!(
            "series has {} bars; snapshot stored without indicator values",
            series.len()
        ));
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "label",
            "detection_id": receipt.detection_id,
            "snapshot_id": receipt.snapshot_id,
            "bar_index": index,
            "bar_timestamp": bar.timestamp,
            "price": request.price,
            "features": receipt.features,
        }));
        return Ok(());
    }

    output::success(&format!(
        "Labeled {} {} at {}",
        request.symbol, request.kind, request.instant
    ));
    output::field("Detection id", receipt.detection_id);
    output::field("Snapshot id", receipt.snapshot_id);
    output::field("Price", request.price);
    output::field("Nearest bar", format!("#{index} {}", bar.timestamp));
    if output::verbosity() > 0 {
        print_features(&receipt.features);
    } else {
        output::field("Features", format!("{} present", receipt.features.present_count()));
    }
    Ok(())
}
