//! `peaklabel detect`: record one detection.

use std::path::Path;

use serde_json::json;

use super::command::DetectArgs;
use super::output;
use crate::domain::{Detection, EventSource};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::store::EventStore;

pub fn execute(config: &Config, db: &Path, args: &DetectArgs) -> Result<()> {
    let detection = Detection::try_new(args.symbol.trim(), args.time, args.kind.into(), args.price)?
        .with_confidence(args.confidence)?
        .with_source(EventSource::from(args.source));

    let store = bootstrap::open_store(config, db)?;
    let id = store.record_detection(&detection)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "detect",
            "id": id,
            "detection": detection,
        }));
        return Ok(());
    }

    output::success(&format!(
        "Recorded {} {} at {}",
        detection.symbol, detection.kind, detection.detect_time
    ));
    output::field("Id", id);
    output::field("Source", detection.source);
    output::field("Confidence", format!("{:.2}", detection.confidence));
    Ok(())
}
