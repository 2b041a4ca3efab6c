//! `peaklabel events`: list joined events with a summary.

use std::path::Path;

use serde_json::json;
use tabled::{Table, Tabled};

use super::command::EventsArgs;
use super::output;
use crate::domain::{EventSummary, JoinedEvent, TimeRange};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct EventLine {
    #[tabled(rename = "Id")]
    id: i32,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Conf")]
    confidence: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Valid")]
    valid: String,
    #[tabled(rename = "Trend")]
    trend: String,
}

impl From<&JoinedEvent> for EventLine {
    fn from(event: &JoinedEvent) -> Self {
        let validation = event.validation.as_ref();
        Self {
            id: event.id,
            time: event.detection.detect_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            kind: event.detection.kind.to_string(),
            price: format!("{:.2}", event.detection.price),
            confidence: format!("{:.2}", event.detection.confidence),
            source: event.detection.source.to_string(),
            valid: match validation.and_then(|v| v.is_valid) {
                Some(true) => "yes".to_string(),
                Some(false) => "no".to_string(),
                None => "-".to_string(),
            },
            trend: validation
                .and_then(|v| v.trend_label)
                .map_or_else(|| "-".to_string(), |t| t.to_string()),
        }
    }
}

pub fn execute(config: &Config, db: &Path, args: &EventsArgs) -> Result<()> {
    let gateway = bootstrap::build_gateway(config, db)?;
    let range = TimeRange::new(args.from, args.to);
    let events = gateway.events(args.symbol.trim(), range)?;
    let summary = EventSummary::from_events(&events);

    if output::is_json() {
        output::json_output(json!({
            "command": "events",
            "symbol": args.symbol,
            "summary": summary,
            "events": events,
        }));
        return Ok(());
    }

    output::section(&format!("Events for {}", args.symbol));
    if events.is_empty() {
        output::hint("no events in range");
        return Ok(());
    }
    let rows: Vec<EventLine> = events.iter().map(EventLine::from).collect();
    output::lines(&Table::new(rows).to_string());

    output::section("Summary");
    output::field("Total", summary.total);
    output::field("Manual", summary.manual);
    output::field("ML", summary.ml);
    output::field("Valid", summary.valid);
    if let Some(rate) = summary.valid_rate() {
        output::field("Valid rate", format!("{rate:.1}%"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Detection, EventKind, TrendLabel, Validation};
    use chrono::{TimeZone, Utc};

    #[test]
    fn table_cells_are_plain_text() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let event = JoinedEvent {
            id: 7,
            detection: Detection::try_new("BTC", at, EventKind::Peak, 45000.0).unwrap(),
            validation: Some(Validation::try_new("BTC", at, Some(false), None).unwrap()),
        };

        let line = EventLine::from(&event);
        assert_eq!(line.valid, "no");
        assert_eq!(line.trend, "-");

        let table = Table::new([line]).to_string();
        assert!(!table.contains('\u{1b}'));
        assert!(table.contains("2024-01-01 10:00:00"));

        let sideways = JoinedEvent {
            validation: Some(
                Validation::try_new("BTC", at, None, Some(TrendLabel::Sideways)).unwrap(),
            ),
            ..event
        };
        let line = EventLine::from(&sideways);
        assert_eq!(line.valid, "-");
        assert_eq!(line.trend, "sideways");
    }
}
