#![allow(dead_code)]

use std::path::Path;

use chrono::{DateTime, Duration, TimeZone, Utc};
use peaklabel::domain::Bar;

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Hourly bars oscillating around a slow uptrend.
pub fn series(len: usize) -> Vec<Bar> {
    (0..len)
        .map(|i| {
            let x = i as f64;
            let close = 100.0 + (x * 0.35).sin() * 6.0 + (x * 0.11).cos() * 2.0 + x * 0.05;
            Bar::new(
                start() + Duration::hours(i as i64),
                close - 0.3,
                close + 1.2 + (x * 0.7).sin().abs(),
                close - 1.1 - (x * 0.5).cos().abs(),
                close,
                1_000.0 + (x * 0.9).sin() * 200.0 + x,
            )
        })
        .collect()
}

/// Write bars as an OHLCV CSV file.
pub fn write_csv(path: &Path, bars: &[Bar]) {
    let mut text = String::from("timestamp,open,high,low,close,volume\n");
    for bar in bars {
        text.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.timestamp.format("%Y-%m-%d %H:%M:%S"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    std::fs::write(path, text).expect("write csv");
}
