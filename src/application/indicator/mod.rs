//! Point-in-time technical indicator engine.
//!
//! Computes the fixed [`FeatureVector`] for one bar of an OHLCV series using
//! only that bar and the bars before it. Indicators:
//!
//! - RSI(14) from simple means of the last 14 close-to-close deltas
//! - MACD(12, 26, 9) on recursive EMAs seeded with the first close
//! - Bollinger Bands(20, 2) with the sample standard deviation
//! - SMA(20) of close and volume, EMA(12) and EMA(26) of close
//! - Stochastic %K(14) and %D(3), Williams %R(14)
//! - ATR(14) as the simple mean of true range
//!
//! A value whose window is not yet filled, or whose denominator is zero, is
//! `None`. Only a structurally invalid series is an error.

mod window;

use tracing::debug;

use crate::domain::{validate_series, Bar, FeatureVector};
use crate::error::DataError;

use window::{
    ema_series, finite, trailing_max, trailing_mean, trailing_min, trailing_sample_std,
};

/// Minimum series length before any indicator is reported.
pub const DEFAULT_WARMUP_BARS: usize = 50;

const RSI_PERIOD: usize = 14;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;
const BB_PERIOD: usize = 20;
const BB_WIDTH: f64 = 2.0;
const SMA_PERIOD: usize = 20;
const STOCH_PERIOD: usize = 14;
const STOCH_D_PERIOD: usize = 3;
const ATR_PERIOD: usize = 14;

/// Indicator engine with a configurable warm-up length.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorEngine {
    warmup_bars: usize,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(DEFAULT_WARMUP_BARS)
    }
}

impl IndicatorEngine {
    #[must_use]
    pub const fn new(warmup_bars: usize) -> Self {
        Self { warmup_bars }
    }

    #[must_use]
    pub const fn warmup_bars(&self) -> usize {
        self.warmup_bars
    }

    /// Compute the features of `series[target_index]`.
    ///
    /// Returns [`FeatureVector::empty`] when the series is shorter than the
    /// warm-up length.
    ///
    /// # Errors
    /// Returns [`DataError`] for an empty or malformed series, or an index
    /// past the end.
    pub fn extract(&self, series: &[Bar], target_index: usize) -> Result<FeatureVector, DataError> {
        validate_series(series)?;
        if target_index >= series.len() {
            return Err(DataError::IndexOutOfRange {
                index: target_index,
                len: series.len(),
            });
        }
        if series.len() < self.warmup_bars {
            debug!(
                bars = series.len(),
                warmup = self.warmup_bars,
                "Series shorter than warm-up, no features"
            );
            return Ok(FeatureVector::empty());
        }

        let features = compute(&series[..=target_index]);
        debug!(
            target_index,
            present = features.present_count(),
            "Extracted features"
        );
        Ok(features)
    }
}

/// Features at `series[target_index]` with the default warm-up.
///
/// # Errors
/// See [`IndicatorEngine::extract`].
pub fn extract_features(series: &[Bar], target_index: usize) -> Result<FeatureVector, DataError> {
    IndicatorEngine::default().extract(series, target_index)
}

/// All indicators at the last bar of `history`.
fn compute(history: &[Bar]) -> FeatureVector {
    let closes: Vec<f64> = history.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = history.iter().map(|b| b.volume).collect();

    let ema_fast = ema_series(&closes, MACD_FAST);
    let ema_slow = ema_series(&closes, MACD_SLOW);
    let macd: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| fast - slow)
        .collect();
    let signal = ema_series(&macd, MACD_SIGNAL);

    let macd_line = macd.last().copied().and_then(finite);
    let macd_signal = signal.last().copied().and_then(finite);
    let macd_histogram = match (macd_line, macd_signal) {
        (Some(line), Some(signal)) => finite(line - signal),
        _ => None,
    };

    let bb_middle = trailing_mean(&closes, BB_PERIOD);
    let bb_std = trailing_sample_std(&closes, BB_PERIOD);
    let (bb_upper, bb_lower) = match (bb_middle, bb_std) {
        (Some(mid), Some(std)) => (finite(mid + BB_WIDTH * std), finite(mid - BB_WIDTH * std)),
        _ => (None, None),
    };

    let stoch_k_recent: Vec<Option<f64>> = (history.len().saturating_sub(STOCH_D_PERIOD)
        ..history.len())
        .map(|end| stochastic_k(&history[..=end]))
        .collect();
    let stoch_k = stochastic_k(history);
    let stoch_d = if stoch_k_recent.len() == STOCH_D_PERIOD {
        stoch_k_recent
            .iter()
            .copied()
            .collect::<Option<Vec<f64>>>()
            .and_then(|ks| trailing_mean(&ks, STOCH_D_PERIOD))
    } else {
        None
    };

    FeatureVector {
        rsi_14: rsi(&closes, RSI_PERIOD),
        macd_line,
        macd_signal,
        macd_histogram,
        bb_upper,
        bb_middle,
        bb_lower,
        volume_sma_20: trailing_mean(&volumes, SMA_PERIOD),
        price_sma_20: trailing_mean(&closes, SMA_PERIOD),
        price_ema_12: ema_fast.last().copied().and_then(finite),
        price_ema_26: ema_slow.last().copied().and_then(finite),
        stoch_k,
        stoch_d,
        atr_14: atr(history, ATR_PERIOD),
        williams_r: williams_r(history),
    }
}

/// RSI from simple averages of the last `period` deltas. `None` when the
/// average loss is zero.
fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }
    let recent = &closes[closes.len() - period - 1..];
    let (gain, loss) = recent
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0, 0.0), |(gain, loss), delta| {
            if delta > 0.0 {
                (gain + delta, loss)
            } else {
                (gain, loss - delta)
            }
        });
    let avg_gain = gain / period as f64;
    let avg_loss = loss / period as f64;
    if avg_loss == 0.0 {
        return None;
    }
    finite(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}

/// Highest high and lowest low of the trailing stochastic window.
fn stochastic_range(history: &[Bar]) -> Option<(f64, f64)> {
    let highs: Vec<f64> = history.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = history.iter().map(|b| b.low).collect();
    let high = trailing_max(&highs, STOCH_PERIOD)?;
    let low = trailing_min(&lows, STOCH_PERIOD)?;
    (high != low).then_some((high, low))
}

fn stochastic_k(history: &[Bar]) -> Option<f64> {
    let (high, low) = stochastic_range(history)?;
    let close = history.last()?.close;
    finite(100.0 * (close - low) / (high - low))
}

fn williams_r(history: &[Bar]) -> Option<f64> {
    let (high, low) = stochastic_range(history)?;
    let close = history.last()?.close;
    finite(-100.0 * (high - close) / (high - low))
}

/// Mean true range. Bar 0 has no previous close, so its range is high - low.
fn atr(history: &[Bar], period: usize) -> Option<f64> {
    let true_ranges: Vec<f64> = history
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let range = bar.high - bar.low;
            match i.checked_sub(1).map(|p| history[p].close) {
                Some(prev) => range
                    .max((bar.high - prev).abs())
                    .max((bar.low - prev).abs()),
                None => range,
            }
        })
        .collect();
    trailing_mean(&true_ranges, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    const EPS: f64 = 1e-9;

    fn series_from_closes(closes: &[f64]) -> Vec<Bar> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                Bar::new(
                    t0 + Duration::minutes(3 * i as i64),
                    c,
                    c + 1.0,
                    c - 1.0,
                    c,
                    1000.0 + i as f64,
                )
            })
            .collect()
    }

    fn zigzag(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn short_series_yields_empty_vector() {
        let series = series_from_closes(&zigzag(49));
        let features = extract_features(&series, 48).unwrap();
        assert!(features.is_empty());
    }

    #[test]
    fn full_history_populates_every_indicator() {
        let series = series_from_closes(&zigzag(60));
        let features = extract_features(&series, 59).unwrap();
        assert_eq!(features.present_count(), 15, "{features:?}");
    }

    #[test]
    fn early_index_leaves_windows_absent() {
        let series = series_from_closes(&zigzag(60));
        let features = extract_features(&series, 5).unwrap();
        assert!(features.rsi_14.is_none());
        assert!(features.price_sma_20.is_none());
        assert!(features.bb_upper.is_none());
        assert!(features.stoch_k.is_none());
        assert!(features.atr_14.is_none());
        // Recursive EMAs have no window
        assert!(features.price_ema_12.is_some());
        assert!(features.macd_line.is_some());
    }

    #[test]
    fn window_edges() {
        let series = series_from_closes(&zigzag(60));
        let at = |i| extract_features(&series, i).unwrap();

        assert!(at(13).rsi_14.is_none());
        assert!(at(14).rsi_14.is_some());
        assert!(at(12).atr_14.is_none());
        assert!(at(13).atr_14.is_some());
        assert!(at(13).stoch_k.is_some());
        assert!(at(14).stoch_d.is_none());
        assert!(at(15).stoch_d.is_some());
        assert!(at(18).price_sma_20.is_none());
        assert!(at(19).price_sma_20.is_some());
    }

    #[test]
    fn rising_closes_make_rsi_absent() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let series = series_from_closes(&closes);
        let features = extract_features(&series, 59).unwrap();
        assert_eq!(features.rsi_14, None);
    }

    #[test]
    fn flat_range_makes_stochastics_absent() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let series: Vec<Bar> = (0..60)
            .map(|i| Bar::new(t0 + Duration::minutes(i), 50.0, 50.0, 50.0, 50.0, 1.0))
            .collect();
        let features = extract_features(&series, 59).unwrap();
        assert_eq!(features.stoch_k, None);
        assert_eq!(features.stoch_d, None);
        assert_eq!(features.williams_r, None);
        assert_eq!(features.rsi_14, None);
        assert_eq!(features.atr_14, Some(0.0));
        assert_eq!(features.bb_upper, Some(50.0));
    }

    #[test]
    fn rsi_matches_hand_computation() {
        // 14 deltas: seven +2 and seven -1 -> RS = 2, RSI = 66.67
        let mut closes = vec![100.0];
        for i in 0..14 {
            let last = *closes.last().unwrap();
            closes.push(if i % 2 == 0 { last + 2.0 } else { last - 1.0 });
        }
        let value = rsi(&closes, 14).unwrap();
        assert!((value - 200.0 / 3.0).abs() < EPS);
    }

    fn bar(i: i64, high: f64, low: f64, close: f64) -> Bar {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Bar::new(t0 + Duration::hours(i), close, high, low, close, 1.0)
    }

    #[test]
    fn atr_matches_hand_computation() {
        // True ranges: 2 (first bar, high - low), 3, 1, 5 (gap above prior close)
        let bars = [
            bar(0, 10.0, 8.0, 9.0),
            bar(1, 12.0, 9.0, 11.0),
            bar(2, 11.0, 10.0, 10.0),
            bar(3, 15.0, 12.0, 14.0),
        ];
        assert!((atr(&bars[..3], 3).unwrap() - 2.0).abs() < EPS);
        assert!((atr(&bars, 3).unwrap() - 3.0).abs() < EPS);
        assert_eq!(atr(&bars[..2], 3), None);
    }

    #[test]
    fn stochastics_match_hand_computation() {
        // Every bar spans 90..110; the last three closes give %K of 25, 50, 100
        let mut closes = vec![100.0; 13];
        closes.extend([95.0, 100.0, 110.0]);
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| bar(i as i64, 110.0, 90.0, c))
            .collect();

        let f = compute(&bars);
        assert!((f.stoch_k.unwrap() - 100.0).abs() < EPS);
        assert!((f.stoch_d.unwrap() - 175.0 / 3.0).abs() < EPS);
        assert!(f.williams_r.unwrap().abs() < EPS);

        let f = compute(&bars[..15]);
        assert!((f.stoch_k.unwrap() - 50.0).abs() < EPS);
        assert!(f.stoch_d.is_none());
    }

    #[test]
    fn bollinger_bands_use_sample_deviation() {
        // Ten closes of 1 and ten of 3: mean 2, sum of squares 20, sample std sqrt(20/19)
        let closes: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 1.0 } else { 3.0 }).collect();
        let f = compute(&series_from_closes(&closes));
        let std = (20.0_f64 / 19.0).sqrt();

        assert!((f.bb_middle.unwrap() - 2.0).abs() < EPS);
        assert!((f.bb_upper.unwrap() - (2.0 + 2.0 * std)).abs() < EPS);
        assert!((f.bb_lower.unwrap() - (2.0 - 2.0 * std)).abs() < EPS);
        assert!((f.bb_upper.unwrap() - f.bb_lower.unwrap() - 4.0 * std).abs() < EPS);
        assert_eq!(f.price_sma_20, f.bb_middle);
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let series = series_from_closes(&zigzag(80));
        for i in 0..series.len() {
            let f = extract_features(&series, i).unwrap();
            let (line, signal, hist) = (
                f.macd_line.unwrap(),
                f.macd_signal.unwrap(),
                f.macd_histogram.unwrap(),
            );
            assert!((hist - (line - signal)).abs() < EPS);
        }
    }

    #[test]
    fn stochastics_stay_in_range() {
        let series = series_from_closes(&zigzag(80));
        let f = extract_features(&series, 79).unwrap();
        let k = f.stoch_k.unwrap();
        let w = f.williams_r.unwrap();
        assert!((0.0..=100.0).contains(&k));
        assert!((-100.0..=0.0).contains(&w));
        // %K and %R are the same ratio on shifted scales
        assert!((k - 100.0 - w).abs() < EPS);
    }

    #[test]
    fn index_past_end_is_an_error() {
        let series = series_from_closes(&zigzag(60));
        assert_eq!(
            extract_features(&series, 60),
            Err(DataError::IndexOutOfRange { index: 60, len: 60 })
        );
    }

    #[test]
    fn custom_warmup_is_respected() {
        let series = series_from_closes(&zigzag(30));
        assert!(extract_features(&series, 29).unwrap().is_empty());
        let engine = IndicatorEngine::new(20);
        assert!(!engine.extract(&series, 29).unwrap().is_empty());
    }
}
