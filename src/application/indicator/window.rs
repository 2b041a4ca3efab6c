//! Trailing-window statistics over a history slice.
//!
//! Every helper looks only at the tail of the slice it is given. The engine
//! passes `series[..=i]`, so nothing here can see bars after `i`.

/// `Some(v)` only for finite values.
pub(crate) fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// The last `period` values, or `None` while the window is still filling.
fn tail(values: &[f64], period: usize) -> Option<&[f64]> {
    if period == 0 || values.len() < period {
        return None;
    }
    Some(&values[values.len() - period..])
}

/// Simple moving average of the last `period` values.
pub(crate) fn trailing_mean(values: &[f64], period: usize) -> Option<f64> {
    let window = tail(values, period)?;
    finite(window.iter().sum::<f64>() / period as f64)
}

/// Sample standard deviation (n - 1) of the last `period` values.
pub(crate) fn trailing_sample_std(values: &[f64], period: usize) -> Option<f64> {
    if period < 2 {
        return None;
    }
    let window = tail(values, period)?;
    let mean = window.iter().sum::<f64>() / period as f64;
    let sum_sq: f64 = window.iter().map(|v| (v - mean).powi(2)).sum();
    finite((sum_sq / (period - 1) as f64).sqrt())
}

pub(crate) fn trailing_max(values: &[f64], period: usize) -> Option<f64> {
    tail(values, period)?.iter().copied().reduce(f64::max)
}

pub(crate) fn trailing_min(values: &[f64], period: usize) -> Option<f64> {
    tail(values, period)?.iter().copied().reduce(f64::min)
}

/// Recursive EMA with `alpha = 2 / (span + 1)`, seeded with the first value.
///
/// Output has one entry per input; there is no warm-up gap.
pub(crate) fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut iter = values.iter().copied();
    if let Some(first) = iter.next() {
        let mut prev = first;
        out.push(prev);
        for v in iter {
            prev = alpha * v + (1.0 - alpha) * prev;
            out.push(prev);
        }
    }
    out
}
