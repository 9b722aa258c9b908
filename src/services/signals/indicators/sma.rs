//! Simple Moving Average (SMA) indicator.

use super::IndicatorSeries;

/// Default SMA lookback.
pub const DEFAULT_PERIOD: usize = 20;

/// SMA (Simple Moving Average).
///
/// Average of the last `period` values. The first defined entry sits at
/// index `period - 1`.
pub fn sma(values: &[f64], period: usize) -> IndicatorSeries {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    for i in (period - 1)..values.len() {
        let window = &values[(i + 1 - period)..=i];
        out[i] = Some(window.iter().sum::<f64>() / period as f64);
    }

    out
}
