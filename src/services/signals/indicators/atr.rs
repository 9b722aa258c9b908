//! Average True Range (ATR) indicator.

use super::IndicatorSeries;

pub const DEFAULT_PERIOD: usize = 14;

/// True range per candle:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
///
/// The first candle has no previous close and uses High-Low.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let len = close.len().min(high.len()).min(low.len());
    (0..len)
        .map(|i| {
            let hl = high[i] - low[i];
            if i == 0 {
                return hl;
            }
            let hc = (high[i] - close[i - 1]).abs();
            let lc = (low[i] - close[i - 1]).abs();
            hl.max(hc).max(lc)
        })
        .collect()
}

/// ATR (Average True Range).
///
/// Wilder-smoothed average of true ranges. The first value sits at index
/// `period` and averages the true ranges of candles 1..=period.
pub fn atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> IndicatorSeries {
    let ranges = true_range(high, low, close);
    let mut out = vec![None; ranges.len()];
    if period == 0 || ranges.len() < period + 1 {
        return out;
    }

    let mut current = ranges[1..=period].iter().sum::<f64>() / period as f64;
    out[period] = Some(current);

    for i in (period + 1)..ranges.len() {
        current = (current * (period - 1) as f64 + ranges[i]) / period as f64;
        out[i] = Some(current);
    }

    out
}
