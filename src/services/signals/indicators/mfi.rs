//! Money flow building blocks (typical price, raw money flow, flow ratio).

use super::IndicatorSeries;

pub const DEFAULT_PERIOD: usize = 14;

const EPSILON: f64 = 1e-4;

/// Typical price: (high + low + close) / 3.
pub fn typical_price(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    high.iter()
        .zip(low.iter())
        .zip(close.iter())
        .map(|((h, l), c)| (h + l + c) / 3.0)
        .collect()
}

/// Raw money flow: typical price * volume.
pub fn money_flow(typical: &[f64], volumes: &[f64]) -> Vec<f64> {
    typical
        .iter()
        .zip(volumes.iter())
        .map(|(tp, v)| tp * v)
        .collect()
}

/// Positive share of money flow over a rolling window.
///
/// Flow counts as positive when the typical price rose against the previous
/// candle and negative when it fell. The ratio is
/// `positive / (positive + negative + 1e-4)`, in [0, 1). The first value
/// sits at index `period - 1`.
pub fn money_flow_ratio(typical: &[f64], volumes: &[f64], period: usize) -> IndicatorSeries {
    let flows = money_flow(typical, volumes);
    let len = flows.len();
    let mut out = vec![None; len];
    if period == 0 || len < period {
        return out;
    }

    let mut positive = vec![0.0; len];
    let mut negative = vec![0.0; len];
    for i in 1..len {
        if typical[i] > typical[i - 1] {
            positive[i] = flows[i];
        } else if typical[i] < typical[i - 1] {
            negative[i] = flows[i];
        }
    }

    for i in (period - 1)..len {
        let start = i + 1 - period;
        let pos: f64 = positive[start..=i].iter().sum();
        let neg: f64 = negative[start..=i].iter().sum();
        out[i] = Some(pos / (pos + neg + EPSILON));
    }

    out
}
