//! Composite smart-money flow index.
//!
//! Five volume/price series are min-max normalized and blended into one
//! score in [0, 1]: higher readings suggest accumulation, lower readings
//! distribution.

use crate::services::signals::indicators::{
    accumulation_distribution, cumulative_vwap, money_flow_ratio, on_balance_volume,
    true_range, typical_price, IndicatorSeries,
};
use crate::types::candle::{closes, highs, lows, volumes};
use crate::types::Candle;

/// Candles required before the index is computed.
pub const MIN_CANDLES: usize = 50;

const MONEY_FLOW_PERIOD: usize = 14;
const SMOOTHING_WINDOW: usize = 5;
const EPSILON: f64 = 1e-4;

const VWAP_WEIGHT: f64 = 0.25;
const AD_WEIGHT: f64 = 0.25;
const OBV_WEIGHT: f64 = 0.20;
const VOLUME_RATIO_WEIGHT: f64 = 0.15;
const MONEY_FLOW_WEIGHT: f64 = 0.15;

/// Smoothed index aligned with the candle sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SmartMoneyIndex {
    /// Output of the centered moving average. The two candles at each edge
    /// (and the money-flow warm-up) are undefined.
    pub smoothed: IndicatorSeries,
    /// `smoothed` with edges filled from the nearest defined value, clamped
    /// to [0, 1].
    pub values: Vec<f64>,
}

impl SmartMoneyIndex {
    /// The last two values produced by the smoothing window, as
    /// `(previous, current)`.
    ///
    /// Edge filling copies the final smoothed value forward, so the filled
    /// tail is flat by construction and cannot show a change.
    pub fn latest_pair(&self) -> Option<(f64, f64)> {
        let mut defined = self.smoothed.iter().rev().filter_map(|v| *v);
        let current = defined.next()?;
        let previous = defined.next()?;
        Some((previous.clamp(0.0, 1.0), current.clamp(0.0, 1.0)))
    }
}

/// Min-max normalize the defined entries into [0, 1].
///
/// A constant series (or one with a single defined value) reads 0.5 at every
/// position, undefined ones included.
pub fn normalize(series: &[Option<f64>]) -> IndicatorSeries {
    let (min, max) = series
        .iter()
        .filter_map(|v| *v)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() || !max.is_finite() || max == min {
        return vec![Some(0.5); series.len()];
    }

    let range = max - min;
    series.iter().map(|v| v.map(|x| (x - min) / range)).collect()
}

/// Volume traded per unit of true range.
pub fn volume_volatility_ratio(volumes: &[f64], ranges: &[f64]) -> Vec<f64> {
    volumes
        .iter()
        .zip(ranges.iter())
        .map(|(v, tr)| v / (tr + EPSILON))
        .collect()
}

fn wrap(values: Vec<f64>) -> IndicatorSeries {
    values.into_iter().map(Some).collect()
}

/// Weighted blend of the five normalized components, before smoothing.
///
/// Undefined wherever the money-flow ratio is still warming up.
pub fn composite_index(candles: &[Candle]) -> IndicatorSeries {
    let high = highs(candles);
    let low = lows(candles);
    let close = closes(candles);
    let volume = volumes(candles);

    let typical = typical_price(&high, &low, &close);
    let ranges = true_range(&high, &low, &close);

    let vwap = normalize(&wrap(cumulative_vwap(&typical, &volume)));
    let ad = normalize(&wrap(accumulation_distribution(&high, &low, &close, &volume)));
    let obv = normalize(&wrap(on_balance_volume(&close, &volume)));
    let ratio = normalize(&wrap(volume_volatility_ratio(&volume, &ranges)));
    let flow = normalize(&money_flow_ratio(&typical, &volume, MONEY_FLOW_PERIOD));

    (0..candles.len())
        .map(|i| {
            Some(
                VWAP_WEIGHT * vwap[i]?
                    + AD_WEIGHT * ad[i]?
                    + OBV_WEIGHT * obv[i]?
                    + VOLUME_RATIO_WEIGHT * ratio[i]?
                    + MONEY_FLOW_WEIGHT * flow[i]?,
            )
        })
        .collect()
}

/// Centered moving average; defined only where the whole window is.
fn centered_mean(series: &[Option<f64>], window: usize) -> IndicatorSeries {
    let len = series.len();
    let half = window / 2;
    let mut out = vec![None; len];
    if window == 0 || len < window {
        return out;
    }

    for i in half..(len - (window - 1 - half)) {
        let slice = &series[(i - half)..=(i + window - 1 - half)];
        let sum: Option<f64> = slice.iter().copied().sum();
        out[i] = sum.map(|s| s / window as f64);
    }

    out
}

/// Fill undefined entries backward from the first defined value, then
/// forward from the last one.
fn fill_edges(series: &[Option<f64>]) -> Vec<f64> {
    let mut out: Vec<Option<f64>> = series.to_vec();

    let mut next = None;
    for v in out.iter_mut().rev() {
        match v {
            Some(x) => next = Some(*x),
            None => *v = next,
        }
    }

    let mut prev = None;
    for v in out.iter_mut() {
        match v {
            Some(x) => prev = Some(*x),
            None => *v = prev,
        }
    }

    out.into_iter().map(|v| v.unwrap_or(0.5)).collect()
}

/// Compute the smart-money index, or `None` for fewer than
/// [`MIN_CANDLES`] candles.
pub fn smart_money_index(candles: &[Candle]) -> Option<SmartMoneyIndex> {
    if candles.len() < MIN_CANDLES {
        return None;
    }

    let smoothed = centered_mean(&composite_index(candles), SMOOTHING_WINDOW);
    let values = fill_edges(&smoothed)
        .into_iter()
        .map(|v| v.clamp(0.0, 1.0))
        .collect();

    Some(SmartMoneyIndex { smoothed, values })
}
