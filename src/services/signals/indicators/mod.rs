//! Technical indicator implementations.
//!
//! Every function is pure and returns a series aligned 1:1 with its input.
//! Entries before the lookback window is satisfied are `None`; short input
//! never panics, it simply yields an all-`None` series.

pub mod ad;
pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod mfi;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod vwap;

pub use ad::{accumulation_distribution, close_location_value};
pub use adx::{adx, AdxSeries};
pub use atr::{atr, true_range};
pub use bollinger::{bollinger_bands, BollingerBands};
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use mfi::{money_flow, money_flow_ratio, typical_price};
pub use obv::on_balance_volume;
pub use rsi::rsi;
pub use sma::sma;
pub use stochastic::{stochastic, StochasticSeries};
pub use vwap::cumulative_vwap;

/// Indicator output aligned with the candle sequence.
pub type IndicatorSeries = Vec<Option<f64>>;

/// Latest value of a series, if defined.
pub fn latest(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

/// Value `back` positions before the latest, if defined.
pub fn previous(series: &[Option<f64>], back: usize) -> Option<f64> {
    let len = series.len();
    if back >= len {
        return None;
    }
    series[len - 1 - back]
}

/// Defined values of a series, in order.
pub fn defined(series: &[Option<f64>]) -> Vec<f64> {
    series.iter().filter_map(|v| *v).collect()
}

/// Apply a series transform to the defined tail of a leading-undefined
/// series, padding the result back to the original length.
pub(crate) fn apply_to_defined<F>(series: &[Option<f64>], transform: F) -> IndicatorSeries
where
    F: Fn(&[f64]) -> IndicatorSeries,
{
    let Some(start) = series.iter().position(|v| v.is_some()) else {
        return vec![None; series.len()];
    };
    let tail: Vec<f64> = series[start..].iter().map(|v| v.unwrap_or(0.0)).collect();
    let mut out = vec![None; start];
    out.extend(transform(&tail));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_and_previous() {
        let series = vec![None, Some(1.0), Some(2.0)];
        assert_eq!(latest(&series), Some(2.0));
        assert_eq!(previous(&series, 1), Some(1.0));
        assert_eq!(previous(&series, 2), None);
        assert_eq!(previous(&series, 3), None);
        assert_eq!(latest(&[]), None);
    }

    #[test]
    fn test_apply_to_defined_pads_leading() {
        let series = vec![None, None, Some(1.0), Some(3.0), Some(5.0)];
        let out = apply_to_defined(&series, |v| sma(v, 2));
        assert_eq!(out, vec![None, None, None, Some(2.0), Some(4.0)]);
    }

    #[test]
    fn test_apply_to_defined_all_undefined() {
        let series = vec![None, None];
        let out = apply_to_defined(&series, |v| sma(v, 2));
        assert_eq!(out, vec![None, None]);
    }
}
