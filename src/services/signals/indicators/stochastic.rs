//! Stochastic Oscillator indicator.

use super::{apply_to_defined, sma, IndicatorSeries};

pub const DEFAULT_K_PERIOD: usize = 14;
pub const DEFAULT_D_PERIOD: usize = 3;

/// Slow stochastic output: %K and its %D signal line.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: IndicatorSeries,
    pub d: IndicatorSeries,
}

/// Stochastic Oscillator.
///
/// Compares closing price to price range over a period:
/// fast %K = (Close - Lowest Low) / (Highest High - Lowest Low) * 100
///
/// The slow form is returned: %K is the `d_period` SMA of fast %K and %D is
/// the `d_period` SMA of that. A flat window gives fast %K = 50.
pub fn stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    k_period: usize,
    d_period: usize,
) -> StochasticSeries {
    let len = close.len().min(high.len()).min(low.len());
    let mut fast_k = vec![None; len];

    if k_period > 0 && len >= k_period {
        for i in (k_period - 1)..len {
            let start = i + 1 - k_period;
            let lowest_low = low[start..=i].iter().copied().fold(f64::INFINITY, f64::min);
            let highest_high = high[start..=i]
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);

            let k = if highest_high != lowest_low {
                ((close[i] - lowest_low) / (highest_high - lowest_low)) * 100.0
            } else {
                50.0
            };
            fast_k[i] = Some(k);
        }
    }

    let k = apply_to_defined(&fast_k, |values| sma(values, d_period));
    let d = apply_to_defined(&k, |values| sma(values, d_period));

    StochasticSeries { k, d }
}
