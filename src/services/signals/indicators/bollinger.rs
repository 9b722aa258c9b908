//! Bollinger Bands indicator.

use super::IndicatorSeries;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STD_DEV: f64 = 2.0;

/// Bollinger Bands series.
///
/// Consists of:
/// - Middle band: SMA(period)
/// - Upper band: SMA + k * StdDev
/// - Lower band: SMA - k * StdDev
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
}

impl BollingerBands {
    /// Position of `price` inside the latest band: 0 at the lower band, 1 at
    /// the upper band. A collapsed band reads 0.5.
    pub fn latest_position(&self, price: f64) -> Option<f64> {
        let upper = super::latest(&self.upper)?;
        let lower = super::latest(&self.lower)?;
        let width = upper - lower;
        if width > 0.0 {
            Some((price - lower) / width)
        } else {
            Some(0.5)
        }
    }
}

/// Calculate population standard deviation.
fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance: f64 =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Compute Bollinger Bands over `period` closes with `k` standard deviations.
pub fn bollinger_bands(closes: &[f64], period: usize, k: f64) -> BollingerBands {
    let len = closes.len();
    let mut upper = vec![None; len];
    let mut middle = vec![None; len];
    let mut lower = vec![None; len];

    if period == 0 || len < period {
        return BollingerBands {
            upper,
            middle,
            lower,
        };
    }

    for i in (period - 1)..len {
        let window = &closes[(i + 1 - period)..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let deviation = std_dev(window, mean);
        upper[i] = Some(mean + k * deviation);
        middle[i] = Some(mean);
        lower[i] = Some(mean - k * deviation);
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}
