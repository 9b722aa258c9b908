//! Exponential Moving Average (EMA) indicator.

use super::IndicatorSeries;

/// Default EMA lookback.
pub const DEFAULT_PERIOD: usize = 20;

/// EMA (Exponential Moving Average).
///
/// Like SMA but gives more weight to recent values. Seeded with the SMA of
/// the first `period` values, then `ema = (value - ema) * k + ema` with
/// `k = 2 / (period + 1)`.
pub fn ema(values: &[f64], period: usize) -> IndicatorSeries {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);

    // First EMA is SMA
    let mut current = values.iter().take(period).sum::<f64>() / period as f64;
    out[period - 1] = Some(current);

    for i in period..values.len() {
        current = (values[i] - current) * multiplier + current;
        out[i] = Some(current);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ema_seeded_with_sma() {
        let values = [2.0, 4.0, 6.0, 8.0];
        let out = ema(&values, 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_relative_eq!(out[2].unwrap(), 4.0);
        // k = 0.5: (8 - 4) * 0.5 + 4
        assert_relative_eq!(out[3].unwrap(), 6.0);
    }

    #[test]
    fn test_ema_constant_series() {
        let values = vec![5.0; 30];
        let out = ema(&values, DEFAULT_PERIOD);
        assert!(out.iter().skip(19).all(|v| *v == Some(5.0)));
    }

    #[test]
    fn test_ema_insufficient_data() {
        let out = ema(&[1.0; 5], 10);
        assert!(out.iter().all(|v| v.is_none()));
    }
}
