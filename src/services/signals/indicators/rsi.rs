//! Relative Strength Index (RSI) indicator.

use super::IndicatorSeries;

/// Default RSI lookback.
pub const DEFAULT_PERIOD: usize = 14;

/// RSI (Relative Strength Index).
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
///
/// Uses Wilder smoothing. The first value sits at index `period` (it needs
/// `period` price changes). A window with neither gains nor losses reads 50.
pub fn rsi(closes: &[f64], period: usize) -> IndicatorSeries {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);

    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    // Calculate initial averages
    let mut avg_gain: f64 = gains.iter().take(period).sum::<f64>() / period as f64;
    let mut avg_loss: f64 = losses.iter().take(period).sum::<f64>() / period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    // Use smoothed averages for remaining data
    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        out[i + 1] = Some(rsi_value(avg_gain, avg_loss));
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uptrend(count: usize) -> Vec<f64> {
        (0..count).map(|i| 100.0 + i as f64 * 1.5).collect()
    }

    fn downtrend(count: usize) -> Vec<f64> {
        (0..count).map(|i| 200.0 - i as f64 * 1.5).collect()
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let out = rsi(&uptrend(10), DEFAULT_PERIOD);
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_rsi_first_value_index() {
        let out = rsi(&uptrend(20), DEFAULT_PERIOD);
        assert_eq!(out[13], None);
        assert!(out[14].is_some());
    }

    #[test]
    fn test_rsi_uptrend_is_100() {
        let out = rsi(&uptrend(50), DEFAULT_PERIOD);
        assert_relative_eq!(out[49].unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_downtrend_is_0() {
        let out = rsi(&downtrend(50), DEFAULT_PERIOD);
        assert_relative_eq!(out[49].unwrap(), 0.0);
    }

    #[test]
    fn test_rsi_flat_is_neutral() {
        let out = rsi(&vec![10.0; 30], DEFAULT_PERIOD);
        assert_relative_eq!(out[29].unwrap(), 50.0);
    }

    #[test]
    fn test_rsi_alternating_is_balanced() {
        let closes: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect();
        let value = rsi(&closes, DEFAULT_PERIOD)[39].unwrap();
        assert!(value > 40.0 && value < 60.0, "got {}", value);
    }

    #[test]
    fn test_rsi_value_range() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        for value in rsi(&closes, DEFAULT_PERIOD).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }
}
