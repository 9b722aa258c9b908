//! On-Balance Volume (OBV) indicator.

/// OBV (On-Balance Volume).
///
/// Cumulative volume signed by the close-to-close change:
/// - If close > previous close: OBV += volume
/// - If close < previous close: OBV -= volume
///
/// The first candle contributes nothing, so the series starts at 0.
pub fn on_balance_volume(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    let len = closes.len().min(volumes.len());
    let mut out = Vec::with_capacity(len);
    let mut obv = 0.0;

    for i in 0..len {
        if i > 0 {
            if closes[i] > closes[i - 1] {
                obv += volumes[i];
            } else if closes[i] < closes[i - 1] {
                obv -= volumes[i];
            }
        }
        out.push(obv);
    }

    out
}
