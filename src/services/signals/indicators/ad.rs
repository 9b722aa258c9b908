//! Accumulation/Distribution line.

const EPSILON: f64 = 1e-4;

/// Close location value: where the close sits in the candle's range, from
/// -1 (at the low) to +1 (at the high). A zero range is guarded by a small
/// epsilon and reads 0 when close is mid-range.
pub fn close_location_value(high: f64, low: f64, close: f64) -> f64 {
    ((close - low) - (high - close)) / (high - low + EPSILON)
}

/// Cumulative sum of close-location-value * volume.
pub fn accumulation_distribution(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volumes: &[f64],
) -> Vec<f64> {
    let len = close.len().min(high.len()).min(low.len()).min(volumes.len());
    let mut total = 0.0;
    (0..len)
        .map(|i| {
            total += close_location_value(high[i], low[i], close[i]) * volumes[i];
            total
        })
        .collect()
}
