//! Volume Weighted Average Price (VWAP) indicator.

/// Cumulative VWAP from the start of the sequence.
///
/// VWAP = Cumulative(TP * Volume) / Cumulative(Volume)
///
/// While no volume has traded yet the typical price itself is reported.
pub fn cumulative_vwap(typical: &[f64], volumes: &[f64]) -> Vec<f64> {
    let mut cum_tp_vol = 0.0;
    let mut cum_vol = 0.0;

    typical
        .iter()
        .zip(volumes.iter())
        .map(|(tp, vol)| {
            cum_tp_vol += tp * vol;
            cum_vol += vol;
            if cum_vol > 0.0 {
                cum_tp_vol / cum_vol
            } else {
                *tp
            }
        })
        .collect()
}
