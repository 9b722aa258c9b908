//! Average Directional Index (ADX) indicator.

use super::IndicatorSeries;

pub const DEFAULT_PERIOD: usize = 14;

/// ADX output with the directional indicators it is built from.
///
/// ADX measures trend strength (not direction):
/// - Below 20: Weak trend / ranging market
/// - 20-40: Trending
/// - Above 40: Strong trend
///
/// +DI above -DI reads as a bullish trend, the reverse as bearish.
#[derive(Debug, Clone, PartialEq)]
pub struct AdxSeries {
    pub adx: IndicatorSeries,
    pub plus_di: IndicatorSeries,
    pub minus_di: IndicatorSeries,
}

/// Compute ADX, +DI and -DI with Wilder smoothing.
///
/// +DI/-DI start at index `period`; ADX averages the first `period` DX values
/// and starts at index `2 * period - 1`.
pub fn adx(high: &[f64], low: &[f64], close: &[f64], period: usize) -> AdxSeries {
    let len = close.len().min(high.len()).min(low.len());
    let mut out = AdxSeries {
        adx: vec![None; len],
        plus_di: vec![None; len],
        minus_di: vec![None; len],
    };
    if period == 0 || len < period + 1 {
        return out;
    }

    let mut plus_dm = vec![0.0; len];
    let mut minus_dm = vec![0.0; len];
    let mut tr = vec![0.0; len];

    for i in 1..len {
        let up_move = high[i] - high[i - 1];
        let down_move = low[i - 1] - low[i];

        if up_move > down_move && up_move > 0.0 {
            plus_dm[i] = up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            minus_dm[i] = down_move;
        }

        let hl = high[i] - low[i];
        let hc = (high[i] - close[i - 1]).abs();
        let lc = (low[i] - close[i - 1]).abs();
        tr[i] = hl.max(hc).max(lc);
    }

    let p = period as f64;
    let mut smoothed_plus = plus_dm[1..=period].iter().sum::<f64>() / p;
    let mut smoothed_minus = minus_dm[1..=period].iter().sum::<f64>() / p;
    let mut smoothed_tr = tr[1..=period].iter().sum::<f64>() / p;

    let mut dx = vec![None; len];
    for i in period..len {
        if i > period {
            smoothed_plus = (smoothed_plus * (p - 1.0) + plus_dm[i]) / p;
            smoothed_minus = (smoothed_minus * (p - 1.0) + minus_dm[i]) / p;
            smoothed_tr = (smoothed_tr * (p - 1.0) + tr[i]) / p;
        }

        let (plus_di, minus_di) = if smoothed_tr > 0.0 {
            (
                smoothed_plus / smoothed_tr * 100.0,
                smoothed_minus / smoothed_tr * 100.0,
            )
        } else {
            (0.0, 0.0)
        };
        out.plus_di[i] = Some(plus_di);
        out.minus_di[i] = Some(minus_di);

        let di_sum = plus_di + minus_di;
        dx[i] = Some(if di_sum > 0.0 {
            (plus_di - minus_di).abs() / di_sum * 100.0
        } else {
            0.0
        });
    }

    let first_adx = 2 * period - 1;
    if len <= first_adx {
        return out;
    }

    let mut current = dx[period..=first_adx].iter().flatten().sum::<f64>() / p;
    out.adx[first_adx] = Some(current);
    for i in (first_adx + 1)..len {
        current = (current * (p - 1.0) + dx[i].unwrap_or(0.0)) / p;
        out.adx[i] = Some(current);
    }

    out
}
