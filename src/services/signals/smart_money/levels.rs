//! Support and resistance levels from local extremes and a volume profile.

use crate::types::{Candle, SupportResistance};

/// Candles on each side a local extreme must beat.
pub const EXTREME_ORDER: usize = 5;
/// Buckets in the volume profile.
pub const PROFILE_BUCKETS: usize = 50;
/// Highest-volume profile levels kept.
pub const VOLUME_LEVELS: usize = 5;

/// Indices whose value is strictly greater (or less, for minima) than every
/// neighbour within `order` candles on both sides.
///
/// Neighbours past either end are ignored, but the first and last candles
/// are never reported.
fn local_extremes(
    values: &[f64],
    order: usize,
    is_better: impl Fn(f64, f64) -> bool,
) -> Vec<usize> {
    let len = values.len();
    if len < 3 {
        return Vec::new();
    }

    (1..len - 1)
        .filter(|&i| {
            let start = i.saturating_sub(order);
            let end = (i + order).min(len - 1);
            (start..=end)
                .filter(|&j| j != i)
                .all(|j| is_better(values[i], values[j]))
        })
        .collect()
}

/// Local highs over a +/- `order` neighbourhood.
pub fn local_maxima(values: &[f64], order: usize) -> Vec<usize> {
    local_extremes(values, order, |a, b| a > b)
}

/// Local lows over a +/- `order` neighbourhood.
pub fn local_minima(values: &[f64], order: usize) -> Vec<usize> {
    local_extremes(values, order, |a, b| a < b)
}

/// Highest-volume price levels of an evenly bucketed volume profile.
///
/// Bucket prices run from the lowest low to the highest high inclusive.
/// Each candle's volume is split evenly across the buckets inside its
/// high-low range. Levels come back by volume, largest first.
pub fn volume_profile_levels(candles: &[Candle], buckets: usize, top: usize) -> Vec<f64> {
    if candles.is_empty() || buckets == 0 {
        return Vec::new();
    }

    let min_price = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let max_price = candles
        .iter()
        .map(|c| c.high)
        .fold(f64::NEG_INFINITY, f64::max);

    let prices: Vec<f64> = if buckets == 1 {
        vec![min_price]
    } else {
        let step = (max_price - min_price) / (buckets - 1) as f64;
        (0..buckets).map(|i| min_price + step * i as f64).collect()
    };

    let mut volume_at_price = vec![0.0; buckets];
    for candle in candles {
        let inside: Vec<usize> = prices
            .iter()
            .enumerate()
            .filter(|(_, p)| **p >= candle.low && **p <= candle.high)
            .map(|(i, _)| i)
            .collect();
        if inside.is_empty() {
            continue;
        }
        let share = candle.volume / inside.len() as f64;
        for i in inside {
            volume_at_price[i] += share;
        }
    }

    let mut order: Vec<usize> = (0..buckets).collect();
    order.sort_by(|a, b| {
        volume_at_price[*b]
            .total_cmp(&volume_at_price[*a])
            .then(a.cmp(b))
    });
    order.into_iter().take(top).map(|i| prices[i]).collect()
}

/// Nearest support and resistance around the latest close.
///
/// Resistance is the lowest local high or volume level above the price,
/// support the highest local low or volume level below it. Without a
/// candidate the price +5% / -5% is used.
pub fn support_resistance(candles: &[Candle]) -> SupportResistance {
    let Some(last) = candles.last() else {
        return SupportResistance {
            resistance: 0.0,
            support: 0.0,
            volume_levels: Vec::new(),
            resistance_levels: Vec::new(),
            support_levels: Vec::new(),
        };
    };
    let price = last.close;

    let high: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let low: Vec<f64> = candles.iter().map(|c| c.low).collect();

    let resistance_levels: Vec<f64> = local_maxima(&high, EXTREME_ORDER)
        .into_iter()
        .map(|i| high[i])
        .collect();
    let support_levels: Vec<f64> = local_minima(&low, EXTREME_ORDER)
        .into_iter()
        .map(|i| low[i])
        .collect();
    let volume_levels = volume_profile_levels(candles, PROFILE_BUCKETS, VOLUME_LEVELS);

    let resistance = resistance_levels
        .iter()
        .chain(volume_levels.iter())
        .copied()
        .filter(|level| *level > price)
        .reduce(f64::min)
        .unwrap_or(price * 1.05);
    let support = support_levels
        .iter()
        .chain(volume_levels.iter())
        .copied()
        .filter(|level| *level < price)
        .reduce(f64::max)
        .unwrap_or(price * 0.95);

    SupportResistance {
        resistance,
        support,
        volume_levels,
        resistance_levels,
        support_levels,
    }
}
