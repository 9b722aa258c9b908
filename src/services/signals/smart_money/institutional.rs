//! Heuristic institutional-activity scoring.

use chrono::{DateTime, Timelike};
use std::collections::BTreeMap;

use crate::types::{Candle, GapDirection, HourlyActivity, InstitutionalActivity, PriceGap};

/// Trailing window for the volume and body baselines.
const BASELINE_WINDOW: usize = 20;
/// A gap wider than this fraction of the previous close counts.
const GAP_THRESHOLD: f64 = 0.01;
const RECENT_GAPS: usize = 5;

fn trailing_mean(values: &[f64], window: usize) -> f64 {
    let start = values.len().saturating_sub(window);
    let tail = &values[start..];
    if tail.is_empty() {
        0.0
    } else {
        tail.iter().sum::<f64>() / tail.len() as f64
    }
}

/// Opening gaps larger than 1% of the previous close.
pub fn price_gaps(candles: &[Candle]) -> Vec<PriceGap> {
    candles
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let prev_close = pair[0].close;
            let open = pair[1].open;
            if prev_close == 0.0 {
                return None;
            }
            let size = (open - prev_close).abs() / prev_close.abs();
            (size > GAP_THRESHOLD).then(|| PriceGap {
                index: i + 1,
                size,
                direction: if open > prev_close {
                    GapDirection::Up
                } else {
                    GapDirection::Down
                },
            })
        })
        .collect()
}

/// Average volume and high-low range per UTC hour of day.
pub fn activity_by_hour(candles: &[Candle]) -> BTreeMap<u32, HourlyActivity> {
    let mut buckets: BTreeMap<u32, (f64, f64, usize)> = BTreeMap::new();
    for candle in candles {
        let Some(time) = DateTime::from_timestamp_millis(candle.timestamp) else {
            continue;
        };
        let entry = buckets.entry(time.hour()).or_insert((0.0, 0.0, 0));
        entry.0 += candle.volume;
        entry.1 += candle.range();
        entry.2 += 1;
    }

    buckets
        .into_iter()
        .map(|(hour, (volume, range, count))| {
            let n = count as f64;
            (
                hour,
                HourlyActivity {
                    avg_volume: volume / n,
                    volatility: range / n,
                },
            )
        })
        .collect()
}

/// Count volume spikes, large bodies and gaps over the whole sequence.
///
/// Spikes and large bodies are measured against the mean of the last 20
/// candles. Score = min(100, 10 x spikes + 5 x large candles + 15 x gaps).
pub fn institutional_activity(candles: &[Candle]) -> InstitutionalActivity {
    if candles.is_empty() {
        return InstitutionalActivity::default();
    }

    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
    let bodies: Vec<f64> = candles.iter().map(|c| c.body()).collect();

    let avg_volume = trailing_mean(&volumes, BASELINE_WINDOW);
    let avg_body = trailing_mean(&bodies, BASELINE_WINDOW);

    let volume_spikes = volumes.iter().filter(|v| **v > avg_volume * 2.0).count();
    let large_candles = bodies.iter().filter(|b| **b > avg_body * 2.0).count();

    let gaps = price_gaps(candles);
    let gap_count = gaps.len();
    let recent_gaps = gaps[gap_count.saturating_sub(RECENT_GAPS)..].to_vec();

    let score = ((volume_spikes * 10 + large_candles * 5 + gap_count * 15) as f64).min(100.0);

    InstitutionalActivity {
        volume_spikes,
        large_candles,
        gap_count,
        recent_gaps,
        score,
        activity_by_hour: activity_by_hour(candles),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 3_600_000;

    fn candle(i: usize, open: f64, close: f64, volume: f64) -> Candle {
        Candle {
            timestamp: i as i64 * HOUR_MS,
            open,
            high: open.max(close) + 0.5,
            low: open.min(close) - 0.5,
            close,
            volume,
        }
    }

    #[test]
    fn test_quiet_market_scores_zero() {
        let candles: Vec<Candle> = (0..30).map(|i| candle(i, 100.0, 100.2, 1000.0)).collect();
        let activity = institutional_activity(&candles);
        assert_eq!(activity.volume_spikes, 0);
        assert_eq!(activity.large_candles, 0);
        assert_eq!(activity.gap_count, 0);
        assert_eq!(activity.score, 0.0);
    }

    #[test]
    fn test_spikes_bodies_and_gaps() {
        let mut candles: Vec<Candle> = (0..30).map(|i| candle(i, 100.0, 100.2, 1000.0)).collect();
        // Volume spike with a large body
        candles[25] = candle(25, 100.0, 101.0, 5000.0);
        // Gap up of 2% off the previous close
        candles[27] = candle(27, 102.2, 102.3, 1000.0);

        let activity = institutional_activity(&candles);
        assert_eq!(activity.volume_spikes, 1);
        assert_eq!(activity.large_candles, 1);
        // Gap into candle 27 and back down into candle 28
        assert_eq!(activity.gap_count, 2);
        assert_eq!(activity.recent_gaps[0].index, 27);
        assert_eq!(activity.recent_gaps[0].direction, GapDirection::Up);
        assert_eq!(activity.recent_gaps[1].direction, GapDirection::Down);
        assert_eq!(activity.score, 10.0 + 5.0 + 30.0);
    }

    #[test]
    fn test_score_capped_and_recent_gaps_limited() {
        let candles: Vec<Candle> = (0..20)
            .map(|i| {
                let open = if i % 2 == 0 { 100.0 } else { 110.0 };
                candle(i, open, open, 1000.0)
            })
            .collect();
        let activity = institutional_activity(&candles);
        assert_eq!(activity.gap_count, 19);
        assert_eq!(activity.recent_gaps.len(), 5);
        assert_eq!(activity.recent_gaps[4].index, 19);
        assert_eq!(activity.score, 100.0);
    }

    #[test]
    fn test_activity_by_hour() {
        let candles = vec![
            candle(0, 100.0, 100.0, 100.0),
            candle(1, 100.0, 100.0, 300.0),
            candle(24, 100.0, 100.0, 300.0),
        ];
        let hours = activity_by_hour(&candles);
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[&0].avg_volume, 200.0);
        assert_eq!(hours[&1].avg_volume, 300.0);
        assert_eq!(hours[&0].volatility, 1.0);
    }
}
