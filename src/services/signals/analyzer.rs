//! Per-indicator classification and the combined technical vote.
//!
//! Each `analyze_*` function reads the latest value(s) of one indicator and
//! returns a fresh [`SignalVerdict`]. Input too short for the indicator's
//! lookback yields HOLD with confidence 0 rather than an error.

use crate::services::signals::indicators::{
    bollinger, bollinger_bands, defined, latest, macd, rsi, stochastic,
};
use crate::types::candle::{closes, highs, lows};
use crate::types::{Candle, SignalDirection, SignalVerdict};

/// Oscillator level above which the market reads as overbought.
pub const OVERBOUGHT: f64 = 70.0;
/// Oscillator level below which the market reads as oversold.
pub const OVERSOLD: f64 = 30.0;

const MACD_CROSS_CONFIDENCE: f64 = 75.0;
const BAND_TOUCH_CONFIDENCE: f64 = 70.0;
const STOCH_EXTREME_CONFIDENCE: f64 = 65.0;
const NEUTRAL_CONFIDENCE: f64 = 50.0;

/// Classify an RSI-like oscillator reading.
///
/// Confidence grows by 3 points per unit beyond the 70/30 thresholds:
/// - 75 → SELL 15
/// - 25 → BUY 15
/// - anything in between → HOLD 50
pub fn classify_oscillator(value: f64) -> SignalVerdict {
    if value > OVERBOUGHT {
        SignalVerdict::new(
            value,
            SignalDirection::Sell,
            ((value - OVERBOUGHT) * 3.0).min(100.0),
            format!("RSI overbought at {:.2}", value),
        )
    } else if value < OVERSOLD {
        SignalVerdict::new(
            value,
            SignalDirection::Buy,
            ((OVERSOLD - value) * 3.0).min(100.0),
            format!("RSI oversold at {:.2}", value),
        )
    } else {
        SignalVerdict::new(
            value,
            SignalDirection::Hold,
            NEUTRAL_CONFIDENCE,
            format!("RSI neutral at {:.2}", value),
        )
    }
}

/// RSI(14) verdict on close prices.
pub fn analyze_rsi(closes: &[f64]) -> SignalVerdict {
    match latest(&rsi(closes, rsi::DEFAULT_PERIOD)) {
        Some(value) => classify_oscillator(value),
        None => SignalVerdict::insufficient("RSI"),
    }
}

/// Classify the last two MACD histogram values.
///
/// A cross from <= 0 to > 0 is bullish, from >= 0 to < 0 bearish.
pub fn classify_macd_cross(prev: f64, current: f64) -> SignalVerdict {
    if prev <= 0.0 && current > 0.0 {
        SignalVerdict::new(
            current,
            SignalDirection::Buy,
            MACD_CROSS_CONFIDENCE,
            "MACD histogram crossed above zero",
        )
    } else if prev >= 0.0 && current < 0.0 {
        SignalVerdict::new(
            current,
            SignalDirection::Sell,
            MACD_CROSS_CONFIDENCE,
            "MACD histogram crossed below zero",
        )
    } else {
        SignalVerdict::new(
            current,
            SignalDirection::Hold,
            NEUTRAL_CONFIDENCE,
            "No MACD crossover",
        )
    }
}

/// MACD(12, 26, 9) verdict on close prices. Needs two histogram points.
pub fn analyze_macd(closes: &[f64]) -> SignalVerdict {
    let series = macd(
        closes,
        macd::DEFAULT_FAST,
        macd::DEFAULT_SLOW,
        macd::DEFAULT_SIGNAL,
    );
    let histogram = defined(&series.histogram);
    match histogram.as_slice() {
        [.., prev, current] => classify_macd_cross(*prev, *current),
        _ => SignalVerdict::insufficient("MACD"),
    }
}

/// Bollinger(20, 2) verdict: touching a band fades the move.
pub fn analyze_bollinger(closes: &[f64]) -> SignalVerdict {
    let bands = bollinger_bands(closes, bollinger::DEFAULT_PERIOD, bollinger::DEFAULT_STD_DEV);
    let (Some(upper), Some(lower), Some(price)) = (
        latest(&bands.upper),
        latest(&bands.lower),
        closes.last().copied(),
    ) else {
        return SignalVerdict::insufficient("Bollinger Bands");
    };

    if price >= upper {
        SignalVerdict::new(
            price,
            SignalDirection::Sell,
            BAND_TOUCH_CONFIDENCE,
            format!("Price {:.5} at or above upper band {:.5}", price, upper),
        )
    } else if price <= lower {
        SignalVerdict::new(
            price,
            SignalDirection::Buy,
            BAND_TOUCH_CONFIDENCE,
            format!("Price {:.5} at or below lower band {:.5}", price, lower),
        )
    } else {
        SignalVerdict::new(
            price,
            SignalDirection::Hold,
            NEUTRAL_CONFIDENCE,
            "Price inside Bollinger Bands",
        )
    }
}

/// Classify a stochastic %K/%D pair.
pub fn classify_stochastic(k: f64, d: f64) -> SignalVerdict {
    if k > 80.0 && d > 80.0 {
        SignalVerdict::new(
            k,
            SignalDirection::Sell,
            STOCH_EXTREME_CONFIDENCE,
            format!("Stochastic overbought (K {:.2}, D {:.2})", k, d),
        )
    } else if k < 20.0 && d < 20.0 {
        SignalVerdict::new(
            k,
            SignalDirection::Buy,
            STOCH_EXTREME_CONFIDENCE,
            format!("Stochastic oversold (K {:.2}, D {:.2})", k, d),
        )
    } else {
        SignalVerdict::new(
            k,
            SignalDirection::Hold,
            NEUTRAL_CONFIDENCE,
            format!("Stochastic neutral (K {:.2}, D {:.2})", k, d),
        )
    }
}

/// Slow stochastic(14, 3) verdict.
pub fn analyze_stochastic(candles: &[Candle]) -> SignalVerdict {
    let series = stochastic(
        &highs(candles),
        &lows(candles),
        &closes(candles),
        stochastic::DEFAULT_K_PERIOD,
        stochastic::DEFAULT_D_PERIOD,
    );
    match (latest(&series.k), latest(&series.d)) {
        (Some(k), Some(d)) => classify_stochastic(k, d),
        _ => SignalVerdict::insufficient("Stochastic"),
    }
}

/// Majority vote over a set of verdicts.
///
/// The winning direction's confidence is the mean confidence of all verdicts
/// scaled by its share of the votes. Equal BUY and SELL counts (including
/// zero each) give HOLD 50.
pub fn vote(verdicts: &[SignalVerdict], value: f64) -> SignalVerdict {
    let buys = verdicts
        .iter()
        .filter(|v| v.direction == SignalDirection::Buy)
        .count();
    let sells = verdicts
        .iter()
        .filter(|v| v.direction == SignalDirection::Sell)
        .count();
    let description = format!("Combined signal: BUY({}) SELL({})", buys, sells);

    if buys == sells || verdicts.is_empty() {
        return SignalVerdict::new(value, SignalDirection::Hold, NEUTRAL_CONFIDENCE, description);
    }

    let (direction, votes) = if buys > sells {
        (SignalDirection::Buy, buys)
    } else {
        (SignalDirection::Sell, sells)
    };
    let total = verdicts.len() as f64;
    let mean = verdicts.iter().map(|v| v.confidence).sum::<f64>() / total;

    SignalVerdict::new(value, direction, mean * votes as f64 / total, description)
}

/// The four per-indicator verdicts for a candle sequence, in the order
/// RSI, MACD, Bollinger, Stochastic.
pub fn indicator_verdicts(candles: &[Candle]) -> [SignalVerdict; 4] {
    let prices = closes(candles);
    [
        analyze_rsi(&prices),
        analyze_macd(&prices),
        analyze_bollinger(&prices),
        analyze_stochastic(candles),
    ]
}

/// Combined technical signal from RSI, MACD, Bollinger and Stochastic.
///
/// The verdict's value is the latest close.
pub fn combined_signal(candles: &[Candle]) -> SignalVerdict {
    let value = candles.last().map(|c| c.close).unwrap_or(0.0);
    vote(&indicator_verdicts(candles), value)
}
