//! Smart-money flow analysis.
//!
//! Builds the composite flow index, detects accumulation/distribution calls
//! confirmed by momentum and volume, and locates the levels and
//! institutional footprint used to price smart-money signals.

pub mod index;
pub mod institutional;
pub mod levels;

pub use index::{smart_money_index, SmartMoneyIndex, MIN_CANDLES};
pub use institutional::institutional_activity;
pub use levels::support_resistance;

use crate::services::signals::indicators::{
    atr, bollinger, bollinger_bands, latest, macd, rsi, sma,
};
use crate::types::candle::{closes, highs, lows};
use crate::types::{
    clamp_confidence, Candle, MacdBias, SignalDirection, SignalVerdict, SmartMoneyAnalysis,
    SmartMoneyFactors, SmartMoneyFlow, TrendDirection, VolatilityClass,
};

const BUY_LEVEL: f64 = 0.7;
const SELL_LEVEL: f64 = 0.3;
const MIN_CHANGE: f64 = 0.05;

const BASE_CONFIDENCE: f64 = 30.0;
const MOMENTUM_BONUS: f64 = 25.0;
const VOLUME_BONUS: f64 = 20.0;
const POSITION_BONUS: f64 = 15.0;
const MAX_CONFIDENCE: f64 = 95.0;

const VOLUME_WINDOW: usize = 20;
const VOLUME_SPIKE_FACTOR: f64 = 1.5;
const HIGH_VOLATILITY_FACTOR: f64 = 1.3;

/// Classify the latest index move given its confirmation factors.
///
/// Returns the direction and the capped confidence; HOLD carries 0.
pub fn classify_flow(
    current: f64,
    change: f64,
    factors: &SmartMoneyFactors,
) -> (SignalDirection, f64) {
    let mut confidence = BASE_CONFIDENCE;

    if current > BUY_LEVEL && change > MIN_CHANGE {
        if factors.rsi < 70.0 && factors.macd_bias == MacdBias::Bullish {
            confidence += MOMENTUM_BONUS;
        }
        if factors.volume_spike {
            confidence += VOLUME_BONUS;
        }
        if factors.price_position < 0.3 {
            confidence += POSITION_BONUS;
        }
        (SignalDirection::Buy, confidence.min(MAX_CONFIDENCE))
    } else if current < SELL_LEVEL && change < -MIN_CHANGE {
        if factors.rsi > 30.0 && factors.macd_bias == MacdBias::Bearish {
            confidence += MOMENTUM_BONUS;
        }
        if factors.volume_spike {
            confidence += VOLUME_BONUS;
        }
        if factors.price_position > 0.7 {
            confidence += POSITION_BONUS;
        }
        (SignalDirection::Sell, confidence.min(MAX_CONFIDENCE))
    } else {
        (SignalDirection::Hold, 0.0)
    }
}

/// Momentum, trend, volatility and volume readings at the latest candle.
pub fn confirmation_factors(candles: &[Candle], index_value: f64) -> SmartMoneyFactors {
    let close = closes(candles);
    let high = highs(candles);
    let low = lows(candles);
    let price = close.last().copied().unwrap_or(0.0);

    let rsi_value = latest(&rsi(&close, rsi::DEFAULT_PERIOD)).unwrap_or(50.0);

    let macd_series = macd(
        &close,
        macd::DEFAULT_FAST,
        macd::DEFAULT_SLOW,
        macd::DEFAULT_SIGNAL,
    );
    let macd_bias = match (latest(&macd_series.line), latest(&macd_series.signal)) {
        (Some(line), Some(signal)) if line > signal => MacdBias::Bullish,
        (Some(line), Some(signal)) if line < signal => MacdBias::Bearish,
        _ => MacdBias::Neutral,
    };

    let bands = bollinger_bands(&close, bollinger::DEFAULT_PERIOD, bollinger::DEFAULT_STD_DEV);
    let price_position = bands.latest_position(price).unwrap_or(0.5);

    let trend = match (latest(&sma(&close, 20)), latest(&sma(&close, 50))) {
        (Some(fast), Some(slow)) if fast > slow => TrendDirection::Uptrend,
        _ => TrendDirection::Downtrend,
    };

    let atr_series = atr(&high, &low, &close, atr::DEFAULT_PERIOD);
    let recent_atr: Vec<f64> = atr_series
        .iter()
        .rev()
        .take(VOLUME_WINDOW)
        .filter_map(|v| *v)
        .collect();
    let volatility = match latest(&atr_series) {
        Some(current) if !recent_atr.is_empty() => {
            let mean = recent_atr.iter().sum::<f64>() / recent_atr.len() as f64;
            if current > mean * HIGH_VOLATILITY_FACTOR {
                VolatilityClass::High
            } else {
                VolatilityClass::Normal
            }
        }
        _ => VolatilityClass::Normal,
    };

    let recent_volume: Vec<f64> = candles
        .iter()
        .rev()
        .take(VOLUME_WINDOW)
        .map(|c| c.volume)
        .collect();
    let volume_spike = match candles.last() {
        Some(last) if !recent_volume.is_empty() => {
            let mean = recent_volume.iter().sum::<f64>() / recent_volume.len() as f64;
            last.volume > mean * VOLUME_SPIKE_FACTOR
        }
        _ => false,
    };

    SmartMoneyFactors {
        rsi: rsi_value,
        macd_bias,
        trend,
        volatility,
        volume_spike,
        price_position,
        flow: SmartMoneyFlow::from_index(index_value),
    }
}

/// Run the full smart-money evaluation on a candle sequence.
///
/// Fewer than [`MIN_CANDLES`] candles yield [`SmartMoneyAnalysis::neutral`].
pub fn analyze(candles: &[Candle]) -> SmartMoneyAnalysis {
    let Some(index) = smart_money_index(candles) else {
        return SmartMoneyAnalysis::neutral();
    };
    let Some((previous, current)) = index.latest_pair() else {
        return SmartMoneyAnalysis::neutral();
    };

    let change = current - previous;
    let factors = confirmation_factors(candles, current);
    let (direction, confidence) = classify_flow(current, change, &factors);

    SmartMoneyAnalysis {
        index_value: current,
        index_change: change,
        direction,
        confidence: clamp_confidence(confidence),
        factors: Some(factors),
    }
}

/// Express an analysis as a verdict for the combiner.
///
/// No signal maps to HOLD with confidence 0.
pub fn smart_money_verdict(analysis: &SmartMoneyAnalysis) -> SignalVerdict {
    let flow = SmartMoneyFlow::from_index(analysis.index_value);
    if !analysis.has_signal() {
        return SignalVerdict::new(
            analysis.index_value,
            SignalDirection::Hold,
            0.0,
            format!("Smart money {} (no signal)", flow.label()),
        );
    }
    SignalVerdict::new(
        analysis.index_value,
        analysis.direction,
        analysis.confidence,
        format!(
            "Smart money {} ({:.3}, change {:+.3})",
            flow.label(),
            analysis.index_value,
            analysis.index_change
        ),
    )
}
