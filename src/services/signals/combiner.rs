//! Fusion of technical and smart-money verdicts into trading signals.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::types::{
    clamp_confidence, InstitutionalActivity, InstrumentClass, InstrumentKind, SignalDirection,
    SignalOrigin, SignalVerdict, SmartMoneyAnalysis, SmartMoneyContext, SupportResistance,
    Timeframe, TradeDirection, TradingSignal,
};

pub const TECHNICAL_WEIGHT: f64 = 0.6;
pub const SMART_MONEY_WEIGHT: f64 = 0.4;
/// Multiplier applied when both sides agree.
pub const AGREEMENT_BOOST: f64 = 1.2;
/// Multiplier applied to the stronger side when they disagree.
pub const CONFLICT_DISCOUNT: f64 = 0.8;

/// Smart-money targets never reach further than this from entry.
const SMART_MONEY_TARGET_CAP: f64 = 0.03;
/// Smart-money stops never sit further than this from entry.
const SMART_MONEY_STOP_CAP: f64 = 0.02;
/// More than this many volume spikes marks the context as high volume.
const HIGH_VOLUME_SPIKES: usize = 2;

/// Fuse a technical verdict with a smart-money verdict.
///
/// Agreeing directions blend 60/40 and get a 20% boost (capped at 100).
/// Otherwise the stronger side wins at a 20% discount; on equal confidence
/// the smart-money side wins. HOLD against BUY/SELL counts as a conflict.
pub fn combine(technical: &SignalVerdict, smart_money: &SignalVerdict) -> SignalVerdict {
    let (direction, confidence) = if technical.direction == smart_money.direction {
        (
            technical.direction,
            (technical.confidence * TECHNICAL_WEIGHT
                + smart_money.confidence * SMART_MONEY_WEIGHT)
                * AGREEMENT_BOOST,
        )
    } else if technical.confidence > smart_money.confidence {
        (
            technical.direction,
            technical.confidence * CONFLICT_DISCOUNT,
        )
    } else {
        (
            smart_money.direction,
            smart_money.confidence * CONFLICT_DISCOUNT,
        )
    };

    SignalVerdict::new(
        (technical.value + smart_money.value) / 2.0,
        direction,
        confidence.min(100.0),
        format!(
            "Technical: {}. Smart money: {}",
            technical.description, smart_money.description
        ),
    )
}

/// Map an analytic direction onto the instrument's trade direction.
pub fn map_direction(direction: SignalDirection, kind: InstrumentKind) -> TradeDirection {
    match (direction, kind) {
        (SignalDirection::Buy, InstrumentKind::Binary) => TradeDirection::Call,
        (SignalDirection::Sell, InstrumentKind::Binary) => TradeDirection::Put,
        (SignalDirection::Buy, InstrumentKind::Continuous) => TradeDirection::Buy,
        (SignalDirection::Sell, InstrumentKind::Continuous) => TradeDirection::Sell,
        (SignalDirection::Hold, _) => TradeDirection::Hold,
    }
}

/// Expiry for combined signals: stronger signals settle sooner.
pub fn expiry_minutes(confidence: f64) -> i64 {
    if confidence >= 90.0 {
        1
    } else if confidence >= 80.0 {
        3
    } else {
        5
    }
}

/// Target and stop for an entry, scaled by the symbol's asset class.
///
/// HOLD gets neither.
pub fn targets(
    direction: TradeDirection,
    entry: f64,
    class: InstrumentClass,
) -> (Option<f64>, Option<f64>) {
    let (target_pct, stop_pct) = class.target_stop_pct();
    if direction.is_bullish() {
        (
            Some(entry * (1.0 + target_pct)),
            Some(entry * (1.0 - stop_pct)),
        )
    } else if direction.is_bearish() {
        (
            Some(entry * (1.0 - target_pct)),
            Some(entry * (1.0 + stop_pct)),
        )
    } else {
        (None, None)
    }
}

/// Build the trading signal for a combined verdict.
pub fn build_trading_signal(
    symbol: &str,
    verdict: &SignalVerdict,
    entry_price: f64,
    kind: InstrumentKind,
    timeframe: Timeframe,
    now: DateTime<Utc>,
) -> TradingSignal {
    let direction = map_direction(verdict.direction, kind);
    let (target_price, stop_loss) =
        targets(direction, entry_price, InstrumentClass::from_symbol(symbol));

    TradingSignal {
        id: Uuid::new_v4(),
        symbol: symbol.to_string(),
        direction,
        entry_price,
        target_price,
        stop_loss,
        expiry_time: now + Duration::minutes(expiry_minutes(verdict.confidence)),
        confidence: clamp_confidence(verdict.confidence),
        reasoning: verdict.description.clone(),
        created_at: now,
        origin: SignalOrigin::Combined,
        timeframe,
        context: None,
    }
}

/// Build a signal from a smart-money analysis alone.
///
/// Targets use the nearest levels but stay within 3% of entry; stops within
/// 2%. Returns `None` when the analysis carries no BUY/SELL call.
pub fn build_smart_money_signal(
    symbol: &str,
    analysis: &SmartMoneyAnalysis,
    levels: &SupportResistance,
    activity: &InstitutionalActivity,
    entry_price: f64,
    timeframe: Timeframe,
    now: DateTime<Utc>,
) -> Option<TradingSignal> {
    let (direction, target, stop) = match analysis.direction {
        SignalDirection::Buy => (
            TradeDirection::Buy,
            levels
                .resistance
                .min(entry_price * (1.0 + SMART_MONEY_TARGET_CAP)),
            levels.support.max(entry_price * (1.0 - SMART_MONEY_STOP_CAP)),
        ),
        SignalDirection::Sell => (
            TradeDirection::Sell,
            levels
                .support
                .max(entry_price * (1.0 - SMART_MONEY_TARGET_CAP)),
            levels
                .resistance
                .min(entry_price * (1.0 + SMART_MONEY_STOP_CAP)),
        ),
        SignalDirection::Hold => return None,
    };

    let flow = analysis
        .factors
        .as_ref()
        .map(|f| f.flow.label())
        .unwrap_or("unknown flow");

    Some(TradingSignal {
        id: Uuid::new_v4(),
        symbol: symbol.to_string(),
        direction,
        entry_price,
        target_price: Some(target),
        stop_loss: Some(stop),
        expiry_time: now + Duration::minutes(timeframe.smart_money_expiry_minutes()),
        confidence: clamp_confidence(analysis.confidence),
        reasoning: format!(
            "Smart money {} (index {:.3}, change {:+.3}), support {:.5}, resistance {:.5}",
            flow, analysis.index_value, analysis.index_change, levels.support, levels.resistance
        ),
        created_at: now,
        origin: SignalOrigin::SmartMoney,
        timeframe,
        context: Some(SmartMoneyContext {
            index_value: analysis.index_value,
            support: levels.support,
            resistance: levels.resistance,
            institutional_score: activity.score,
            high_volume: activity.volume_spikes > HIGH_VOLUME_SPIKES,
            factors: analysis.factors.clone(),
        }),
    })
}
