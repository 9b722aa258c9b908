use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::Timeframe;

/// Direction of an analytic verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Buy,
    Sell,
    Hold,
}

impl SignalDirection {
    /// Get display label for this direction.
    pub fn label(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "BUY",
            SignalDirection::Sell => "SELL",
            SignalDirection::Hold => "HOLD",
        }
    }
}

/// Directional call with a 0-100 confidence score.
///
/// Verdicts are produced fresh per evaluation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalVerdict {
    /// Indicator value the verdict was derived from.
    pub value: f64,
    pub direction: SignalDirection,
    /// Heuristic strength, always within [0, 100].
    pub confidence: f64,
    pub description: String,
}

impl SignalVerdict {
    /// Create a verdict, clamping confidence into [0, 100].
    pub fn new(
        value: f64,
        direction: SignalDirection,
        confidence: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            value,
            direction,
            confidence: clamp_confidence(confidence),
            description: description.into(),
        }
    }

    /// Neutral verdict used when an indicator has too little history.
    pub fn insufficient(indicator: &str) -> Self {
        Self::new(
            0.0,
            SignalDirection::Hold,
            0.0,
            format!("Insufficient data for {}", indicator),
        )
    }
}

/// Clamp a confidence score into [0, 100]. NaN maps to 0.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Price trend from the SMA(20)/SMA(50) relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendDirection {
    Uptrend,
    Downtrend,
}

/// Volatility regime from ATR relative to its recent mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolatilityClass {
    High,
    Normal,
}

/// MACD line relative to its signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MacdBias {
    Bullish,
    Bearish,
    Neutral,
}

/// Interpretation of the smart-money index level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SmartMoneyFlow {
    StrongAccumulation,
    Accumulation,
    NeutralBullish,
    NeutralBearish,
    Distribution,
    StrongDistribution,
}

impl SmartMoneyFlow {
    /// Classify an index value in [0, 1].
    pub fn from_index(value: f64) -> Self {
        match value {
            v if v > 0.8 => SmartMoneyFlow::StrongAccumulation,
            v if v > 0.6 => SmartMoneyFlow::Accumulation,
            v if v > 0.4 => SmartMoneyFlow::NeutralBullish,
            v if v > 0.2 => SmartMoneyFlow::NeutralBearish,
            v if v > 0.1 => SmartMoneyFlow::Distribution,
            _ => SmartMoneyFlow::StrongDistribution,
        }
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            SmartMoneyFlow::StrongAccumulation => "strong accumulation",
            SmartMoneyFlow::Accumulation => "accumulation",
            SmartMoneyFlow::NeutralBullish => "neutral-bullish",
            SmartMoneyFlow::NeutralBearish => "neutral-bearish",
            SmartMoneyFlow::Distribution => "distribution",
            SmartMoneyFlow::StrongDistribution => "strong distribution",
        }
    }
}

/// Confirmation factors gathered alongside the smart-money index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartMoneyFactors {
    pub rsi: f64,
    pub macd_bias: MacdBias,
    pub trend: TrendDirection,
    pub volatility: VolatilityClass,
    pub volume_spike: bool,
    /// Close position inside the Bollinger band, 0 = lower, 1 = upper.
    pub price_position: f64,
    pub flow: SmartMoneyFlow,
}

/// Result of a smart-money evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartMoneyAnalysis {
    /// Latest smoothed index, within [0, 1].
    pub index_value: f64,
    pub index_change: f64,
    pub direction: SignalDirection,
    pub confidence: f64,
    /// Absent when the input was too short to analyse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factors: Option<SmartMoneyFactors>,
}

impl SmartMoneyAnalysis {
    /// Neutral analysis returned for insufficient history.
    pub fn neutral() -> Self {
        Self {
            index_value: 0.5,
            index_change: 0.0,
            direction: SignalDirection::Hold,
            confidence: 0.0,
            factors: None,
        }
    }

    /// Whether the analysis carries a BUY or SELL call.
    pub fn has_signal(&self) -> bool {
        self.direction != SignalDirection::Hold
    }
}

/// Nearest support/resistance around the latest close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportResistance {
    pub resistance: f64,
    pub support: f64,
    /// Five highest-volume price levels of the volume profile.
    pub volume_levels: Vec<f64>,
    /// Local highs over a +/-5 candle neighbourhood.
    pub resistance_levels: Vec<f64>,
    /// Local lows over a +/-5 candle neighbourhood.
    pub support_levels: Vec<f64>,
}

/// Direction of an opening gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GapDirection {
    Up,
    Down,
}

/// Gap between a candle's open and the previous close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceGap {
    /// Index of the candle that opened with the gap.
    pub index: usize,
    /// Gap size as a fraction of the previous close.
    pub size: f64,
    pub direction: GapDirection,
}

/// Volume and range statistics for one hour of the day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyActivity {
    pub avg_volume: f64,
    pub volatility: f64,
}

/// Heuristic institutional footprint over a candle sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionalActivity {
    pub volume_spikes: usize,
    pub large_candles: usize,
    pub gap_count: usize,
    /// The last five gaps, oldest first.
    pub recent_gaps: Vec<PriceGap>,
    /// Score within [0, 100].
    pub score: f64,
    pub activity_by_hour: BTreeMap<u32, HourlyActivity>,
}

/// Direction of an emitted trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeDirection {
    Call,
    Put,
    Buy,
    Sell,
    Hold,
}

impl TradeDirection {
    /// Binary-option directions settle at expiry.
    pub fn is_binary(&self) -> bool {
        matches!(self, TradeDirection::Call | TradeDirection::Put)
    }

    /// Whether the signal profits from a rising price.
    pub fn is_bullish(&self) -> bool {
        matches!(self, TradeDirection::Call | TradeDirection::Buy)
    }

    /// Whether the signal profits from a falling price.
    pub fn is_bearish(&self) -> bool {
        matches!(self, TradeDirection::Put | TradeDirection::Sell)
    }
}

/// Which analysis produced a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalOrigin {
    Technical,
    SmartMoney,
    Combined,
}

/// Smart-money levels attached to signals from the smart-money path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartMoneyContext {
    pub index_value: f64,
    pub support: f64,
    pub resistance: f64,
    pub institutional_score: f64,
    /// True when more than two volume spikes were seen.
    pub high_volume: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factors: Option<SmartMoneyFactors>,
}

/// An actionable recommendation for one symbol.
///
/// Created once by the combiner and read-only afterwards; outcomes are
/// tracked separately by the monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingSignal {
    pub id: Uuid,
    pub symbol: String,
    pub direction: TradeDirection,
    pub entry_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    pub expiry_time: DateTime<Utc>,
    pub confidence: f64,
    pub reasoning: String,
    pub created_at: DateTime<Utc>,
    pub origin: SignalOrigin,
    pub timeframe: Timeframe,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<SmartMoneyContext>,
}

/// Settlement state of a tracked signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalOutcome {
    Win,
    Loss,
    Pending,
}

impl SignalOutcome {
    /// WIN and LOSS are terminal.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, SignalOutcome::Pending)
    }
}
