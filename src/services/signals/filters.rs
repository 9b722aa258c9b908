//! Time-of-day trading filters.
//!
//! All checks run on the trading clock: UTC shifted by the configured
//! offset. Signals generated while a filter blocks are suppressed.

use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, Offset, Timelike, Utc, Weekday};

use crate::config::{NewsWindow, TradingHoursConfig};
use crate::types::TradingSignal;

/// Why trading is blocked at a given moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradingBlock {
    Weekend,
    OutsideHours { hour: u32 },
    News(String),
}

impl std::fmt::Display for TradingBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradingBlock::Weekend => write!(f, "weekend"),
            TradingBlock::OutsideHours { hour } => write!(f, "outside trading hours ({}h)", hour),
            TradingBlock::News(name) => write!(f, "{} news window", name),
        }
    }
}

/// `now` on the trading clock. Offsets are range-checked by
/// `SignalConfig::validate`; an unchecked out-of-range offset reads as UTC.
fn trading_clock(now: DateTime<Utc>, config: &TradingHoursConfig) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(config.utc_offset_minutes * 60).unwrap_or(Utc.fix());
    now.with_timezone(&offset)
}

fn in_window(local: &DateTime<FixedOffset>, window: &NewsWindow) -> bool {
    if let Some(weekday) = window.weekday {
        if local.weekday() != weekday {
            return false;
        }
        if window.first_of_month && local.day() > 7 {
            return false;
        }
    }
    let Some(minute) = NaiveTime::from_hms_opt(local.hour(), local.minute(), 0) else {
        return false;
    };
    minute >= window.start && minute <= window.end
}

/// Name of the news window covering `now`, if any.
pub fn news_window_at(now: DateTime<Utc>, config: &TradingHoursConfig) -> Option<&str> {
    let local = trading_clock(now, config);
    config
        .news_windows
        .iter()
        .find(|w| in_window(&local, w))
        .map(|w| w.name.as_str())
}

/// Whether `now` falls inside a high-impact news window.
pub fn is_news_time(now: DateTime<Utc>, config: &TradingHoursConfig) -> bool {
    news_window_at(now, config).is_some()
}

/// The first rule blocking trading at `now`, or `None` when allowed.
pub fn trading_block(now: DateTime<Utc>, config: &TradingHoursConfig) -> Option<TradingBlock> {
    let local = trading_clock(now, config);

    if config.skip_weekends && matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return Some(TradingBlock::Weekend);
    }

    let hour = local.hour();
    if hour < config.start_hour || hour > config.end_hour {
        return Some(TradingBlock::OutsideHours { hour });
    }

    news_window_at(now, config).map(|name| TradingBlock::News(name.to_string()))
}

/// Whether signals may be generated at `now`.
pub fn is_trading_allowed(now: DateTime<Utc>, config: &TradingHoursConfig) -> bool {
    trading_block(now, config).is_none()
}

/// Drop every signal when trading is blocked at `now`.
pub fn filter_signals_by_time(
    signals: Vec<TradingSignal>,
    now: DateTime<Utc>,
    config: &TradingHoursConfig,
) -> Vec<TradingSignal> {
    if is_trading_allowed(now, config) {
        signals
    } else {
        Vec::new()
    }
}
