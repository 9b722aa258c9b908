use chrono::{NaiveTime, Weekday};
use std::env;
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::types::{InstrumentKind, Timeframe};

/// Symbols evaluated when no explicit list is configured.
pub const DEFAULT_SYMBOLS: &[&str] = &[
    "EURUSD", "GBPUSD", "USDJPY", "AUDUSD", "USDCAD", "BTCUSD", "ETHUSD", "XAUUSD", "CRUDE_OIL",
    "SPX500",
];

/// Trading clock offsets must stay strictly inside one day.
const MAX_OFFSET_MINUTES: i32 = 24 * 60;

/// Recurring high-impact news window during which no signals are generated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsWindow {
    /// Human-readable label used in logs.
    pub name: String,
    /// Restrict to one weekday, or every day when `None`.
    pub weekday: Option<Weekday>,
    /// Only the first occurrence of `weekday` in the month.
    pub first_of_month: bool,
    /// Inclusive start, trading-clock time.
    pub start: NaiveTime,
    /// Inclusive end, trading-clock time.
    pub end: NaiveTime,
}

impl NewsWindow {
    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Monthly payrolls release: first Friday, 15:25-15:35.
    pub fn payrolls() -> Self {
        Self {
            name: "payrolls".to_string(),
            weekday: Some(Weekday::Fri),
            first_of_month: true,
            start: Self::hm(15, 25),
            end: Self::hm(15, 35),
        }
    }

    /// Daily rate-decision window: 21:00-21:30.
    pub fn rate_decision() -> Self {
        Self {
            name: "rate decision".to_string(),
            weekday: None,
            first_of_month: false,
            start: Self::hm(21, 0),
            end: Self::hm(21, 30),
        }
    }
}

/// Time-of-day trading filter settings.
#[derive(Debug, Clone)]
pub struct TradingHoursConfig {
    /// Offset of the trading clock from UTC, in minutes.
    pub utc_offset_minutes: i32,
    /// First allowed hour (inclusive).
    pub start_hour: u32,
    /// Last allowed hour (inclusive).
    pub end_hour: u32,
    pub skip_weekends: bool,
    pub news_windows: Vec<NewsWindow>,
}

impl Default for TradingHoursConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 180,
            start_hour: 8,
            end_hour: 22,
            skip_weekends: true,
            news_windows: vec![NewsWindow::payrolls(), NewsWindow::rate_decision()],
        }
    }
}

/// Settings consumed by the signal generator and combiner.
#[derive(Debug, Clone)]
pub struct SignalConfig {
    /// Combined confidence required to emit a signal.
    pub min_confidence: f64,
    /// Confidence required on the smart-money-only path.
    pub smart_money_min_confidence: f64,
    /// Symbols evaluated by a batch when none are passed explicitly.
    pub symbols: Vec<String>,
    pub timeframe: Timeframe,
    /// Candles requested per symbol.
    pub candle_limit: usize,
    pub instrument_kind: InstrumentKind,
    pub trading_hours: TradingHoursConfig,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            min_confidence: 70.0,
            smart_money_min_confidence: 60.0,
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            timeframe: Timeframe::OneHour,
            candle_limit: 100,
            instrument_kind: InstrumentKind::Binary,
            trading_hours: TradingHoursConfig::default(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub signals: SignalConfig,
    /// Whether the binary starts the outcome monitor.
    pub monitoring_enabled: bool,
    /// Seconds between monitor polls.
    pub monitor_interval_secs: u64,
    /// Directory read by the file-backed market data provider.
    pub candle_data_dir: PathBuf,
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = SignalConfig::default();
        let hours_defaults = TradingHoursConfig::default();

        let symbols = env::var("MONITORING_SYMBOLS")
            .map(|s| {
                s.split(',')
                    .map(|sym| sym.trim().to_uppercase())
                    .filter(|sym| !sym.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or(defaults.symbols);

        let signals = SignalConfig {
            min_confidence: parse_env("MIN_SIGNAL_CONFIDENCE").unwrap_or(defaults.min_confidence),
            smart_money_min_confidence: parse_env("SMART_MONEY_MIN_CONFIDENCE")
                .unwrap_or(defaults.smart_money_min_confidence),
            symbols,
            timeframe: env::var("SIGNAL_TIMEFRAME")
                .ok()
                .and_then(|v| Timeframe::from_str(&v))
                .unwrap_or(defaults.timeframe),
            candle_limit: parse_env("CANDLE_LIMIT").unwrap_or(defaults.candle_limit),
            instrument_kind: env::var("INSTRUMENT_KIND")
                .ok()
                .and_then(|v| InstrumentKind::from_str(&v))
                .unwrap_or(defaults.instrument_kind),
            trading_hours: TradingHoursConfig {
                utc_offset_minutes: parse_env("TRADING_UTC_OFFSET_MINUTES")
                    .unwrap_or(hours_defaults.utc_offset_minutes),
                start_hour: parse_env("TRADING_START_HOUR").unwrap_or(hours_defaults.start_hour),
                end_hour: parse_env("TRADING_END_HOUR").unwrap_or(hours_defaults.end_hour),
                skip_weekends: parse_flag("TRADING_SKIP_WEEKENDS", hours_defaults.skip_weekends),
                news_windows: hours_defaults.news_windows,
            },
        };

        Self {
            signals,
            monitoring_enabled: parse_flag("ENABLE_SIGNAL_MONITORING", true),
            monitor_interval_secs: parse_env("SIGNAL_MONITOR_INTERVAL").unwrap_or(300),
            candle_data_dir: env::var("CANDLE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
        }
    }

    /// Reject settings the generator cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.signals.validate()?;
        if self.monitor_interval_secs == 0 {
            return Err(AppError::InvalidConfig(
                "SIGNAL_MONITOR_INTERVAL must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl SignalConfig {
    /// Reject settings the generator cannot work with.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_confidence", self.min_confidence),
            ("smart_money_min_confidence", self.smart_money_min_confidence),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(AppError::InvalidConfig(format!(
                    "{} must be within 0-100, got {}",
                    name, value
                )));
            }
        }
        if self.symbols.is_empty() {
            return Err(AppError::InvalidConfig("no symbols configured".to_string()));
        }
        if self.candle_limit == 0 {
            return Err(AppError::InvalidConfig("candle_limit must be positive".to_string()));
        }
        let hours = &self.trading_hours;
        if hours.start_hour > hours.end_hour || hours.end_hour > 23 {
            return Err(AppError::InvalidConfig(format!(
                "invalid trading hours {}-{}",
                hours.start_hour, hours.end_hour
            )));
        }
        if hours.utc_offset_minutes.abs() >= MAX_OFFSET_MINUTES {
            return Err(AppError::InvalidConfig(format!(
                "trading clock offset {} minutes is outside +/-24h",
                hours.utc_offset_minutes
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            signals: SignalConfig::default(),
            monitoring_enabled: true,
            monitor_interval_secs: 300,
            candle_data_dir: PathBuf::from("data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_signal_config() {
        let config = SignalConfig::default();
        assert_eq!(config.min_confidence, 70.0);
        assert_eq!(config.smart_money_min_confidence, 60.0);
        assert_eq!(config.symbols.len(), 10);
        assert_eq!(config.timeframe, Timeframe::OneHour);
        assert_eq!(config.candle_limit, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_news_windows() {
        let hours = TradingHoursConfig::default();
        assert_eq!(hours.news_windows.len(), 2);
        let payrolls = &hours.news_windows[0];
        assert_eq!(payrolls.weekday, Some(Weekday::Fri));
        assert!(payrolls.first_of_month);
        assert_eq!(payrolls.start, NaiveTime::from_hms_opt(15, 25, 0).unwrap());
        let rates = &hours.news_windows[1];
        assert_eq!(rates.weekday, None);
        assert_eq!(rates.end, NaiveTime::from_hms_opt(21, 30, 0).unwrap());
    }

    #[test]
    fn test_validate_rejects_out_of_range_confidence() {
        let config = SignalConfig {
            min_confidence: 120.0,
            ..SignalConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_empty_symbols() {
        let config = SignalConfig {
            symbols: Vec::new(),
            ..SignalConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_offset_beyond_a_day() {
        let mut config = SignalConfig::default();
        config.trading_hours.utc_offset_minutes = 24 * 60;
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));
        config.trading_hours.utc_offset_minutes = -1500;
        assert!(config.validate().is_err());
        config.trading_hours.utc_offset_minutes = -(23 * 60 + 59);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_hours() {
        let mut config = SignalConfig::default();
        config.trading_hours.start_hour = 20;
        config.trading_hours.end_hour = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_monitor_interval() {
        let config = Config {
            monitor_interval_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
