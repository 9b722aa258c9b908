use serde::{Deserialize, Serialize};
use std::fmt;

/// Candle timeframe used when requesting market data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[default]
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Timeframe {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1m" => Some(Timeframe::OneMinute),
            "5m" => Some(Timeframe::FiveMinutes),
            "15m" => Some(Timeframe::FifteenMinutes),
            "1h" => Some(Timeframe::OneHour),
            "4h" => Some(Timeframe::FourHours),
            "1d" => Some(Timeframe::OneDay),
            _ => None,
        }
    }

    /// Short label ("1m", "1h", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1m",
            Timeframe::FiveMinutes => "5m",
            Timeframe::FifteenMinutes => "15m",
            Timeframe::OneHour => "1h",
            Timeframe::FourHours => "4h",
            Timeframe::OneDay => "1d",
        }
    }

    /// Expiry in minutes for signals produced by the smart-money path.
    pub fn smart_money_expiry_minutes(&self) -> i64 {
        match self {
            Timeframe::OneMinute => 5,
            Timeframe::FiveMinutes => 15,
            Timeframe::FifteenMinutes => 30,
            Timeframe::OneHour => 60,
            _ => 240,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a signal on an instrument is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    /// Binary-option style: CALL/PUT scored against price at expiry.
    #[default]
    Binary,
    /// Continuous: BUY/SELL scored against target and stop.
    Continuous,
}

impl InstrumentKind {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "binary" | "option" | "options" => Some(Self::Binary),
            "continuous" | "spot" | "forex" => Some(Self::Continuous),
            _ => None,
        }
    }
}

/// Asset class driving target/stop distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentClass {
    Forex,
    Crypto,
    Metal,
    /// Indices, commodities and anything unrecognised.
    Other,
}

const CRYPTO_TICKERS: &[&str] = &[
    "BTC", "ETH", "SOL", "XRP", "BNB", "ADA", "DOGE", "LTC", "DOT", "AVAX", "USDT",
];
const METAL_TICKERS: &[&str] = &["XAU", "XAG", "XPT", "XPD", "GOLD", "SILVER"];
const FIAT_TICKERS: &[&str] = &[
    "USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "NZD",
];

impl InstrumentClass {
    /// Classify a symbol such as "EURUSD", "BTC/USDT" or "XAUUSD".
    ///
    /// Crypto and metal tickers are checked before fiat so that crypto and
    /// metal pairs quoted in USD are not taken for forex.
    pub fn from_symbol(symbol: &str) -> Self {
        let upper = symbol.to_uppercase();
        if CRYPTO_TICKERS.iter().any(|t| upper.contains(t)) {
            InstrumentClass::Crypto
        } else if METAL_TICKERS.iter().any(|t| upper.contains(t)) {
            InstrumentClass::Metal
        } else if FIAT_TICKERS.iter().any(|t| upper.contains(t)) {
            InstrumentClass::Forex
        } else {
            InstrumentClass::Other
        }
    }

    /// (target_pct, stop_pct) as fractions of the entry price.
    pub fn target_stop_pct(&self) -> (f64, f64) {
        match self {
            InstrumentClass::Forex => (0.002, 0.001),
            InstrumentClass::Crypto => (0.02, 0.01),
            InstrumentClass::Metal => (0.005, 0.0025),
            InstrumentClass::Other => (0.01, 0.005),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_symbols() {
        assert_eq!(InstrumentClass::from_symbol("EURUSD"), InstrumentClass::Forex);
        assert_eq!(InstrumentClass::from_symbol("GBP/USD"), InstrumentClass::Forex);
        assert_eq!(InstrumentClass::from_symbol("BTCUSD"), InstrumentClass::Crypto);
        assert_eq!(InstrumentClass::from_symbol("eth/usdt"), InstrumentClass::Crypto);
        assert_eq!(InstrumentClass::from_symbol("XAUUSD"), InstrumentClass::Metal);
        assert_eq!(InstrumentClass::from_symbol("SPX500"), InstrumentClass::Other);
        assert_eq!(InstrumentClass::from_symbol("CRUDE_OIL"), InstrumentClass::Other);
    }

    #[test]
    fn test_smart_money_expiry() {
        assert_eq!(Timeframe::OneMinute.smart_money_expiry_minutes(), 5);
        assert_eq!(Timeframe::FiveMinutes.smart_money_expiry_minutes(), 15);
        assert_eq!(Timeframe::FifteenMinutes.smart_money_expiry_minutes(), 30);
        assert_eq!(Timeframe::OneHour.smart_money_expiry_minutes(), 60);
        assert_eq!(Timeframe::FourHours.smart_money_expiry_minutes(), 240);
        assert_eq!(Timeframe::OneDay.smart_money_expiry_minutes(), 240);
    }

    #[test]
    fn test_timeframe_round_trip_str() {
        for tf in [Timeframe::OneMinute, Timeframe::OneHour, Timeframe::OneDay] {
            assert_eq!(Timeframe::from_str(tf.as_str()), Some(tf));
        }
        assert_eq!(Timeframe::from_str("2h"), None);
    }
}
