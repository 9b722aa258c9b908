//! Market data boundary.
//!
//! Candle and price acquisition lives behind [`MarketDataProvider`] so the
//! analytics never touch exchange feeds directly.

use async_trait::async_trait;
use dashmap::DashMap;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::types::{Candle, PriceQuote, Timeframe};

/// Abstract interface for fetching market data.
///
/// Implementations return either a complete, ascending candle sequence or
/// an error. A partially read sequence is never returned.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch up to `limit` most recent candles for a symbol.
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>>;

    /// Fetch the latest traded price for a symbol.
    async fn fetch_current_price(&self, symbol: &str) -> Result<PriceQuote>;
}

/// Keep the last `limit` candles after checking ascending order.
fn tail_checked(symbol: &str, mut candles: Vec<Candle>, limit: usize) -> Result<Vec<Candle>> {
    if candles.windows(2).any(|w| w[1].timestamp < w[0].timestamp) {
        return Err(AppError::fetch(symbol, "candles out of timestamp order"));
    }
    let start = candles.len().saturating_sub(limit);
    Ok(candles.split_off(start))
}

/// Reads candle arrays from `{dir}/{SYMBOL}_{timeframe}.json`.
///
/// The current price is the close of the last candle in the symbol's
/// one-minute file if present, otherwise of the first timeframe file found.
pub struct JsonFileProvider {
    dir: PathBuf,
}

impl JsonFileProvider {
    /// Create a provider rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File path for a symbol/timeframe pair.
    pub fn path_for(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        // Sanitize symbol for filesystem
        let safe = symbol
            .to_uppercase()
            .replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        self.dir.join(format!("{}_{}.json", safe, timeframe))
    }

    async fn read_candles(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>> {
        let path = self.path_for(symbol, timeframe);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::fetch(symbol, format!("{}: {}", path.display(), e)))?;
        let candles: Vec<Candle> = serde_json::from_str(&content)
            .map_err(|e| AppError::fetch(symbol, format!("{}: {}", path.display(), e)))?;
        debug!("Loaded {} candles from {}", candles.len(), path.display());
        Ok(candles)
    }
}

const PRICE_TIMEFRAMES: [Timeframe; 6] = [
    Timeframe::OneMinute,
    Timeframe::FiveMinutes,
    Timeframe::FifteenMinutes,
    Timeframe::OneHour,
    Timeframe::FourHours,
    Timeframe::OneDay,
];

#[async_trait]
impl MarketDataProvider for JsonFileProvider {
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let candles = self.read_candles(symbol, timeframe).await?;
        tail_checked(symbol, candles, limit)
    }

    async fn fetch_current_price(&self, symbol: &str) -> Result<PriceQuote> {
        for timeframe in PRICE_TIMEFRAMES {
            if !tokio::fs::try_exists(self.path_for(symbol, timeframe))
                .await
                .unwrap_or(false)
            {
                continue;
            }
            let candles = self.read_candles(symbol, timeframe).await?;
            return candles
                .last()
                .map(|c| PriceQuote {
                    price: c.close,
                    timestamp: c.timestamp,
                })
                .ok_or_else(|| AppError::fetch(symbol, "candle file is empty"));
        }
        Err(AppError::fetch(symbol, "no candle file found"))
    }
}

/// Provider backed by in-memory candle series and price quotes.
///
/// Series are keyed by symbol; the timeframe is ignored. Quotes set with
/// [`InMemoryProvider::set_price`] take precedence over the last close.
#[derive(Default)]
pub struct InMemoryProvider {
    candles: DashMap<String, Vec<Candle>>,
    prices: DashMap<String, f64>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candle series for a symbol.
    pub fn insert_candles(&self, symbol: &str, candles: Vec<Candle>) {
        self.candles.insert(symbol.to_uppercase(), candles);
    }

    /// Set the quote returned by `fetch_current_price`.
    pub fn set_price(&self, symbol: &str, price: f64) {
        self.prices.insert(symbol.to_uppercase(), price);
    }

    /// Forget the quote and candles for a symbol, making lookups fail.
    pub fn remove(&self, symbol: &str) {
        let key = symbol.to_uppercase();
        self.candles.remove(&key);
        self.prices.remove(&key);
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryProvider {
    async fn fetch_candles(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let candles = self
            .candles
            .get(&symbol.to_uppercase())
            .map(|c| c.value().clone())
            .ok_or_else(|| AppError::fetch(symbol, "unknown symbol"))?;
        tail_checked(symbol, candles, limit)
    }

    async fn fetch_current_price(&self, symbol: &str) -> Result<PriceQuote> {
        let key = symbol.to_uppercase();
        let last = self.candles.get(&key).and_then(|c| c.last().copied());
        if let Some(price) = self.prices.get(&key) {
            return Ok(PriceQuote {
                price: *price,
                timestamp: last.map(|c| c.timestamp).unwrap_or(0),
            });
        }
        last.map(|c| PriceQuote {
            price: c.close,
            timestamp: c.timestamp,
        })
        .ok_or_else(|| AppError::fetch(symbol, "unknown symbol"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles(count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| Candle {
                timestamp: i as i64 * 60_000,
                open: 1.0,
                high: 1.1,
                low: 0.9,
                close: 1.0 + i as f64 * 0.01,
                volume: 10.0,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_json_provider_reads_tail() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonFileProvider::new(dir.path());
        let path = provider.path_for("eur/usd", Timeframe::OneHour);
        assert!(path.ends_with("EUR_USD_1h.json"));
        std::fs::write(&path, serde_json::to_string(&candles(10)).unwrap()).unwrap();

        let out = provider
            .fetch_candles("eur/usd", Timeframe::OneHour, 4)
            .await
            .unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].timestamp, 6 * 60_000);

        let quote = provider.fetch_current_price("eur/usd").await.unwrap();
        assert!((quote.price - 1.09).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_json_provider_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonFileProvider::new(dir.path());
        let err = provider
            .fetch_candles("BTCUSD", Timeframe::OneHour, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExternalFetch { .. }));
        assert!(provider.fetch_current_price("BTCUSD").await.is_err());
    }

    #[tokio::test]
    async fn test_json_provider_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonFileProvider::new(dir.path());
        std::fs::write(provider.path_for("BTCUSD", Timeframe::OneHour), "[{").unwrap();
        let err = provider
            .fetch_candles("BTCUSD", Timeframe::OneHour, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExternalFetch { .. }));
    }

    #[tokio::test]
    async fn test_out_of_order_rejected() {
        let provider = InMemoryProvider::new();
        let mut data = candles(5);
        data.swap(1, 3);
        provider.insert_candles("EURUSD", data);
        assert!(provider
            .fetch_candles("EURUSD", Timeframe::OneHour, 5)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_in_memory_price_override() {
        let provider = InMemoryProvider::new();
        provider.insert_candles("EURUSD", candles(3));
        let quote = provider.fetch_current_price("eurusd").await.unwrap();
        assert!((quote.price - 1.02).abs() < 1e-9);

        provider.set_price("EURUSD", 1.5);
        assert_eq!(provider.fetch_current_price("EURUSD").await.unwrap().price, 1.5);

        provider.remove("EURUSD");
        assert!(provider.fetch_current_price("EURUSD").await.is_err());
    }
}
