//! Core services: market data access and the signal pipeline.

pub mod market_data;
pub mod signals;

pub use market_data::{InMemoryProvider, JsonFileProvider, MarketDataProvider};
pub use signals::{SignalGenerator, SignalMonitor};
