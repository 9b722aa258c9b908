//! Smartflow - trading signal analytics over OHLCV candle series

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::{Config, SignalConfig, TradingHoursConfig};
pub use error::{AppError, Result};
pub use services::{
    InMemoryProvider, JsonFileProvider, MarketDataProvider, SignalGenerator, SignalMonitor,
};
pub use types::*;
