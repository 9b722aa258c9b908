//! Trading signals service module.
//!
//! Provides technical indicator calculations, per-indicator verdicts,
//! smart-money flow analysis, signal fusion and outcome monitoring.

pub mod analyzer;
pub mod combiner;
pub mod filters;
pub mod generator;
pub mod indicators;
pub mod monitor;
pub mod smart_money;

pub use analyzer::combined_signal;
pub use combiner::{build_smart_money_signal, build_trading_signal, combine};
pub use filters::{filter_signals_by_time, is_news_time, is_trading_allowed, TradingBlock};
pub use generator::SignalGenerator;
pub use monitor::{evaluate_signal, SignalMonitor, TrackedSignal};
pub use smart_money::{
    institutional_activity, smart_money_index, smart_money_verdict, support_resistance,
};
