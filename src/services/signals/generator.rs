//! Batch signal generation.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::SignalConfig;
use crate::error::{AppError, Result};
use crate::services::market_data::MarketDataProvider;
use crate::services::signals::{analyzer, combiner, filters, smart_money};
use crate::types::{Candle, Timeframe, TradingSignal};

/// Candles requested by the smart-money-only path.
pub const SMART_MONEY_CANDLES: usize = 200;

/// Generates trading signals for a set of symbols.
///
/// Symbols are evaluated one after another; each evaluation owns its candle
/// snapshot, so a failure on one symbol never affects another.
pub struct SignalGenerator {
    provider: Arc<dyn MarketDataProvider>,
    config: SignalConfig,
}

impl SignalGenerator {
    /// Create a new generator.
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: SignalConfig) -> Self {
        Self { provider, config }
    }

    /// Settings this generator was built with.
    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Combine technical and smart-money verdicts for one candle snapshot.
    ///
    /// Returns `None` below the confidence threshold.
    pub fn evaluate(
        &self,
        symbol: &str,
        candles: &[Candle],
        now: DateTime<Utc>,
    ) -> Option<TradingSignal> {
        let entry_price = candles.last()?.close;

        let technical = analyzer::combined_signal(candles);
        let analysis = smart_money::analyze(candles);
        let smart = smart_money::smart_money_verdict(&analysis);
        let combined = combiner::combine(&technical, &smart);

        debug!(
            "{}: technical {} {:.1}, smart money {} {:.1}, combined {} {:.1}",
            symbol,
            technical.direction.label(),
            technical.confidence,
            smart.direction.label(),
            smart.confidence,
            combined.direction.label(),
            combined.confidence
        );

        if combined.confidence < self.config.min_confidence {
            return None;
        }

        Some(combiner::build_trading_signal(
            symbol,
            &combined,
            entry_price,
            self.config.instrument_kind,
            self.config.timeframe,
            now,
        ))
    }

    /// Fetch candles and evaluate a single symbol.
    pub async fn generate_for_symbol(
        &self,
        symbol: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<TradingSignal>> {
        let candles = self
            .provider
            .fetch_candles(symbol, self.config.timeframe, self.config.candle_limit)
            .await?;

        if candles.len() < smart_money::MIN_CANDLES {
            return Err(AppError::InsufficientData {
                symbol: symbol.to_string(),
                have: candles.len(),
                need: smart_money::MIN_CANDLES,
            });
        }

        Ok(self.evaluate(symbol, &candles, now))
    }

    /// Generate signals for `symbols`, or the configured list when `None`.
    ///
    /// Nothing is generated while the time filter blocks `now`. Symbols that
    /// fail or lack history are logged and skipped.
    pub async fn generate_signals(
        &self,
        symbols: Option<&[String]>,
        now: DateTime<Utc>,
    ) -> Vec<TradingSignal> {
        if let Some(block) = filters::trading_block(now, &self.config.trading_hours) {
            info!("Signal generation suppressed: {}", block);
            return Vec::new();
        }

        let symbols = symbols.unwrap_or(self.config.symbols.as_slice());
        let mut signals = Vec::new();

        for symbol in symbols {
            match self.generate_for_symbol(symbol, now).await {
                Ok(Some(signal)) => {
                    info!(
                        "Signal {} {:?} at {:.5} ({:.1}% confidence, expires {})",
                        signal.symbol,
                        signal.direction,
                        signal.entry_price,
                        signal.confidence,
                        signal.expiry_time
                    );
                    signals.push(signal);
                }
                Ok(None) => debug!("{}: no signal above threshold", symbol),
                Err(e @ AppError::InsufficientData { .. }) => warn!("Skipping {}: {}", symbol, e),
                Err(e) => error!("Failed to generate signal for {}: {}", symbol, e),
            }
        }

        info!(
            "Generated {} signals from {} symbols",
            signals.len(),
            symbols.len()
        );
        signals
    }

    /// Signal from smart-money analysis alone, priced off support and
    /// resistance.
    ///
    /// Returns `None` without enough history or when the analysis is below
    /// the smart-money confidence threshold.
    pub async fn generate_smart_money_signal(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<Option<TradingSignal>> {
        let candles = self
            .provider
            .fetch_candles(symbol, timeframe, SMART_MONEY_CANDLES)
            .await?;

        if candles.len() < smart_money::MIN_CANDLES {
            warn!(
                "Insufficient data for {}: {} candles",
                symbol,
                candles.len()
            );
            return Ok(None);
        }

        let analysis = smart_money::analyze(&candles);
        if !analysis.has_signal() || analysis.confidence < self.config.smart_money_min_confidence {
            debug!(
                "{}: smart money {:.3} without qualifying signal",
                symbol, analysis.index_value
            );
            return Ok(None);
        }

        let levels = smart_money::support_resistance(&candles);
        let activity = smart_money::institutional_activity(&candles);
        let entry_price = candles.last().map(|c| c.close).unwrap_or_default();

        let signal = combiner::build_smart_money_signal(
            symbol,
            &analysis,
            &levels,
            &activity,
            entry_price,
            timeframe,
            now,
        );
        if let Some(signal) = &signal {
            info!(
                "Smart money signal {} {:?} at {:.5} ({:.1}% confidence)",
                signal.symbol, signal.direction, signal.entry_price, signal.confidence
            );
        }
        Ok(signal)
    }

    /// Apply the time filter to already generated signals.
    pub fn filter_signals_by_time(
        &self,
        signals: Vec<TradingSignal>,
        now: DateTime<Utc>,
    ) -> Vec<TradingSignal> {
        filters::filter_signals_by_time(signals, now, &self.config.trading_hours)
    }
}
