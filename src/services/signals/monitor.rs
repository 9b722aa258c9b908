//! Outcome monitoring for emitted signals.
//!
//! Every tracked signal starts PENDING and moves to WIN or LOSS at most
//! once. Price lookup failures leave it PENDING for the next poll.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services::market_data::MarketDataProvider;
use crate::types::{SignalOutcome, TradeDirection, TradingSignal};

/// A signal together with its settlement state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedSignal {
    pub signal: TradingSignal,
    pub outcome: SignalOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Decide a signal's outcome against the current price.
///
/// - CALL/PUT settle only at or after expiry: CALL wins above entry, PUT
///   below; anything else loses.
/// - BUY/SELL settle as soon as price reaches the target (WIN) or the stop
///   (LOSS). Without both levels they stay PENDING.
/// - HOLD never settles.
pub fn evaluate_signal(signal: &TradingSignal, price: f64, now: DateTime<Utc>) -> SignalOutcome {
    if signal.direction.is_binary() {
        if now < signal.expiry_time {
            return SignalOutcome::Pending;
        }
        let won = if signal.direction.is_bullish() {
            price > signal.entry_price
        } else {
            price < signal.entry_price
        };
        return if won {
            SignalOutcome::Win
        } else {
            SignalOutcome::Loss
        };
    }

    match signal.direction {
        TradeDirection::Buy => match (signal.target_price, signal.stop_loss) {
            (Some(target), Some(_)) if price >= target => SignalOutcome::Win,
            (Some(_), Some(stop)) if price <= stop => SignalOutcome::Loss,
            _ => SignalOutcome::Pending,
        },
        TradeDirection::Sell => match (signal.target_price, signal.stop_loss) {
            (Some(target), Some(_)) if price <= target => SignalOutcome::Win,
            (Some(_), Some(stop)) if price >= stop => SignalOutcome::Loss,
            _ => SignalOutcome::Pending,
        },
        TradeDirection::Call | TradeDirection::Put | TradeDirection::Hold => SignalOutcome::Pending,
    }
}

/// Tracks emitted signals and settles them against live prices.
pub struct SignalMonitor {
    signals: DashMap<Uuid, TrackedSignal>,
    /// Shutdown signal sender
    shutdown_tx: broadcast::Sender<()>,
    running: AtomicBool,
}

impl Default for SignalMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalMonitor {
    /// Create a new monitor.
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            signals: DashMap::new(),
            shutdown_tx,
            running: AtomicBool::new(false),
        }
    }

    /// Start tracking a signal as PENDING. Re-tracking a known id is a no-op.
    pub fn track(&self, signal: TradingSignal) {
        self.signals.entry(signal.id).or_insert_with(|| TrackedSignal {
            signal,
            outcome: SignalOutcome::Pending,
            exit_price: None,
            resolved_at: None,
        });
    }

    /// Outcome of a tracked signal.
    pub fn outcome(&self, id: &Uuid) -> Option<SignalOutcome> {
        self.signals.get(id).map(|t| t.outcome)
    }

    /// Snapshot of a tracked signal.
    pub fn get(&self, id: &Uuid) -> Option<TrackedSignal> {
        self.signals.get(id).map(|t| t.value().clone())
    }

    /// Signals still awaiting settlement, oldest first.
    pub fn pending(&self) -> Vec<TradingSignal> {
        let mut pending: Vec<TradingSignal> = self
            .signals
            .iter()
            .filter(|t| t.outcome == SignalOutcome::Pending)
            .map(|t| t.signal.clone())
            .collect();
        pending.sort_by_key(|s| s.created_at);
        pending
    }

    /// Number of tracked signals.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Run one monitoring pass over the pending signals.
    ///
    /// Prices are fetched once per symbol. Returns the symbols whose signals
    /// resolved during this pass with their outcome.
    pub async fn poll_once(
        &self,
        provider: &dyn MarketDataProvider,
        now: DateTime<Utc>,
    ) -> HashMap<String, SignalOutcome> {
        let pending = self.pending();
        debug!("Monitoring {} pending signals", pending.len());

        let mut prices: HashMap<String, Option<f64>> = HashMap::new();
        let mut results = HashMap::new();

        for signal in pending {
            let price = match prices.get(&signal.symbol) {
                Some(cached) => *cached,
                None => {
                    let fetched = match provider.fetch_current_price(&signal.symbol).await {
                        Ok(quote) => Some(quote.price),
                        Err(e) => {
                            warn!("Price lookup failed for {}: {}", signal.symbol, e);
                            None
                        }
                    };
                    prices.insert(signal.symbol.clone(), fetched);
                    fetched
                }
            };
            let Some(price) = price else {
                continue;
            };

            let outcome = evaluate_signal(&signal, price, now);
            if !outcome.is_resolved() {
                continue;
            }

            if let Some(mut tracked) = self.signals.get_mut(&signal.id) {
                if tracked.outcome.is_resolved() {
                    continue;
                }
                tracked.outcome = outcome;
                tracked.exit_price = Some(price);
                tracked.resolved_at = Some(now);
            }

            info!(
                "Signal {} {:?} resolved {:?} at {:.5} (entry {:.5})",
                signal.symbol, signal.direction, outcome, price, signal.entry_price
            );
            results.insert(signal.symbol.clone(), outcome);
        }

        results
    }

    /// Whether the periodic task is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Poll every `period` until [`SignalMonitor::stop`] is called.
    pub async fn run(&self, provider: Arc<dyn MarketDataProvider>, period: Duration) {
        let shutdown_rx = self.shutdown_tx.subscribe();
        self.run_until(provider, period, shutdown_rx).await
    }

    async fn run_until(
        &self,
        provider: Arc<dyn MarketDataProvider>,
        period: Duration,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        self.running.store(true, Ordering::SeqCst);
        let mut ticker = interval(period);

        info!("Signal monitor started ({}s interval)", period.as_secs());

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    info!("Signal monitor received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    let results = self.poll_once(provider.as_ref(), Utc::now()).await;
                    if !results.is_empty() {
                        info!("Monitor pass resolved {} signals", results.len());
                    }
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
    }

    /// Spawn the polling loop on the tokio runtime.
    ///
    /// The shutdown receiver is registered before the task starts, so a
    /// [`SignalMonitor::stop`] issued right after this call still ends it.
    pub fn spawn(
        self: &Arc<Self>,
        provider: Arc<dyn MarketDataProvider>,
        period: Duration,
    ) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        let shutdown_rx = self.shutdown_tx.subscribe();
        tokio::spawn(async move { monitor.run_until(provider, period, shutdown_rx).await })
    }

    /// Stop the periodic task. Outstanding signals stay PENDING.
    pub fn stop(&self) {
        if self.shutdown_tx.send(()).is_err() {
            debug!("Signal monitor stop requested with no running task");
        }
        info!("Signal monitor stopped");
    }
}
