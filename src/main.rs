use chrono::Utc;
use smartflow::config::Config;
use smartflow::services::{JsonFileProvider, MarketDataProvider, SignalGenerator, SignalMonitor};
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartflow=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    config.validate()?;

    let provider: Arc<dyn MarketDataProvider> =
        Arc::new(JsonFileProvider::new(config.candle_data_dir.clone()));
    let generator = SignalGenerator::new(provider.clone(), config.signals.clone());
    info!(
        "Starting smartflow: {} symbols on {} candles, data from {}",
        generator.config().symbols.len(),
        generator.config().timeframe,
        config.candle_data_dir.display()
    );

    let signals = generator.generate_signals(None, Utc::now()).await;
    for signal in &signals {
        println!("{}", serde_json::to_string(signal)?);
    }

    if !config.monitoring_enabled {
        info!("Signal monitoring disabled");
        return Ok(());
    }
    if signals.is_empty() {
        warn!("No signals to monitor");
        return Ok(());
    }

    let monitor = Arc::new(SignalMonitor::new());
    for signal in signals {
        monitor.track(signal);
    }
    let handle = monitor.spawn(
        provider,
        Duration::from_secs(config.monitor_interval_secs),
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    monitor.stop();
    handle.await?;

    for tracked in monitor.pending() {
        info!("Still pending: {} {:?}", tracked.symbol, tracked.direction);
    }

    Ok(())
}
