//! Unit tests for the signal pipeline

use chrono::{DateTime, Duration, TimeZone, Utc};
use smartflow::services::signals::{analyzer, combiner, smart_money};
use smartflow::*;
use std::sync::Arc;

/// Tuesday 12 March 2024, 10:00 on the default UTC+3 trading clock.
fn trading_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 12, 7, 0, 0).unwrap()
}

/// Saturday 16 March 2024, midday on the trading clock.
fn weekend_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 16, 9, 0, 0).unwrap()
}

/// Deterministic wave with a gentle drift and varying volume.
fn wave_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            let close = 100.0 + (t * 0.3).sin() * 2.0 + t * 0.02;
            let open = close - (t * 0.7).cos() * 0.4;
            Candle {
                timestamp: 1_700_000_000_000 + i as i64 * 3_600_000,
                open,
                high: open.max(close) + 0.5,
                low: open.min(close) - 0.5,
                close,
                volume: 1_000.0 + ((t * 0.45).sin() + 1.0) * 400.0,
            }
        })
        .collect()
}

fn verdict(direction: SignalDirection, confidence: f64) -> SignalVerdict {
    SignalVerdict::new(1.0, direction, confidence, "test")
}

fn generator(provider: Arc<InMemoryProvider>, min_confidence: f64) -> SignalGenerator {
    let config = SignalConfig {
        min_confidence,
        symbols: vec!["EURUSD".to_string(), "BTCUSD".to_string()],
        ..SignalConfig::default()
    };
    SignalGenerator::new(provider, config)
}

#[test]
fn test_oscillator_thresholds() {
    let sell = analyzer::classify_oscillator(75.0);
    assert_eq!(sell.direction, SignalDirection::Sell);
    assert!((sell.confidence - 15.0).abs() < 1e-9);

    let buy = analyzer::classify_oscillator(25.0);
    assert_eq!(buy.direction, SignalDirection::Buy);
    assert!((buy.confidence - 15.0).abs() < 1e-9);

    let hold = analyzer::classify_oscillator(50.0);
    assert_eq!(hold.direction, SignalDirection::Hold);
    assert_eq!(hold.confidence, 50.0);
}

#[test]
fn test_unanimous_vote_keeps_mean_confidence() {
    let verdicts = [
        verdict(SignalDirection::Buy, 60.0),
        verdict(SignalDirection::Buy, 70.0),
        verdict(SignalDirection::Buy, 80.0),
        verdict(SignalDirection::Buy, 90.0),
    ];
    let combined = analyzer::vote(&verdicts, 1.0);
    assert_eq!(combined.direction, SignalDirection::Buy);
    assert!((combined.confidence - 75.0).abs() < 1e-9);
    assert_eq!(combined.description, "Combined signal: BUY(4) SELL(0)");
}

#[test]
fn test_split_vote_is_hold() {
    let verdicts = [
        verdict(SignalDirection::Buy, 90.0),
        verdict(SignalDirection::Buy, 90.0),
        verdict(SignalDirection::Sell, 90.0),
        verdict(SignalDirection::Sell, 90.0),
    ];
    let combined = analyzer::vote(&verdicts, 1.0);
    assert_eq!(combined.direction, SignalDirection::Hold);
    assert_eq!(combined.confidence, 50.0);
}

#[test]
fn test_combine_agreement_and_conflict() {
    let agree = combiner::combine(
        &verdict(SignalDirection::Buy, 80.0),
        &verdict(SignalDirection::Buy, 80.0),
    );
    assert_eq!(agree.direction, SignalDirection::Buy);
    assert!((agree.confidence - 96.0).abs() < 1e-9);

    let conflict = combiner::combine(
        &verdict(SignalDirection::Buy, 90.0),
        &verdict(SignalDirection::Sell, 60.0),
    );
    assert_eq!(conflict.direction, SignalDirection::Buy);
    assert!((conflict.confidence - 72.0).abs() < 1e-9);
}

#[test]
fn test_combine_tie_goes_to_smart_money() {
    let tie = combiner::combine(
        &verdict(SignalDirection::Buy, 70.0),
        &verdict(SignalDirection::Sell, 70.0),
    );
    assert_eq!(tie.direction, SignalDirection::Sell);
    assert!((tie.confidence - 56.0).abs() < 1e-9);
}

#[test]
fn test_short_history_is_neutral() {
    let analysis = smart_money::analyze(&wave_candles(49));
    assert_eq!(analysis, SmartMoneyAnalysis::neutral());

    let technical = analyzer::combined_signal(&wave_candles(10));
    assert_eq!(technical.direction, SignalDirection::Hold);
}

#[test]
fn test_smart_money_index_bounded() {
    let candles = wave_candles(150);
    let index = smart_money::smart_money_index(&candles).unwrap();
    assert_eq!(index.values.len(), candles.len());
    assert!(index.values.iter().all(|v| (0.0..=1.0).contains(v)));

    let analysis = smart_money::analyze(&candles);
    assert!((0.0..=1.0).contains(&analysis.index_value));
    assert!((0.0..=100.0).contains(&analysis.confidence));
    assert!(analysis.factors.is_some());
}

#[test]
fn test_analysis_is_deterministic() {
    let candles = wave_candles(120);
    assert_eq!(smart_money::analyze(&candles), smart_money::analyze(&candles));
    assert_eq!(
        analyzer::combined_signal(&candles),
        analyzer::combined_signal(&candles)
    );
    assert_eq!(
        smart_money::support_resistance(&candles),
        smart_money::support_resistance(&candles)
    );
}

#[test]
fn test_support_below_resistance() {
    let candles = wave_candles(150);
    let levels = smart_money::support_resistance(&candles);
    let close = candles.last().unwrap().close;
    assert!(levels.support <= close);
    assert!(levels.resistance >= close);
    assert!(levels.volume_levels.len() <= 5);
}

#[test]
fn test_binary_signal_shape() {
    let now = trading_now();
    let signal = combiner::build_trading_signal(
        "EURUSD",
        &verdict(SignalDirection::Buy, 92.0),
        1.1,
        InstrumentKind::Binary,
        Timeframe::FiveMinutes,
        now,
    );
    assert_eq!(signal.direction, TradeDirection::Call);
    assert_eq!(signal.origin, SignalOrigin::Combined);
    assert_eq!(signal.expiry_time, now + Duration::minutes(1));

    let put = combiner::build_trading_signal(
        "EURUSD",
        &verdict(SignalDirection::Sell, 75.0),
        1.1,
        InstrumentKind::Binary,
        Timeframe::FiveMinutes,
        now,
    );
    assert_eq!(put.direction, TradeDirection::Put);
    assert_eq!(put.expiry_time, now + Duration::minutes(5));
}

#[tokio::test]
async fn test_generation_suppressed_on_weekend() {
    let provider = Arc::new(InMemoryProvider::new());
    provider.insert_candles("EURUSD", wave_candles(120));
    let generator = generator(provider, 0.0);

    let signals = generator.generate_signals(None, weekend_now()).await;
    assert!(signals.is_empty());
}

#[tokio::test]
async fn test_batch_skips_failing_symbols() {
    let provider = Arc::new(InMemoryProvider::new());
    provider.insert_candles("EURUSD", wave_candles(120));
    provider.insert_candles("BTCUSD", wave_candles(30));
    let generator = generator(provider, 0.0);

    let symbols = vec![
        "BTCUSD".to_string(),
        "UNKNOWN".to_string(),
        "EURUSD".to_string(),
    ];
    let signals = generator.generate_signals(Some(&symbols), trading_now()).await;

    assert_eq!(signals.len(), 1);
    let signal = &signals[0];
    assert_eq!(signal.symbol, "EURUSD");
    assert_eq!(signal.origin, SignalOrigin::Combined);
    assert_eq!(signal.timeframe, Timeframe::OneHour);
    assert_eq!(signal.created_at, trading_now());
    assert!((0.0..=100.0).contains(&signal.confidence));
}

#[tokio::test]
async fn test_short_history_reports_insufficient_data() {
    let provider = Arc::new(InMemoryProvider::new());
    provider.insert_candles("BTCUSD", wave_candles(30));
    let generator = generator(provider, 0.0);

    let err = generator
        .generate_for_symbol("BTCUSD", trading_now())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientData { have: 30, .. }));
}

#[tokio::test]
async fn test_threshold_filters_signals() {
    let provider = Arc::new(InMemoryProvider::new());
    provider.insert_candles("EURUSD", wave_candles(120));
    let generator = generator(provider, 101.0);
    assert_eq!(generator.config().min_confidence, 101.0);

    let signals = generator.generate_signals(None, trading_now()).await;
    assert!(signals.is_empty());
}

#[tokio::test]
async fn test_smart_money_path_needs_history() {
    let provider = Arc::new(InMemoryProvider::new());
    provider.insert_candles("EURUSD", wave_candles(20));
    let generator = generator(provider, 0.0);

    let signal = generator
        .generate_smart_money_signal("EURUSD", Timeframe::OneHour, trading_now())
        .await
        .unwrap();
    assert!(signal.is_none());
}

/// A flat base followed by a high-volume rally: 100 quiet candles around 100,
/// then six candles each closing 2 higher on twenty times the volume.
fn rally_candles() -> Vec<Candle> {
    let mut candles: Vec<Candle> = (0..100)
        .map(|i| Candle {
            timestamp: 1_700_000_000_000 + i as i64 * 3_600_000,
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 99.2,
            volume: 1_000.0,
        })
        .collect();
    let mut price = 100.0;
    for i in 100..106 {
        candles.push(Candle {
            timestamp: 1_700_000_000_000 + i as i64 * 3_600_000,
            open: price,
            high: price + 2.05,
            low: price,
            close: price + 2.0,
            volume: 20_000.0,
        });
        price += 2.0;
    }
    candles
}

#[test]
fn test_rally_reads_as_accumulation() {
    let analysis = smart_money::analyze(&rally_candles());
    assert_eq!(analysis.direction, SignalDirection::Buy);
    assert!(analysis.index_value > 0.7);
    assert!(analysis.index_change > 0.05);
    // Base 30 plus the volume-spike bonus; RSI at 100 blocks the momentum bonus
    assert!((analysis.confidence - 50.0).abs() < 1e-9);
    let factors = analysis.factors.unwrap();
    assert!(factors.volume_spike);
    assert_eq!(factors.macd_bias, MacdBias::Bullish);
}

#[tokio::test]
async fn test_smart_money_signal_from_rally() {
    let provider = Arc::new(InMemoryProvider::new());
    provider.insert_candles("EURUSD", rally_candles());
    let config = SignalConfig {
        smart_money_min_confidence: 50.0,
        ..SignalConfig::default()
    };
    let generator = SignalGenerator::new(provider, config);
    let now = trading_now();

    let signal = generator
        .generate_smart_money_signal("EURUSD", Timeframe::OneHour, now)
        .await
        .unwrap()
        .expect("rally should produce a smart money signal");

    assert_eq!(signal.symbol, "EURUSD");
    assert_eq!(signal.direction, TradeDirection::Buy);
    assert_eq!(signal.origin, SignalOrigin::SmartMoney);
    assert_eq!(signal.timeframe, Timeframe::OneHour);
    assert!((signal.confidence - 50.0).abs() < 1e-9);
    assert!((signal.entry_price - 112.0).abs() < 1e-9);
    assert_eq!(signal.created_at, now);
    assert_eq!(signal.expiry_time, now + Duration::minutes(60));

    // Resistance falls back to +5% and support sits near the base, so both
    // levels end up at their caps
    assert!((signal.target_price.unwrap() - 112.0 * 1.03).abs() < 1e-9);
    assert!((signal.stop_loss.unwrap() - 112.0 * 0.98).abs() < 1e-9);

    let context = signal.context.unwrap();
    assert!((context.resistance - 112.0 * 1.05).abs() < 1e-9);
    assert!(context.support < 102.0);
    assert!(context.high_volume);
    assert!(context.factors.is_some());
}

#[tokio::test]
async fn test_smart_money_signal_respects_threshold() {
    let provider = Arc::new(InMemoryProvider::new());
    provider.insert_candles("EURUSD", rally_candles());
    // Default threshold is 60, above the rally's 50
    let generator = SignalGenerator::new(provider, SignalConfig::default());

    let signal = generator
        .generate_smart_money_signal("EURUSD", Timeframe::OneHour, trading_now())
        .await
        .unwrap();
    assert!(signal.is_none());
}
