//! Benchmarks for the hot event-processing paths

use chrono::{DateTime, Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use poly_activity::config::DetectorConfig;
use poly_activity::detector::UnusualActivityDetector;
use poly_activity::events::{OrderbookUpdate, PriceChangeEvent, PriceLevel, TradeSide, TradeUpdate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
}

fn benchmark_process_trade(c: &mut Criterion) {
    let mut detector = UnusualActivityDetector::new(DetectorConfig::default());
    let mut trade = TradeUpdate {
        market: "0xmarket".to_string(),
        asset_id: "token-yes".to_string(),
        price: dec!(0.50),
        size: dec!(100),
        side: TradeSide::Buy,
        timestamp: ts(0),
    };

    c.bench_function("process_trade_quiet", |b| {
        b.iter(|| {
            // Advance time so the rolling windows stay at steady-state size
            trade.timestamp += Duration::seconds(1);
            detector.process_trade(black_box(&trade))
        })
    });
}

fn benchmark_process_price_change(c: &mut Criterion) {
    let mut detector = UnusualActivityDetector::new(DetectorConfig::default());
    let mut event = PriceChangeEvent {
        market: "0xmarket".to_string(),
        asset_id: "token-yes".to_string(),
        old_price: dec!(0.50),
        new_price: dec!(0.51),
        change_pct: dec!(2),
        timestamp: ts(0),
    };

    c.bench_function("process_price_change_quiet", |b| {
        b.iter(|| {
            event.timestamp += Duration::seconds(1);
            detector.process_price_change(black_box(&event))
        })
    });
}

fn benchmark_process_book(c: &mut Criterion) {
    let mut detector = UnusualActivityDetector::new(DetectorConfig::default());
    let level = |price, size| PriceLevel { price, size };
    let update = OrderbookUpdate {
        market: "0xmarket".to_string(),
        asset_id: "token-yes".to_string(),
        bids: (0..20)
            .map(|i| level(dec!(0.49), dec!(100) + Decimal::from(i)))
            .collect(),
        asks: (0..20)
            .map(|i| level(dec!(0.51), dec!(100) + Decimal::from(i)))
            .collect(),
        timestamp: ts(0),
    };

    c.bench_function("process_book_l2", |b| {
        b.iter(|| detector.process_book(black_box(&update)))
    });
}

criterion_group!(
    benches,
    benchmark_process_trade,
    benchmark_process_price_change,
    benchmark_process_book
);
criterion_main!(benches);
