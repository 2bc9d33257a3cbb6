//! Criterion benchmarks: discount bootstrap and Monte Carlo throughput.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use trs_core::conventions::MarketConventions;
use trs_core::curves::{Interpolation, PillarCurve};
use trs_core::types::{BasketId, Currency, Date, DayCountConvention, Ticker};
use trs_market::bootstrap::{Bootstrap, DiscountBootstrap};
use trs_market::quotes::{Compounding, DataQuoteSheet, InstrumentKind, QuoteInstrument, QuoteKind};
use trs_models::basket::Basket;
use trs_models::correlation::CorrelationMatrix;
use trs_models::gbm::{CorrelatedGbm, GbmAsset};
use trs_models::schedules::Frequency;
use trs_models::trs::{ResetPolicy, Side, TotalReturnSwap};
use trs_pricing::context::{AssetCurves, MarketView};
use trs_pricing::mc::{McConfig, McEngine};

fn discount_sheet() -> DataQuoteSheet {
    let as_of = Date::from_ymd(2020, 6, 15).unwrap();
    let mut sheet = DataQuoteSheet::new(as_of);
    for (months, mid) in [
        (6, 0.004),
        (12, 0.005),
        (24, 0.007),
        (36, 0.008),
        (60, 0.010),
        (84, 0.011),
        (120, 0.012),
    ] {
        let maturity = as_of.add_months(months).unwrap();
        sheet.add_instrument(
            QuoteInstrument::new(
                format!("USD.ZC.{months}M"),
                InstrumentKind::ZeroCoupon {
                    compounding: Compounding::Continuous,
                },
                maturity,
            )
            .add_quote(QuoteKind::Mid, mid)
            .unwrap(),
        );
    }
    sheet
}

fn bench_bootstrap(c: &mut Criterion) {
    let sheet = discount_sheet();
    let bootstrapper = DiscountBootstrap::new(MarketConventions::default());
    c.bench_function("discount_bootstrap_7_pillars", |b| {
        b.iter_batched(
            || sheet.clone(),
            |sheet| bootstrapper.bootstrap(&sheet).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let swap = TotalReturnSwap::new(
        "TRS-BENCH",
        Basket::new(BasketId::new("PAIR"))
            .with_component(Ticker::new("AAA"), 0.6)
            .unwrap()
            .with_component(Ticker::new("BBB"), 0.4)
            .unwrap(),
        ResetPolicy::Threshold { threshold: 0.05 },
        0.001,
        DayCountConvention::Act365Fixed,
        1_000_000.0,
        Currency::USD,
        Side::ReceiveTotalReturn,
        Date::from_ymd(2020, 6, 15).unwrap(),
        Date::from_ymd(2022, 6, 15).unwrap(),
        Frequency::Quarterly,
    )
    .unwrap();
    let model = CorrelatedGbm::new(
        vec![
            GbmAsset::new(Ticker::new("AAA"), 100.0, 0.2).unwrap(),
            GbmAsset::new(Ticker::new("BBB"), 50.0, 0.3).unwrap(),
        ],
        CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap(),
    )
    .unwrap();
    let view = MarketView::new(
        Date::from_ymd(2020, 6, 15).unwrap(),
        DayCountConvention::Act365Fixed,
        Arc::new(
            PillarCurve::new(
                vec![1.0, 10.0],
                vec![0.01, 0.012],
                Interpolation::LogLinearDiscount,
            )
            .unwrap(),
        ),
        vec![AssetCurves::default(), AssetCurves::default()],
    );
    let engine = McEngine::new(
        McConfig::builder()
            .n_paths(10_000)
            .seed(42)
            .build()
            .unwrap(),
    );

    c.bench_function("mc_trs_two_assets_10k_paths", |b| {
        b.iter(|| engine.price(&swap, &model, &view).unwrap())
    });
}

criterion_group!(benches, bench_bootstrap, bench_monte_carlo);
criterion_main!(benches);
