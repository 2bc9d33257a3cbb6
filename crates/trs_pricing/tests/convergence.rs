//! Monte Carlo convergence tests against the deterministic formula.

use std::sync::Arc;

use approx::assert_relative_eq;
use trs_core::curves::{Interpolation, PillarCurve};
use trs_core::types::{BasketId, Currency, Date, DayCountConvention, Ticker};
use trs_models::basket::Basket;
use trs_models::correlation::CorrelationMatrix;
use trs_models::gbm::{CorrelatedGbm, GbmAsset};
use trs_models::schedules::Frequency;
use trs_models::trs::{ResetPolicy, Side, TotalReturnSwap};
use trs_pricing::context::{AssetCurves, MarketView};
use trs_pricing::deterministic::{forward_price, DeterministicTrsPricer};
use trs_pricing::mc::{McConfig, McEngine};

fn flat(rate: f64) -> Arc<PillarCurve<f64>> {
    Arc::new(
        PillarCurve::new(
            vec![0.5, 30.0],
            vec![rate, rate],
            Interpolation::LogLinearDiscount,
        )
        .unwrap(),
    )
}

fn view(rate: f64) -> MarketView {
    MarketView::new(
        Date::from_ymd(2020, 6, 15).unwrap(),
        DayCountConvention::Act365Fixed,
        flat(rate),
        vec![AssetCurves::default()],
    )
}

fn swap(spread: f64, reset_policy: ResetPolicy) -> TotalReturnSwap {
    TotalReturnSwap::new(
        "TRS-CONV",
        Basket::new(BasketId::new("B"))
            .with_component(Ticker::new("AAA"), 1.0)
            .unwrap(),
        reset_policy,
        spread,
        DayCountConvention::Act365Fixed,
        1_000_000.0,
        Currency::USD,
        Side::ReceiveTotalReturn,
        Date::from_ymd(2020, 6, 15).unwrap(),
        Date::from_ymd(2021, 6, 15).unwrap(),
        Frequency::Quarterly,
    )
    .unwrap()
}

fn model(volatility: f64) -> CorrelatedGbm {
    CorrelatedGbm::single(GbmAsset::new(Ticker::new("AAA"), 100.0, volatility).unwrap())
}

#[test]
fn zero_vol_mc_matches_closed_form() {
    // One asset, flat 0.5% discount, no dividend or repo carry, fixed
    // spread: every path is the forward path, so 100,000 paths must hit
    // the formula price with vanishing standard error.
    let engine = McEngine::new(
        McConfig::builder()
            .n_paths(100_000)
            .seed(42)
            .build()
            .unwrap(),
    );
    let swap = swap(0.002, ResetPolicy::Periodic);
    let view = view(0.005);

    let mc = engine.price(&swap, &model(0.0), &view).unwrap();
    let det = DeterministicTrsPricer::price(&swap, &model(0.0), &view).unwrap();

    assert!(mc.std_error < 1e-9);
    assert_relative_eq!(mc.price, det.price, max_relative = 1e-6);
}

#[test]
fn zero_vol_terminal_value_matches_forward() {
    // The deterministic engine's 1Y forward agrees with the closed form
    // S * exp(r * T) at flat 0.5%.
    let discount = flat(0.005);
    let t = 365.0 / 365.0;
    let forward = forward_price(100.0, t, &discount, &AssetCurves::default()).unwrap();
    assert_relative_eq!(forward, 100.0 * (0.005_f64).exp(), max_relative = 1e-12);
}

#[test]
fn periodic_trs_expectation_is_model_free() {
    // Periodic-reset cash flows are linear in the basket levels, so the
    // Monte Carlo expectation must agree with the deterministic forward
    // price irrespective of volatility, within sampling error.
    let engine = McEngine::new(
        McConfig::builder()
            .n_paths(200_000)
            .seed(7)
            .antithetic(true)
            .build()
            .unwrap(),
    );
    let swap = swap(0.001, ResetPolicy::Periodic);
    let view = view(0.01);

    let mc = engine.price(&swap, &model(0.25), &view).unwrap();
    let det = DeterministicTrsPricer::price(&swap, &model(0.25), &view).unwrap();

    let tolerance = 4.0 * mc.std_error.max(1e-9);
    assert!(
        (mc.price - det.price).abs() < tolerance,
        "MC {} vs formula {} outside 4 standard errors ({})",
        mc.price,
        det.price,
        tolerance
    );
}

#[test]
fn standard_error_shrinks_with_path_count() {
    let swap = swap(0.0, ResetPolicy::Periodic);
    let view = view(0.005);

    let small = McEngine::new(McConfig::builder().n_paths(5_000).seed(11).build().unwrap())
        .price(&swap, &model(0.3), &view)
        .unwrap();
    let large = McEngine::new(McConfig::builder().n_paths(80_000).seed(11).build().unwrap())
        .price(&swap, &model(0.3), &view)
        .unwrap();

    // Four times the paths roughly halves the standard error twice over.
    assert!(large.std_error < small.std_error * 0.5);
}

#[test]
fn correlated_basket_prices_with_two_assets() {
    let basket = Basket::new(BasketId::new("PAIR"))
        .with_component(Ticker::new("AAA"), 0.6)
        .unwrap()
        .with_component(Ticker::new("BBB"), 0.4)
        .unwrap();
    let swap = TotalReturnSwap::new(
        "TRS-PAIR",
        basket,
        ResetPolicy::Periodic,
        0.001,
        DayCountConvention::Act365Fixed,
        1_000_000.0,
        Currency::USD,
        Side::ReceiveTotalReturn,
        Date::from_ymd(2020, 6, 15).unwrap(),
        Date::from_ymd(2021, 6, 15).unwrap(),
        Frequency::Quarterly,
    )
    .unwrap();
    let model = CorrelatedGbm::new(
        vec![
            GbmAsset::new(Ticker::new("AAA"), 100.0, 0.2).unwrap(),
            GbmAsset::new(Ticker::new("BBB"), 50.0, 0.3).unwrap(),
        ],
        CorrelationMatrix::new(&[1.0, 0.6, 0.6, 1.0], 2).unwrap(),
    )
    .unwrap();
    let view = MarketView::new(
        Date::from_ymd(2020, 6, 15).unwrap(),
        DayCountConvention::Act365Fixed,
        flat(0.01),
        vec![AssetCurves::default(), AssetCurves::default()],
    );

    let engine = McEngine::new(
        McConfig::builder()
            .n_paths(50_000)
            .seed(3)
            .antithetic(true)
            .build()
            .unwrap(),
    );
    let mc = engine.price(&swap, &model, &view).unwrap();
    let det = DeterministicTrsPricer::price(&swap, &model, &view).unwrap();
    assert!((mc.price - det.price).abs() < 4.0 * mc.std_error.max(1e-9));
}
