//! Pricing orchestration: books priced across labelled scenario sets.
//!
//! A run iterates the cross-product of selected instruments and the
//! parallel (context, model, setting) label arrays, dispatches each
//! combination to the pricer bound to the instrument's product type, and
//! collects the results into a table keyed by (instrument, scenario
//! label). One cell's failure never aborts unrelated cells; run-level
//! configuration errors abort before any cell is priced.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};

use trs_core::conventions::MarketConventions;
use trs_core::curves::{FxForwardCurve, PillarCurve};
use trs_core::types::{Currency, CurrencyPair, Date, Ticker};
use trs_market::bump::BumpDirection;
use trs_market::market::Market;
use trs_models::book::Book;
use trs_models::gbm::CorrelatedGbm;
use trs_models::trs::{ProductType, TotalReturnSwap};
use trs_pricing::context::{AssetCurves, MarketView};
use trs_pricing::error::{NumericalWarning, SimulationError};
use trs_pricing::mc::{McConfig, McEngine};
use trs_pricing::deterministic::DeterministicTrsPricer;

use crate::error::OrchestrationError;

/// Which tasks a pricing run computes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PricingTasks {
    /// Compute the dirty price.
    pub price: bool,
    /// Solve the fair spread.
    pub fair_spread: bool,
    /// Compute bump sensitivities.
    pub sensitivities: bool,
}

impl PricingTasks {
    /// Price only.
    pub fn price_only() -> Self {
        Self {
            price: true,
            ..Default::default()
        }
    }

    /// Everything.
    pub fn all() -> Self {
        Self {
            price: true,
            fair_spread: true,
            sensitivities: true,
        }
    }
}

/// A labelled market context: one market container per curve family.
///
/// The containers are the generic [`Market`] keyed by heterogeneous
/// identity types; the context only bundles them with the valuation date
/// and conventions.
pub struct PricingContext {
    /// Valuation date all sheets share.
    pub as_of: Date,
    /// Conventions threaded through curve time computation.
    pub conventions: MarketConventions,
    /// Discount curves keyed by currency.
    pub discount: Market<Currency, PillarCurve<f64>>,
    /// Repo curves keyed by underlying.
    pub repo: Market<Ticker, PillarCurve<f64>>,
    /// Dividend curves keyed by underlying.
    pub dividend: Market<Ticker, PillarCurve<f64>>,
    /// Fx forward curves keyed by currency pair.
    pub fx: Market<CurrencyPair, FxForwardCurve<f64>>,
}

impl PricingContext {
    /// Creates a context with empty markets.
    pub fn new(as_of: Date, conventions: MarketConventions) -> Self {
        Self {
            as_of,
            conventions,
            discount: Market::new(),
            repo: Market::new(),
            dividend: Market::new(),
            fx: Market::new(),
        }
    }

    /// Builds the curve view a swap prices against, resolving the
    /// discount curve for its currency and per-asset carry curves where
    /// registered.
    pub fn market_view(&self, swap: &TotalReturnSwap) -> Result<MarketView, OrchestrationError> {
        self.view_with(swap, |market, key| market.resolve(key))
    }

    /// Like [`PricingContext::market_view`], with every key's registered
    /// bumps applied in the given direction.
    pub fn market_view_bumped(
        &self,
        swap: &TotalReturnSwap,
        direction: BumpDirection,
    ) -> Result<MarketView, OrchestrationError> {
        self.view_with(swap, |market, key| market.resolve_bumped(key, direction))
    }

    fn view_with<FD>(
        &self,
        swap: &TotalReturnSwap,
        resolve_discount: FD,
    ) -> Result<MarketView, OrchestrationError>
    where
        FD: Fn(
            &Market<Currency, PillarCurve<f64>>,
            &Currency,
        ) -> Result<Arc<PillarCurve<f64>>, trs_market::error::MarketError>,
    {
        let discount = resolve_discount(&self.discount, &swap.currency())?;
        let mut asset_curves = Vec::with_capacity(swap.asset_leg().basket.len());
        for ticker in swap.asset_leg().basket.tickers() {
            let dividend = if self.dividend.contains(ticker) {
                Some(self.dividend.resolve(ticker)?)
            } else {
                None
            };
            let repo = if self.repo.contains(ticker) {
                Some(self.repo.resolve(ticker)?)
            } else {
                None
            };
            asset_curves.push(AssetCurves { dividend, repo });
        }
        Ok(MarketView::new(
            self.as_of,
            self.conventions.discount_day_count,
            discount,
            asset_curves,
        ))
    }
}

/// Values a pricer writes into a cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellValues {
    /// Dirty price.
    pub dirty_price: f64,
    /// Monte Carlo standard error, zero for closed-form pricers.
    pub std_error: f64,
    /// Fair spread, when solvable.
    pub fair_spread: Option<f64>,
    /// Non-fatal diagnostics.
    pub warnings: Vec<NumericalWarning>,
}

/// Strategy bound to a product type.
pub trait Pricer: Send + Sync {
    /// Prices one swap under one (model, view, settings) combination.
    fn price(
        &self,
        swap: &TotalReturnSwap,
        model: &CorrelatedGbm,
        view: &MarketView,
        settings: &McConfig,
    ) -> Result<CellValues, SimulationError>;
}

/// Monte Carlo pricer for the TRS family.
#[derive(Default)]
pub struct McTrsPricer;

impl Pricer for McTrsPricer {
    fn price(
        &self,
        swap: &TotalReturnSwap,
        model: &CorrelatedGbm,
        view: &MarketView,
        settings: &McConfig,
    ) -> Result<CellValues, SimulationError> {
        let estimate = McEngine::new(settings.clone()).price(swap, model, view)?;
        Ok(CellValues {
            dirty_price: estimate.price,
            std_error: estimate.std_error,
            fair_spread: estimate.fair_spread,
            warnings: estimate.warnings,
        })
    }
}

/// Direct-formula pricer for the TRS family.
#[derive(Default)]
pub struct ClosedFormTrsPricer;

impl Pricer for ClosedFormTrsPricer {
    fn price(
        &self,
        swap: &TotalReturnSwap,
        model: &CorrelatedGbm,
        view: &MarketView,
        _settings: &McConfig,
    ) -> Result<CellValues, SimulationError> {
        let result = DeterministicTrsPricer::price(swap, model, view)?;
        Ok(CellValues {
            dirty_price: result.price,
            std_error: 0.0,
            fair_spread: result.fair_spread,
            warnings: Vec::new(),
        })
    }
}

/// One cell of the result table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellResult {
    /// Dirty price, when the price task was requested and succeeded.
    pub dirty_price: Option<f64>,
    /// Standard error accompanying the price.
    pub std_error: Option<f64>,
    /// Fair spread, when requested and solvable.
    pub fair_spread: Option<f64>,
    /// Bump sensitivities keyed by market key rendering.
    pub sensitivities: BTreeMap<String, f64>,
    /// Non-fatal diagnostics.
    pub warnings: Vec<NumericalWarning>,
    /// Failure reason when this cell errored; other cells are unaffected.
    pub error: Option<String>,
}

/// Results keyed by (instrument id, scenario label).
#[derive(Clone, Debug, Default)]
pub struct ResultTable {
    cells: BTreeMap<(String, String), CellResult>,
}

impl ResultTable {
    /// Returns the cell for an (instrument, scenario) pair.
    pub fn get(&self, instrument: &str, scenario: &str) -> Option<&CellResult> {
        self.cells
            .get(&(instrument.to_string(), scenario.to_string()))
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true when no cell was priced.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates cells with their keys.
    pub fn iter(&self) -> impl Iterator<Item = (&(String, String), &CellResult)> {
        self.cells.iter()
    }

    /// Returns the keys of failed cells.
    pub fn failed(&self) -> Vec<&(String, String)> {
        self.cells
            .iter()
            .filter(|(_, cell)| cell.error.is_some())
            .map(|(key, _)| key)
            .collect()
    }

    fn insert(&mut self, instrument: String, scenario: String, cell: CellResult) {
        self.cells.insert((instrument, scenario), cell);
    }
}

/// The orchestration engine: a pricer registry plus the cross-product
/// pricing loop.
#[derive(Default)]
pub struct PricingOrchestrator {
    pricers: HashMap<ProductType, Arc<dyn Pricer>>,
}

impl PricingOrchestrator {
    /// Creates an orchestrator with no pricer bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a pricer to a product type, replacing any existing binding.
    pub fn register(&mut self, product: ProductType, pricer: Arc<dyn Pricer>) {
        self.pricers.insert(product, pricer);
    }

    /// Prices the selected instruments across the scenario arrays.
    ///
    /// `context_labels`, `model_labels`, `setting_labels`, `enabled` and
    /// `bump_enabled` are parallel arrays: entry `i` describes scenario
    /// `i`. Disabled scenarios are skipped; `bump_enabled` gates the
    /// sensitivity task per scenario.
    ///
    /// # Errors
    ///
    /// Run-level configuration failures (arity mismatch, unknown labels
    /// or instruments, unfrozen book) abort before any cell is priced.
    /// Cell-level failures are recorded in the table instead.
    #[allow(clippy::too_many_arguments)]
    pub fn price(
        &self,
        book: &Book,
        contexts: &BTreeMap<String, PricingContext>,
        models: &BTreeMap<String, CorrelatedGbm>,
        settings: &BTreeMap<String, McConfig>,
        instrument_ids: &[String],
        context_labels: &[String],
        model_labels: &[String],
        setting_labels: &[String],
        enabled: &[bool],
        bump_enabled: &[bool],
        tasks: PricingTasks,
    ) -> Result<ResultTable, OrchestrationError> {
        if !book.is_frozen() {
            return Err(OrchestrationError::UnfrozenBook {
                name: book.name().to_string(),
            });
        }

        let expected = context_labels.len();
        for (name, len) in [
            ("model_labels", model_labels.len()),
            ("setting_labels", setting_labels.len()),
            ("enabled", enabled.len()),
            ("bump_enabled", bump_enabled.len()),
        ] {
            if len != expected {
                return Err(OrchestrationError::ArityMismatch {
                    array: name.to_string(),
                    got: len,
                    expected,
                });
            }
        }

        // Resolve every selection up front: configuration errors must
        // abort with no partial results.
        let mut trades = Vec::with_capacity(instrument_ids.len());
        for id in instrument_ids {
            let entry = book
                .find(id)
                .ok_or_else(|| OrchestrationError::UnknownInstrument { id: id.clone() })?;
            trades.push(entry);
        }
        let mut scenarios = Vec::new();
        for i in 0..expected {
            if !enabled[i] {
                continue;
            }
            let context = contexts.get(&context_labels[i]).ok_or_else(|| {
                OrchestrationError::UnknownLabel {
                    kind: "context".to_string(),
                    label: context_labels[i].clone(),
                }
            })?;
            let model =
                models
                    .get(&model_labels[i])
                    .ok_or_else(|| OrchestrationError::UnknownLabel {
                        kind: "model".to_string(),
                        label: model_labels[i].clone(),
                    })?;
            let setting = settings.get(&setting_labels[i]).ok_or_else(|| {
                OrchestrationError::UnknownLabel {
                    kind: "setting".to_string(),
                    label: setting_labels[i].clone(),
                }
            })?;
            let label = format!(
                "{}/{}/{}",
                context_labels[i], model_labels[i], setting_labels[i]
            );
            scenarios.push((label, context, model, setting, bump_enabled[i]));
        }

        // Cells are independent: fan them out across the worker pool and
        // merge the finished results.
        let work: Vec<_> = trades
            .iter()
            .flat_map(|entry| scenarios.iter().map(move |scenario| (&entry.trade, scenario)))
            .collect();
        let cells: Vec<(String, String, CellResult)> = work
            .into_par_iter()
            .map(|(swap, (label, context, model, setting, bumps))| {
                let cell = self.price_cell(swap, context, model, setting, *bumps, tasks);
                if let Some(reason) = &cell.error {
                    warn!(trade = swap.trade_id(), scenario = %label, %reason, "cell failed");
                }
                (swap.trade_id().to_string(), label.clone(), cell)
            })
            .collect();

        let mut table = ResultTable::default();
        for (trade_id, label, cell) in cells {
            table.insert(trade_id, label, cell);
        }

        debug!(
            cells = table.len(),
            failed = table.failed().len(),
            "pricing run complete"
        );
        Ok(table)
    }

    /// Prices one (instrument, scenario) cell, catching failures into the
    /// cell instead of propagating them.
    fn price_cell(
        &self,
        swap: &TotalReturnSwap,
        context: &PricingContext,
        model: &CorrelatedGbm,
        setting: &McConfig,
        bumps: bool,
        tasks: PricingTasks,
    ) -> CellResult {
        let mut cell = CellResult::default();

        let pricer = match self.pricers.get(&swap.product_type()) {
            Some(pricer) => Arc::clone(pricer),
            None => {
                cell.error = Some(
                    OrchestrationError::UnsupportedProduct {
                        product: format!("{:?}", swap.product_type()),
                    }
                    .to_string(),
                );
                return cell;
            }
        };

        let outcome = context
            .market_view(swap)
            .and_then(|view| pricer.price(swap, model, &view, setting).map_err(Into::into));
        let values = match outcome {
            Ok(values) => values,
            Err(error) => {
                cell.error = Some(error.to_string());
                return cell;
            }
        };

        if tasks.price {
            cell.dirty_price = Some(values.dirty_price);
            cell.std_error = Some(values.std_error);
        }
        if tasks.fair_spread {
            cell.fair_spread = values.fair_spread;
        }
        cell.warnings = values.warnings;

        if tasks.sensitivities && bumps {
            match self.bump_sensitivity(swap, context, model, setting, pricer.as_ref()) {
                Ok(Some((key, sensitivity))) => {
                    cell.sensitivities.insert(key, sensitivity);
                }
                Ok(None) => {}
                Err(error) => {
                    // Sensitivity failure poisons the cell but not the run.
                    cell.error = Some(error.to_string());
                }
            }
        }
        cell
    }

    /// Central-difference sensitivity under the discount key's registered
    /// bumps, `None` when the trade's currency has no bumps registered.
    fn bump_sensitivity(
        &self,
        swap: &TotalReturnSwap,
        context: &PricingContext,
        model: &CorrelatedGbm,
        setting: &McConfig,
        pricer: &dyn Pricer,
    ) -> Result<Option<(String, f64)>, OrchestrationError> {
        let key = swap.currency();
        let specs = context.discount.bumps(&key)?;
        if specs.is_empty() {
            return Ok(None);
        }

        let up_view = context.market_view_bumped(swap, BumpDirection::Up)?;
        let down_view = context.market_view_bumped(swap, BumpDirection::Down)?;
        let up = pricer.price(swap, model, &up_view, setting)?;
        let down = pricer.price(swap, model, &down_view, setting)?;

        let width: f64 = specs.iter().map(|s| s.width()).sum();
        Ok(Some((
            key.to_string(),
            (up.dirty_price - down.dirty_price) / width,
        )))
    }
}
