//! Benchmark shadow portfolio.
//!
//! Replays the investor's own cash-flow timing into a passive index: every
//! contribution buys index units at that day's close, every withdrawal or
//! dividend redeems units. Comparing the shadow's money-weighted return with
//! the portfolio's isolates the effect of security selection from the effect
//! of timing.

use folio_core::types::{CashFlow, Date, PriceSeries};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cashflows::{net_invested, with_terminal};
use crate::config::SolverSettings;
use crate::diagnostics::{Warning, WarningKind};
use crate::returns::{money_weighted_return, ReturnOutcome};

/// One simulated benchmark trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowTrade {
    /// Date of the mirrored flow.
    pub date: Date,
    /// Close used.
    pub price: Decimal,
    /// Units bought (positive) or redeemed (negative).
    pub units: Decimal,
    /// Cash flow actually mirrored, same sign convention as the portfolio.
    pub amount: Decimal,
}

/// Result of a benchmark simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowPortfolio {
    prices: PriceSeries,
    trades: Vec<ShadowTrade>,
    /// Real flows that were mirrored, with redemptions capped to the units held.
    pub included_flows: Vec<CashFlow>,
    /// Number of flows excluded for lack of a benchmark close.
    pub excluded_flows: usize,
    /// Units held on the terminal date.
    pub units: Decimal,
    /// Terminal date.
    pub as_of: Date,
    /// Close on or before the terminal date.
    pub terminal_price: Option<Decimal>,
    /// `units * terminal_price`.
    pub terminal_value: Decimal,
    /// Warnings raised while simulating.
    pub warnings: Vec<Warning>,
}

impl ShadowPortfolio {
    /// Simulated trades in date order.
    #[must_use]
    pub fn trades(&self) -> &[ShadowTrade] {
        &self.trades
    }

    /// Units held at the end of `date`.
    #[must_use]
    pub fn units_at(&self, date: Date) -> Decimal {
        self.trades
            .iter()
            .filter(|t| t.date <= date)
            .map(|t| t.units)
            .sum()
    }

    /// Value of the shadow holding on `date`, zero before any close exists.
    #[must_use]
    pub fn value_at(&self, date: Date) -> Decimal {
        self.prices
            .price_on_or_before(date)
            .map_or(Decimal::ZERO, |price| self.units_at(date) * price)
    }

    /// Net money mirrored into the benchmark.
    #[must_use]
    pub fn net_invested(&self) -> Decimal {
        net_invested(&self.included_flows)
    }

    /// Terminal value minus net money mirrored.
    #[must_use]
    pub fn profit_loss(&self) -> Decimal {
        self.terminal_value - self.net_invested()
    }

    /// The mirrored flows closed by the shadow terminal value.
    #[must_use]
    pub fn flows_with_terminal(&self) -> Vec<CashFlow> {
        with_terminal(self.included_flows.clone(), self.as_of, self.terminal_value)
    }

    /// Money-weighted return of the shadow portfolio.
    #[must_use]
    pub fn money_weighted_return(&self, settings: &SolverSettings) -> ReturnOutcome {
        money_weighted_return(&self.flows_with_terminal(), settings)
    }
}

/// Mirrors `flows` into the benchmark up to `as_of`.
///
/// Terminal markers are skipped. A flow dated before the first benchmark
/// close is excluded with a [`WarningKind::PriceGap`] warning; a redemption
/// larger than the units held is capped with a
/// [`WarningKind::ShadowRedemption`] warning. A purchase whose units would
/// not fit a `Decimal` is excluded as a [`WarningKind::MalformedRecord`].
#[must_use]
pub fn simulate(flows: &[CashFlow], benchmark_prices: &PriceSeries, as_of: Date) -> ShadowPortfolio {
    let mut ordered: Vec<&CashFlow> = flows
        .iter()
        .filter(|cf| cf.kind.is_real() && !cf.amount.is_zero() && cf.date <= as_of)
        .collect();
    ordered.sort_by_key(|cf| cf.date);

    let mut trades = Vec::with_capacity(ordered.len());
    let mut included_flows = Vec::with_capacity(ordered.len());
    let mut warnings = Vec::new();
    let mut excluded_flows = 0;
    let mut units = Decimal::ZERO;
    // units are capped so that units * any close fits a Decimal
    let ceiling = benchmark_prices
        .iter()
        .map(|(_, close)| close)
        .max()
        .unwrap_or(Decimal::ONE);

    for cf in ordered {
        let Some(price) = benchmark_prices.price_on_or_before(cf.date) else {
            excluded_flows += 1;
            warnings.push(Warning::new(
                WarningKind::PriceGap,
                format!(
                    "benchmark has no close on or before {}; flow of {} excluded",
                    cf.date, cf.amount
                ),
            ));
            continue;
        };

        if cf.is_outflow() {
            let Some((bought, held)) = cf
                .amount
                .abs()
                .checked_div(price)
                .and_then(|b| units.checked_add(b).map(|held| (b, held)))
                .filter(|(_, held)| held.checked_mul(ceiling).is_some())
            else {
                excluded_flows += 1;
                warnings.push(Warning::new(
                    WarningKind::MalformedRecord,
                    format!(
                        "benchmark purchase of {} at {} on {} out of range; flow excluded",
                        cf.amount.abs(),
                        price,
                        cf.date
                    ),
                ));
                continue;
            };
            units = held;
            trades.push(ShadowTrade {
                date: cf.date,
                price,
                units: bought,
                amount: cf.amount,
            });
            included_flows.push(cf.clone());
            continue;
        }

        let wanted = cf.amount.checked_div(price).unwrap_or(Decimal::MAX);
        let redeemed = wanted.min(units);
        if redeemed < wanted {
            warnings.push(Warning::new(
                WarningKind::ShadowRedemption,
                format!(
                    "benchmark redemption on {} capped at {} units (wanted {})",
                    cf.date,
                    redeemed.round_dp(6),
                    wanted.round_dp(6)
                ),
            ));
        }
        if redeemed.is_zero() {
            continue;
        }

        let amount = if redeemed == wanted {
            cf.amount
        } else {
            redeemed * price
        };
        units -= redeemed;
        trades.push(ShadowTrade {
            date: cf.date,
            price,
            units: -redeemed,
            amount,
        });
        included_flows.push(CashFlow {
            amount,
            ..cf.clone()
        });
    }

    let terminal_price = benchmark_prices.price_on_or_before(as_of);
    let terminal_value = terminal_price.map_or(Decimal::ZERO, |p| units * p);

    debug!(
        trades = trades.len(),
        excluded_flows,
        %units,
        %terminal_value,
        "benchmark simulation complete"
    );

    ShadowPortfolio {
        prices: benchmark_prices.clone(),
        trades,
        included_flows,
        excluded_flows,
        units,
        as_of,
        terminal_price,
        terminal_value,
        warnings,
    }
}
