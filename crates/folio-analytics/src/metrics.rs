//! Metrics assembly.
//!
//! [`compute_metrics`] is the single entry point: it validates the raw
//! input, runs every analytic over the validated values and packages the
//! results with the collected warnings.

use std::collections::{BTreeMap, BTreeSet};

use folio_core::types::{Date, Holding, Transaction, TransactionType};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::benchmark::simulate;
use crate::bucketing::{allocate, Allocation};
use crate::cashflows::{
    monthly_summary, net_invested, reconstruct, reconstruct_for, with_terminal, MonthlyCashFlow,
};
use crate::config::AnalyticsConfig;
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::error::AnalyticsResult;
use crate::history::{history, HistoryPoint};
use crate::input::{PortfolioInput, ValidatedInput};
use crate::returns::{money_weighted_return, ReturnOutcome};
use crate::valuation::{percent_of, reconcile, replay_lots, totals, LotBook, ProfitLoss};

/// Per-holding breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingMetrics {
    /// Instrument symbol.
    pub symbol: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Units held.
    pub quantity: Decimal,
    /// Average cost per unit.
    pub average_cost: Decimal,
    /// Latest price per unit.
    pub current_price: Decimal,
    /// `quantity * current_price`.
    pub market_value: Decimal,
    /// `quantity * average_cost`.
    pub cost_basis: Decimal,
    /// Share of the portfolio value, 0-100.
    pub weight: Decimal,
    /// Unrealized P/L against the cost basis.
    #[serde(rename = "unrealizedPL")]
    pub unrealized_pl: ProfitLoss,
    /// FIFO realized P/L.
    #[serde(rename = "realizedPL")]
    pub realized_pl: Decimal,
    /// Net money put into this symbol.
    pub net_invested: Decimal,
    /// Money-weighted return of this symbol's flows.
    pub money_weighted_return: ReturnOutcome,
    /// Date of the first BUY.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_purchase: Option<Date>,
    /// Time since the first BUY, as `N years M months D days`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_held: Option<String>,
}

/// Summary of the benchmark shadow portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSummary {
    /// Benchmark symbol.
    pub symbol: String,
    /// Shadow units held on the valuation date.
    pub units: Decimal,
    /// Net money mirrored into the benchmark.
    pub net_invested: Decimal,
    /// Shadow value on the valuation date.
    pub terminal_value: Decimal,
    /// `terminal_value - net_invested`.
    pub profit_loss: Decimal,
    /// Flows dropped for lack of a benchmark close.
    pub excluded_flows: usize,
}

/// Everything computed for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Valuation date.
    pub as_of: Date,
    /// Market value of the holdings.
    pub total_value: Decimal,
    /// Cost basis of the holdings.
    pub total_cost_basis: Decimal,
    /// Unrealized P/L of the holdings.
    #[serde(rename = "totalPL")]
    pub total_pl: ProfitLoss,
    /// FIFO realized P/L over the ledger.
    #[serde(rename = "realizedPL")]
    pub realized_pl: Decimal,
    /// Portfolio money-weighted return.
    pub money_weighted_return: ReturnOutcome,
    /// Benchmark shadow money-weighted return.
    pub benchmark_return: ReturnOutcome,
    /// Sector and type breakdowns.
    pub allocation: Allocation,
    /// Net cash flow per month.
    pub monthly_cash_flows: Vec<MonthlyCashFlow>,
    /// Per-holding breakdown.
    pub holdings: Vec<HoldingMetrics>,
    /// Benchmark shadow summary.
    pub benchmark: BenchmarkSummary,
    /// Periodic value series.
    pub history: Vec<HistoryPoint>,
    /// Warnings, flattened to text.
    pub warnings: Vec<String>,
}

/// Computes the metrics snapshot for a raw input document.
///
/// Fails only when the document has no holdings list; bad records are
/// skipped and reported in [`MetricsSnapshot::warnings`].
pub fn compute_metrics(
    input: &PortfolioInput,
    config: &AnalyticsConfig,
) -> AnalyticsResult<MetricsSnapshot> {
    let mut diagnostics = Diagnostics::new();
    let validated = input.validate(&mut diagnostics)?;
    Ok(assemble(&validated, config, diagnostics))
}

/// Computes the metrics snapshot for already validated input.
///
/// `diagnostics` carries warnings raised before this call.
#[must_use]
pub fn assemble(
    input: &ValidatedInput,
    config: &AnalyticsConfig,
    mut diagnostics: Diagnostics,
) -> MetricsSnapshot {
    let as_of = config.as_of.unwrap_or_else(Date::today);
    let benchmark_symbol = input
        .benchmark_symbol
        .clone()
        .unwrap_or_else(|| config.benchmark_symbol.clone());

    if config.reconcile_holdings {
        diagnostics.extend(reconcile(&input.holdings, &input.transactions));
    }

    let ledger: Vec<Transaction> = input
        .transactions
        .iter()
        .filter(|t| t.date <= as_of)
        .cloned()
        .collect();

    let portfolio = totals(&input.holdings);
    let (books, oversells) = replay_lots(&ledger);
    diagnostics.extend(oversells);
    let realized_pl: Decimal = books.values().map(LotBook::realized_pl).sum();

    let flows = reconstruct(&ledger);
    let mwr = money_weighted_return(
        &with_terminal(flows.clone(), as_of, portfolio.market_value),
        &config.solver,
    );
    if !flows.is_empty() {
        if let ReturnOutcome::Indeterminate(reason) = mwr {
            diagnostics.push(
                WarningKind::IndeterminateReturn,
                format!("portfolio money-weighted return: {reason}"),
            );
        }
    }

    let shadow = simulate(&flows, &input.benchmark_prices, as_of);
    diagnostics.extend(shadow.warnings.iter().cloned());
    let benchmark_return = shadow.money_weighted_return(&config.solver);
    if !shadow.included_flows.is_empty() {
        if let ReturnOutcome::Indeterminate(reason) = benchmark_return {
            diagnostics.push(
                WarningKind::IndeterminateReturn,
                format!("{benchmark_symbol} benchmark money-weighted return: {reason}"),
            );
        }
    }

    let (history_points, gaps) = history(
        &input.holdings,
        &ledger,
        &input.prices,
        &flows,
        &shadow,
        as_of,
        config.history_step(),
    );
    diagnostics.extend(gaps);

    let holdings = holding_breakdown(input, &ledger, &books, portfolio.market_value, as_of, config);

    info!(
        %as_of,
        holdings = holdings.len(),
        flows = flows.len(),
        warnings = diagnostics.len(),
        "metrics computed"
    );

    MetricsSnapshot {
        as_of,
        total_value: portfolio.market_value,
        total_cost_basis: portfolio.cost_basis,
        total_pl: portfolio.unrealized,
        realized_pl,
        money_weighted_return: mwr,
        benchmark_return,
        allocation: allocate(&input.holdings),
        monthly_cash_flows: monthly_summary(&flows),
        holdings,
        benchmark: BenchmarkSummary {
            symbol: benchmark_symbol,
            units: shadow.units,
            net_invested: shadow.net_invested(),
            terminal_value: shadow.terminal_value,
            profit_loss: shadow.profit_loss(),
            excluded_flows: shadow.excluded_flows,
        },
        history: history_points,
        warnings: diagnostics.messages(),
    }
}

/// Breakdown for every held symbol, then every closed symbol in the ledger.
fn holding_breakdown(
    input: &ValidatedInput,
    ledger: &[Transaction],
    books: &BTreeMap<String, LotBook>,
    total_value: Decimal,
    as_of: Date,
    config: &AnalyticsConfig,
) -> Vec<HoldingMetrics> {
    let held: BTreeSet<&str> = input.holdings.iter().map(|h| h.symbol.as_str()).collect();
    let closed: BTreeSet<&str> = ledger
        .iter()
        .map(|t| t.symbol.as_str())
        .filter(|s| !held.contains(s))
        .collect();

    let closed_holdings: Vec<Holding> = closed
        .into_iter()
        .map(|symbol| {
            let last_close = input
                .prices
                .get(symbol)
                .and_then(|series| series.price_on_or_before(as_of))
                .unwrap_or(Decimal::ZERO);
            Holding::new(symbol, Decimal::ZERO, Decimal::ZERO, last_close)
        })
        .collect();

    input
        .holdings
        .iter()
        .chain(closed_holdings.iter())
        .map(|holding| {
            let flows = reconstruct_for(ledger, &holding.symbol);
            let first_purchase = ledger
                .iter()
                .find(|t| t.symbol == holding.symbol && t.kind == TransactionType::Buy)
                .map(|t| t.date);
            let market_value = holding.market_value();
            let mwr = money_weighted_return(
                &with_terminal(flows.clone(), as_of, market_value),
                &config.solver,
            );
            debug!(symbol = %holding.symbol, %mwr, "holding return");

            HoldingMetrics {
                symbol: holding.symbol.clone(),
                name: holding.name.clone(),
                quantity: holding.quantity,
                average_cost: holding.average_cost,
                current_price: holding.current_price,
                market_value,
                cost_basis: holding.cost_basis(),
                weight: percent_of(market_value, total_value),
                unrealized_pl: ProfitLoss::new(holding.unrealized_pl(), holding.cost_basis()),
                realized_pl: books
                    .get(&holding.symbol)
                    .map_or(Decimal::ZERO, LotBook::realized_pl),
                net_invested: net_invested(&flows),
                money_weighted_return: mwr,
                first_purchase,
                time_held: first_purchase.map(|first| as_of.elapsed_since(first).to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn test_empty_input_zero_snapshot() {
        let input: PortfolioInput = serde_json::from_value(json!({ "holdings": [] })).unwrap();
        let config = AnalyticsConfig::new().with_as_of(Date::from_ymd(2024, 6, 30).unwrap());
        let snapshot = compute_metrics(&input, &config).unwrap();

        assert_eq!(snapshot.total_value, Decimal::ZERO);
        assert_eq!(snapshot.total_pl, ProfitLoss::default());
        assert!(!snapshot.money_weighted_return.is_determinate());
        assert!(!snapshot.benchmark_return.is_determinate());
        assert!(snapshot.holdings.is_empty());
        assert!(snapshot.history.is_empty());
        assert!(snapshot.warnings.is_empty());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["moneyWeightedReturn"], "N/A");
        assert_eq!(json["benchmarkReturn"], "N/A");
        assert_eq!(json["benchmark"]["symbol"], "^GSPC");
    }

    #[test]
    fn test_closed_dividend_only_symbol_listed() {
        let input: PortfolioInput = serde_json::from_value(json!({
            "holdings": [],
            "transactions": [
                { "date": "2024-03-01", "symbol": "T", "type": "DIVIDEND", "amount": 12 }
            ]
        }))
        .unwrap();
        let config = AnalyticsConfig::new().with_as_of(Date::from_ymd(2024, 6, 30).unwrap());
        let snapshot = compute_metrics(&input, &config).unwrap();

        assert_eq!(snapshot.holdings.len(), 1);
        let t = &snapshot.holdings[0];
        assert_eq!(t.symbol, "T");
        assert_eq!(t.market_value, Decimal::ZERO);
        assert_eq!(t.net_invested, Decimal::from(-12));
        assert!(t.first_purchase.is_none());
        assert!(!t.money_weighted_return.is_determinate());
    }

    #[test]
    fn test_valuation_date_defaults_to_today() {
        let input: PortfolioInput = serde_json::from_value(json!({
            "holdings": [
                { "symbol": "VTI", "quantity": 20, "averageCost": 100, "currentPrice": 120 }
            ],
            "transactions": [
                { "date": "2024-01-01", "symbol": "VTI", "type": "BUY", "quantity": 10, "price": 100 },
                { "date": "2025-01-01", "symbol": "VTI", "type": "BUY", "quantity": 10, "price": 100 }
            ],
            "prices": { "VTI": { "2024-01-01": 100, "2025-01-01": 100 } }
        }))
        .unwrap();
        let today = Date::today();
        let snapshot = compute_metrics(&input, &AnalyticsConfig::new()).unwrap();

        // the terminal flow is the current value, dated today
        assert!(snapshot.as_of >= today);
        assert!(snapshot.as_of.days_between(&today).abs() <= 1);

        // dated today, 20% over 2+ years annualises well below 20%
        let dated_today = compute_metrics(&input, &AnalyticsConfig::new().with_as_of(today)).unwrap();
        let rate = snapshot.money_weighted_return.rate().unwrap();
        assert_relative_eq!(rate, dated_today.money_weighted_return.rate().unwrap(), epsilon = 1e-3);
        assert!(rate < 0.20);
        assert_eq!(snapshot.history.last().unwrap().date, snapshot.as_of);
    }
}
