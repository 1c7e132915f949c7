//! Periodic history series.
//!
//! Samples portfolio value, cumulative net invested and the benchmark
//! shadow value every `history_interval_days` from the first cash flow to
//! the valuation date. The valuation date is always the last point.

use std::collections::BTreeMap;

use folio_core::types::{CashFlow, Date, Holding, PriceSeries, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::benchmark::ShadowPortfolio;
use crate::cashflows::net_invested_until;
use crate::diagnostics::{Warning, WarningKind};
use crate::valuation::value_at;

/// One sample of the history series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    /// Sample date.
    pub date: Date,
    /// Ledger-replayed market value.
    pub portfolio_value: Decimal,
    /// Money put in so far.
    pub net_invested: Decimal,
    /// Value of the benchmark shadow holding.
    pub benchmark_value: Decimal,
}

/// Sample dates from `start` to `end` every `step` days, `end` included.
#[must_use]
pub fn sample_dates(start: Date, end: Date, step: i64) -> Vec<Date> {
    if start > end {
        return Vec::new();
    }
    let step = step.max(1);
    let mut dates = Vec::new();
    let mut current = start;
    while current < end {
        dates.push(current);
        current = current.add_days(step);
    }
    dates.push(end);
    dates
}

/// Builds the history series.
///
/// Returns the points and one [`WarningKind::PriceGap`] warning per symbol
/// that was held on some sample date without a close.
#[must_use]
pub fn history(
    holdings: &[Holding],
    ledger: &[Transaction],
    prices: &BTreeMap<String, PriceSeries>,
    flows: &[CashFlow],
    shadow: &ShadowPortfolio,
    end: Date,
    step: i64,
) -> (Vec<HistoryPoint>, Vec<Warning>) {
    let Some(start) = flows
        .iter()
        .filter(|cf| cf.kind.is_real())
        .map(|cf| cf.date)
        .min()
    else {
        return (Vec::new(), Vec::new());
    };

    let mut gaps: BTreeMap<String, Date> = BTreeMap::new();
    let points = sample_dates(start, end, step)
        .into_iter()
        .map(|date| {
            let valuation = value_at(holdings, ledger, prices, date);
            for symbol in valuation.price_gaps {
                gaps.entry(symbol).or_insert(date);
            }
            HistoryPoint {
                date,
                portfolio_value: valuation.total,
                net_invested: net_invested_until(flows, date),
                benchmark_value: shadow.value_at(date),
            }
        })
        .collect();

    let warnings = gaps
        .into_iter()
        .map(|(symbol, first_gap)| {
            Warning::new(
                WarningKind::PriceGap,
                format!("{symbol} has no close on or before {first_gap}; valued at zero in history"),
            )
        })
        .collect();

    (points, warnings)
}
