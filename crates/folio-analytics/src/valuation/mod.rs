//! Valuation engine.
//!
//! - Current profit and loss from the reported holdings
//! - Point-in-time portfolio value from the replayed ledger and price history
//! - Realized profit and loss through FIFO [`lots`]
//! - Reconciliation of reported holdings against the ledger
//!
//! All currency arithmetic is `Decimal`.

mod lots;

pub use lots::{replay_lots, Lot, LotBook, RealizedTrade};

use std::collections::{BTreeMap, BTreeSet};

use folio_core::types::{Date, Holding, PriceSeries, Transaction};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Warning, WarningKind};

/// An amount with its percentage of a base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitLoss {
    /// Profit (positive) or loss (negative).
    pub amount: Decimal,
    /// `amount / base * 100`, zero when the base is zero.
    pub percent: Decimal,
}

impl ProfitLoss {
    /// Builds the P/L of `amount` against `base`.
    #[must_use]
    pub fn new(amount: Decimal, base: Decimal) -> Self {
        Self {
            amount,
            percent: percent_of(amount, base),
        }
    }
}

/// Returns `part / whole * 100`, or zero when `whole` is zero or the ratio
/// does not fit a `Decimal`.
#[must_use]
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .unwrap_or(Decimal::ZERO)
}

/// Aggregates over the reported holdings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortfolioTotals {
    /// Sum of market values.
    pub market_value: Decimal,
    /// Sum of cost bases.
    pub cost_basis: Decimal,
    /// Unrealized P/L against the cost basis.
    pub unrealized: ProfitLoss,
}

/// Sums market value, cost basis and unrealized P/L over `holdings`.
#[must_use]
pub fn totals(holdings: &[Holding]) -> PortfolioTotals {
    let market_value: Decimal = holdings.iter().map(Holding::market_value).sum();
    let cost_basis: Decimal = holdings.iter().map(Holding::cost_basis).sum();
    let unrealized: Decimal = holdings.iter().map(Holding::unrealized_pl).sum();

    PortfolioTotals {
        market_value,
        cost_basis,
        unrealized: ProfitLoss::new(unrealized, cost_basis),
    }
}

/// Value of one symbol on a valuation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionValue {
    /// Instrument symbol.
    pub symbol: String,
    /// Units held at the end of the date.
    pub quantity: Decimal,
    /// Close used, if one was found.
    pub price: Option<Decimal>,
    /// `quantity * price`, zero on a price gap.
    pub market_value: Decimal,
}

/// Portfolio value on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuation {
    /// Valuation date.
    pub date: Date,
    /// One entry per symbol with a non-zero quantity.
    pub positions: Vec<PositionValue>,
    /// Sum of position values.
    pub total: Decimal,
    /// Symbols held on `date` without a close on or before it.
    pub price_gaps: Vec<String>,
}

/// Units of `symbol` after replaying every entry dated on or before `date`.
///
/// A SELL larger than the units held closes the position; the excess is not
/// carried as a short.
#[must_use]
pub fn quantity_at(ledger: &[Transaction], symbol: &str, date: Date) -> Decimal {
    ledger
        .iter()
        .filter(|t| t.date <= date && t.symbol == symbol)
        .fold(Decimal::ZERO, |held, t| (held + t.quantity).max(Decimal::ZERO))
}

/// Values the portfolio on `date`.
///
/// Symbols are the union of held and traded ones. Quantities come from the
/// ledger, closes from `prices` with the prior-trading-day fallback.
#[must_use]
pub fn value_at(
    holdings: &[Holding],
    ledger: &[Transaction],
    prices: &BTreeMap<String, PriceSeries>,
    date: Date,
) -> Valuation {
    let symbols: BTreeSet<&str> = holdings
        .iter()
        .map(|h| h.symbol.as_str())
        .chain(ledger.iter().map(|t| t.symbol.as_str()))
        .collect();

    let mut positions = Vec::new();
    let mut price_gaps = Vec::new();
    let mut total = Decimal::ZERO;

    for symbol in symbols {
        let quantity = quantity_at(ledger, symbol, date);
        if quantity.is_zero() {
            continue;
        }

        let price = prices
            .get(symbol)
            .and_then(|series| series.price_on_or_before(date));
        let market_value = match price {
            Some(p) => quantity * p,
            None => {
                price_gaps.push(symbol.to_string());
                Decimal::ZERO
            }
        };
        total += market_value;

        positions.push(PositionValue {
            symbol: symbol.to_string(),
            quantity,
            price,
            market_value,
        });
    }

    Valuation {
        date,
        positions,
        total,
        price_gaps,
    }
}

/// Compares reported quantities with the fully replayed ledger.
///
/// History is never interpolated; a mismatch is only reported.
#[must_use]
pub fn reconcile(holdings: &[Holding], ledger: &[Transaction]) -> Vec<Warning> {
    let mut replayed: BTreeMap<&str, Decimal> = BTreeMap::new();
    for tx in ledger {
        let held = replayed.entry(tx.symbol.as_str()).or_default();
        *held = (*held + tx.quantity).max(Decimal::ZERO);
    }

    let mut warnings = Vec::new();
    for holding in holdings {
        let ledger_qty = replayed
            .remove(holding.symbol.as_str())
            .unwrap_or(Decimal::ZERO);
        if ledger_qty != holding.quantity {
            warnings.push(Warning::new(
                WarningKind::Reconciliation,
                format!(
                    "{}: holdings report {} units, ledger replays to {}",
                    holding.symbol,
                    holding.quantity.normalize(),
                    ledger_qty.normalize()
                ),
            ));
        }
    }

    for (symbol, qty) in replayed {
        if !qty.is_zero() {
            warnings.push(Warning::new(
                WarningKind::Reconciliation,
                format!(
                    "{symbol}: ledger replays to {} units but no holding is reported",
                    qty.normalize()
                ),
            ));
        }
    }

    warnings
}
