//! Cash flow type for return calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Date;

/// Origin of a cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowKind {
    /// Money paid into a position (a buy).
    Contribution,
    /// Money taken out of a position (a sell).
    Withdrawal,
    /// Dividend received.
    Dividend,
    /// Fee paid.
    Fee,
    /// Synthetic valuation marker closing a series; not a real transaction.
    Terminal,
}

impl CashFlowKind {
    /// Returns true for flows that correspond to a ledger transaction.
    #[must_use]
    pub fn is_real(self) -> bool {
        !matches!(self, CashFlowKind::Terminal)
    }
}

impl fmt::Display for CashFlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CashFlowKind::Contribution => "Contribution",
            CashFlowKind::Withdrawal => "Withdrawal",
            CashFlowKind::Dividend => "Dividend",
            CashFlowKind::Fee => "Fee",
            CashFlowKind::Terminal => "Terminal",
        };
        write!(f, "{name}")
    }
}

/// A dated, signed cash flow seen from the investor's pocket.
///
/// Negative amounts are contributions into the portfolio, positive amounts
/// are withdrawals, income or the terminal market value.
///
/// # Example
///
/// ```rust
/// use folio_core::types::{CashFlow, CashFlowKind, Date};
/// use rust_decimal_macros::dec;
///
/// let cf = CashFlow::new(Date::from_ymd(2025, 6, 15).unwrap(), dec!(-250), CashFlowKind::Contribution);
/// assert!(cf.is_outflow());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Flow date.
    pub date: Date,
    /// Signed amount.
    pub amount: Decimal,
    /// What produced the flow.
    pub kind: CashFlowKind,
    /// Symbol the flow belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl CashFlow {
    /// Creates a cash flow not attached to a symbol.
    #[must_use]
    pub fn new(date: Date, amount: Decimal, kind: CashFlowKind) -> Self {
        Self {
            date,
            amount,
            kind,
            symbol: None,
        }
    }

    /// Creates the synthetic terminal valuation flow.
    #[must_use]
    pub fn terminal(date: Date, market_value: Decimal) -> Self {
        Self::new(date, market_value, CashFlowKind::Terminal)
    }

    /// Attaches a symbol to the flow.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Returns true if money left the investor's pocket.
    #[must_use]
    pub fn is_outflow(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns true if this is the synthetic terminal marker.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.kind == CashFlowKind::Terminal
    }
}

impl fmt::Display for CashFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.kind, self.amount)
    }
}
