//! Ledger transactions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{CashFlowKind, Date};
use crate::error::FolioError;

/// Type of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Purchase of units.
    Buy,
    /// Sale of units.
    Sell,
    /// Cash dividend received.
    Dividend,
    /// Fee charged against the position.
    Fee,
}

impl TransactionType {
    /// Returns true for entries that move units (BUY and SELL).
    #[must_use]
    pub fn is_trade(self) -> bool {
        matches!(self, TransactionType::Buy | TransactionType::Sell)
    }

    /// Sign of the cash effect from the investor's point of view.
    #[must_use]
    pub fn cash_sign(self) -> Decimal {
        match self {
            TransactionType::Buy | TransactionType::Fee => Decimal::NEGATIVE_ONE,
            TransactionType::Sell | TransactionType::Dividend => Decimal::ONE,
        }
    }

    /// Sign of the quantity effect on the position.
    #[must_use]
    pub fn quantity_sign(self) -> Decimal {
        match self {
            TransactionType::Buy => Decimal::ONE,
            TransactionType::Sell => Decimal::NEGATIVE_ONE,
            TransactionType::Dividend | TransactionType::Fee => Decimal::ZERO,
        }
    }

    /// The cash flow kind this entry produces.
    #[must_use]
    pub fn cash_flow_kind(self) -> CashFlowKind {
        match self {
            TransactionType::Buy => CashFlowKind::Contribution,
            TransactionType::Sell => CashFlowKind::Withdrawal,
            TransactionType::Dividend => CashFlowKind::Dividend,
            TransactionType::Fee => CashFlowKind::Fee,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
            TransactionType::Dividend => "DIVIDEND",
            TransactionType::Fee => "FEE",
        };
        write!(f, "{name}")
    }
}

impl FromStr for TransactionType {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TransactionType::Buy),
            "SELL" => Ok(TransactionType::Sell),
            "DIVIDEND" | "DIV" => Ok(TransactionType::Dividend),
            "FEE" => Ok(TransactionType::Fee),
            _ => Err(FolioError::UnknownTransactionType {
                label: s.to_string(),
            }),
        }
    }
}

/// A validated ledger entry.
///
/// `quantity` and `net_cash` carry the sign implied by the type: a BUY has a
/// positive quantity and a negative net cash effect, a SELL the reverse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Position of the entry in the original ledger; breaks date ties.
    pub sequence: usize,
    /// Trade or payment date.
    pub date: Date,
    /// Instrument symbol (uppercase).
    pub symbol: String,
    /// Entry type.
    pub kind: TransactionType,
    /// Signed unit change.
    pub quantity: Decimal,
    /// Execution price per unit (zero for dividends and fees).
    pub price: Decimal,
    /// Signed cash effect for the investor.
    pub net_cash: Decimal,
}

impl Transaction {
    /// Builds a transaction, normalising the signs of quantity and cash.
    ///
    /// `quantity` and `net_cash` may be given signed or unsigned; only their
    /// magnitude is used.
    #[must_use]
    pub fn new(
        sequence: usize,
        date: Date,
        symbol: &str,
        kind: TransactionType,
        quantity: Decimal,
        price: Decimal,
        net_cash: Decimal,
    ) -> Self {
        Self {
            sequence,
            date,
            symbol: symbol.trim().to_uppercase(),
            kind,
            quantity: quantity.abs() * kind.quantity_sign(),
            price,
            net_cash: net_cash.abs() * kind.cash_sign(),
        }
    }

    /// Returns true if the entry moves units.
    #[must_use]
    pub fn is_trade(&self) -> bool {
        self.kind.is_trade()
    }
}
