//! FIFO lot tracking for realized profit and loss.
//!
//! Every BUY opens a lot whose cost is the absolute net cash of the trade,
//! so commissions are capitalised into the basis. A SELL consumes the oldest
//! lots first and realizes `proceeds - consumed cost`. When a SELL exceeds the
//! open quantity only the matched fraction of its proceeds is realized.

use std::collections::{BTreeMap, VecDeque};

use folio_core::types::{Date, Transaction, TransactionType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::{Warning, WarningKind};

/// An open purchase lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    /// Purchase date.
    pub date: Date,
    /// Ledger sequence of the opening BUY.
    pub sequence: usize,
    /// Units still open.
    pub quantity: Decimal,
    /// Cost of the units still open.
    pub cost: Decimal,
}

/// Gain or loss realized by one SELL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizedTrade {
    /// Sale date.
    pub date: Date,
    /// Units matched against open lots.
    pub quantity: Decimal,
    /// Proceeds attributed to the matched units.
    pub proceeds: Decimal,
    /// FIFO cost of the matched units.
    pub cost_basis: Decimal,
}

impl RealizedTrade {
    /// Realized gain (negative for a loss).
    #[must_use]
    pub fn gain(&self) -> Decimal {
        self.proceeds - self.cost_basis
    }
}

/// FIFO lot book for one symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LotBook {
    symbol: String,
    lots: VecDeque<Lot>,
    realized: Vec<RealizedTrade>,
}

impl LotBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// The symbol this book tracks.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Applies one ledger entry. Dividends and fees leave the lots untouched.
    ///
    /// Returns an [`WarningKind::Oversell`] warning when a SELL exceeds the
    /// open quantity.
    pub fn apply(&mut self, tx: &Transaction) -> Option<Warning> {
        match tx.kind {
            TransactionType::Buy => {
                self.buy(tx);
                None
            }
            TransactionType::Sell => self.sell(tx),
            TransactionType::Dividend | TransactionType::Fee => None,
        }
    }

    fn buy(&mut self, tx: &Transaction) {
        self.lots.push_back(Lot {
            date: tx.date,
            sequence: tx.sequence,
            quantity: tx.quantity.abs(),
            cost: tx.net_cash.abs(),
        });
    }

    fn sell(&mut self, tx: &Transaction) -> Option<Warning> {
        let sold = tx.quantity.abs();
        let proceeds = tx.net_cash.abs();
        let mut remaining = sold;
        let mut cost_basis = Decimal::ZERO;

        while remaining > Decimal::ZERO {
            let Some(lot) = self.lots.front_mut() else {
                break;
            };
            let take = remaining.min(lot.quantity);
            let cost = if take == lot.quantity {
                lot.cost
            } else {
                lot.cost * take / lot.quantity
            };

            lot.quantity -= take;
            lot.cost -= cost;
            cost_basis += cost;
            remaining -= take;

            if lot.quantity.is_zero() {
                self.lots.pop_front();
            }
        }

        let matched = sold - remaining;
        let realized_proceeds = if remaining.is_zero() {
            proceeds
        } else {
            proceeds * matched / sold
        };

        debug!(
            symbol = %self.symbol,
            date = %tx.date,
            %matched,
            %cost_basis,
            "FIFO sell"
        );

        self.realized.push(RealizedTrade {
            date: tx.date,
            quantity: matched,
            proceeds: realized_proceeds,
            cost_basis,
        });

        if remaining.is_zero() {
            None
        } else {
            Some(Warning::new(
                WarningKind::Oversell,
                format!(
                    "{} on {}: sold {} with only {} open; {} unmatched units ignored",
                    self.symbol, tx.date, sold, matched, remaining
                ),
            ))
        }
    }

    /// Open lots, oldest first.
    #[must_use]
    pub fn lots(&self) -> &VecDeque<Lot> {
        &self.lots
    }

    /// Realized trades in ledger order.
    #[must_use]
    pub fn realized(&self) -> &[RealizedTrade] {
        &self.realized
    }

    /// Units still open.
    #[must_use]
    pub fn open_quantity(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.quantity).sum()
    }

    /// Cost of the units still open.
    #[must_use]
    pub fn open_cost(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.cost).sum()
    }

    /// Total realized gain.
    #[must_use]
    pub fn realized_pl(&self) -> Decimal {
        self.realized.iter().map(RealizedTrade::gain).sum()
    }
}

/// Replays the ledger into one lot book per symbol.
///
/// The ledger must already be in date order.
pub fn replay_lots(ledger: &[Transaction]) -> (BTreeMap<String, LotBook>, Vec<Warning>) {
    let mut books: BTreeMap<String, LotBook> = BTreeMap::new();
    let mut warnings = Vec::new();

    for tx in ledger {
        let book = books
            .entry(tx.symbol.clone())
            .or_insert_with(|| LotBook::new(tx.symbol.clone()));
        if let Some(warning) = book.apply(tx) {
            warnings.push(warning);
        }
    }

    (books, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(month: u32, day: u32) -> Date {
        Date::from_ymd(2024, month, day).unwrap()
    }

    fn buy(seq: usize, date: Date, qty: Decimal, price: Decimal, net: Decimal) -> Transaction {
        Transaction::new(seq, date, "AAPL", TransactionType::Buy, qty, price, net)
    }

    fn sell(seq: usize, date: Date, qty: Decimal, price: Decimal, net: Decimal) -> Transaction {
        Transaction::new(seq, date, "AAPL", TransactionType::Sell, qty, price, net)
    }

    #[test]
    fn test_fifo_consumes_oldest_first() {
        let ledger = vec![
            buy(0, d(1, 2), dec!(10), dec!(100), dec!(1000)),
            buy(1, d(2, 1), dec!(10), dec!(150), dec!(1500)),
            sell(2, d(3, 1), dec!(15), dec!(200), dec!(3000)),
        ];
        let (books, warnings) = replay_lots(&ledger);
        let book = &books["AAPL"];

        // 10 @ 100 + 5 @ 150 = 1750 cost
        assert_eq!(book.realized()[0].cost_basis, dec!(1750));
        assert_eq!(book.realized_pl(), dec!(1250));
        assert_eq!(book.open_quantity(), dec!(5));
        assert_eq!(book.open_cost(), dec!(750));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_commission_capitalised() {
        let ledger = vec![
            buy(0, d(1, 2), dec!(10), dec!(100), dec!(1005)),
            sell(1, d(3, 1), dec!(10), dec!(110), dec!(1095)),
        ];
        let (books, _) = replay_lots(&ledger);
        assert_eq!(books["AAPL"].realized_pl(), dec!(90));
        assert!(books["AAPL"].lots().is_empty());
    }

    #[test]
    fn test_oversell_realizes_matched_fraction() {
        let ledger = vec![
            buy(0, d(1, 2), dec!(4), dec!(100), dec!(400)),
            sell(1, d(3, 1), dec!(5), dec!(120), dec!(600)),
        ];
        let (books, warnings) = replay_lots(&ledger);
        let trade = &books["AAPL"].realized()[0];

        assert_eq!(trade.quantity, dec!(4));
        assert_eq!(trade.proceeds, dec!(480));
        assert_eq!(trade.gain(), dec!(80));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::Oversell);
    }

    #[test]
    fn test_sell_without_lots() {
        let ledger = vec![sell(0, d(3, 1), dec!(5), dec!(120), dec!(600))];
        let (books, warnings) = replay_lots(&ledger);

        assert_eq!(books["AAPL"].realized_pl(), Decimal::ZERO);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_dividends_do_not_touch_lots() {
        let ledger = vec![
            buy(0, d(1, 2), dec!(1), dec!(100), dec!(100)),
            Transaction::new(1, d(2, 1), "AAPL", TransactionType::Dividend, dec!(0), dec!(0), dec!(3)),
        ];
        let (books, _) = replay_lots(&ledger);
        assert_eq!(books["AAPL"].open_quantity(), dec!(1));
        assert!(books["AAPL"].realized().is_empty());
    }
}
