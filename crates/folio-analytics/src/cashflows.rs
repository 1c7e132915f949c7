//! Cash-flow reconstruction from the transaction ledger.
//!
//! Amounts are seen from the investor's pocket: BUY and FEE entries are
//! negative (money in), SELL and DIVIDEND entries positive (money out).

use std::collections::BTreeMap;

use folio_core::types::{CashFlow, Date, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Net cash flow for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCashFlow {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Signed sum of the month's flows.
    pub amount: Decimal,
}

/// Converts the ledger into an aggregate cash-flow series.
///
/// The result is ordered by date; same-day flows keep ledger order.
#[must_use]
pub fn reconstruct(transactions: &[Transaction]) -> Vec<CashFlow> {
    let mut flows: Vec<CashFlow> = transactions.iter().map(to_flow).collect();
    flows.sort_by_key(|cf| cf.date);
    flows
}

/// Converts the ledger entries of one symbol into a cash-flow series.
#[must_use]
pub fn reconstruct_for(transactions: &[Transaction], symbol: &str) -> Vec<CashFlow> {
    let mut flows: Vec<CashFlow> = transactions
        .iter()
        .filter(|t| t.symbol.eq_ignore_ascii_case(symbol))
        .map(to_flow)
        .collect();
    flows.sort_by_key(|cf| cf.date);
    flows
}

/// Appends the terminal valuation marker dated `as_of`.
///
/// A zero market value still produces a marker, so a fully sold or
/// dividend-only position closes its series cleanly.
#[must_use]
pub fn with_terminal(mut flows: Vec<CashFlow>, as_of: Date, market_value: Decimal) -> Vec<CashFlow> {
    flows.push(CashFlow::terminal(as_of, market_value));
    flows
}

/// Sums the real flows per calendar month, oldest first.
#[must_use]
pub fn monthly_summary(flows: &[CashFlow]) -> Vec<MonthlyCashFlow> {
    let mut months: BTreeMap<String, Decimal> = BTreeMap::new();
    for cf in flows.iter().filter(|cf| cf.kind.is_real()) {
        *months.entry(cf.date.month_key()).or_default() += cf.amount;
    }
    months
        .into_iter()
        .map(|(month, amount)| MonthlyCashFlow { month, amount })
        .collect()
}

/// Net money put in: the negated sum of the real flows.
#[must_use]
pub fn net_invested(flows: &[CashFlow]) -> Decimal {
    -flows
        .iter()
        .filter(|cf| cf.kind.is_real())
        .map(|cf| cf.amount)
        .sum::<Decimal>()
}

/// Net money put in up to and including `date`.
#[must_use]
pub fn net_invested_until(flows: &[CashFlow], date: Date) -> Decimal {
    -flows
        .iter()
        .filter(|cf| cf.kind.is_real() && cf.date <= date)
        .map(|cf| cf.amount)
        .sum::<Decimal>()
}

fn to_flow(tx: &Transaction) -> CashFlow {
    CashFlow::new(tx.date, tx.net_cash, tx.kind.cash_flow_kind()).with_symbol(tx.symbol.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::types::{CashFlowKind, TransactionType};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            Transaction::new(0, d(2024, 1, 10), "AAPL", TransactionType::Buy, dec!(10), dec!(100), dec!(1000)),
            Transaction::new(1, d(2024, 1, 20), "MSFT", TransactionType::Buy, dec!(2), dec!(300), dec!(601)),
            Transaction::new(2, d(2024, 2, 15), "AAPL", TransactionType::Dividend, dec!(0), dec!(0), dec!(4.5)),
            Transaction::new(3, d(2024, 3, 1), "AAPL", TransactionType::Sell, dec!(5), dec!(120), dec!(600)),
            Transaction::new(4, d(2024, 3, 2), "MSFT", TransactionType::Fee, dec!(0), dec!(0), dec!(1)),
        ]
    }

    #[test]
    fn test_signs_follow_type() {
        let flows = reconstruct(&ledger());
        let amounts: Vec<Decimal> = flows.iter().map(|cf| cf.amount).collect();

        assert_eq!(amounts, vec![dec!(-1000), dec!(-601), dec!(4.5), dec!(600), dec!(-1)]);
        assert_eq!(flows[0].kind, CashFlowKind::Contribution);
        assert_eq!(flows[2].kind, CashFlowKind::Dividend);
        assert_eq!(flows[3].kind, CashFlowKind::Withdrawal);
        assert_eq!(flows[4].kind, CashFlowKind::Fee);
        assert_eq!(flows[1].symbol.as_deref(), Some("MSFT"));
    }

    #[test]
    fn test_per_symbol_series() {
        let flows = reconstruct_for(&ledger(), "aapl");
        assert_eq!(flows.len(), 3);
        assert!(flows.iter().all(|cf| cf.symbol.as_deref() == Some("AAPL")));
    }

    #[test]
    fn test_dividend_only_series_with_zero_terminal() {
        let ledger = vec![Transaction::new(
            0,
            d(2024, 5, 1),
            "T",
            TransactionType::Dividend,
            dec!(0),
            dec!(0),
            dec!(12),
        )];
        let flows = with_terminal(reconstruct_for(&ledger, "T"), d(2024, 6, 1), Decimal::ZERO);

        assert_eq!(flows.len(), 2);
        assert!(flows[1].is_terminal());
        assert_eq!(flows[1].amount, Decimal::ZERO);
    }

    #[test]
    fn test_monthly_summary_skips_terminal() {
        let flows = with_terminal(reconstruct(&ledger()), d(2024, 3, 31), dec!(5000));
        let months = monthly_summary(&flows);

        assert_eq!(
            months,
            vec![
                MonthlyCashFlow { month: "2024-01".into(), amount: dec!(-1601) },
                MonthlyCashFlow { month: "2024-02".into(), amount: dec!(4.5) },
                MonthlyCashFlow { month: "2024-03".into(), amount: dec!(599) },
            ]
        );
    }

    #[test]
    fn test_net_invested() {
        let flows = with_terminal(reconstruct(&ledger()), d(2024, 3, 31), dec!(5000));
        assert_eq!(net_invested(&flows), dec!(997.5));
        assert_eq!(net_invested_until(&flows, d(2024, 1, 31)), dec!(1601));
    }
}
