//! Domain types for portfolio analytics.
//!
//! - [`Date`]: Calendar date with month bucketing and elapsed-time helpers
//! - [`Holding`]: Current position reported by the broker
//! - [`Transaction`]: One ledger entry (buy, sell, dividend, fee)
//! - [`CashFlow`]: Signed dated amount derived from the ledger
//! - [`PriceSeries`]: Sparse daily closes with prior-day fallback

mod cashflow;
mod date;
mod holding;
mod price_series;
mod transaction;

pub use cashflow::{CashFlow, CashFlowKind};
pub use date::{Date, Elapsed};
pub use holding::{Classification, Holding};
pub use price_series::PriceSeries;
pub use transaction::{Transaction, TransactionType};
