//! # Folio Core
//!
//! Core types for the Folio portfolio analytics workspace.
//!
//! This crate provides the building blocks shared by the analytics and CLI crates:
//!
//! - **Types**: `Date`, `Holding`, `Transaction`, `CashFlow`, `PriceSeries`
//! - **Day Count Conventions**: ACT/365 Fixed, the basis used for money-weighted returns
//!
//! ## Design Philosophy
//!
//! - **Type Safety**: Newtypes keep dates and prices from being mixed up
//! - **Decimal Money**: All currency amounts are `rust_decimal::Decimal`
//! - **Immutable Inputs**: Types are plain data, validated once at the ingestion boundary
//!
//! ## Example
//!
//! ```rust
//! use folio_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let mut series = PriceSeries::new();
//! series.insert(Date::from_ymd(2024, 1, 5).unwrap(), dec!(101.50));
//!
//! // Saturday lookup falls back to Friday's close
//! let sat = Date::from_ymd(2024, 1, 6).unwrap();
//! assert_eq!(series.price_on_or_before(sat), Some(dec!(101.50)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]

pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{Act365Fixed, DayCount};
    pub use crate::error::{FolioError, FolioResult};
    pub use crate::types::{
        CashFlow, CashFlowKind, Classification, Date, Elapsed, Holding, PriceSeries,
        Transaction, TransactionType,
    };
}

// Re-export commonly used types at crate root
pub use error::{FolioError, FolioResult};
pub use types::{CashFlow, CashFlowKind, Date, Holding, PriceSeries, Transaction, TransactionType};
