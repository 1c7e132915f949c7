//! # Folio Analytics
//!
//! Portfolio performance analytics over brokerage holdings and their
//! transaction history.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: Every computation takes its inputs and an
//!   [`AnalyticsConfig`] explicitly; there is no I/O and no shared state
//! - **Strict boundary**: Raw documents are validated once in [`input`];
//!   nothing downstream sees untyped data
//! - **Decimal money**: Currency arithmetic is `Decimal`; only the return
//!   solver works in `f64`
//! - **Degrade, don't fail**: Bad records become warnings, undeterminable
//!   returns become `N/A`
//!
//! ## Quick Start
//!
//! ```rust
//! use folio_analytics::prelude::*;
//!
//! let input = PortfolioInput::from_json(r#"{
//!     "holdings": [
//!         { "symbol": "VTI", "quantity": 10, "averageCost": 200, "currentPrice": 240, "isEtf": true }
//!     ],
//!     "transactions": [
//!         { "date": "2024-01-02", "symbol": "VTI", "type": "BUY", "quantity": 10, "price": 200 }
//!     ],
//!     "benchmarkPrices": { "2024-01-02": 4742.83, "2025-01-02": 5868.55 }
//! }"#).unwrap();
//!
//! let config = AnalyticsConfig::new().with_as_of(Date::from_ymd(2025, 1, 2).unwrap());
//! let snapshot = compute_metrics(&input, &config).unwrap();
//!
//! assert_eq!(snapshot.total_pl.amount.to_string(), "400");
//! assert!(snapshot.money_weighted_return.is_determinate());
//! ```
//!
//! ## Module Overview
//!
//! - [`input`] - Raw input document and validation
//! - [`cashflows`] - Cash-flow reconstruction from the ledger
//! - [`valuation`] - P/L, point-in-time valuation, FIFO lots, reconciliation
//! - [`returns`] - Money-weighted return (XIRR)
//! - [`benchmark`] - Shadow benchmark portfolio
//! - [`bucketing`] - Allocation by sector and type
//! - [`history`] - Periodic value series
//! - [`metrics`] - Snapshot assembly

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod benchmark;
pub mod bucketing;
pub mod cashflows;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod history;
pub mod input;
pub mod metrics;
pub mod returns;
pub mod valuation;

pub use config::{AnalyticsConfig, SolverSettings};
pub use error::{AnalyticsError, AnalyticsResult};
pub use metrics::{compute_metrics, MetricsSnapshot};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::benchmark::{simulate, ShadowPortfolio};
    pub use crate::bucketing::{allocate, Allocation, AllocationBucket};
    pub use crate::cashflows::{
        monthly_summary, net_invested, reconstruct, reconstruct_for, with_terminal,
        MonthlyCashFlow,
    };
    pub use crate::config::{AnalyticsConfig, SolverSettings};
    pub use crate::diagnostics::{Diagnostics, Warning, WarningKind};
    pub use crate::error::{AnalyticsError, AnalyticsResult};
    pub use crate::input::{PortfolioInput, ValidatedInput};
    pub use crate::metrics::{compute_metrics, HoldingMetrics, MetricsSnapshot};
    pub use crate::returns::{
        money_weighted_return, money_weighted_return_between, IndeterminateReason, ReturnOutcome,
    };
    pub use crate::valuation::{reconcile, totals, value_at, ProfitLoss, Valuation};
    pub use folio_core::types::{CashFlow, CashFlowKind, Date, Holding, PriceSeries, Transaction};
}
