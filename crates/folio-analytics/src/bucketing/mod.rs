//! Allocation breakdowns.
//!
//! Holdings with a non-zero quantity are grouped by sector and by
//! instrument type. Buckets are ordered by descending market value; equal
//! values keep first-seen order.
//!
//! # Example
//!
//! ```rust
//! use folio_analytics::bucketing::allocate;
//! use folio_core::types::{Classification, Holding};
//! use rust_decimal_macros::dec;
//!
//! let holdings = vec![
//!     Holding::new("VTI", dec!(10), dec!(200), dec!(250))
//!         .with_classification(Classification::new().etf()),
//!     Holding::new("AAPL", dec!(5), dec!(150), dec!(150))
//!         .with_classification(Classification::new().with_sector("Technology")),
//! ];
//!
//! let allocation = allocate(&holdings);
//! assert_eq!(allocation.by_type[0].name, "ETF");
//! assert_eq!(allocation.by_sector[1].name, "Technology");
//! ```

use folio_core::types::Holding;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::valuation::percent_of;

/// Sector label for holdings without one.
pub const UNCLASSIFIED: &str = "Unclassified";

/// Type label for exchange-traded funds.
pub const ETF_LABEL: &str = "ETF";

/// Type label for single stocks.
pub const STOCK_LABEL: &str = "Stock";

/// One allocation bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBucket {
    /// Bucket label.
    pub name: String,
    /// Number of holdings in the bucket.
    pub count: usize,
    /// Total market value.
    pub market_value: Decimal,
    /// Share of the total market value, 0-100.
    pub percent: Decimal,
}

/// Allocation by sector and by instrument type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    /// Buckets keyed by sector.
    pub by_sector: Vec<AllocationBucket>,
    /// `ETF` and `Stock` buckets.
    pub by_type: Vec<AllocationBucket>,
}

/// Builds both allocation breakdowns.
#[must_use]
pub fn allocate(holdings: &[Holding]) -> Allocation {
    Allocation {
        by_sector: bucket_by_sector(holdings),
        by_type: bucket_by_type(holdings),
    }
}

/// Groups holdings by sector; a missing sector becomes [`UNCLASSIFIED`].
#[must_use]
pub fn bucket_by_sector(holdings: &[Holding]) -> Vec<AllocationBucket> {
    bucket_by(holdings, |h| {
        h.classification
            .sector
            .clone()
            .unwrap_or_else(|| UNCLASSIFIED.to_string())
    })
}

/// Groups holdings into [`ETF_LABEL`] and [`STOCK_LABEL`].
#[must_use]
pub fn bucket_by_type(holdings: &[Holding]) -> Vec<AllocationBucket> {
    bucket_by(holdings, |h| {
        if h.classification.is_etf {
            ETF_LABEL.to_string()
        } else {
            STOCK_LABEL.to_string()
        }
    })
}

fn bucket_by<F>(holdings: &[Holding], key: F) -> Vec<AllocationBucket>
where
    F: Fn(&Holding) -> String,
{
    let mut buckets: Vec<AllocationBucket> = Vec::new();

    for holding in holdings.iter().filter(|h| !h.is_closed()) {
        let name = key(holding);
        let value = holding.market_value();
        match buckets.iter_mut().find(|b| b.name == name) {
            Some(bucket) => {
                bucket.count += 1;
                bucket.market_value += value;
            }
            None => buckets.push(AllocationBucket {
                name,
                count: 1,
                market_value: value,
                percent: Decimal::ZERO,
            }),
        }
    }

    let total: Decimal = buckets.iter().map(|b| b.market_value).sum();
    for bucket in &mut buckets {
        bucket.percent = percent_of(bucket.market_value, total);
    }

    // Stable: ties keep insertion order
    buckets.sort_by(|a, b| b.market_value.cmp(&a.market_value));
    buckets
}
