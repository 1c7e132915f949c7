//! Sparse daily close series.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Date;

/// Daily closing prices for one instrument.
///
/// Non-trading days are simply absent. Lookups fall back to the most recent
/// close on or before the requested date and never look forward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    closes: BTreeMap<Date, Decimal>,
}

impl PriceSeries {
    /// Creates an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the close for `date`.
    pub fn insert(&mut self, date: Date, close: Decimal) {
        self.closes.insert(date, close);
    }

    /// Returns the close on `date` or on the latest earlier trading day.
    #[must_use]
    pub fn price_on_or_before(&self, date: Date) -> Option<Decimal> {
        self.closes.range(..=date).next_back().map(|(_, p)| *p)
    }

    /// Number of closes in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// Returns true if the series holds no closes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Iterates closes in date order.
    pub fn iter(&self) -> impl Iterator<Item = (Date, Decimal)> + '_ {
        self.closes.iter().map(|(d, p)| (*d, *p))
    }
}

impl Extend<(Date, Decimal)> for PriceSeries {
    fn extend<I: IntoIterator<Item = (Date, Decimal)>>(&mut self, iter: I) {
        self.closes.extend(iter);
    }
}

impl FromIterator<(Date, Decimal)> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = (Date, Decimal)>>(iter: I) -> Self {
        Self {
            closes: iter.into_iter().collect(),
        }
    }
}
