//! Day count conventions.
//!
//! Money-weighted returns discount each flow by `(1 + r)^t` where `t` is the
//! year fraction since the first flow. Folio uses ACT/365 Fixed: actual
//! calendar days over a constant 365-day year, leap years included.
//!
//! ```rust
//! use folio_core::daycounts::{Act365Fixed, DayCount};
//! use folio_core::types::Date;
//!
//! let start = Date::from_ymd(2025, 1, 1).unwrap();
//! let end = Date::from_ymd(2026, 1, 1).unwrap();
//! assert_eq!(Act365Fixed.year_fraction_f64(start, end), 1.0);
//! ```

mod act365;

pub use act365::{Act365Fixed, YEAR_BASIS};

use crate::types::Date;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Negative if `end` is before `start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Calculates the day count between two dates.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Year fraction as `f64`, for numerical solvers.
    fn year_fraction_f64(&self, start: Date, end: Date) -> f64 {
        self.year_fraction(start, end).to_f64().unwrap_or(0.0)
    }
}
