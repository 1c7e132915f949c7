//! Date type for portfolio calculations.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{FolioError, FolioResult};

/// A calendar date for portfolio calculations.
///
/// This is a newtype wrapper around `chrono::NaiveDate`. Ledger entries,
/// price closes and cash flows are all keyed by `Date`; intraday time is
/// never relevant to the analytics.
///
/// # Example
///
/// ```rust
/// use folio_core::types::Date;
///
/// let date = Date::from_ymd(2025, 1, 31).unwrap();
/// let next = date.add_months(1).unwrap();
/// assert_eq!(next.to_string(), "2025-02-28");
/// assert_eq!(next.month_key(), "2025-02");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> FolioResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| FolioError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses a date from `YYYY-MM-DD` or from an ISO 8601 timestamp.
    ///
    /// Broker ledgers often report execution timestamps such as
    /// `2023-04-12T14:31:07.120Z`; only the calendar date is kept.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::InvalidDate` if no date can be read.
    pub fn parse(s: &str) -> FolioResult<Self> {
        let head = s.trim().split(['T', ' ']).next().unwrap_or_default();
        NaiveDate::parse_from_str(head, "%Y-%m-%d")
            .map(Date)
            .map_err(|_| FolioError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns today's date in the local timezone.
    #[must_use]
    pub fn today() -> Self {
        Date(chrono::Local::now().date_naive())
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Adds a number of days to the date.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a number of months to the date.
    ///
    /// If the resulting day would be invalid (e.g., Jan 31 + 1 month),
    /// it rolls back to the last valid day of the month.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::InvalidDate` if the result is out of range.
    pub fn add_months(&self, months: i32) -> FolioResult<Self> {
        let total_months = self.year() * 12 + self.month() as i32 - 1 + months;
        let new_year = total_months.div_euclid(12);
        let new_month = (total_months.rem_euclid(12) + 1) as u32;

        let new_day = self.day().min(days_in_month(new_year, new_month));

        Self::from_ymd(new_year, new_month, new_day)
    }

    /// Calculates the number of calendar days between two dates.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the calendar month this date falls in, as `YYYY-MM`.
    #[must_use]
    pub fn month_key(&self) -> String {
        self.0.format("%Y-%m").to_string()
    }

    /// Returns the whole years, months and days from `earlier` to `self`.
    ///
    /// Returns a zero span when `earlier` is after `self`.
    #[must_use]
    pub fn elapsed_since(&self, earlier: Date) -> Elapsed {
        if earlier >= *self {
            return Elapsed::default();
        }

        let mut months =
            (self.year() - earlier.year()) * 12 + self.month() as i32 - earlier.month() as i32;
        let mut anchor = earlier.add_months(months).unwrap_or(earlier);
        while months > 0 && anchor > *self {
            months -= 1;
            anchor = earlier.add_months(months).unwrap_or(earlier);
        }

        Elapsed {
            years: (months / 12) as u32,
            months: (months % 12) as u32,
            days: anchor.days_between(self).max(0) as u32,
        }
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl Add<i64> for Date {
    type Output = Date;

    fn add(self, days: i64) -> Self::Output {
        self.add_days(days)
    }
}

impl Sub<i64> for Date {
    type Output = Date;

    fn sub(self, days: i64) -> Self::Output {
        self.add_days(-days)
    }
}

impl Sub<Date> for Date {
    type Output = i64;

    fn sub(self, other: Date) -> Self::Output {
        other.days_between(&self)
    }
}

/// A calendar span expressed in whole years, months and days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elapsed {
    /// Whole years.
    pub years: u32,
    /// Whole months after the years.
    pub months: u32,
    /// Remaining days.
    pub days: u32,
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} years {} months {} days",
            self.years, self.months, self.days
        )
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_creation() {
        let date = Date::from_ymd(2025, 6, 15).unwrap();
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_invalid_date() {
        assert!(Date::from_ymd(2025, 2, 30).is_err());
        assert!(Date::from_ymd(2025, 13, 1).is_err());
    }

    #[test]
    fn test_parse() {
        let expected = Date::from_ymd(2023, 4, 12).unwrap();
        assert_eq!(Date::parse("2023-04-12").unwrap(), expected);
        assert_eq!(Date::parse("2023-04-12T14:31:07.120Z").unwrap(), expected);
        assert_eq!(Date::parse(" 2023-04-12 09:30:00").unwrap(), expected);
        assert!(Date::parse("12/04/2023").is_err());
        assert!(Date::parse("").is_err());
    }

    #[test]
    fn test_add_months() {
        let date = Date::from_ymd(2024, 1, 31).unwrap();
        assert_eq!(date.add_months(1).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
        assert_eq!(date.add_months(-2).unwrap(), Date::from_ymd(2023, 11, 30).unwrap());
        assert_eq!(date.add_months(12).unwrap(), Date::from_ymd(2025, 1, 31).unwrap());
    }

    #[test]
    fn test_days_between() {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 1, 1).unwrap();
        assert_eq!(start.days_between(&end), 366);
        assert_eq!(end.days_between(&start), -366);
        assert_eq!(end - start, 366);
    }

    #[test]
    fn test_month_key() {
        let date = Date::from_ymd(2024, 3, 9).unwrap();
        assert_eq!(date.month_key(), "2024-03");
    }

    #[test]
    fn test_elapsed_since() {
        let start = Date::from_ymd(2021, 3, 15).unwrap();
        let end = Date::from_ymd(2023, 5, 20).unwrap();
        let elapsed = end.elapsed_since(start);
        assert_eq!(
            elapsed,
            Elapsed {
                years: 2,
                months: 2,
                days: 5
            }
        );
        assert_eq!(elapsed.to_string(), "2 years 2 months 5 days");
    }

    #[test]
    fn test_elapsed_day_rollback() {
        // Feb 10 -> Mar 5 is under one month
        let start = Date::from_ymd(2024, 2, 10).unwrap();
        let end = Date::from_ymd(2024, 3, 5).unwrap();
        let elapsed = end.elapsed_since(start);
        assert_eq!(elapsed.years, 0);
        assert_eq!(elapsed.months, 0);
        assert_eq!(elapsed.days, 24);

        assert_eq!(start.elapsed_since(end), Elapsed::default());
    }

    #[test]
    fn test_date_arithmetic_operators() {
        let date = Date::from_ymd(2025, 1, 15).unwrap();
        assert_eq!(date + 10, Date::from_ymd(2025, 1, 25).unwrap());
        assert_eq!(date - 15, Date::from_ymd(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_serde() {
        let date = Date::from_ymd(2025, 6, 15).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2025-06-15\"");

        let parsed: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, date);
    }
}
