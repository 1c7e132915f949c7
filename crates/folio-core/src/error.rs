//! Error types for the Folio core types.

use rust_decimal::Decimal;
use thiserror::Error;

/// A specialized Result type for core operations.
pub type FolioResult<T> = Result<T, FolioError>;

/// The error type for constructing core domain values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FolioError {
    /// Error in date parsing or an out-of-range date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Invalid price value.
    #[error("Invalid price: {value} - {reason}")]
    InvalidPrice {
        /// The invalid price value.
        value: Decimal,
        /// Reason for invalidity.
        reason: String,
    },

    /// Invalid quantity value.
    #[error("Invalid quantity: {value} - {reason}")]
    InvalidQuantity {
        /// The invalid quantity.
        value: Decimal,
        /// Reason for invalidity.
        reason: String,
    },

    /// Unknown transaction type label.
    #[error("Unknown transaction type: {label}")]
    UnknownTransactionType {
        /// The label that could not be parsed.
        label: String,
    },
}

impl FolioError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid price error.
    #[must_use]
    pub fn invalid_price(value: Decimal, reason: impl Into<String>) -> Self {
        Self::InvalidPrice {
            value,
            reason: reason.into(),
        }
    }

    /// Creates an invalid quantity error.
    #[must_use]
    pub fn invalid_quantity(value: Decimal, reason: impl Into<String>) -> Self {
        Self::InvalidQuantity {
            value,
            reason: reason.into(),
        }
    }
}
