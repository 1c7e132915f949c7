//! Error types for portfolio analytics.
//!
//! Only a wholesale malformed input fails a computation. Individual bad
//! records produce [`AnalyticsError::Data`] internally, are skipped, and
//! surface as warnings on the snapshot.

use folio_core::FolioError;
use thiserror::Error;

/// Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Errors that can occur during analytics operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// The input document has no holdings list.
    #[error("Input has no holdings list")]
    MissingHoldings,

    /// The input document could not be read at all.
    #[error("Malformed input document: {reason}")]
    InvalidDocument {
        /// Parser message.
        reason: String,
    },

    /// A single record is structurally invalid.
    #[error("Invalid {record}: {reason}")]
    Data {
        /// Which record, e.g. `transaction #4`.
        record: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A core value could not be constructed.
    #[error(transparent)]
    Core(#[from] FolioError),
}

impl AnalyticsError {
    /// Creates a data error for one record.
    #[must_use]
    pub fn data(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Data {
            record: record.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid document error.
    #[must_use]
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            reason: reason.into(),
        }
    }
}
