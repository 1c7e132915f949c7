//! CLI command implementations.

pub mod config;
pub mod metrics;
pub mod xirr;

pub use config::ConfigArgs;
pub use metrics::MetricsArgs;
pub use xirr::XirrArgs;

use std::path::Path;

use folio_core::types::Date;

use crate::error::{CliError, CliResult};

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    if s.trim().len() != 10 {
        return Err(CliError::InvalidDate(s.to_string()));
    }
    Date::parse(s).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Reads a whole input file, naming the file on failure.
pub fn read_input(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        CliError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {e}", path.display()),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-06-30").unwrap().to_string(), "2024-06-30");
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("30/06/2024").is_err());
        assert!(parse_date("2024-06-30T10:00:00Z").is_err());
    }
}
