//! Structured warnings collected during a computation.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Category of a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A record was rejected during ingestion.
    MalformedRecord,
    /// No price was available on or before a required date.
    PriceGap,
    /// Reported holdings disagree with the replayed ledger.
    Reconciliation,
    /// A sell exceeded the open lots.
    Oversell,
    /// A benchmark redemption exceeded the shadow units held.
    ShadowRedemption,
    /// A money-weighted return could not be determined.
    IndeterminateReturn,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WarningKind::MalformedRecord => "malformed record",
            WarningKind::PriceGap => "price gap",
            WarningKind::Reconciliation => "reconciliation",
            WarningKind::Oversell => "oversell",
            WarningKind::ShadowRedemption => "shadow redemption",
            WarningKind::IndeterminateReturn => "indeterminate return",
        };
        write!(f, "{label}")
    }
}

/// A single warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Category.
    pub kind: WarningKind,
    /// Human-readable detail.
    pub message: String,
}

impl Warning {
    /// Creates a warning.
    #[must_use]
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Ordered collection of warnings for one computation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and emits it as a tracing event.
    pub fn push(&mut self, kind: WarningKind, message: impl Into<String>) {
        self.record(Warning::new(kind, message));
    }

    /// Records an already-built warning.
    pub fn record(&mut self, warning: Warning) {
        warn!(kind = %warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Records every warning from `warnings`.
    pub fn extend(&mut self, warnings: impl IntoIterator<Item = Warning>) {
        for warning in warnings {
            self.record(warning);
        }
    }

    /// Number of warnings recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Iterates warnings in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.iter()
    }

    /// Number of warnings of `kind`.
    #[must_use]
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    /// Consumes the collector and returns the warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    /// Flattens the warnings to display strings.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(WarningKind::PriceGap, "no close for VTI before 2020-01-02");
        diagnostics.push(WarningKind::Oversell, "sold 5 AAPL with 3 open");

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.count(WarningKind::PriceGap), 1);
        assert_eq!(
            diagnostics.messages(),
            vec![
                "price gap: no close for VTI before 2020-01-02".to_string(),
                "oversell: sold 5 AAPL with 3 open".to_string(),
            ]
        );
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&WarningKind::ShadowRedemption).unwrap();
        assert_eq!(json, "\"shadow_redemption\"");
    }
}
