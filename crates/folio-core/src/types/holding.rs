//! Current holdings as reported by the broker.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classification tags used for allocation breakdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Sector name, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// True for exchange-traded funds.
    #[serde(default)]
    pub is_etf: bool,
}

impl Classification {
    /// Creates an empty classification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sector.
    #[must_use]
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Marks the instrument as an ETF.
    #[must_use]
    pub fn etf(mut self) -> Self {
        self.is_etf = true;
        self
    }
}

/// A current position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    /// Instrument symbol (uppercase), unique within a portfolio.
    pub symbol: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Units held.
    pub quantity: Decimal,
    /// Average cost per unit.
    pub average_cost: Decimal,
    /// Latest price per unit.
    pub current_price: Decimal,
    /// Classification tags.
    #[serde(default)]
    pub classification: Classification,
}

impl Holding {
    /// Creates a holding with an empty classification.
    #[must_use]
    pub fn new(symbol: &str, quantity: Decimal, average_cost: Decimal, current_price: Decimal) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            name: None,
            quantity,
            average_cost,
            current_price,
            classification: Classification::default(),
        }
    }

    /// Sets the classification.
    #[must_use]
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Current market value (`quantity * current_price`).
    #[must_use]
    pub fn market_value(&self) -> Decimal {
        self.quantity * self.current_price
    }

    /// Cost basis (`quantity * average_cost`).
    #[must_use]
    pub fn cost_basis(&self) -> Decimal {
        self.quantity * self.average_cost
    }

    /// Unrealized profit or loss: `(current_price - average_cost) * quantity`.
    #[must_use]
    pub fn unrealized_pl(&self) -> Decimal {
        (self.current_price - self.average_cost) * self.quantity
    }

    /// Returns true when no units are held.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.quantity.is_zero()
    }
}
