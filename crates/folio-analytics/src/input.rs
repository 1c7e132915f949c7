//! Ingestion boundary.
//!
//! [`PortfolioInput`] mirrors the JSON document handed over by the brokerage
//! adapter: every field is optional and numbers may arrive as JSON numbers or
//! strings. [`PortfolioInput::validate`] turns it into typed domain values.
//! Bad records are skipped with a [`WarningKind::MalformedRecord`] warning;
//! only a missing holdings list fails.

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use folio_core::types::{Classification, Date, Holding, PriceSeries, Transaction, TransactionType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::diagnostics::{Diagnostics, WarningKind};
use crate::error::{AnalyticsError, AnalyticsResult};

/// Largest quantity accepted on a holding or trade.
pub const MAX_QUANTITY: Decimal = dec!(1000000000000);

/// Largest unit price or close accepted.
pub const MAX_PRICE: Decimal = dec!(1000000000);

/// Largest cash amount or position value accepted.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Raw close prices keyed by `YYYY-MM-DD`.
pub type RawPriceSeries = BTreeMap<String, Value>;

/// Raw input document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioInput {
    /// Current positions. Absent means the document is unusable.
    #[serde(default)]
    pub holdings: Option<Vec<RawHolding>>,

    /// Ledger entries in original order.
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,

    /// Daily closes per symbol.
    #[serde(default)]
    pub prices: BTreeMap<String, RawPriceSeries>,

    /// Daily closes of the benchmark index.
    #[serde(default)]
    pub benchmark_prices: RawPriceSeries,

    /// Benchmark symbol, overriding the configured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark_symbol: Option<String>,
}

/// Raw holding record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHolding {
    /// Instrument symbol.
    pub symbol: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Units held.
    pub quantity: Option<Value>,
    /// Average cost per unit.
    pub average_cost: Option<Value>,
    /// Latest price per unit.
    pub current_price: Option<Value>,
    /// Sector tag.
    pub sector: Option<String>,
    /// ETF flag.
    pub is_etf: Option<bool>,
    /// Asset type label; `ETF` marks a fund.
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
}

/// Raw ledger record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// `YYYY-MM-DD` or an ISO timestamp.
    pub date: Option<String>,
    /// Instrument symbol.
    pub symbol: Option<String>,
    /// `BUY`, `SELL`, `DIVIDEND` or `FEE`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Units traded.
    pub quantity: Option<Value>,
    /// Execution price.
    pub price: Option<Value>,
    /// Net cash effect. Required for dividends and fees; defaults to
    /// `quantity * price` for trades.
    pub amount: Option<Value>,
}

/// Typed, validated input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedInput {
    /// Positions with unique symbols.
    pub holdings: Vec<Holding>,
    /// Ledger sorted by date, ties in original order.
    pub transactions: Vec<Transaction>,
    /// Closes per uppercase symbol.
    pub prices: BTreeMap<String, PriceSeries>,
    /// Benchmark closes.
    pub benchmark_prices: PriceSeries,
    /// Benchmark symbol from the document, if any.
    pub benchmark_symbol: Option<String>,
}

impl PortfolioInput {
    /// Parses a JSON document.
    pub fn from_json(json: &str) -> AnalyticsResult<Self> {
        serde_json::from_str(json).map_err(|e| AnalyticsError::invalid_document(e.to_string()))
    }

    /// Validates the document into typed values, recording a warning for
    /// every record that is skipped.
    pub fn validate(&self, diagnostics: &mut Diagnostics) -> AnalyticsResult<ValidatedInput> {
        let raw_holdings = self
            .holdings
            .as_ref()
            .ok_or(AnalyticsError::MissingHoldings)?;

        let mut holdings = Vec::with_capacity(raw_holdings.len());
        let mut seen = HashSet::new();
        for (index, raw) in raw_holdings.iter().enumerate() {
            match parse_holding(index, raw) {
                Ok(holding) if seen.insert(holding.symbol.clone()) => holdings.push(holding),
                Ok(holding) => diagnostics.push(
                    WarningKind::MalformedRecord,
                    format!("duplicate holding {} skipped", holding.symbol),
                ),
                Err(e) => diagnostics.push(WarningKind::MalformedRecord, e.to_string()),
            }
        }

        let mut transactions = Vec::with_capacity(self.transactions.len());
        for (sequence, raw) in self.transactions.iter().enumerate() {
            match parse_transaction(sequence, raw) {
                Ok(tx) => transactions.push(tx),
                Err(e) => diagnostics.push(WarningKind::MalformedRecord, e.to_string()),
            }
        }
        // Stable: same-day entries keep ledger order
        transactions.sort_by_key(|t| t.date);

        let mut prices = BTreeMap::new();
        for (symbol, raw) in &self.prices {
            let symbol = symbol.trim().to_uppercase();
            let series = parse_series(&symbol, raw, diagnostics);
            prices
                .entry(symbol)
                .or_insert_with(PriceSeries::new)
                .extend(series.iter());
        }

        let benchmark_prices = parse_series("benchmark", &self.benchmark_prices, diagnostics);

        debug!(
            holdings = holdings.len(),
            transactions = transactions.len(),
            series = prices.len(),
            benchmark_closes = benchmark_prices.len(),
            "validated input"
        );

        Ok(ValidatedInput {
            holdings,
            transactions,
            prices,
            benchmark_prices,
            benchmark_symbol: self
                .benchmark_symbol
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

/// Reads a decimal from a JSON number or numeric string.
#[must_use]
pub fn decimal_value(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().replace(',', ""),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn required_decimal(
    record: &str,
    field: &str,
    value: Option<&Value>,
) -> AnalyticsResult<Decimal> {
    let value = value.ok_or_else(|| AnalyticsError::data(record, format!("missing {field}")))?;
    decimal_value(value)
        .ok_or_else(|| AnalyticsError::data(record, format!("{field} is not a number: {value}")))
}

fn bounded(record: &str, field: &str, value: Decimal, limit: Decimal) -> AnalyticsResult<Decimal> {
    if value.abs() > limit {
        return Err(AnalyticsError::data(
            record,
            format!("{field} {value} exceeds {limit}"),
        ));
    }
    Ok(value)
}

fn bounded_product(record: &str, field: &str, a: Decimal, b: Decimal) -> AnalyticsResult<Decimal> {
    a.checked_mul(b)
        .filter(|v| v.abs() <= MAX_AMOUNT)
        .ok_or_else(|| AnalyticsError::data(record, format!("{field} exceeds {MAX_AMOUNT}")))
}

fn required_symbol(record: &str, symbol: Option<&String>) -> AnalyticsResult<String> {
    symbol
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AnalyticsError::data(record, "missing symbol"))
}

fn parse_holding(index: usize, raw: &RawHolding) -> AnalyticsResult<Holding> {
    let record = format!("holding #{}", index + 1);
    let symbol = required_symbol(&record, raw.symbol.as_ref())?;
    let record = format!("holding {symbol}");

    let quantity = required_decimal(&record, "quantity", raw.quantity.as_ref())?;
    let current_price = required_decimal(&record, "current price", raw.current_price.as_ref())?;
    let average_cost = match raw.average_cost.as_ref() {
        Some(value) => decimal_value(value).ok_or_else(|| {
            AnalyticsError::data(&record, format!("average cost is not a number: {value}"))
        })?,
        None => Decimal::ZERO,
    };

    for (field, value) in [
        ("quantity", quantity),
        ("current price", current_price),
        ("average cost", average_cost),
    ] {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AnalyticsError::data(
                &record,
                format!("negative {field} {value}"),
            ));
        }
    }
    bounded(&record, "quantity", quantity, MAX_QUANTITY)?;
    bounded(&record, "current price", current_price, MAX_PRICE)?;
    bounded(&record, "average cost", average_cost, MAX_PRICE)?;
    bounded_product(&record, "market value", quantity, current_price)?;
    bounded_product(&record, "cost basis", quantity, average_cost)?;

    let mut classification = Classification::new();
    if let Some(sector) = raw.sector.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        classification = classification.with_sector(sector);
    }
    let labelled_etf = raw
        .asset_type
        .as_deref()
        .is_some_and(|t| t.trim().eq_ignore_ascii_case("ETF"));
    if raw.is_etf.unwrap_or(false) || labelled_etf {
        classification = classification.etf();
    }

    let mut holding = Holding::new(&symbol, quantity, average_cost, current_price)
        .with_classification(classification);
    if let Some(name) = raw.name.as_deref().filter(|s| !s.trim().is_empty()) {
        holding = holding.with_name(name);
    }
    Ok(holding)
}

fn parse_transaction(sequence: usize, raw: &RawTransaction) -> AnalyticsResult<Transaction> {
    let record = format!("transaction #{}", sequence + 1);

    let date = raw
        .date
        .as_deref()
        .ok_or_else(|| AnalyticsError::data(&record, "missing date"))
        .and_then(|s| Date::parse(s).map_err(|e| AnalyticsError::data(&record, e.to_string())))?;
    let symbol = required_symbol(&record, raw.symbol.as_ref())?;
    let kind = raw
        .kind
        .as_deref()
        .ok_or_else(|| AnalyticsError::data(&record, "missing type"))?
        .parse::<TransactionType>()
        .map_err(|e| AnalyticsError::data(&record, e.to_string()))?;

    let record = format!("{record} ({kind} {symbol} {date})");

    if kind.is_trade() {
        let quantity = required_decimal(&record, "quantity", raw.quantity.as_ref())?;
        if quantity.is_zero() {
            return Err(AnalyticsError::data(&record, "zero quantity"));
        }
        let price = required_decimal(&record, "price", raw.price.as_ref())?;
        if price <= Decimal::ZERO {
            return Err(AnalyticsError::data(
                &record,
                format!("non-positive price {price}"),
            ));
        }
        bounded(&record, "quantity", quantity, MAX_QUANTITY)?;
        bounded(&record, "price", price, MAX_PRICE)?;
        let net_cash = match raw.amount.as_ref() {
            Some(value) => {
                let amount = decimal_value(value).ok_or_else(|| {
                    AnalyticsError::data(&record, format!("amount is not a number: {value}"))
                })?;
                bounded(&record, "amount", amount, MAX_AMOUNT)?
            }
            None => bounded_product(&record, "amount", quantity.abs(), price)?,
        };
        Ok(Transaction::new(
            sequence, date, &symbol, kind, quantity, price, net_cash,
        ))
    } else {
        let amount = required_decimal(&record, "amount", raw.amount.as_ref())?;
        bounded(&record, "amount", amount, MAX_AMOUNT)?;
        Ok(Transaction::new(
            sequence,
            date,
            &symbol,
            kind,
            Decimal::ZERO,
            Decimal::ZERO,
            amount,
        ))
    }
}

fn parse_series(label: &str, raw: &RawPriceSeries, diagnostics: &mut Diagnostics) -> PriceSeries {
    let mut series = PriceSeries::new();
    for (day, value) in raw {
        let Ok(date) = Date::parse(day) else {
            diagnostics.push(
                WarningKind::MalformedRecord,
                format!("{label} close dropped: unreadable date {day:?}"),
            );
            continue;
        };
        match decimal_value(value) {
            Some(close) if close > Decimal::ZERO && close <= MAX_PRICE => series.insert(date, close),
            _ => diagnostics.push(
                WarningKind::MalformedRecord,
                format!("{label} close on {date} dropped: {value} is not a price in (0, {MAX_PRICE}]"),
            ),
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn input(value: Value) -> PortfolioInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_holdings_is_fatal() {
        let doc = input(json!({ "transactions": [] }));
        let mut diagnostics = Diagnostics::new();
        assert_eq!(
            doc.validate(&mut diagnostics),
            Err(AnalyticsError::MissingHoldings)
        );
    }

    #[test]
    fn test_numbers_as_strings() {
        let doc = input(json!({
            "holdings": [{
                "symbol": "aapl",
                "quantity": "10",
                "averageCost": 150.25,
                "currentPrice": "1,175.50",
                "type": "etf"
            }]
        }));
        let mut diagnostics = Diagnostics::new();
        let validated = doc.validate(&mut diagnostics).unwrap();

        let holding = &validated.holdings[0];
        assert_eq!(holding.symbol, "AAPL");
        assert_eq!(holding.quantity, dec!(10));
        assert_eq!(holding.average_cost, dec!(150.25));
        assert_eq!(holding.current_price, dec!(1175.50));
        assert!(holding.classification.is_etf);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_duplicate_holding_warned() {
        let doc = input(json!({
            "holdings": [
                { "symbol": "MSFT", "quantity": 1, "currentPrice": 300 },
                { "symbol": "msft", "quantity": 2, "currentPrice": 300 }
            ]
        }));
        let mut diagnostics = Diagnostics::new();
        let validated = doc.validate(&mut diagnostics).unwrap();

        assert_eq!(validated.holdings.len(), 1);
        assert_eq!(validated.holdings[0].quantity, dec!(1));
        assert_eq!(diagnostics.count(WarningKind::MalformedRecord), 1);
    }

    #[test]
    fn test_malformed_transactions_skipped() {
        let doc = input(json!({
            "holdings": [],
            "transactions": [
                { "date": "2024-01-02", "symbol": "VTI", "type": "BUY", "quantity": 5, "price": 200 },
                { "symbol": "VTI", "type": "BUY", "quantity": 5, "price": 200 },
                { "date": "2024-01-03", "symbol": "VTI", "type": "SELL", "quantity": 1, "price": -3 },
                { "date": "2024-01-04", "symbol": "VTI", "type": "SPLIT", "quantity": 2 },
                { "date": "2024-01-05", "symbol": "", "type": "BUY", "quantity": 1, "price": 1 },
                { "date": "2024-01-06", "symbol": "VTI", "type": "BUY", "quantity": 0, "price": 1 },
                { "date": "2024-01-07", "symbol": "VTI", "type": "DIVIDEND" }
            ]
        }));
        let mut diagnostics = Diagnostics::new();
        let validated = doc.validate(&mut diagnostics).unwrap();

        assert_eq!(validated.transactions.len(), 1);
        assert_eq!(validated.transactions[0].net_cash, dec!(-1000));
        assert_eq!(diagnostics.count(WarningKind::MalformedRecord), 6);
    }

    #[test]
    fn test_transactions_sorted_stably() {
        let doc = input(json!({
            "holdings": [],
            "transactions": [
                { "date": "2024-03-01", "symbol": "A", "type": "BUY", "quantity": 1, "price": 10 },
                { "date": "2024-02-01T15:30:00Z", "symbol": "B", "type": "BUY", "quantity": 1, "price": 10 },
                { "date": "2024-03-01", "symbol": "A", "type": "SELL", "quantity": 1, "price": 12 },
                { "date": "2024-03-01", "symbol": "C", "type": "FEE", "amount": 2 }
            ]
        }));
        let mut diagnostics = Diagnostics::new();
        let validated = doc.validate(&mut diagnostics).unwrap();

        let order: Vec<usize> = validated.transactions.iter().map(|t| t.sequence).collect();
        assert_eq!(order, vec![1, 0, 2, 3]);
        assert_eq!(validated.transactions[3].net_cash, dec!(-2));
    }

    #[test]
    fn test_non_positive_closes_dropped() {
        let doc = input(json!({
            "holdings": [],
            "prices": { "vti": { "2024-01-02": 230.1, "2024-01-03": 0, "not-a-date": 1 } },
            "benchmarkPrices": { "2024-01-02": "4700.5", "2024-01-03": -1 }
        }));
        let mut diagnostics = Diagnostics::new();
        let validated = doc.validate(&mut diagnostics).unwrap();

        assert_eq!(validated.prices["VTI"].len(), 1);
        assert_eq!(validated.benchmark_prices.len(), 1);
        assert_eq!(diagnostics.count(WarningKind::MalformedRecord), 3);
        assert_eq!(
            validated.benchmark_prices.iter().collect::<Vec<_>>(),
            vec![(Date::from_ymd(2024, 1, 2).unwrap(), dec!(4700.5))]
        );
    }

    #[test]
    fn test_out_of_range_values_skipped() {
        let doc = input(json!({
            "holdings": [
                { "symbol": "BIG", "quantity": "1000000000000000", "currentPrice": "1000000000000000" },
                { "symbol": "WIDE", "quantity": 900000000000_i64, "averageCost": 1, "currentPrice": 900000000 },
                { "symbol": "VTI", "quantity": 5, "averageCost": 200, "currentPrice": 220 }
            ],
            "transactions": [
                { "date": "2024-01-02", "symbol": "VTI", "type": "BUY", "quantity": "1e13", "price": 1 },
                { "date": "2024-01-02", "symbol": "VTI", "type": "DIVIDEND", "amount": "1e20" },
                { "date": "2024-01-02", "symbol": "VTI", "type": "BUY", "quantity": 5, "price": 200 }
            ],
            "benchmarkPrices": { "2024-01-02": "1e12", "2024-01-03": 4700 }
        }));
        let mut diagnostics = Diagnostics::new();
        let validated = doc.validate(&mut diagnostics).unwrap();

        let symbols: Vec<&str> = validated.holdings.iter().map(|h| h.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["VTI"]);
        assert_eq!(validated.transactions.len(), 1);
        assert_eq!(validated.benchmark_prices.len(), 1);
        assert_eq!(diagnostics.count(WarningKind::MalformedRecord), 5);
        assert!(diagnostics
            .messages()
            .iter()
            .any(|m| m.contains("holding BIG") && m.contains("quantity")));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            PortfolioInput::from_json("not json"),
            Err(AnalyticsError::InvalidDocument { .. })
        ));
    }
}
