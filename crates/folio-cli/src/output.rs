//! Output formatting utilities.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Prints rows as a formatted table.
pub fn print_table<T: Tabled>(data: &[T]) {
    if data.is_empty() {
        println!("No results.");
        return;
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{table}");
}

/// Prints any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Formats a currency amount with two decimals.
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Formats an amount that is already a percentage.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

/// Formats a signed amount with its percentage, coloured by sign.
pub fn format_pl(amount: Decimal, percent: Decimal) -> String {
    let text = format!("{} ({})", format_money(amount), format_percent(percent));
    if amount.is_sign_negative() && !amount.is_zero() {
        text.red().to_string()
    } else {
        text.green().to_string()
    }
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a key-value pair from a currency amount.
    pub fn money(key: impl Into<String>, value: Decimal) -> Self {
        Self::new(key, format_money(value))
    }
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_money_rounds() {
        assert_eq!(format_money(dec!(1234.5678)), "1234.57");
        assert_eq!(format_money(dec!(5)), "5.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(16.744186)), "16.74%");
    }

    #[test]
    fn test_format_pl_contains_both_parts() {
        colored::control::set_override(false);
        assert_eq!(format_pl(dec!(-30), dec!(-2.5)), "-30.00 (-2.50%)");
    }
}
