//! Metrics command implementation.
//!
//! Reads an exported portfolio document (holdings, transactions, price
//! history) and prints the full performance snapshot.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use folio_analytics::bucketing::AllocationBucket;
use folio_analytics::metrics::HoldingMetrics;
use folio_analytics::{compute_metrics, input::PortfolioInput, MetricsSnapshot};
use serde::Serialize;
use tabled::Tabled;

use super::{parse_date, read_input};
use crate::cli::{Context, OutputFormat};
use crate::output::{
    format_money, format_percent, format_pl, print_header, print_json, print_table,
    print_warning, KeyValue,
};

/// Arguments for the metrics command.
#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// Portfolio document (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Valuation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<String>,

    /// Benchmark symbol shown when the document does not name one
    #[arg(long)]
    pub benchmark: Option<String>,

    /// Include the periodic value history in table output
    #[arg(long)]
    pub history: bool,
}

/// Per-holding table row.
#[derive(Debug, Clone, Serialize, Tabled)]
struct HoldingRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Unrealized P/L")]
    unrealized: String,
    #[tabled(rename = "Realized P/L")]
    realized: String,
    #[tabled(rename = "MWR")]
    mwr: String,
    #[tabled(rename = "Held")]
    held: String,
}

impl From<&HoldingMetrics> for HoldingRow {
    fn from(h: &HoldingMetrics) -> Self {
        Self {
            symbol: h.symbol.clone(),
            quantity: h.quantity.normalize().to_string(),
            price: format_money(h.current_price),
            value: format_money(h.market_value),
            weight: format_percent(h.weight),
            unrealized: format_pl(h.unrealized_pl.amount, h.unrealized_pl.percent),
            realized: format_money(h.realized_pl),
            mwr: h.money_weighted_return.to_string(),
            held: h.time_held.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Allocation table row.
#[derive(Debug, Clone, Serialize, Tabled)]
struct BucketRow {
    #[tabled(rename = "Bucket")]
    name: String,
    #[tabled(rename = "Holdings")]
    count: usize,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

impl From<&AllocationBucket> for BucketRow {
    fn from(b: &AllocationBucket) -> Self {
        Self {
            name: b.name.clone(),
            count: b.count,
            value: format_money(b.market_value),
            weight: format_percent(b.percent),
        }
    }
}

/// Month/amount table row.
#[derive(Debug, Clone, Serialize, Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Net Flow")]
    amount: String,
}

/// History table row.
#[derive(Debug, Clone, Serialize, Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Portfolio")]
    portfolio: String,
    #[tabled(rename = "Invested")]
    invested: String,
    #[tabled(rename = "Benchmark")]
    benchmark: String,
}

/// Executes the metrics command.
pub fn execute(args: MetricsArgs, ctx: &Context) -> Result<()> {
    let mut config = super::config::load(ctx.config_path.as_deref())?;
    if let Some(as_of) = args.as_of.as_deref() {
        config = config.with_as_of(parse_date(as_of)?);
    }
    if let Some(symbol) = args.benchmark {
        config = config.with_benchmark_symbol(symbol);
    }

    let raw = read_input(&args.input)?;
    let input = PortfolioInput::from_json(&raw)?;
    let snapshot = compute_metrics(&input, &config)?;

    tracing::debug!(
        holdings = snapshot.holdings.len(),
        warnings = snapshot.warnings.len(),
        "computed metrics"
    );

    match ctx.format {
        OutputFormat::Json => print_json(&snapshot)?,
        OutputFormat::Table => print_snapshot(&snapshot, args.history, ctx.quiet),
    }

    Ok(())
}

fn print_snapshot(snapshot: &MetricsSnapshot, with_history: bool, quiet: bool) {
    print_header(&format!("Portfolio Summary ({})", snapshot.as_of));
    let summary = vec![
        KeyValue::money("Total Value", snapshot.total_value),
        KeyValue::money("Cost Basis", snapshot.total_cost_basis),
        KeyValue::new(
            "Unrealized P/L",
            format_pl(snapshot.total_pl.amount, snapshot.total_pl.percent),
        ),
        KeyValue::money("Realized P/L", snapshot.realized_pl),
        KeyValue::new(
            "Money-Weighted Return",
            snapshot.money_weighted_return.to_string(),
        ),
        KeyValue::new(
            format!("Benchmark Return ({})", snapshot.benchmark.symbol),
            snapshot.benchmark_return.to_string(),
        ),
    ];
    print_table(&summary);

    print_header("Holdings");
    let rows: Vec<HoldingRow> = snapshot.holdings.iter().map(HoldingRow::from).collect();
    print_table(&rows);

    print_header("Allocation by Sector");
    let rows: Vec<BucketRow> = snapshot
        .allocation
        .by_sector
        .iter()
        .map(BucketRow::from)
        .collect();
    print_table(&rows);

    print_header("Allocation by Type");
    let rows: Vec<BucketRow> = snapshot
        .allocation
        .by_type
        .iter()
        .map(BucketRow::from)
        .collect();
    print_table(&rows);

    let benchmark = &snapshot.benchmark;
    print_header(&format!("Benchmark ({})", benchmark.symbol));
    let rows = vec![
        KeyValue::new("Units", benchmark.units.round_dp(6).normalize().to_string()),
        KeyValue::money("Net Invested", benchmark.net_invested),
        KeyValue::money("Value", benchmark.terminal_value),
        KeyValue::money("P/L", benchmark.profit_loss),
        KeyValue::new("Excluded Flows", benchmark.excluded_flows.to_string()),
    ];
    print_table(&rows);

    if !quiet {
        print_header("Monthly Cash Flows");
        let rows: Vec<MonthRow> = snapshot
            .monthly_cash_flows
            .iter()
            .map(|m| MonthRow {
                month: m.month.clone(),
                amount: format_money(m.amount),
            })
            .collect();
        print_table(&rows);
    }

    if with_history {
        print_header("History");
        let rows: Vec<HistoryRow> = snapshot
            .history
            .iter()
            .map(|p| HistoryRow {
                date: p.date.to_string(),
                portfolio: format_money(p.portfolio_value),
                invested: format_money(p.net_invested),
                benchmark: format_money(p.benchmark_value),
            })
            .collect();
        print_table(&rows);
    }

    if !quiet && !snapshot.warnings.is_empty() {
        eprintln!();
        for warning in &snapshot.warnings {
            print_warning(warning);
        }
    }
}
