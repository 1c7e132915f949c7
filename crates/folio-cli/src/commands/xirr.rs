//! XIRR command implementation.
//!
//! Computes the money-weighted return of a plain `date,amount` CSV.
//! Negative amounts are money paid in, positive amounts money received;
//! the final market value goes in as a positive row.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use folio_analytics::returns::{money_weighted_return, ReturnOutcome};
use folio_core::types::{CashFlow, CashFlowKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::parse_date;
use crate::cli::{Context, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output::{print_header, print_json, print_table, KeyValue};

/// Arguments for the xirr command.
#[derive(Args, Debug)]
pub struct XirrArgs {
    /// Cash flow file with `date,amount` columns
    #[arg(short, long)]
    pub input: PathBuf,
}

#[derive(Debug, Deserialize)]
struct FlowRow {
    date: String,
    amount: String,
}

#[derive(Debug, Serialize)]
struct XirrReport {
    flows: usize,
    xirr: ReturnOutcome,
}

/// Executes the xirr command.
pub fn execute(args: XirrArgs, ctx: &Context) -> Result<()> {
    let config = super::config::load(ctx.config_path.as_deref())?;
    let file = std::fs::File::open(&args.input).map_err(|e| {
        CliError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {e}", args.input.display()),
        ))
    })?;
    let flows = read_flows(file)?;

    let outcome = money_weighted_return(&flows, &config.solver);
    tracing::debug!(flows = flows.len(), %outcome, "computed xirr");

    match ctx.format {
        OutputFormat::Json => print_json(&XirrReport {
            flows: flows.len(),
            xirr: outcome,
        })?,
        OutputFormat::Table => {
            if !ctx.quiet {
                print_header("Money-Weighted Return");
            }
            let mut rows = vec![KeyValue::new("Flows", flows.len().to_string())];
            if let (Some(first), Some(last)) = (flows.first(), flows.last()) {
                rows.push(KeyValue::new("First", first.date.to_string()));
                rows.push(KeyValue::new("Last", last.date.to_string()));
            }
            rows.push(KeyValue::new("XIRR", outcome.to_string()));
            if let ReturnOutcome::Indeterminate(reason) = outcome {
                rows.push(KeyValue::new("Reason", reason.to_string()));
            }
            print_table(&rows);
        }
    }

    Ok(())
}

/// Reads `date,amount` rows into cash flows, sorted by date.
fn read_flows<R: std::io::Read>(reader: R) -> CliResult<Vec<CashFlow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut flows = Vec::new();
    for (index, record) in csv_reader.deserialize::<FlowRow>().enumerate() {
        // header is line 1
        let line = index as u64 + 2;
        let row = record.map_err(|e| CliError::Csv {
            line,
            reason: e.to_string(),
        })?;
        let date = parse_date(&row.date).map_err(|e| CliError::Csv {
            line,
            reason: e.to_string(),
        })?;
        let amount: Decimal = row.amount.replace(',', "").parse().map_err(|_| CliError::Csv {
            line,
            reason: format!("invalid amount: {}", row.amount),
        })?;
        let kind = if amount.is_sign_negative() {
            CashFlowKind::Contribution
        } else {
            CashFlowKind::Withdrawal
        };
        flows.push(CashFlow::new(date, amount, kind));
    }

    flows.sort_by_key(|cf| cf.date);
    Ok(flows)
}
