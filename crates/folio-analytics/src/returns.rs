//! Money-weighted return (XIRR).
//!
//! Solves `Σ amount_i / (1 + r)^(t_i) = 0` where `t_i` is the ACT/365F year
//! fraction from the first flow. The NPV is divided by `Σ |amount_i|` so the
//! solver tolerance does not depend on portfolio size.
//!
//! The search is bounded: Newton-Raphson from the configured guess, then
//! bisection over a bracket that starts at `[-0.999999, 1.0]` and doubles its
//! upper end a fixed number of times. A return that cannot be found is an
//! [`ReturnOutcome::Indeterminate`] value, never zero.

use std::fmt;

use folio_core::daycounts::{Act365Fixed, DayCount};
use folio_core::types::{CashFlow, CashFlowKind, Date};
use folio_math::solvers::{find_bracket, hybrid};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::cashflows::with_terminal;
use crate::config::SolverSettings;

/// Lowest rate probed; `-100%` itself is a pole of the NPV.
pub const RATE_FLOOR: f64 = -0.999_999;

/// Upper end of the first bracket probed.
pub const INITIAL_RATE_CAP: f64 = 1.0;

/// Number of times the upper bracket end may double.
pub const MAX_BRACKET_EXPANSIONS: u32 = 12;

/// Why a return could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndeterminateReason {
    /// Fewer than two non-zero flows.
    InsufficientFlows,
    /// Every non-zero flow has the same sign.
    NoSignChange,
    /// The solver found no root within its budget.
    NoConvergence,
}

impl fmt::Display for IndeterminateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            IndeterminateReason::InsufficientFlows => "fewer than two non-zero cash flows",
            IndeterminateReason::NoSignChange => "cash flows never change sign",
            IndeterminateReason::NoConvergence => "solver did not converge",
        };
        write!(f, "{reason}")
    }
}

/// Result of a money-weighted return calculation.
///
/// Serializes as the annual rate in percent, or the string `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReturnOutcome {
    /// Annualized rate as a fraction (`0.1` is 10%).
    Rate(f64),
    /// No meaningful rate exists.
    Indeterminate(IndeterminateReason),
}

impl ReturnOutcome {
    /// The rate as a fraction, if determinate.
    #[must_use]
    pub fn rate(&self) -> Option<f64> {
        match self {
            ReturnOutcome::Rate(r) => Some(*r),
            ReturnOutcome::Indeterminate(_) => None,
        }
    }

    /// The rate in percent, if determinate.
    #[must_use]
    pub fn percent(&self) -> Option<f64> {
        self.rate().map(|r| r * 100.0)
    }

    /// Returns true if a rate was found.
    #[must_use]
    pub fn is_determinate(&self) -> bool {
        matches!(self, ReturnOutcome::Rate(_))
    }
}

impl fmt::Display for ReturnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent() {
            Some(pct) => write!(f, "{pct:.2}%"),
            None => write!(f, "N/A"),
        }
    }
}

impl Serialize for ReturnOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.percent() {
            Some(pct) => serializer.serialize_f64(pct),
            None => serializer.serialize_str("N/A"),
        }
    }
}

/// Computes the money-weighted return of `flows`.
///
/// The series should already include the terminal valuation marker; see
/// [`with_terminal`](crate::cashflows::with_terminal).
#[must_use]
pub fn money_weighted_return(flows: &[CashFlow], settings: &SolverSettings) -> ReturnOutcome {
    let mut points: Vec<(Date, Decimal)> = flows
        .iter()
        .filter(|cf| !cf.amount.is_zero())
        .map(|cf| (cf.date, cf.amount))
        .collect();

    if points.len() < 2 {
        return ReturnOutcome::Indeterminate(IndeterminateReason::InsufficientFlows);
    }

    let has_inflow = points.iter().any(|(_, a)| a.is_sign_positive());
    let has_outflow = points.iter().any(|(_, a)| a.is_sign_negative());
    if !(has_inflow && has_outflow) {
        return ReturnOutcome::Indeterminate(IndeterminateReason::NoSignChange);
    }

    points.sort_by_key(|(date, _)| *date);
    let start = points[0].0;
    let scale: Decimal = points.iter().map(|(_, a)| a.abs()).sum();

    let terms: Vec<(f64, f64)> = points
        .iter()
        .map(|(date, amount)| {
            let t = Act365Fixed.year_fraction_f64(start, *date);
            let a = (*amount / scale).to_f64().unwrap_or(0.0);
            (t, a)
        })
        .collect();

    let npv = |r: f64| -> f64 {
        terms
            .iter()
            .map(|(t, a)| a * (1.0 + r).powf(-t))
            .sum()
    };
    let d_npv = |r: f64| -> f64 {
        terms
            .iter()
            .map(|(t, a)| -t * a * (1.0 + r).powf(-t - 1.0))
            .sum()
    };

    let bracket = find_bracket(&npv, RATE_FLOOR, INITIAL_RATE_CAP, MAX_BRACKET_EXPANSIONS);
    debug!(flows = terms.len(), ?bracket, "solving money-weighted return");

    match hybrid(
        npv,
        d_npv,
        settings.initial_guess,
        bracket,
        &settings.solver_config(),
    ) {
        Ok(result) if result.root.is_finite() && result.root > -1.0 => {
            debug!(
                rate = result.root,
                iterations = result.iterations,
                "money-weighted return converged"
            );
            ReturnOutcome::Rate(result.root)
        }
        Ok(result) => {
            debug!(root = result.root, "rejected root outside the rate domain");
            ReturnOutcome::Indeterminate(IndeterminateReason::NoConvergence)
        }
        Err(e) => {
            debug!(error = %e, "money-weighted return did not converge");
            ReturnOutcome::Indeterminate(IndeterminateReason::NoConvergence)
        }
    }
}

/// Money-weighted return over the window `(start, end]`.
///
/// The portfolio value at `start` is treated as a contribution on `start`
/// and the value at `end` as the terminal marker. Real flows outside the
/// window and any existing terminal markers are ignored.
#[must_use]
pub fn money_weighted_return_between(
    flows: &[CashFlow],
    start: Date,
    start_value: Decimal,
    end: Date,
    end_value: Decimal,
    settings: &SolverSettings,
) -> ReturnOutcome {
    let mut window = Vec::with_capacity(flows.len() + 2);
    if !start_value.is_zero() {
        window.push(CashFlow::new(start, -start_value, CashFlowKind::Contribution));
    }
    window.extend(
        flows
            .iter()
            .filter(|cf| cf.kind.is_real() && cf.date > start && cf.date <= end)
            .cloned(),
    );
    money_weighted_return(&with_terminal(window, end, end_value), settings)
}
