//! Configuration for analytics computation.

use folio_core::Date;
use folio_math::solvers::{SolverConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use serde::{Deserialize, Serialize};

/// Benchmark used when neither the input nor the config names one.
pub const DEFAULT_BENCHMARK_SYMBOL: &str = "^GSPC";

/// Spacing of history points in days.
pub const DEFAULT_HISTORY_INTERVAL_DAYS: u32 = 7;

/// Settings for the money-weighted return solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Convergence tolerance on the normalised NPV.
    pub tolerance: f64,
    /// Iteration budget per solve.
    pub max_iterations: u32,
    /// Starting rate for Newton-Raphson.
    pub initial_guess: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            initial_guess: 0.1,
        }
    }
}

impl SolverSettings {
    /// Returns the root-finder configuration.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.tolerance, self.max_iterations)
    }
}

/// Configuration for one metrics computation.
///
/// Every computation takes its configuration explicitly; there is no
/// process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Valuation date. When unset, today is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<Date>,

    /// Symbol reported for the benchmark when the input does not name one.
    pub benchmark_symbol: String,

    /// Days between history points.
    pub history_interval_days: u32,

    /// Compare reported holdings with the replayed ledger.
    pub reconcile_holdings: bool,

    /// Return solver settings.
    pub solver: SolverSettings,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            as_of: None,
            benchmark_symbol: DEFAULT_BENCHMARK_SYMBOL.to_string(),
            history_interval_days: DEFAULT_HISTORY_INTERVAL_DAYS,
            reconcile_holdings: true,
            solver: SolverSettings::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the valuation date.
    #[must_use]
    pub fn with_as_of(mut self, as_of: Date) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// Sets the benchmark symbol.
    #[must_use]
    pub fn with_benchmark_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.benchmark_symbol = symbol.into();
        self
    }

    /// Sets the solver settings.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverSettings) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the history spacing.
    #[must_use]
    pub fn with_history_interval_days(mut self, days: u32) -> Self {
        self.history_interval_days = days;
        self
    }

    /// Sets whether holdings are reconciled against the ledger.
    #[must_use]
    pub fn with_reconcile_holdings(mut self, enabled: bool) -> Self {
        self.reconcile_holdings = enabled;
        self
    }

    /// History spacing, never less than one day.
    #[must_use]
    pub fn history_step(&self) -> i64 {
        i64::from(self.history_interval_days.max(1))
    }
}
