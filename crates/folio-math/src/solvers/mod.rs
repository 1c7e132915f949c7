//! Root-finding algorithms.
//!
//! - [`bisection`]: Slow but guaranteed once a root is bracketed
//! - [`hybrid`]: Newton-Raphson with divergence monitoring, bisection fallback over a bracket
//! - [`find_bracket`]: Bounded outward search for a sign change
//!
//! Every solver stops after [`SolverConfig::max_iterations`] and reports
//! [`MathError::ConvergenceFailed`](crate::MathError::ConvergenceFailed)
//! instead of returning its last iterate.
//!
//! # Example: internal rate of return
//!
//! ```rust
//! use folio_math::solvers::{find_bracket, hybrid, SolverConfig};
//!
//! // Pay 100 now, receive 110 in one year
//! let npv = |r: f64| -100.0 + 110.0 / (1.0 + r);
//! let d_npv = |r: f64| -110.0 / ((1.0 + r) * (1.0 + r));
//!
//! let bracket = find_bracket(&npv, -0.99, 1.0, 20);
//! let result = hybrid(npv, d_npv, 0.1, bracket, &SolverConfig::default()).unwrap();
//! assert!((result.root - 0.10).abs() < 1e-9);
//! ```

mod bisection;
mod hybrid;

pub use bisection::bisection;
pub use hybrid::hybrid;

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance for convergence, applied to both residual and step size.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
}

/// Searches for an interval `[lower, upper']` on which `f` changes sign.
///
/// `lower` is fixed; the upper end starts at `upper` and doubles its distance
/// from `lower` at most `max_expansions` times. Returns `None` when no sign
/// change is found or `f` is not finite at the probed points.
pub fn find_bracket<F>(f: &F, lower: f64, upper: f64, max_expansions: u32) -> Option<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let f_lower = f(lower);
    if !f_lower.is_finite() {
        return None;
    }
    if f_lower == 0.0 {
        return Some((lower, lower));
    }

    let mut hi = upper;
    for _ in 0..=max_expansions {
        let f_hi = f(hi);
        if !f_hi.is_finite() {
            return None;
        }
        if f_lower.signum() != f_hi.signum() || f_hi == 0.0 {
            return Some((lower, hi));
        }
        hi = lower + (hi - lower) * 2.0;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solver_config() {
        let config = SolverConfig::default()
            .with_tolerance(1e-8)
            .with_max_iterations(50);

        assert!((config.tolerance - 1e-8).abs() < f64::EPSILON);
        assert_eq!(config.max_iterations, 50);
    }

    #[test]
    fn test_find_bracket_expands() {
        // Root at 5, initial upper at 1
        let f = |x: f64| x - 5.0;
        let (lo, hi) = find_bracket(&f, 0.0, 1.0, 10).unwrap();
        assert_relative_eq!(lo, 0.0);
        assert!(hi >= 5.0);
    }

    #[test]
    fn test_find_bracket_gives_up() {
        let f = |x: f64| x * x + 1.0;
        assert!(find_bracket(&f, 0.0, 1.0, 5).is_none());
    }

    #[test]
    fn test_find_bracket_non_finite() {
        let f = |x: f64| 1.0 / x;
        assert!(find_bracket(&f, 0.0, 1.0, 5).is_none());
    }

    /// Two-flow IRR has a closed form: (terminal / invested)^(1/t) - 1.
    #[test]
    fn test_two_flow_irr_matches_closed_form() {
        let invested = 1_000.0;
        let terminal = 1_500.0;
        let years = 2.5_f64;

        let f = |r: f64| -invested + terminal / (1.0 + r).powf(years);
        let df = |r: f64| -years * terminal / (1.0 + r).powf(years + 1.0);

        let bracket = find_bracket(&f, -0.99, 1.0, 20);
        let result = hybrid(f, df, 0.1, bracket, &SolverConfig::default()).unwrap();

        let expected = (terminal / invested).powf(1.0 / years) - 1.0;
        assert_relative_eq!(result.root, expected, epsilon = 1e-9);
    }
}
