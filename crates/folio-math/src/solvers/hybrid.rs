//! Hybrid root-finding algorithm.
//!
//! Newton-Raphson for speed, bisection over a bracket for robustness.

use tracing::debug;

use crate::error::{MathError, MathResult};
use crate::solvers::{bisection, SolverConfig, SolverResult};

/// Consecutive residual blow-ups tolerated before Newton is abandoned.
const MAX_DIVERGENCE: u32 = 3;

/// Newton iterations allowed before falling back.
const MAX_NEWTON_ITERATIONS: u32 = 20;

/// Derivatives smaller than this in magnitude stop Newton.
const MIN_DERIVATIVE: f64 = 1e-15;

/// Hybrid root-finding algorithm.
///
/// # Strategy
///
/// 1. Run Newton-Raphson with divergence monitoring and a short iteration cap
/// 2. If Newton converges inside `bounds` (when given), return it
/// 3. Otherwise bisect over `bounds`
/// 4. Without bounds, return Newton's error
///
/// # Example
///
/// ```rust
/// use folio_math::solvers::{hybrid, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let df = |x: f64| 3.0 * x * x - 1.0;
///
/// let result = hybrid(f, df, 1.5, Some((1.0, 2.0)), &SolverConfig::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-10);
/// ```
pub fn hybrid<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let newton = newton_with_monitoring(&f, &df, initial_guess, config);

    match (newton, bounds) {
        (Ok(result), None) => Ok(result),
        (Ok(result), Some((a, b))) if result.root >= a.min(b) && result.root <= a.max(b) => {
            Ok(result)
        }
        (Ok(result), Some((a, b))) => {
            debug!(
                root = result.root,
                a, b, "Newton converged outside bracket, bisecting"
            );
            bisection(&f, a, b, config)
        }
        (Err(e), Some((a, b))) => {
            debug!(error = %e, a, b, "Newton failed, bisecting");
            bisection(&f, a, b, config)
        }
        (Err(e), None) => Err(e),
    }
}

fn newton_with_monitoring<F, DF>(
    f: &F,
    df: &DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;
    let mut prev_residual = f64::MAX;
    let mut divergence_count = 0;

    let max_iter = config.max_iterations.min(MAX_NEWTON_ITERATIONS);

    for iteration in 0..max_iter {
        let fx = f(x);
        if !fx.is_finite() {
            return Err(MathError::NonFinite { x });
        }

        let residual = fx.abs();
        if residual < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        if residual > prev_residual * 2.0 {
            divergence_count += 1;
            if divergence_count >= MAX_DIVERGENCE {
                return Err(MathError::invalid_input("Newton-Raphson diverging"));
            }
        } else {
            divergence_count = 0;
        }
        prev_residual = residual;

        let dfx = df(x);
        if !dfx.is_finite() || dfx.abs() < MIN_DERIVATIVE {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let step = fx / dfx;
        if step.abs() > 1e10 {
            return Err(MathError::invalid_input("Newton step too large"));
        }

        x -= step;
        if !x.is_finite() {
            return Err(MathError::NonFinite { x });
        }

        if step.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: f(x),
            });
        }
    }

    Err(MathError::convergence_failed(max_iter, f(x).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_newton_path() {
        let f = |x: f64| x * x - 4.0;
        let df = |x: f64| 2.0 * x;

        let result = hybrid(f, df, 3.0, None, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_bisection_fallback_on_flat_derivative() {
        // Newton starts on a stationary point
        let f = |x: f64| x * x * x - 1.0;
        let df = |x: f64| 3.0 * x * x;

        let result = hybrid(f, df, 0.0, Some((0.0, 2.0)), &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_root_outside_bracket_is_rejected() {
        // Roots at -2 and 2; Newton from -3 finds -2, bracket holds 2
        let f = |x: f64| x * x - 4.0;
        let df = |x: f64| 2.0 * x;

        let result = hybrid(f, df, -3.0, Some((0.0, 5.0)), &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_derivative_without_bounds() {
        let f = |x: f64| x * x * x - 1.0;
        let df = |x: f64| 3.0 * x * x;

        let err = hybrid(f, df, 0.0, None, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::DivisionByZero { .. }));
    }

    #[test]
    fn test_no_bounds_no_root() {
        let f = |x: f64| x * x + 1.0;
        let df = |x: f64| 2.0 * x;

        assert!(hybrid(f, df, 0.5, None, &SolverConfig::default()).is_err());
    }
}
