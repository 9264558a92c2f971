//! Brent's root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{ObjectiveFunction, Solver1D, SolverConfig, SolverResult, SolverState};

/// Brent's method solver.
///
/// Combines the reliability of bisection with the speed of the secant method
/// and inverse quadratic interpolation. This is generally the best choice
/// when a derivative is not available.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrentSolver {
    config: SolverConfig,
}

impl BrentSolver {
    /// Creates a Brent solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver1D for BrentSolver {
    fn name(&self) -> &'static str {
        "Brent"
    }

    fn config(&self) -> &SolverConfig {
        &self.config
    }

    #[allow(clippy::many_single_char_names)]
    fn iterate<F>(&self, f: &F, state: &mut SolverState, accuracy: f64) -> MathResult<f64>
    where
        F: ObjectiveFunction + ?Sized,
    {
        // `a` is the previous estimate, `b` the current one and `c` the
        // contrapoint keeping the sign change with `b`.
        let (mut a, mut fa) = (state.x_min, state.fx_min);
        let (mut c, mut fc) = (state.x_max, state.fx_max);
        let mut b = state.x_max;
        let mut fb = state.fx_max;
        let mut d = 0.0_f64;
        let mut e = 0.0_f64;

        while state.evaluations <= self.config.max_evaluations {
            if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * accuracy;
            let mid = (c - b) / 2.0;
            if mid.abs() <= tol || fb == 0.0 {
                state.root = b;
                return Ok(b);
            }

            if e.abs() >= tol && fa.abs() > fb.abs() {
                // Attempt inverse quadratic interpolation
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    (2.0 * mid * s, 1.0 - s)
                } else {
                    let qa = fa / fc;
                    let r = fb / fc;
                    (
                        s * (2.0 * mid * qa * (qa - r) - (b - a) * (r - 1.0)),
                        (qa - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                if p > 0.0 {
                    q = -q;
                }
                p = p.abs();

                let min1 = 3.0 * mid * q - (tol * q).abs();
                let min2 = (e * q).abs();
                if 2.0 * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = mid;
                    e = d;
                }
            } else {
                d = mid;
                e = d;
            }

            a = b;
            fa = fb;
            b += if d.abs() > tol { d } else { tol.copysign(mid) };
            fb = state.evaluate(f, b);
            state.root = b;
        }

        Err(MathError::max_evaluations_exceeded(self.config.max_evaluations))
    }
}

/// Brent root finding on a known bracket.
///
/// Requires: `f(a) * f(b) < 0` (opposite signs at endpoints)
///
/// # Example
///
/// ```rust
/// use kestrel_math::solvers::{brent, SolverConfig};
///
/// // Find root of x^3 - x - 2
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let result = brent(f, 1.0, 2.0, 1e-12, &SolverConfig::default()).unwrap();
/// assert!((f(result.root)).abs() < 1e-10);
/// ```
pub fn brent<F>(
    f: F,
    a: f64,
    b: f64,
    accuracy: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    BrentSolver::new(*config).solve_in_bracket(&f, accuracy, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;

        let result = brent(f, 1.0, 2.0, 1e-12, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_cubic() {
        // x^3 - x - 2 has a root near 1.52
        let f = |x: f64| x * x * x - x - 2.0;

        let result = brent(f, 1.0, 2.0, 1e-12, &SolverConfig::default()).unwrap();

        assert!(f(result.root).abs() < 1e-10);
        assert_relative_eq!(result.root, 1.521_379_706_804_568, epsilon = 1e-10);
    }

    #[test]
    fn test_sin() {
        // Find root of sin(x) near pi
        let f = |x: f64| x.sin();

        let result = brent(f, 3.0, 4.0, 1e-12, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::PI, epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x - 2.0;

        let result = brent(f, 2.0, 3.0, 1e-12, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_faster_than_bisection() {
        let f = |x: f64| x * x - 2.0;
        let config = SolverConfig::default();

        let brent_result = brent(f, 1.0, 2.0, 1e-10, &config).unwrap();

        // Bisection needs ~34 halvings for 1e-10
        assert!(brent_result.evaluations < 20);
    }
}
