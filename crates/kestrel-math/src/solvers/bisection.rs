//! Bisection root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{ObjectiveFunction, Solver1D, SolverConfig, SolverResult, SolverState};

/// Bisection solver.
///
/// A simple and reliable bracketing method that works by repeatedly
/// halving the interval and keeping the half containing the sign change.
#[derive(Debug, Clone, Copy, Default)]
pub struct BisectionSolver {
    config: SolverConfig,
}

impl BisectionSolver {
    /// Creates a bisection solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver1D for BisectionSolver {
    fn name(&self) -> &'static str {
        "Bisection"
    }

    fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn iterate<F>(&self, f: &F, state: &mut SolverState, accuracy: f64) -> MathResult<f64>
    where
        F: ObjectiveFunction + ?Sized,
    {
        // Orient the search so that f > 0 lies at root + dx
        let mut dx = if state.fx_min < 0.0 {
            state.root = state.x_min;
            state.x_max - state.x_min
        } else {
            state.root = state.x_max;
            state.x_min - state.x_max
        };

        while state.evaluations <= self.config.max_evaluations {
            dx /= 2.0;
            let mid = state.root + dx;
            let f_mid = state.evaluate(f, mid);
            if f_mid <= 0.0 {
                state.root = mid;
            }
            if dx.abs() < accuracy || f_mid == 0.0 {
                return Ok(state.root);
            }
        }

        Err(MathError::max_evaluations_exceeded(self.config.max_evaluations))
    }
}

/// Bisection root finding on a known bracket.
///
/// Requires: `f(a) * f(b) < 0` (opposite signs at endpoints)
///
/// # Example
///
/// ```rust
/// use kestrel_math::solvers::{bisection, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
///
/// let result = bisection(f, 1.0, 2.0, 1e-12, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn bisection<F>(
    f: F,
    a: f64,
    b: f64,
    accuracy: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    BisectionSolver::new(*config).solve_in_bracket(&f, accuracy, a, b)
}
