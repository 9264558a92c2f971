//! Secant root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{ObjectiveFunction, Solver1D, SolverConfig, SolverResult, SolverState};

/// Secant solver.
///
/// Similar to Newton-Raphson but approximates the derivative from the two
/// most recent estimates. The bracket only supplies the starting pair, so
/// iterates are free to leave it.
///
/// Convergence rate is superlinear (order ~1.618, the golden ratio).
#[derive(Debug, Clone, Copy, Default)]
pub struct SecantSolver {
    config: SolverConfig,
}

impl SecantSolver {
    /// Creates a secant solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver1D for SecantSolver {
    fn name(&self) -> &'static str {
        "Secant"
    }

    fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn iterate<F>(&self, f: &F, state: &mut SolverState, accuracy: f64) -> MathResult<f64>
    where
        F: ObjectiveFunction + ?Sized,
    {
        // Start from the endpoint with the smaller residual
        let (root, mut f_root, mut x_prev, mut f_prev) = if state.fx_min.abs() < state.fx_max.abs()
        {
            (state.x_min, state.fx_min, state.x_max, state.fx_max)
        } else {
            (state.x_max, state.fx_max, state.x_min, state.fx_min)
        };
        state.root = root;

        while state.evaluations <= self.config.max_evaluations {
            let denom = f_root - f_prev;
            if denom == 0.0 {
                return Err(MathError::DivisionByZero { value: denom });
            }
            let dx = (x_prev - state.root) * f_root / denom;
            x_prev = state.root;
            f_prev = f_root;
            state.root += dx;
            f_root = state.evaluate(f, state.root);
            if dx.abs() < accuracy || f_root == 0.0 {
                return Ok(state.root);
            }
        }

        Err(MathError::max_evaluations_exceeded(self.config.max_evaluations))
    }
}

/// Secant root finding started from a known bracket.
///
/// # Example
///
/// ```rust
/// use kestrel_math::solvers::{secant, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
///
/// let result = secant(f, 1.0, 2.0, 1e-12, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn secant<F>(
    f: F,
    a: f64,
    b: f64,
    accuracy: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    SecantSolver::new(*config).solve_in_bracket(&f, accuracy, a, b)
}
