//! Newton-Raphson root-finding algorithms.
//!
//! Both solvers need the objective's derivative, supplied through
//! [`ObjectiveFunction::derivative`] (see [`with_derivative`]).
//!
//! [`with_derivative`]: crate::solvers::with_derivative

use log::debug;

use crate::error::{MathError, MathResult};
use crate::solvers::{
    with_derivative, ObjectiveFunction, Solver1D, SolverConfig, SolverResult, SolverState,
};

/// Newton-Raphson solver.
///
/// Uses the iteration `x_{n+1} = x_n - f(x_n) / f'(x_n)`, starting from the
/// bracket midpoint. If a step leaves the bracket, the search continues with
/// [`NewtonSafeSolver`] from the last point inside it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonSolver {
    config: SolverConfig,
}

impl NewtonSolver {
    /// Creates a Newton solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver1D for NewtonSolver {
    fn name(&self) -> &'static str {
        "Newton"
    }

    fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn iterate<F>(&self, f: &F, state: &mut SolverState, accuracy: f64) -> MathResult<f64>
    where
        F: ObjectiveFunction + ?Sized,
    {
        let (mut f_root, mut df_root) = state.evaluate_with_derivative(f, state.root)?;

        while state.evaluations <= self.config.max_evaluations {
            if df_root == 0.0 {
                debug!("Newton: flat derivative at {}, switching to NewtonSafe", state.root);
                return NewtonSafeSolver::new(self.config)
                    .iterate_from(f, state, accuracy, f_root, df_root);
            }
            let dx = f_root / df_root;
            let previous = state.root;
            state.root -= dx;

            if (state.x_min - state.root) * (state.root - state.x_max) < 0.0 {
                debug!(
                    "Newton: step left [{}, {}], switching to NewtonSafe",
                    state.x_min, state.x_max
                );
                state.root = previous;
                return NewtonSafeSolver::new(self.config)
                    .iterate_from(f, state, accuracy, f_root, df_root);
            }
            if dx.abs() < accuracy {
                return Ok(state.root);
            }

            (f_root, df_root) = state.evaluate_with_derivative(f, state.root)?;
        }

        Err(MathError::max_evaluations_exceeded(self.config.max_evaluations))
    }
}

/// Safeguarded Newton-Raphson solver.
///
/// Takes a Newton step when it stays inside the bracket and at least halves
/// the step before last; otherwise bisects. The bracket is tightened after
/// every evaluation, so convergence is guaranteed for a continuous function.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonSafeSolver {
    config: SolverConfig,
}

impl NewtonSafeSolver {
    /// Creates a safeguarded Newton solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Runs the safeguarded iteration from `state.root`, where the value and
    /// derivative are already known.
    fn iterate_from<F>(
        &self,
        f: &F,
        state: &mut SolverState,
        accuracy: f64,
        mut f_root: f64,
        mut df_root: f64,
    ) -> MathResult<f64>
    where
        F: ObjectiveFunction + ?Sized,
    {
        // Orient the search so that f(xl) < 0
        let (mut xl, mut xh) = if state.fx_min < 0.0 {
            (state.x_min, state.x_max)
        } else {
            (state.x_max, state.x_min)
        };

        let mut dx_old = state.x_max - state.x_min;
        let mut dx = dx_old;

        while state.evaluations <= self.config.max_evaluations {
            let out_of_range =
                ((state.root - xh) * df_root - f_root) * ((state.root - xl) * df_root - f_root) > 0.0;
            let too_slow = (2.0 * f_root).abs() > (dx_old * df_root).abs();

            dx_old = dx;
            if out_of_range || too_slow {
                dx = (xh - xl) / 2.0;
                state.root = xl + dx;
            } else {
                dx = f_root / df_root;
                state.root -= dx;
            }

            if dx.abs() < accuracy {
                return Ok(state.root);
            }

            (f_root, df_root) = state.evaluate_with_derivative(f, state.root)?;
            if f_root < 0.0 {
                xl = state.root;
            } else {
                xh = state.root;
            }
        }

        Err(MathError::max_evaluations_exceeded(self.config.max_evaluations))
    }
}

impl Solver1D for NewtonSafeSolver {
    fn name(&self) -> &'static str {
        "NewtonSafe"
    }

    fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn iterate<F>(&self, f: &F, state: &mut SolverState, accuracy: f64) -> MathResult<f64>
    where
        F: ObjectiveFunction + ?Sized,
    {
        let (f_root, df_root) = state.evaluate_with_derivative(f, state.root)?;
        self.iterate_from(f, state, accuracy, f_root, df_root)
    }
}

/// Newton-Raphson root finding on a known bracket.
///
/// # Example
///
/// ```rust
/// use kestrel_math::solvers::{newton, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = newton(f, df, 1.0, 2.0, 1e-12, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton<F, DF>(
    f: F,
    df: DF,
    a: f64,
    b: f64,
    accuracy: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    NewtonSolver::new(*config).solve_in_bracket(&with_derivative(f, df), accuracy, a, b)
}

/// Safeguarded Newton-Raphson root finding on a known bracket.
pub fn newton_safe<F, DF>(
    f: F,
    df: DF,
    a: f64,
    b: f64,
    accuracy: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    NewtonSafeSolver::new(*config).solve_in_bracket(&with_derivative(f, df), accuracy, a, b)
}
