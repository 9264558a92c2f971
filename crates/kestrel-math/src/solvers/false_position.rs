//! False-position root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{ObjectiveFunction, Solver1D, SolverConfig, SolverResult, SolverState};

/// False-position (regula falsi) solver.
///
/// Each iteration interpolates linearly between the two bracket endpoints
/// and replaces the endpoint whose value has the same sign as the new
/// evaluation. Only one endpoint moves per iteration and the other keeps its
/// function value, so the bracket always straddles the root. This is the
/// classic variant; the stale endpoint value is never scaled down.
///
/// Converges when the moved endpoint shifts by less than the accuracy, or
/// when the objective is exactly zero at the new estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FalsePositionSolver {
    config: SolverConfig,
}

impl FalsePositionSolver {
    /// Creates a false-position solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver1D for FalsePositionSolver {
    fn name(&self) -> &'static str {
        "FalsePosition"
    }

    fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn iterate<F>(&self, f: &F, state: &mut SolverState, accuracy: f64) -> MathResult<f64>
    where
        F: ObjectiveFunction + ?Sized,
    {
        let mut bracket = Straddle::from_state(state);

        while state.evaluations <= self.config.max_evaluations {
            state.root = bracket.interpolate();
            let f_root = state.evaluate(f, state.root);
            let displacement = bracket.replace(state.root, f_root);

            if displacement.abs() < accuracy || f_root == 0.0 {
                return Ok(state.root);
            }
        }

        Err(MathError::max_evaluations_exceeded(self.config.max_evaluations))
    }
}

/// Bracket oriented so that `f(xl) < 0 <= f(xh)`.
#[derive(Debug, Clone, Copy)]
struct Straddle {
    xl: f64,
    fl: f64,
    xh: f64,
    fh: f64,
}

impl Straddle {
    fn from_state(state: &SolverState) -> Self {
        if state.fx_min < 0.0 {
            Self {
                xl: state.x_min,
                fl: state.fx_min,
                xh: state.x_max,
                fh: state.fx_max,
            }
        } else {
            Self {
                xl: state.x_max,
                fl: state.fx_max,
                xh: state.x_min,
                fh: state.fx_min,
            }
        }
    }

    fn interpolate(&self) -> f64 {
        self.xl + (self.xh - self.xl) * self.fl / (self.fl - self.fh)
    }

    /// Moves the endpoint on the same side as `f_root`; returns how far it moved.
    fn replace(&mut self, root: f64, f_root: f64) -> f64 {
        if f_root < 0.0 {
            let displacement = self.xl - root;
            self.xl = root;
            self.fl = f_root;
            displacement
        } else {
            let displacement = self.xh - root;
            self.xh = root;
            self.fh = f_root;
            displacement
        }
    }

    #[cfg(test)]
    fn straddles_root(&self) -> bool {
        self.fl < 0.0 && self.fh >= 0.0
    }
}

/// False-position root finding on a known bracket.
///
/// Convenience wrapper around [`FalsePositionSolver::solve_in_bracket`].
///
/// # Example
///
/// ```rust
/// use kestrel_math::solvers::{false_position, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let result = false_position(f, 0.0, 2.0, 1e-8, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-7);
/// ```
pub fn false_position<F>(
    f: F,
    a: f64,
    b: f64,
    accuracy: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    FalsePositionSolver::new(*config).solve_in_bracket(&f, accuracy, a, b)
}
