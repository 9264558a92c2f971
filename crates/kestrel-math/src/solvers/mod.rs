//! One-dimensional root-finding algorithms.
//!
//! Every algorithm implements [`Solver1D`], which supplies the shared
//! protocol: evaluation counting, accuracy handling, bracket validation and
//! automatic bracketing. An algorithm only provides the iteration rule
//! ([`Solver1D::iterate`]) that runs once a sign change is known.
//!
//! - [`FalsePositionSolver`]: linear interpolation, one endpoint moves per step
//! - [`BisectionSolver`]: halves the bracket, slow but certain
//! - [`SecantSolver`]: superlinear, not bracket-preserving
//! - [`BrentSolver`]: inverse quadratic interpolation with bisection fallback
//! - [`NewtonSolver`]: quadratic convergence, needs the derivative
//! - [`NewtonSafeSolver`]: Newton safeguarded by bisection
//!
//! # Choosing a Solver
//!
//! | Solver | Speed | Reliability | Requires |
//! |--------|-------|-------------|----------|
//! | Newton | Fastest (quadratic) | Falls back to safe Newton | Derivative |
//! | Safe Newton | Fast | Guaranteed | Derivative |
//! | Brent | Fast (superlinear) | Guaranteed | Bracket |
//! | Secant | Fast (superlinear) | May diverge | Bracket |
//! | False position | Linear to superlinear | Guaranteed | Bracket |
//! | Bisection | Slow (linear) | Guaranteed | Bracket |
//!
//! # Example: Yield from Price
//!
//! ```rust
//! use kestrel_math::solvers::{FalsePositionSolver, Solver1D};
//!
//! // Bond: 5% annual coupon, 5 years, price 95
//! let price_fn = |y: f64| {
//!     let mut pv = 0.0;
//!     for t in 1..=5 {
//!         pv += 5.0 / (1.0 + y).powi(t);
//!     }
//!     pv += 100.0 / (1.0 + y).powi(5);
//!     pv - 95.0
//! };
//!
//! let solver = FalsePositionSolver::default();
//! let result = solver.solve(&price_fn, 1e-10, 0.05, 0.01).unwrap();
//! assert!(result.root > 0.05); // discount bond yields more than its coupon
//! ```

mod bisection;
mod brent;
mod false_position;
mod newton;
mod secant;

pub use bisection::{bisection, BisectionSolver};
pub use brent::{brent, BrentSolver};
pub use false_position::{false_position, FalsePositionSolver};
pub use newton::{newton, newton_safe, NewtonSafeSolver, NewtonSolver};
pub use secant::{secant, SecantSolver};

use log::{debug, trace, warn};

use crate::error::{MathError, MathResult};

/// Default ceiling on objective evaluations per solve.
pub const DEFAULT_MAX_EVALUATIONS: u32 = 100;

/// Default factor by which automatic bracketing widens the search interval.
pub const DEFAULT_GROWTH_FACTOR: f64 = 1.6;

/// A scalar function whose root is sought.
///
/// Any `Fn(f64) -> f64` is an objective. Derivative-based solvers also need
/// [`ObjectiveFunction::derivative`]; wrap a function and its derivative with
/// [`with_derivative`] to supply it.
pub trait ObjectiveFunction {
    /// Evaluates the function at `x`.
    fn value(&self, x: f64) -> f64;

    /// Evaluates the first derivative at `x`, if available.
    fn derivative(&self, _x: f64) -> Option<f64> {
        None
    }
}

impl<F> ObjectiveFunction for F
where
    F: Fn(f64) -> f64,
{
    fn value(&self, x: f64) -> f64 {
        self(x)
    }
}

/// A function paired with its analytical derivative.
#[derive(Debug, Clone, Copy)]
pub struct WithDerivative<F, D> {
    f: F,
    df: D,
}

/// Pairs a function with its derivative so Newton-type solvers can use it.
///
/// ```rust
/// use kestrel_math::solvers::{with_derivative, NewtonSolver, Solver1D};
///
/// let f = with_derivative(|x: f64| x * x - 2.0, |x: f64| 2.0 * x);
/// let result = NewtonSolver::default().solve_in_bracket(&f, 1e-12, 1.0, 2.0).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-12);
/// ```
pub fn with_derivative<F, D>(f: F, df: D) -> WithDerivative<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    WithDerivative { f, df }
}

impl<F, D> ObjectiveFunction for WithDerivative<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    fn value(&self, x: f64) -> f64 {
        (self.f)(x)
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        Some((self.df)(x))
    }
}

/// Configuration shared by all root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Maximum number of objective evaluations.
    pub max_evaluations: u32,
    /// Enforced lower bound on every trial point.
    pub lower_bound: Option<f64>,
    /// Enforced upper bound on every trial point.
    pub upper_bound: Option<f64>,
    /// Bracket expansion factor used by [`Solver1D::solve`].
    pub growth_factor: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
            lower_bound: None,
            upper_bound: None,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl SolverConfig {
    /// Creates a configuration with the given evaluation ceiling.
    #[must_use]
    pub fn new(max_evaluations: u32) -> Self {
        Self {
            max_evaluations,
            ..Self::default()
        }
    }

    /// Sets the maximum number of evaluations.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evaluations: u32) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Enforces a lower bound on trial points.
    #[must_use]
    pub fn with_lower_bound(mut self, lower_bound: f64) -> Self {
        self.lower_bound = Some(lower_bound);
        self
    }

    /// Enforces an upper bound on trial points.
    #[must_use]
    pub fn with_upper_bound(mut self, upper_bound: f64) -> Self {
        self.upper_bound = Some(upper_bound);
        self
    }

    /// Sets the bracket expansion factor.
    #[must_use]
    pub fn with_growth_factor(mut self, growth_factor: f64) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Clamps `x` into the enforced bounds.
    #[must_use]
    pub fn enforce_bounds(&self, x: f64) -> f64 {
        let x = match self.lower_bound {
            Some(lo) if x < lo => lo,
            _ => x,
        };
        match self.upper_bound {
            Some(hi) if x > hi => hi,
            _ => x,
        }
    }

    fn check_bracket_within_bounds(&self, x_min: f64, x_max: f64) -> MathResult<()> {
        self.check_within_bounds("x_min", x_min)?;
        self.check_within_bounds("x_max", x_max)
    }

    fn check_within_bounds(&self, label: &str, x: f64) -> MathResult<()> {
        if let Some(lo) = self.lower_bound {
            if x < lo {
                return Err(MathError::invalid_input(format!(
                    "{label} ({x}) is below the enforced lower bound ({lo})"
                )));
            }
        }
        if let Some(hi) = self.upper_bound {
            if x > hi {
                return Err(MathError::invalid_input(format!(
                    "{label} ({x}) is above the enforced upper bound ({hi})"
                )));
            }
        }
        Ok(())
    }
}

/// Per-call scratch state of a solve.
///
/// Created fresh by every [`Solver1D::solve`] or
/// [`Solver1D::solve_in_bracket`] call and handed to the algorithm step, so
/// solvers themselves hold no mutable state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverState {
    /// Lower bracket endpoint.
    pub x_min: f64,
    /// Upper bracket endpoint.
    pub x_max: f64,
    /// Objective value at `x_min`.
    pub fx_min: f64,
    /// Objective value at `x_max`.
    pub fx_max: f64,
    /// Current root estimate.
    pub root: f64,
    /// Objective evaluations spent so far.
    pub evaluations: u32,
}

impl SolverState {
    fn new(x_min: f64, x_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            fx_min: f64::NAN,
            fx_max: f64::NAN,
            root: 0.5 * (x_min + x_max),
            evaluations: 0,
        }
    }

    /// Evaluates `f` at `x`, counting the evaluation.
    pub fn evaluate<F>(&mut self, f: &F, x: f64) -> f64
    where
        F: ObjectiveFunction + ?Sized,
    {
        self.evaluations += 1;
        f.value(x)
    }

    /// Evaluates `f` and its derivative at `x`, counting one evaluation.
    pub fn evaluate_with_derivative<F>(&mut self, f: &F, x: f64) -> MathResult<(f64, f64)>
    where
        F: ObjectiveFunction + ?Sized,
    {
        let df = f.derivative(x).ok_or_else(|| {
            MathError::invalid_input("Newton-type solvers require the function's derivative")
        })?;
        self.evaluations += 1;
        Ok((f.value(x), df))
    }

    /// Returns true if the endpoint values differ in sign (or one is zero).
    #[must_use]
    pub fn is_bracketed(&self) -> bool {
        self.fx_min * self.fx_max <= 0.0
    }

    fn result(&self, root: f64) -> SolverResult {
        SolverResult {
            root,
            evaluations: self.evaluations,
        }
    }
}

/// Result of a root-finding call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of objective evaluations used.
    pub evaluations: u32,
}

/// The root-finding protocol shared by every algorithm.
///
/// Implementors provide [`Solver1D::iterate`], which runs with a valid
/// bracket already established in the [`SolverState`]; the provided methods
/// set that bracket up.
///
/// # Example
///
/// ```rust
/// use kestrel_math::solvers::{FalsePositionSolver, Solver1D};
///
/// let solver = FalsePositionSolver::default();
/// let f = |x: f64| x * x - 2.0;
///
/// let result = solver.solve_in_bracket(&f, 1e-10, 1.0, 2.0).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
pub trait Solver1D {
    /// Returns the name of the algorithm.
    fn name(&self) -> &'static str;

    /// Returns the solver configuration.
    fn config(&self) -> &SolverConfig;

    /// Runs the algorithm-specific iteration.
    ///
    /// On entry `state` holds a bracket whose endpoint values differ in sign
    /// and neither of which is zero, `state.root` holds the starting
    /// estimate, and `accuracy` is positive. Returns the root or
    /// [`MathError::MaxEvaluationsExceeded`].
    fn iterate<F>(&self, f: &F, state: &mut SolverState, accuracy: f64) -> MathResult<f64>
    where
        F: ObjectiveFunction + ?Sized;

    /// Finds a root without a known bracket.
    ///
    /// Starting from `guess`, the interval is widened geometrically (by the
    /// configured growth factor) until the objective changes sign, then the
    /// algorithm iterates inside it.
    ///
    /// # Errors
    ///
    /// - [`MathError::InvalidInput`] if `accuracy`, `step` or the growth
    ///   factor is not positive, or `guess` violates the enforced bounds
    /// - [`MathError::BracketNotFound`] if no sign change is found within the
    ///   evaluation budget
    /// - [`MathError::MaxEvaluationsExceeded`] if the iteration does not
    ///   converge in time
    fn solve<F>(&self, f: &F, accuracy: f64, guess: f64, step: f64) -> MathResult<SolverResult>
    where
        F: ObjectiveFunction + ?Sized,
    {
        let accuracy = checked_accuracy(accuracy)?;
        if !(step > 0.0) {
            return Err(MathError::invalid_input(format!(
                "bracketing step must be positive, got {step}"
            )));
        }
        let config = self.config();
        let growth = config.growth_factor;
        if !(growth > 0.0) {
            return Err(MathError::invalid_input(format!(
                "bracket growth factor must be positive, got {growth}"
            )));
        }
        config.check_within_bounds("guess", guess)?;

        let mut state = SolverState::new(guess, guess);
        let f_guess = state.evaluate(f, guess);
        if f_guess == 0.0 {
            return Ok(converged(self.name(), &state, guess));
        }

        // Monotonically increasing bias, as in price(volatility).
        if f_guess > 0.0 {
            state.x_min = config.enforce_bounds(guess - step);
            state.fx_min = state.evaluate(f, state.x_min);
            state.x_max = guess;
            state.fx_max = f_guess;
        } else {
            state.x_min = guess;
            state.fx_min = f_guess;
            state.x_max = config.enforce_bounds(guess + step);
            state.fx_max = state.evaluate(f, state.x_max);
        }

        let mut expand_lower_on_tie = true;
        while state.evaluations <= config.max_evaluations {
            if state.is_bracketed() {
                if state.fx_min == 0.0 {
                    return Ok(converged(self.name(), &state, state.x_min));
                }
                if state.fx_max == 0.0 {
                    return Ok(converged(self.name(), &state, state.x_max));
                }
                state.root = 0.5 * (state.x_min + state.x_max);
                return run(self, f, state, accuracy);
            }

            let expand_lower = match state.fx_min.abs().partial_cmp(&state.fx_max.abs()) {
                Some(std::cmp::Ordering::Less) => true,
                Some(std::cmp::Ordering::Greater) => false,
                _ => {
                    let lower = expand_lower_on_tie;
                    expand_lower_on_tie = !expand_lower_on_tie;
                    lower
                }
            };

            if expand_lower {
                state.x_min =
                    config.enforce_bounds(state.x_min + growth * (state.x_min - state.x_max));
                state.fx_min = state.evaluate(f, state.x_min);
            } else {
                state.x_max =
                    config.enforce_bounds(state.x_max + growth * (state.x_max - state.x_min));
                state.fx_max = state.evaluate(f, state.x_max);
            }
            trace!(
                "{}: bracket attempt f[{}, {}] -> [{:.2e}, {:.2e}]",
                self.name(),
                state.x_min,
                state.x_max,
                state.fx_min,
                state.fx_max
            );
        }

        warn!(
            "{}: no sign change found after {} evaluations",
            self.name(),
            state.evaluations
        );
        Err(MathError::BracketNotFound {
            x_min: state.x_min,
            x_max: state.x_max,
            fx_min: state.fx_min,
            fx_max: state.fx_max,
            evaluations: state.evaluations,
        })
    }

    /// Finds a root inside a known bracket.
    ///
    /// A reversed bracket is reordered. If an endpoint is an exact root it is
    /// returned immediately.
    ///
    /// # Errors
    ///
    /// - [`MathError::InvalidInput`] if `accuracy` is not positive, the
    ///   bracket is empty, or it violates the enforced bounds
    /// - [`MathError::InvalidBracket`] if `f(x_min)` and `f(x_max)` have the
    ///   same sign
    /// - [`MathError::MaxEvaluationsExceeded`] if the iteration does not
    ///   converge in time
    fn solve_in_bracket<F>(
        &self,
        f: &F,
        accuracy: f64,
        x_min: f64,
        x_max: f64,
    ) -> MathResult<SolverResult>
    where
        F: ObjectiveFunction + ?Sized,
    {
        let accuracy = checked_accuracy(accuracy)?;
        let (x_min, x_max) = if x_min <= x_max {
            (x_min, x_max)
        } else {
            (x_max, x_min)
        };
        if !(x_min < x_max) {
            return Err(MathError::invalid_input(format!(
                "invalid range: x_min ({x_min}) must be below x_max ({x_max})"
            )));
        }
        self.config().check_bracket_within_bounds(x_min, x_max)?;

        let mut state = SolverState::new(x_min, x_max);
        state.fx_min = state.evaluate(f, x_min);
        if state.fx_min == 0.0 {
            return Ok(converged(self.name(), &state, x_min));
        }
        state.fx_max = state.evaluate(f, x_max);
        if state.fx_max == 0.0 {
            return Ok(converged(self.name(), &state, x_max));
        }

        if !(state.fx_min * state.fx_max < 0.0) {
            return Err(MathError::InvalidBracket {
                a: x_min,
                b: x_max,
                fa: state.fx_min,
                fb: state.fx_max,
            });
        }

        run(self, f, state, accuracy)
    }
}

fn checked_accuracy(accuracy: f64) -> MathResult<f64> {
    if !(accuracy > 0.0) {
        return Err(MathError::invalid_input(format!(
            "accuracy must be positive, got {accuracy}"
        )));
    }
    Ok(accuracy.max(f64::EPSILON))
}

fn run<S, F>(solver: &S, f: &F, mut state: SolverState, accuracy: f64) -> MathResult<SolverResult>
where
    S: Solver1D + ?Sized,
    F: ObjectiveFunction + ?Sized,
{
    match solver.iterate(f, &mut state, accuracy) {
        Ok(root) => Ok(converged(solver.name(), &state, root)),
        Err(err) => {
            warn!("{}: {}", solver.name(), err);
            Err(err)
        }
    }
}

fn converged(name: &str, state: &SolverState, root: f64) -> SolverResult {
    debug!(
        "{}: root {} found after {} evaluations",
        name, root, state.evaluations
    );
    state.result(root)
}
