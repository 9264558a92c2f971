//! Line-search step selection.
//!
//! A line search picks the step length `t` along the optimizer's search
//! direction `d`. Failure is not an error here: the outcome carries a
//! [`LineSearchStatus`] and the caller decides whether a failed search is
//! fatal ([`LineSearchOutcome::into_result`]) or recoverable.

use log::{trace, warn};
use nalgebra::DVector;

use crate::error::{MathError, MathResult};
use crate::optimization::{CostFunction, OptimizationProblem};

/// How a line search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearchStatus {
    /// The acceptance condition holds at the returned step.
    Converged,
    /// The iteration ceiling was hit first.
    MaxIterationsReached,
}

/// The step chosen by a line search and the state at the trial point.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSearchOutcome {
    /// Step length `t`.
    pub step: f64,
    /// Objective value at `point`.
    pub value: f64,
    /// Squared gradient norm at `point`.
    pub gradient_norm_squared: f64,
    /// Trial point `x + t·d`.
    pub point: DVector<f64>,
    /// Gradient at `point`.
    pub gradient: DVector<f64>,
    /// Backtracking iterations performed.
    pub iterations: u32,
    /// How the search ended.
    pub status: LineSearchStatus,
}

impl LineSearchOutcome {
    /// Returns true if the acceptance condition holds at the returned step.
    pub fn succeeded(&self) -> bool {
        self.status == LineSearchStatus::Converged
    }

    /// Converts a failed search into [`MathError::LineSearchFailed`].
    pub fn into_result(self) -> MathResult<Self> {
        match self.status {
            LineSearchStatus::Converged => Ok(self),
            LineSearchStatus::MaxIterationsReached => Err(MathError::LineSearchFailed {
                iterations: self.iterations,
                step: self.step,
            }),
        }
    }
}

/// Step-length selection along a search direction.
pub trait LineSearch {
    /// Searches along `problem.search_direction()` from
    /// `problem.current_point()`.
    ///
    /// `value` and `gradient_norm_squared` are the objective and the squared
    /// gradient norm at the current point.
    fn search<C>(
        &self,
        problem: &OptimizationProblem<'_, C>,
        initial_step: f64,
        value: f64,
        gradient_norm_squared: f64,
    ) -> LineSearchOutcome
    where
        C: CostFunction + ?Sized;
}

/// Default sufficient-decrease coefficient.
pub const DEFAULT_ARMIJO_ALPHA: f64 = 0.05;

/// Default step shrink factor.
pub const DEFAULT_ARMIJO_BETA: f64 = 0.65;

/// Armijo backtracking line search.
///
/// Starting from the initial step, the step is multiplied by `beta` until
/// the sufficient-decrease condition
///
/// ```text
/// q(x + t·d) - q(x) <= -alpha · t · |∇q(x)|²
/// ```
///
/// holds and the previous, larger step did not already clear the threshold
/// scaled back by `beta`. The backtracking ceiling is the owning optimizer's
/// [`EndCriteria`](crate::optimization::EndCriteria) iteration limit.
///
/// # Example
///
/// ```rust
/// use kestrel_math::optimization::{
///     ArmijoLineSearch, EndCriteria, LineSearch, NumericalCost, OptimizationProblem,
/// };
/// use nalgebra::DVector;
///
/// let cost = NumericalCost::new(|x: &[f64]| x[0] * x[0]);
/// let x = DVector::from_vec(vec![1.0]);
/// let d = DVector::from_vec(vec![-1.0]);
/// let criteria = EndCriteria::default();
/// let problem = OptimizationProblem::new(&cost, &x, &d, &criteria).unwrap();
///
/// let outcome = ArmijoLineSearch::default().search(&problem, 1.0, 1.0, 4.0);
/// assert!(outcome.succeeded());
/// assert_eq!(outcome.step, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ArmijoParameters"))]
pub struct ArmijoLineSearch {
    alpha: f64,
    beta: f64,
}

/// Unvalidated Armijo coefficients, as read from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ArmijoParameters {
    /// Sufficient-decrease coefficient.
    pub alpha: f64,
    /// Step shrink factor.
    pub beta: f64,
}

impl TryFrom<ArmijoParameters> for ArmijoLineSearch {
    type Error = MathError;

    fn try_from(params: ArmijoParameters) -> MathResult<Self> {
        Self::new(params.alpha, params.beta)
    }
}

impl Default for ArmijoLineSearch {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ARMIJO_ALPHA,
            beta: DEFAULT_ARMIJO_BETA,
        }
    }
}

impl ArmijoLineSearch {
    /// Creates an Armijo line search.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::InvalidInput`] unless `0 < alpha < 1` and
    /// `0 < beta < 1`.
    pub fn new(alpha: f64, beta: f64) -> MathResult<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(MathError::invalid_input(format!(
                "Armijo alpha must lie in (0, 1), got {alpha}"
            )));
        }
        if !(beta > 0.0 && beta < 1.0) {
            return Err(MathError::invalid_input(format!(
                "Armijo beta must lie in (0, 1), got {beta}"
            )));
        }
        Ok(Self { alpha, beta })
    }

    /// Sufficient-decrease coefficient.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Step shrink factor.
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl LineSearch for ArmijoLineSearch {
    fn search<C>(
        &self,
        problem: &OptimizationProblem<'_, C>,
        initial_step: f64,
        value: f64,
        gradient_norm_squared: f64,
    ) -> LineSearchOutcome
    where
        C: CostFunction + ?Sized,
    {
        let q0 = value;
        let qp0 = gradient_norm_squared;
        let x = problem.current_point();
        let d = problem.search_direction();

        let mut t = initial_step;
        let mut point = x + d * t;
        let mut qt = problem.value(&point);
        let mut gradient = DVector::zeros(x.len());
        let mut iterations = 0;
        let mut max_iterations_reached = false;

        if qt - q0 > -self.alpha * t * qp0 {
            loop {
                iterations += 1;
                t *= self.beta;
                let qt_old = qt;

                point = x + d * t;
                qt = problem.value(&point);
                problem.gradient(&mut gradient, &point);
                trace!(
                    "Armijo: t = {:.3e}, q = {:.6e}, |g|^2 = {:.3e}",
                    t,
                    qt,
                    gradient.norm_squared()
                );

                max_iterations_reached = problem.end_criteria().check_iteration_number(iterations);

                let insufficient = qt - q0 > -self.alpha * t * qp0;
                let previous_sufficient = qt_old - q0 <= -self.alpha * t * qp0 / self.beta;
                if !(insufficient || previous_sufficient) || max_iterations_reached {
                    break;
                }
            }
        }

        let status = if max_iterations_reached {
            warn!(
                "Armijo: no sufficient decrease after {} iterations (t = {:.3e})",
                iterations, t
            );
            LineSearchStatus::MaxIterationsReached
        } else {
            LineSearchStatus::Converged
        };

        problem.gradient(&mut gradient, &point);
        let gradient_norm_squared = gradient.norm_squared();

        LineSearchOutcome {
            step: t,
            value: qt,
            gradient_norm_squared,
            point,
            gradient,
            iterations,
            status,
        }
    }
}
