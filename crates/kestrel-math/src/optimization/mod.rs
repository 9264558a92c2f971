//! Gradient-based optimization.
//!
//! This module provides the pieces a calibration routine assembles into a
//! multivariate minimizer:
//!
//! - [`CostFunction`]: the objective and its gradient
//! - [`OptimizationProblem`]: a cost function viewed from the current point
//!   along the current search direction
//! - [`EndCriteria`]: iteration, stationarity and gradient stopping rules
//! - [`ArmijoLineSearch`]: backtracking step-length selection
//! - [`SteepestDescent`]: a complete minimizer driving the line search

mod end_criteria;
mod line_search;
mod steepest_descent;

pub use end_criteria::{EndCriteria, EndCriteriaType};
pub use line_search::{
    ArmijoLineSearch, ArmijoParameters, LineSearch, LineSearchOutcome, LineSearchStatus,
};
pub use steepest_descent::{steepest_descent, SteepestDescent};

use nalgebra::DVector;

use crate::error::{MathError, MathResult};

/// Default step size for central-difference gradients.
pub const DEFAULT_GRADIENT_STEP: f64 = 1e-8;

/// A differentiable scalar function of a vector.
pub trait CostFunction {
    /// Evaluates the function at `x`.
    fn value(&self, x: &DVector<f64>) -> f64;

    /// Writes the gradient at `x` into `gradient`.
    ///
    /// `gradient` has the same length as `x`.
    fn gradient(&self, gradient: &mut DVector<f64>, x: &DVector<f64>);

    /// Writes the gradient at `x` into `gradient` and returns the value.
    fn value_and_gradient(&self, gradient: &mut DVector<f64>, x: &DVector<f64>) -> f64 {
        self.gradient(gradient, x);
        self.value(x)
    }
}

/// Cost function with a central-difference gradient.
///
/// Wraps any `Fn(&[f64]) -> f64`; each gradient costs `2n` evaluations.
#[derive(Debug, Clone, Copy)]
pub struct NumericalCost<F> {
    f: F,
    step_size: f64,
}

impl<F> NumericalCost<F>
where
    F: Fn(&[f64]) -> f64,
{
    /// Wraps `f` with the default finite-difference step.
    pub fn new(f: F) -> Self {
        Self::with_step_size(f, DEFAULT_GRADIENT_STEP)
    }

    /// Wraps `f` with a custom finite-difference step.
    pub fn with_step_size(f: F, step_size: f64) -> Self {
        Self { f, step_size }
    }
}

impl<F> CostFunction for NumericalCost<F>
where
    F: Fn(&[f64]) -> f64,
{
    fn value(&self, x: &DVector<f64>) -> f64 {
        (self.f)(x.as_slice())
    }

    fn gradient(&self, gradient: &mut DVector<f64>, x: &DVector<f64>) {
        let mut shifted = x.clone();
        for i in 0..x.len() {
            shifted[i] = x[i] + self.step_size;
            let f_plus = (self.f)(shifted.as_slice());
            shifted[i] = x[i] - self.step_size;
            let f_minus = (self.f)(shifted.as_slice());
            shifted[i] = x[i];

            gradient[i] = (f_plus - f_minus) / (2.0 * self.step_size);
        }
    }
}

/// A cost function seen from the optimizer's current state.
///
/// Borrows the current point, the search direction and the owning
/// optimizer's end criteria for the duration of one line search. None of
/// them is modified by the search.
#[derive(Debug)]
pub struct OptimizationProblem<'a, C: ?Sized> {
    cost: &'a C,
    x: &'a DVector<f64>,
    direction: &'a DVector<f64>,
    end_criteria: &'a EndCriteria,
}

impl<'a, C> OptimizationProblem<'a, C>
where
    C: CostFunction + ?Sized,
{
    /// Creates a problem at `x` searching along `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::DimensionMismatch`] if `x` and `direction` differ
    /// in length, and [`MathError::InvalidInput`] if they are empty.
    pub fn new(
        cost: &'a C,
        x: &'a DVector<f64>,
        direction: &'a DVector<f64>,
        end_criteria: &'a EndCriteria,
    ) -> MathResult<Self> {
        if x.is_empty() {
            return Err(MathError::invalid_input("optimization point is empty"));
        }
        if x.len() != direction.len() {
            return Err(MathError::dimension_mismatch(x.len(), direction.len()));
        }
        Ok(Self {
            cost,
            x,
            direction,
            end_criteria,
        })
    }

    /// Evaluates the cost at `point`.
    pub fn value(&self, point: &DVector<f64>) -> f64 {
        self.cost.value(point)
    }

    /// Writes the cost gradient at `point` into `gradient`.
    pub fn gradient(&self, gradient: &mut DVector<f64>, point: &DVector<f64>) {
        self.cost.gradient(gradient, point);
    }

    /// The optimizer's current point.
    pub fn current_point(&self) -> &DVector<f64> {
        self.x
    }

    /// The optimizer's current search direction.
    pub fn search_direction(&self) -> &DVector<f64> {
        self.direction
    }

    /// The owning optimizer's stopping rules.
    pub fn end_criteria(&self) -> &EndCriteria {
        self.end_criteria
    }
}

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// Optimal parameters found.
    pub parameters: DVector<f64>,
    /// Final objective function value.
    pub objective_value: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Whether the optimization converged.
    pub converged: bool,
    /// The stopping rule that ended the run, if any fired.
    pub end_reason: Option<EndCriteriaType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Paraboloid;

    impl CostFunction for Paraboloid {
        fn value(&self, x: &DVector<f64>) -> f64 {
            (x[0] - 1.0).powi(2) + 3.0 * x[1] * x[1]
        }

        fn gradient(&self, gradient: &mut DVector<f64>, x: &DVector<f64>) {
            gradient[0] = 2.0 * (x[0] - 1.0);
            gradient[1] = 6.0 * x[1];
        }
    }

    #[test]
    fn test_numerical_gradient_matches_analytic() {
        let numerical = NumericalCost::new(|p: &[f64]| (p[0] - 1.0).powi(2) + 3.0 * p[1] * p[1]);
        let x = DVector::from_vec(vec![0.5, -2.0]);

        let mut expected = DVector::zeros(2);
        Paraboloid.gradient(&mut expected, &x);
        let mut actual = DVector::zeros(2);
        numerical.gradient(&mut actual, &x);

        assert_relative_eq!(actual[0], expected[0], epsilon = 1e-5);
        assert_relative_eq!(actual[1], expected[1], epsilon = 1e-5);
        assert_relative_eq!(numerical.value(&x), Paraboloid.value(&x));
    }

    #[test]
    fn test_value_and_gradient() {
        let x = DVector::from_vec(vec![2.0, 1.0]);
        let mut gradient = DVector::zeros(2);

        let value = Paraboloid.value_and_gradient(&mut gradient, &x);

        assert_relative_eq!(value, 4.0);
        assert_relative_eq!(gradient[0], 2.0);
        assert_relative_eq!(gradient[1], 6.0);
    }

    #[test]
    fn test_problem_dimension_mismatch() {
        let x = DVector::from_vec(vec![0.0, 0.0]);
        let d = DVector::from_vec(vec![1.0]);
        let criteria = EndCriteria::default();

        let result = OptimizationProblem::new(&Paraboloid, &x, &d, &criteria);

        assert!(matches!(
            result,
            Err(MathError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_problem_empty_point() {
        let x = DVector::<f64>::zeros(0);
        let criteria = EndCriteria::default();

        let result = OptimizationProblem::new(&Paraboloid, &x, &x, &criteria);

        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }

    #[test]
    fn test_problem_accessors() {
        let x = DVector::from_vec(vec![1.0, 1.0]);
        let d = DVector::from_vec(vec![0.0, -1.0]);
        let criteria = EndCriteria::default().with_max_iterations(7);

        let problem = OptimizationProblem::new(&Paraboloid, &x, &d, &criteria).unwrap();

        assert_eq!(problem.current_point(), &x);
        assert_eq!(problem.search_direction(), &d);
        assert_eq!(problem.end_criteria().max_iterations, 7);
        assert_relative_eq!(problem.value(&x), 3.0);
    }
}
