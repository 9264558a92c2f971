//! Steepest-descent minimization.

use log::{debug, warn};
use nalgebra::DVector;

use crate::error::{MathError, MathResult};
use crate::optimization::{
    ArmijoLineSearch, CostFunction, EndCriteria, EndCriteriaType, LineSearch, NumericalCost,
    OptimizationProblem, OptimizationResult,
};

/// Steepest-descent minimizer.
///
/// Searches along the negative gradient, choosing each step with the line
/// search and starting each search from the previously accepted step.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteepestDescent<L = ArmijoLineSearch> {
    line_search: L,
    end_criteria: EndCriteria,
}

impl<L: LineSearch> SteepestDescent<L> {
    /// Creates a minimizer with the given line search and stopping rules.
    pub fn new(line_search: L, end_criteria: EndCriteria) -> Self {
        Self {
            line_search,
            end_criteria,
        }
    }

    /// The stopping rules.
    pub fn end_criteria(&self) -> &EndCriteria {
        &self.end_criteria
    }

    /// Minimizes `cost` starting from `initial`.
    ///
    /// A failed line search ends the run with `converged == false` and the
    /// last accepted point.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::InvalidInput`] if `initial` is empty.
    pub fn minimize<C>(&self, cost: &C, initial: &DVector<f64>) -> MathResult<OptimizationResult>
    where
        C: CostFunction + ?Sized,
    {
        if initial.is_empty() {
            return Err(MathError::invalid_input("initial point is empty"));
        }

        let mut x = initial.clone();
        let mut gradient = DVector::zeros(x.len());
        let mut f_old = cost.value_and_gradient(&mut gradient, &x);
        let mut norm2 = gradient.norm_squared();

        if self.end_criteria.check_gradient_norm(norm2.sqrt()) {
            return Ok(OptimizationResult {
                parameters: x,
                objective_value: f_old,
                iterations: 0,
                converged: true,
                end_reason: Some(EndCriteriaType::StationaryGradient),
            });
        }

        let mut direction = -&gradient;
        let mut step = 1.0;
        let mut stationary = 0;
        let mut iteration = 0;

        loop {
            let problem = OptimizationProblem::new(cost, &x, &direction, &self.end_criteria)?;
            let outcome = self.line_search.search(&problem, step, f_old, norm2);

            if !outcome.succeeded() {
                warn!(
                    "SteepestDescent: line search failed at iteration {}, stopping",
                    iteration
                );
                return Ok(OptimizationResult {
                    parameters: x,
                    objective_value: f_old,
                    iterations: iteration,
                    converged: false,
                    end_reason: None,
                });
            }

            iteration += 1;
            let end = self.end_criteria.check(
                iteration,
                f_old,
                outcome.value,
                outcome.gradient_norm_squared.sqrt(),
                &mut stationary,
            );

            step = outcome.step;
            x = outcome.point;
            f_old = outcome.value;
            norm2 = outcome.gradient_norm_squared;
            direction = -&outcome.gradient;

            if let Some(reason) = end {
                debug!(
                    "SteepestDescent: stopped after {} iterations ({:?}), f = {:.6e}",
                    iteration, reason, f_old
                );
                return Ok(OptimizationResult {
                    parameters: x,
                    objective_value: f_old,
                    iterations: iteration,
                    converged: reason != EndCriteriaType::MaxIterations,
                    end_reason: Some(reason),
                });
            }
        }
    }
}

/// Minimizes `f` by steepest descent with numerical gradients and an Armijo
/// line search.
///
/// # Example
///
/// ```rust
/// use kestrel_math::optimization::{steepest_descent, EndCriteria};
///
/// let f = |p: &[f64]| (p[0] - 2.0).powi(2) + (p[1] - 3.0).powi(2);
/// let criteria = EndCriteria::default().with_max_stationary_iterations(3);
/// let result = steepest_descent(f, &[0.0, 0.0], &criteria).unwrap();
///
/// assert!(result.converged);
/// assert!((result.parameters[0] - 2.0).abs() < 1e-4);
/// ```
pub fn steepest_descent<F>(
    f: F,
    initial: &[f64],
    end_criteria: &EndCriteria,
) -> MathResult<OptimizationResult>
where
    F: Fn(&[f64]) -> f64,
{
    let cost = NumericalCost::new(f);
    SteepestDescent::new(ArmijoLineSearch::default(), *end_criteria)
        .minimize(&cost, &DVector::from_column_slice(initial))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Rosenbrock;

    impl CostFunction for Rosenbrock {
        fn value(&self, x: &DVector<f64>) -> f64 {
            (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
        }

        fn gradient(&self, gradient: &mut DVector<f64>, x: &DVector<f64>) {
            gradient[0] = -2.0 * (1.0 - x[0]) - 400.0 * x[0] * (x[1] - x[0] * x[0]);
            gradient[1] = 200.0 * (x[1] - x[0] * x[0]);
        }
    }

    #[test]
    fn test_gradient_descent_quadratic() {
        // Minimize (x-2)^2 + (y-3)^2
        let f = |params: &[f64]| {
            let x = params[0];
            let y = params[1];
            (x - 2.0).powi(2) + (y - 3.0).powi(2)
        };

        // Stop before the central-difference noise dominates the gradient
        let criteria = EndCriteria::default().with_max_stationary_iterations(3);
        let result = steepest_descent(f, &[0.0, 0.0], &criteria).unwrap();

        assert!(result.converged);
        assert_eq!(result.end_reason, Some(EndCriteriaType::StationaryPoint));
        assert_relative_eq!(result.parameters[0], 2.0, epsilon = 1e-4);
        assert_relative_eq!(result.parameters[1], 3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_already_at_minimum() {
        let f = |p: &[f64]| p[0] * p[0];

        let result = steepest_descent(f, &[0.0], &EndCriteria::default()).unwrap();

        assert!(result.converged);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.end_reason, Some(EndCriteriaType::StationaryGradient));
    }

    #[test]
    fn test_iteration_ceiling() {
        let criteria = EndCriteria::default().with_max_iterations(5);
        let minimizer = SteepestDescent::new(ArmijoLineSearch::default(), criteria);

        let result = minimizer
            .minimize(&Rosenbrock, &DVector::from_vec(vec![-1.2, 1.0]))
            .unwrap();

        assert!(!result.converged);
        assert_eq!(result.iterations, 5);
        assert_eq!(result.end_reason, Some(EndCriteriaType::MaxIterations));
        assert!(result.objective_value < Rosenbrock.value(&DVector::from_vec(vec![-1.2, 1.0])));
    }

    #[test]
    fn test_monotone_decrease() {
        let start = DVector::from_vec(vec![-1.2, 1.0]);
        let mut previous = Rosenbrock.value(&start);

        for n in 1..6 {
            let criteria = EndCriteria::default().with_max_iterations(n);
            let result = SteepestDescent::new(ArmijoLineSearch::default(), criteria)
                .minimize(&Rosenbrock, &start)
                .unwrap();
            assert!(result.objective_value < previous);
            previous = result.objective_value;
        }
    }

    #[test]
    fn test_empty_initial_point() {
        let result = SteepestDescent::<ArmijoLineSearch>::default()
            .minimize(&Rosenbrock, &DVector::zeros(0));

        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }
}
