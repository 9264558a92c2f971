//! Stopping rules for iterative optimizers.

/// Why an optimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndCriteriaType {
    /// The iteration ceiling was reached.
    MaxIterations,
    /// The objective stopped changing for too many consecutive iterations.
    StationaryPoint,
    /// The gradient norm fell below its tolerance.
    StationaryGradient,
}

/// Stopping rules shared by an optimizer and its line search.
///
/// The line search uses [`EndCriteria::check_iteration_number`] as its
/// backtracking ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndCriteria {
    /// Maximum number of iterations.
    pub max_iterations: u32,
    /// Consecutive stationary iterations tolerated before stopping.
    pub max_stationary_iterations: u32,
    /// Objective change below which an iteration counts as stationary.
    pub function_epsilon: f64,
    /// Gradient norm below which the point counts as stationary.
    pub gradient_epsilon: f64,
}

impl Default for EndCriteria {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_stationary_iterations: 10,
            function_epsilon: 1e-8,
            gradient_epsilon: 1e-8,
        }
    }
}

impl EndCriteria {
    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the stationary-iteration allowance.
    #[must_use]
    pub fn with_max_stationary_iterations(mut self, max_stationary_iterations: u32) -> Self {
        self.max_stationary_iterations = max_stationary_iterations;
        self
    }

    /// Sets the objective-change tolerance.
    #[must_use]
    pub fn with_function_epsilon(mut self, function_epsilon: f64) -> Self {
        self.function_epsilon = function_epsilon;
        self
    }

    /// Sets the gradient-norm tolerance.
    #[must_use]
    pub fn with_gradient_epsilon(mut self, gradient_epsilon: f64) -> Self {
        self.gradient_epsilon = gradient_epsilon;
        self
    }

    /// Returns true once `iteration` reaches the ceiling.
    pub fn check_iteration_number(&self, iteration: u32) -> bool {
        iteration >= self.max_iterations
    }

    /// Tracks consecutive stationary iterations in `stationary`.
    ///
    /// Returns true once the count reaches the allowance.
    pub fn check_stationary_value(&self, f_old: f64, f_new: f64, stationary: &mut u32) -> bool {
        if (f_new - f_old).abs() < self.function_epsilon {
            *stationary += 1;
            *stationary >= self.max_stationary_iterations
        } else {
            *stationary = 0;
            false
        }
    }

    /// Returns true if `gradient_norm` is below the tolerance.
    pub fn check_gradient_norm(&self, gradient_norm: f64) -> bool {
        gradient_norm < self.gradient_epsilon
    }

    /// Applies every rule, gradient first.
    pub fn check(
        &self,
        iteration: u32,
        f_old: f64,
        f_new: f64,
        gradient_norm: f64,
        stationary: &mut u32,
    ) -> Option<EndCriteriaType> {
        if self.check_gradient_norm(gradient_norm) {
            Some(EndCriteriaType::StationaryGradient)
        } else if self.check_stationary_value(f_old, f_new, stationary) {
            Some(EndCriteriaType::StationaryPoint)
        } else if self.check_iteration_number(iteration) {
            Some(EndCriteriaType::MaxIterations)
        } else {
            None
        }
    }
}
