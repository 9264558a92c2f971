//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during root finding and optimization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The supplied bracket does not straddle a root.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// Automatic bracketing could not locate a sign change.
    #[error(
        "Unable to bracket root in {evaluations} function evaluations \
         (last bracket attempt: f[{x_min}, {x_max}] -> [{fx_min:.2e}, {fx_max:.2e}])"
    )]
    BracketNotFound {
        /// Lower end of the last bracket attempt.
        x_min: f64,
        /// Upper end of the last bracket attempt.
        x_max: f64,
        /// Function value at `x_min`.
        fx_min: f64,
        /// Function value at `x_max`.
        fx_max: f64,
        /// Evaluations spent searching.
        evaluations: u32,
    },

    /// The evaluation ceiling was reached before convergence.
    #[error("Maximum number of function evaluations ({max_evaluations}) exceeded")]
    MaxEvaluationsExceeded {
        /// The configured ceiling.
        max_evaluations: u32,
    },

    /// Armijo backtracking hit its iteration ceiling.
    #[error("Line search failed after {iterations} backtracking iterations (step: {step:.2e})")]
    LineSearchFailed {
        /// Backtracking iterations performed.
        iterations: u32,
        /// Last step length tried.
        step: f64,
    },

    /// Division by zero or near-zero value.
    #[error("Division by zero or near-zero value: {value:.2e}")]
    DivisionByZero {
        /// The near-zero value.
        value: f64,
    },

    /// Vector dimensions are incompatible.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a max-evaluations error.
    #[must_use]
    pub fn max_evaluations_exceeded(max_evaluations: u32) -> Self {
        Self::MaxEvaluationsExceeded { max_evaluations }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a dimension mismatch error.
    #[must_use]
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}
