//! # Kestrel Math
//!
//! Numerical building blocks for calibration routines.
//!
//! This crate provides:
//!
//! - **Solvers**: Bracketing root finders (False Position, Bisection, Brent,
//!   Secant, Newton) with automatic bracket expansion
//! - **Optimization**: Armijo backtracking line search, stopping rules and a
//!   steepest-descent minimizer
//!
//! ## Design Philosophy
//!
//! - **Explicit Failure**: Every solver returns a [`MathResult`]; nothing
//!   panics on bad input
//! - **Reproducible**: Evaluation counts and iteration limits are exact
//! - **Generic**: Objectives are closures or trait objects
//!
//! ## Example
//!
//! ```rust
//! use kestrel_math::prelude::*;
//!
//! let f = |x: f64| x * x - 2.0;
//! let result = false_position(f, 1.0, 2.0, 1e-12, &SolverConfig::default()).unwrap();
//! assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::if_not_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod optimization;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::optimization::{
        steepest_descent, ArmijoLineSearch, CostFunction, EndCriteria, EndCriteriaType,
        LineSearch, LineSearchOutcome, LineSearchStatus, NumericalCost, OptimizationProblem,
        OptimizationResult, SteepestDescent,
    };
    pub use crate::solvers::{
        bisection, brent, false_position, newton, newton_safe, secant, with_derivative,
        BisectionSolver, BrentSolver, FalsePositionSolver, NewtonSafeSolver, NewtonSolver,
        ObjectiveFunction, SecantSolver, Solver1D, SolverConfig, SolverResult, SolverState,
    };
}

pub use error::{MathError, MathResult};
