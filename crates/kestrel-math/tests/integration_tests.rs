//! Integration tests for solving calibration equations.
//!
//! Each test inverts a pricing formula the way a calibration routine would:
//! given a market price, find the parameter that reproduces it.

use approx::assert_relative_eq;
use kestrel_math::prelude::*;
use statrs::distribution::{ContinuousCDF, Normal};

// =============================================================================
// PRICING FORMULAS
// =============================================================================

/// Black-Scholes price of a European call.
fn black_scholes_call(spot: f64, strike: f64, rate: f64, expiry: f64, vol: f64) -> f64 {
    let normal = Normal::new(0.0, 1.0).unwrap();
    let sqrt_t = expiry.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * expiry) / (vol * sqrt_t);
    let d2 = d1 - vol * sqrt_t;
    spot * normal.cdf(d1) - strike * (-rate * expiry).exp() * normal.cdf(d2)
}

/// Price of an annual-pay fixed coupon bond per 100 face.
fn bond_price(coupon: f64, years: i32, ytm: f64) -> f64 {
    let annuity: f64 = (1..=years).map(|t| coupon / (1.0 + ytm).powi(t)).sum();
    annuity + 100.0 / (1.0 + ytm).powi(years)
}

fn all_solvers(config: SolverConfig) -> Vec<(&'static str, MathResult<SolverResult>)> {
    let f = |y: f64| bond_price(6.0, 10, y) - 92.0;
    vec![
        ("FalsePosition", false_position(f, 0.0, 0.2, 1e-12, &config)),
        ("Bisection", bisection(f, 0.0, 0.2, 1e-12, &config)),
        ("Brent", brent(f, 0.0, 0.2, 1e-12, &config)),
        ("Secant", secant(f, 0.0, 0.2, 1e-12, &config)),
    ]
}

// =============================================================================
// IMPLIED VOLATILITY
// =============================================================================

#[test]
fn test_implied_volatility_round_trip() {
    let (spot, strike, rate, expiry) = (100.0, 105.0, 0.03, 0.75);
    let market = black_scholes_call(spot, strike, rate, expiry, 0.30);

    let objective = |vol: f64| black_scholes_call(spot, strike, rate, expiry, vol) - market;
    let solver = FalsePositionSolver::new(SolverConfig::default().with_lower_bound(1e-4));

    let result = solver.solve(&objective, 1e-10, 0.20, 0.05).unwrap();

    assert_relative_eq!(result.root, 0.30, epsilon = 1e-8);
    assert!(result.evaluations < 40);
}

#[test]
fn test_implied_volatility_from_high_guess() {
    let (spot, strike, rate, expiry) = (50.0, 50.0, 0.01, 2.0);
    let market = black_scholes_call(spot, strike, rate, expiry, 0.15);

    let objective = |vol: f64| black_scholes_call(spot, strike, rate, expiry, vol) - market;
    let solver = FalsePositionSolver::new(SolverConfig::default().with_lower_bound(1e-4));

    let result = solver.solve(&objective, 1e-10, 0.80, 0.10).unwrap();

    assert_relative_eq!(result.root, 0.15, epsilon = 1e-8);
}

#[test]
fn test_implied_volatility_with_vega() {
    let (spot, strike, rate, expiry) = (100.0, 90.0, 0.02, 1.0);
    let market = black_scholes_call(spot, strike, rate, expiry, 0.25);

    let vega = |vol: f64| {
        let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * expiry) / (vol * expiry.sqrt());
        spot * (-0.5 * d1 * d1).exp() / (2.0 * std::f64::consts::PI).sqrt() * expiry.sqrt()
    };
    let objective = with_derivative(
        |vol: f64| black_scholes_call(spot, strike, rate, expiry, vol) - market,
        vega,
    );

    let newton = NewtonSafeSolver::default()
        .solve_in_bracket(&objective, 1e-12, 0.01, 2.0)
        .unwrap();
    let fp = FalsePositionSolver::default()
        .solve_in_bracket(&objective, 1e-12, 0.01, 2.0)
        .unwrap();

    assert_relative_eq!(newton.root, 0.25, epsilon = 1e-9);
    assert_relative_eq!(fp.root, newton.root, epsilon = 1e-8);
}

// =============================================================================
// YIELD TO MATURITY
// =============================================================================

#[test]
fn test_yield_all_solvers_agree() {
    let results = all_solvers(SolverConfig::default());
    let reference = results[2].1.as_ref().unwrap().root;

    for (name, result) in &results {
        let root = result.as_ref().unwrap().root;
        assert!(
            (root - reference).abs() < 1e-9,
            "{} gave {} vs Brent {}",
            name,
            root,
            reference
        );
    }
    assert_relative_eq!(bond_price(6.0, 10, reference), 92.0, epsilon = 1e-8);
}

#[test]
fn test_yield_budget_too_small() {
    let results = all_solvers(SolverConfig::new(3));

    for (name, result) in results {
        assert!(
            matches!(
                result,
                Err(MathError::MaxEvaluationsExceeded { max_evaluations: 3 })
            ),
            "{} should exhaust its budget, got {:?}",
            name,
            result
        );
    }
}

#[test]
fn test_yield_through_trait_object() {
    let price = |y: f64| bond_price(4.5, 7, y) - 101.25;
    let objective: &dyn ObjectiveFunction = &price;

    let roots = [
        FalsePositionSolver::default()
            .solve(objective, 1e-12, 0.05, 0.01)
            .unwrap()
            .root,
        BrentSolver::default()
            .solve(objective, 1e-12, 0.05, 0.01)
            .unwrap()
            .root,
    ];

    assert_relative_eq!(roots[0], roots[1], epsilon = 1e-9);
    assert!(roots[0] < 0.045); // premium bond yields less than its coupon
}
