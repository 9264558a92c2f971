//! Benchmarks for the kestrel-math solvers and line search.
//!
//! Run with: cargo bench -p kestrel-math

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nalgebra::DVector;

use kestrel_math::prelude::*;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

/// Price-minus-target for an annual-pay bond, one per coupon level.
fn yield_objective(coupon: f64, target: f64) -> impl Fn(f64) -> f64 {
    move |y: f64| {
        let annuity: f64 = (1..=10).map(|t| coupon / (1.0 + y).powi(t)).sum();
        annuity + 100.0 / (1.0 + y).powi(10) - target
    }
}

fn create_targets(n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let coupon = 2.0 + (i % 7) as f64 * 0.5;
            let target = 90.0 + (i % 20) as f64;
            (coupon, target)
        })
        .collect()
}

// =============================================================================
// ROOT FINDING
// =============================================================================

fn bench_single_yield(c: &mut Criterion) {
    let f = yield_objective(5.0, 95.0);
    let config = SolverConfig::default();

    let mut group = c.benchmark_group("single_yield");
    group.bench_function("false_position", |b| {
        b.iter(|| false_position(&f, black_box(0.0), black_box(0.2), 1e-10, &config))
    });
    group.bench_function("bisection", |b| {
        b.iter(|| bisection(&f, black_box(0.0), black_box(0.2), 1e-10, &config))
    });
    group.bench_function("brent", |b| {
        b.iter(|| brent(&f, black_box(0.0), black_box(0.2), 1e-10, &config))
    });
    group.bench_function("false_position_auto_bracket", |b| {
        let solver = FalsePositionSolver::default();
        b.iter(|| solver.solve(&f, 1e-10, black_box(0.05), black_box(0.01)))
    });
    group.finish();
}

fn bench_batch_yields(c: &mut Criterion) {
    let solver = FalsePositionSolver::default();

    let mut group = c.benchmark_group("batch_yields");
    group.sample_size(50);

    for size in &[10, 100, 1000] {
        let targets = create_targets(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &targets, |b, targets| {
            b.iter(|| {
                targets
                    .iter()
                    .map(|&(coupon, target)| {
                        let f = yield_objective(coupon, target);
                        solver.solve(&f, 1e-10, 0.05, 0.01).map(|r| r.root)
                    })
                    .collect::<Vec<_>>()
            })
        });
    }
    group.finish();
}

// =============================================================================
// LINE SEARCH
// =============================================================================

fn bench_armijo(c: &mut Criterion) {
    let cost = NumericalCost::new(|p: &[f64]| {
        (1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2)
    });
    let x = DVector::from_vec(vec![-1.2, 1.0]);
    let mut gradient = DVector::zeros(2);
    let value = cost.value_and_gradient(&mut gradient, &x);
    let direction = -&gradient;
    let criteria = EndCriteria::default();
    let armijo = ArmijoLineSearch::default();

    c.bench_function("armijo_rosenbrock", |b| {
        b.iter(|| {
            let problem = OptimizationProblem::new(&cost, &x, &direction, &criteria)?;
            Ok::<_, MathError>(armijo.search(
                &problem,
                black_box(1.0),
                value,
                gradient.norm_squared(),
            ))
        })
    });
}

criterion_group!(benches, bench_single_yield, bench_batch_yields, bench_armijo);
criterion_main!(benches);
