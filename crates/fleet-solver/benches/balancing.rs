// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fleet_bnb::{
    bnb::BnbSolver, branching::constrained::MostConstrainedBuilder,
    eval::spread::SpreadEvaluator, monitor::no_op::NoOperationMonitor,
};
use fleet_model::{generate::RideGenerator, model::Model};
use fleet_search::result::SolveStatus;
use fleet_solver::{balancing::solve_balanced_assignment, feasibility::solve_minimum_cars};
use std::{hint::black_box, time::Duration};

const SIZES: [usize; 3] = [8, 10, 12];
const SEED: u64 = 0x5eed;

/// Rides packed into a short horizon so the balancing phase has real work.
fn instance(num_rides: usize) -> Model<i64> {
    RideGenerator::new(num_rides)
        .durations(15, 120)
        .horizon(240)
        .generate_model(SEED)
        .unwrap_or_else(|e| panic!("Failed to generate {} rides: {}", num_rides, e))
}

fn bench_feasibility(c: &mut Criterion) {
    let mut group = c.benchmark_group("feasibility");
    for num_rides in [100usize, 1_000, 10_000] {
        let model = RideGenerator::new(num_rides)
            .generate_model(SEED)
            .unwrap_or_else(|e| panic!("Failed to generate {} rides: {}", num_rides, e));
        group.throughput(Throughput::Elements(num_rides as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_rides), &model, |b, model| {
            b.iter(|| solve_minimum_cars(black_box(model), None))
        });
    }
    group.finish();
}

fn bench_single_strategy(c: &mut Criterion) {
    let mut group = c.benchmark_group("bnb_most_constrained");
    group.sample_size(10);
    for num_rides in SIZES {
        let model = instance(num_rides);
        let num_cars = model.stabbing_number();
        let mut solver = BnbSolver::<i64>::preallocated(num_rides, num_cars);
        let mut builder = MostConstrainedBuilder::preallocated(num_cars);
        let mut evaluator = SpreadEvaluator::<i64>::new();

        group.bench_with_input(
            BenchmarkId::new(format!("{}x{}", num_rides, num_cars), num_rides),
            &model,
            |b, model| {
                b.iter(|| {
                    let outcome = solver.solve(
                        black_box(model),
                        num_cars,
                        &mut builder,
                        &mut evaluator,
                        NoOperationMonitor::new(),
                    );
                    if outcome.result().status() != SolveStatus::Optimal {
                        panic!("Benchmark configuration error: search did not prove optimality.");
                    }
                })
            },
        );
    }
    group.finish();
}

fn bench_portfolio(c: &mut Criterion) {
    let mut group = c.benchmark_group("balancing_portfolio");
    group.sample_size(10);
    for num_rides in SIZES {
        let model = instance(num_rides);
        let witness = solve_minimum_cars(&model, None)
            .result
            .into_solution()
            .expect("the sweep always finds an assignment");
        let num_cars = witness.num_cars();

        group.bench_with_input(
            BenchmarkId::new(format!("{}x{}", num_rides, num_cars), num_rides),
            &model,
            |b, model| {
                b.iter(|| {
                    solve_balanced_assignment(
                        black_box(model),
                        num_cars,
                        Some(Duration::from_secs(10)),
                        Some(witness.clone()),
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_feasibility,
    bench_single_strategy,
    bench_portfolio
);
criterion_main!(benches);
