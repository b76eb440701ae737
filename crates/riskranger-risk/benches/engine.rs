//! Benchmarks for the risk metrics engine.

#![allow(missing_docs)]

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use riskranger_data::PriceSeries;
use riskranger_risk::{RiskFreeRate, RiskMetricsEngine, compute_returns};

fn random_walk(n: usize) -> PriceSeries {
    let mut rng = StdRng::seed_from_u64(11);
    let mut price = 100.0;
    let prices: Vec<f64> = (0..n)
        .map(|_| {
            price *= 1.0 + rng.gen_range(-0.02..0.021);
            price
        })
        .collect();
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date");
    PriceSeries::from_prices("BENCH", start, &prices).expect("valid series")
}

fn bench_engine(c: &mut Criterion) {
    let engine = RiskMetricsEngine::try_default().expect("default config");
    let rf = RiskFreeRate::fixed(0.04).expect("valid rate");

    let mut group = c.benchmark_group("risk_report");
    for years in [1usize, 10, 30] {
        let prices = random_walk(years * 252 + 1);
        let returns = compute_returns(&prices).expect("enough prices");
        group.bench_with_input(BenchmarkId::from_parameter(years), &returns, |b, returns| {
            b.iter(|| engine.compute(black_box(returns), &rf));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
