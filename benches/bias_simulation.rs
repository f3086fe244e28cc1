//! Benchmarks for the bias sampler, group evaluation and a full simulation.

use arrest_bias::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const STUDY: &str = "African-American";
const REFERENCE: &str = "Caucasian";

/// Synthetic cohort with scores roughly linear in prior count.
fn synthetic_cohort(n: usize, seed: u64) -> Cohort {
    let mut rng = StdRng::seed_from_u64(seed);
    let records = (0..n)
        .map(|i| {
            let priors: u32 = rng.gen_range(0..20);
            let noise: i32 = rng.gen_range(-1..=1);
            let decile = (1 + priors as i32 / 2 + noise).clamp(1, 10);
            let race = if i % 2 == 0 { STUDY } else { REFERENCE };
            DefendantRecord::new(i.to_string(), race, priors, decile, rng.gen_bool(0.45))
        })
        .collect();
    Cohort::new(records)
}

fn bench_sampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("bias_sampler");

    for &n in &[1_000usize, 10_000, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        let events: Vec<String> = (0..n).map(|i| (i % 997).to_string()).collect();
        let sampler = BiasSampler::new(0.3).expect("valid fraction");
        let mut rng = StdRng::seed_from_u64(42);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| sampler.sample(black_box(&events), &mut rng));
        });
    }

    group.finish();
}

fn bench_group_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_evaluation");

    for &n in &[1_000usize, 7_000] {
        group.throughput(Throughput::Elements(n as u64));
        let cohort = synthetic_cohort(n, 7);
        let model = RiskModel::fit(&cohort).expect("non-degenerate cohort");
        let events = GroupEvents::extract(&cohort, STUDY);
        let evaluator = GroupEvaluator::new(&model, HIGH_RISK_THRESHOLD);

        group.bench_with_input(BenchmarkId::new("recorded", n), &n, |b, _| {
            b.iter(|| evaluator.evaluate(black_box(&cohort), STUDY, Outcomes::Recorded));
        });
        group.bench_with_input(BenchmarkId::new("observed", n), &n, |b, _| {
            b.iter(|| evaluator.evaluate(black_box(&cohort), STUDY, Outcomes::Observed(&events)));
        });
    }

    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    let cohort = synthetic_cohort(7_000, 11);
    let pipeline = BiasPipeline::new(SimulationConfig::new("synthetic.csv").with_bias_fraction(0.3))
        .expect("valid config");
    let mut rng = StdRng::seed_from_u64(3);

    c.bench_function("simulation_7000", |b| {
        b.iter(|| pipeline.run_cohort(black_box(&cohort), &mut rng));
    });
}

criterion_group!(benches, bench_sampler, bench_group_evaluation, bench_simulation);
criterion_main!(benches);
