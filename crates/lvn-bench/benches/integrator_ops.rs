//! Criterion benchmarks for full integration steps.

use criterion::{criterion_group, criterion_main, Criterion};
use lvn_bench::{critical_line_profile, reference_profile};
use lvn_dp::SimDP;
use lvn_engine::{IntegrationMethod, SplittingScheme};

/// Benchmark: one RK4 + Lie step on the 10K-cell reference plane.
fn bench_step_reference_rk4(c: &mut Criterion) {
    let params = reference_profile(42).unwrap();
    let mut sim = SimDP::new(params);
    sim.prepare().unwrap();

    c.bench_function("step_reference_rk4_10k", |b| {
        b.iter(|| {
            if sim.remaining_steps() == 0 {
                sim.prepare().unwrap();
            }
            sim.run(1).unwrap();
            std::hint::black_box(sim.mean_density());
        });
    });
}

/// Benchmark: Euler vs RK4 and Lie vs Strang on the same plane.
fn bench_step_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_variants_10k");
    for (label, method, splitting) in [
        ("euler_lie", IntegrationMethod::Euler, SplittingScheme::Lie),
        ("rk4_lie", IntegrationMethod::RungeKutta, SplittingScheme::Lie),
        ("rk4_strang", IntegrationMethod::RungeKutta, SplittingScheme::Strang),
    ] {
        let mut params = reference_profile(7).unwrap();
        params.integration_method = method;
        params.splitting = splitting;
        let mut sim = SimDP::new(params);
        sim.prepare().unwrap();
        group.bench_function(label, |b| {
            b.iter(|| {
                if sim.remaining_steps() == 0 {
                    sim.prepare().unwrap();
                }
                sim.run(1).unwrap();
                std::hint::black_box(sim.mean_density());
            });
        });
    }
    group.finish();
}

/// Benchmark: a complete recorded run on a 1024-cell ring.
fn bench_full_run_ring(c: &mut Criterion) {
    let params = critical_line_profile(3).unwrap();

    c.bench_function("full_run_ring_1024x2000", |b| {
        b.iter(|| {
            let mut sim = SimDP::new(params.clone());
            sim.prepare().unwrap();
            sim.run_to_end().unwrap();
            std::hint::black_box(sim.postprocess().unwrap().final_mean);
        });
    });
}

criterion_group!(
    benches,
    bench_step_reference_rk4,
    bench_step_variants,
    bench_full_run_ring
);
criterion_main!(benches);
