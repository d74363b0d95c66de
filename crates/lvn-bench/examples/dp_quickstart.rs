//! End-to-end DP run example.
//!
//! Demonstrates: build parameters → SimDP → prepare → segmented runs →
//! postprocess → read buffers → small replica sweep.
//!
//! Set `RUST_LOG=debug` to see every recorded epoch.

use lvn_bench::critical_line_profile;
use lvn_dp::{Ensemble, SimDP};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("=== DP Langevin Quickstart ===\n");

    let params = critical_line_profile(42).unwrap();
    for (key, value) in params.summary() {
        println!("  {key:<20} {value}");
    }

    let mut sim = SimDP::new(params.clone());
    sim.prepare().unwrap();
    println!("\ninitial mean density: {:.5}", sim.initial_mean_density());

    // --- Segmented run: four quarters of the budget ---
    let quarter = params.n_steps / 4;
    for segment in 1..=4 {
        sim.run(quarter).unwrap();
        println!(
            "  segment {segment}: t={:>7.2}, mean={:>9.5}, step={:>5}μs",
            sim.current_time(),
            sim.mean_density(),
            sim.last_metrics().total_us,
        );
    }

    let summary = sim.postprocess().unwrap().clone();
    println!("\n{summary:#?}");
    println!(
        "recorded {} epochs, grid buffer {} values",
        sim.n_epochs(),
        sim.density_grid().len()
    );

    // --- Replica sweep of a around 0.05 ---
    println!("\nSweep:");
    let outcomes = Ensemble::linear_sweep(&params, 0.05, 0.04, 6).run();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(run) => println!(
                "  a={:>6.3} seed={:>4}: final mean {:>9.5}, survived={}",
                outcome.p, outcome.seed, run.summary.final_mean, run.summary.survived
            ),
            Err(e) => println!("  a={:>6.3} seed={:>4}: failed: {e}", outcome.p, outcome.seed),
        }
    }
}
