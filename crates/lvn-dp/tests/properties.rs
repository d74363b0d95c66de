//! Property tests over seeds and coefficients.

use lvn_dp::SimDP;
use lvn_engine::{InitialCondition, Parameters};
use lvn_test_utils::ring;
use proptest::prelude::*;

fn params(seed: u64, a: f64, gamma: f64, stride: u64, steps: u64) -> Parameters {
    Parameters::builder()
        .lattice(ring(12))
        .linear(a)
        .quadratic(1.0)
        .diffusion(0.2)
        .noise(gamma)
        .dx(1.0)
        .dt(0.05)
        .n_steps(steps)
        .sample_stride(stride)
        .seed(seed)
        .initial_condition(InitialCondition::RandomUniform { min: 0.0, max: 1.5 })
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn field_stays_non_negative(
        seed in any::<u64>(),
        a in -1.0f64..2.0,
        gamma in 0.0f64..2.0,
    ) {
        let mut sim = SimDP::new(params(seed, a, gamma, 1, 60));
        sim.prepare().unwrap();
        prop_assert!(sim.current_density().iter().all(|v| v.is_finite() && *v >= 0.0));
        prop_assert_eq!(sim.current_time(), 0.0);
        sim.run_to_end().unwrap();
        prop_assert!(sim.density_grid().iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn record_count_is_floor_of_steps_over_stride(
        steps in 1u64..120,
        stride in 1u64..40,
    ) {
        let mut sim = SimDP::new(params(1, 0.5, 1.0, stride, steps));
        sim.prepare().unwrap();
        sim.run_to_end().unwrap();
        let effective = stride.min(steps);
        prop_assert_eq!(sim.mean_densities().len() as u64, steps / effective);
        prop_assert_eq!(sim.time_epochs().len(), sim.mean_densities().len());
    }

    #[test]
    fn same_seed_same_output(seed in any::<u64>()) {
        let run = |seed| {
            let mut sim = SimDP::new(params(seed, 0.7, 1.0, 3, 45));
            sim.prepare().unwrap();
            sim.run_to_end().unwrap();
            (sim.mean_densities().to_vec(), sim.density_grid().to_vec())
        };
        prop_assert_eq!(run(seed), run(seed));
    }
}
