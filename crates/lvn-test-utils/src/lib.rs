//! Test fixtures and parameter helpers for langevin-dp development.
//!
//! Provides small [`LangevinModel`](lvn_core::LangevinModel)
//! implementations with known closed-form behaviour ([`fixtures`]) and
//! builders for the parameter sets the integration tests reuse.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use lvn_engine::{InitialCondition, Lattice, Parameters, ParametersBuilder};
use lvn_space::EdgeBehavior;

pub use fixtures::{DecayModel, InertModel, NanAfterModel, RecordingModel};

/// A single isolated cell.
pub fn single_cell() -> Lattice {
    Lattice::Line {
        nx: 1,
        edge: EdgeBehavior::Absorb,
    }
}

/// A periodic ring of `n` cells.
pub fn ring(n: u32) -> Lattice {
    Lattice::Line {
        nx: n,
        edge: EdgeBehavior::Wrap,
    }
}

/// A periodic `n x n` torus.
pub fn torus(n: u32) -> Lattice {
    Lattice::Plane {
        nx: n,
        ny: n,
        edge_x: EdgeBehavior::Wrap,
        edge_y: EdgeBehavior::Wrap,
    }
}

/// Builder with every coefficient zeroed, `dx = 1`, `dt = 0.1`, and
/// `steps` steps on `lattice`.
///
/// Tests switch on exactly the terms they exercise.
pub fn quiet_builder(lattice: Lattice, steps: u64) -> ParametersBuilder {
    Parameters::builder()
        .lattice(lattice)
        .linear(0.0)
        .quadratic(0.0)
        .diffusion(0.0)
        .noise(0.0)
        .dx(1.0)
        .dt(0.1)
        .n_steps(steps)
}

/// Noisy DP parameters on a ring, seeded.
///
/// Near the mean-field active phase so runs neither die instantly nor
/// blow up.
pub fn noisy_ring(n: u32, steps: u64, seed: u64) -> Parameters {
    match Parameters::builder()
        .lattice(ring(n))
        .linear(0.5)
        .quadratic(1.0)
        .diffusion(0.25)
        .noise(1.0)
        .dx(1.0)
        .dt(0.05)
        .n_steps(steps)
        .seed(seed)
        .initial_condition(InitialCondition::RandomUniform { min: 0.0, max: 1.0 })
        .build()
    {
        Ok(params) => params,
        Err(e) => panic!("noisy_ring fixture is invalid: {e}"),
    }
}

/// A field of `n` zeros with `value` at cell `at`.
pub fn spike(n: usize, at: usize, value: f64) -> Vec<f64> {
    let mut field = vec![0.0; n];
    field[at] = value;
    field
}
