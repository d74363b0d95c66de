//! Benchmark profiles for the langevin-dp simulator.
//!
//! Pre-built [`Parameters`] for benchmarks and examples:
//!
//! - [`reference_profile`]: 100x100 periodic plane (10K cells), active phase
//! - [`stress_profile`]: 316x316 periodic plane (~100K cells)
//! - [`critical_line_profile`]: 1D ring near the mean-field critical point

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use lvn_engine::{ConfigError, InitialCondition, Lattice, Parameters};
use lvn_space::EdgeBehavior;

fn plane(side: u32) -> Lattice {
    Lattice::Plane {
        nx: side,
        ny: side,
        edge_x: EdgeBehavior::Wrap,
        edge_y: EdgeBehavior::Wrap,
    }
}

/// 100x100 periodic plane (10K cells) with the default coefficients.
///
/// dt=0.01 against a stability limit of 1/(4 * 0.1/0.5^2) = 0.625.
pub fn reference_profile(seed: u64) -> Result<Parameters, ConfigError> {
    Parameters::builder()
        .lattice(plane(100))
        .dt(0.01)
        .n_steps(1_000)
        .sample_stride(100)
        .seed(seed)
        .record_grid(false)
        .build()
}

/// 316x316 periodic plane (~100K cells).
///
/// Same coefficients as [`reference_profile`] at 10x the cell count.
pub fn stress_profile(seed: u64) -> Result<Parameters, ConfigError> {
    Parameters::builder()
        .lattice(plane(316))
        .dt(0.01)
        .n_steps(100)
        .sample_stride(10)
        .seed(seed)
        .record_grid(false)
        .build()
}

/// 1024-cell ring with `a` just above zero, starting from a full lattice.
pub fn critical_line_profile(seed: u64) -> Result<Parameters, ConfigError> {
    Parameters::builder()
        .lattice(Lattice::Line {
            nx: 1024,
            edge: EdgeBehavior::Wrap,
        })
        .linear(0.05)
        .quadratic(1.0)
        .diffusion(0.25)
        .noise(1.0)
        .dx(1.0)
        .dt(0.1)
        .n_steps(2_000)
        .sample_stride(20)
        .seed(seed)
        .initial_condition(InitialCondition::Constant(1.0))
        .build()
}
