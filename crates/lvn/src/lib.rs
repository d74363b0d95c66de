//! lvn: directed-percolation Langevin simulation.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! lvn sub-crates. For most users, adding `lvn` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use lvn::prelude::*;
//!
//! let params = Parameters::builder()
//!     .lattice(Lattice::Plane {
//!         nx: 16,
//!         ny: 16,
//!         edge_x: EdgeBehavior::Wrap,
//!         edge_y: EdgeBehavior::Wrap,
//!     })
//!     .linear(1.0)
//!     .quadratic(2.0)
//!     .diffusion(0.1)
//!     .noise(1.0)
//!     .dt(0.01)
//!     .n_steps(200)
//!     .sample_stride(20)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let mut sim = SimDP::new(params);
//! sim.prepare().unwrap();
//! sim.run(200).unwrap();
//! let summary = sim.postprocess().unwrap();
//! assert_eq!(summary.records, 10);
//! assert!(sim.mean_densities().iter().all(|m| *m >= 0.0));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `lvn-core` | Epoch IDs, step errors, the model trait |
//! | [`space`] | `lvn-space` | 1D and 2D lattices, edge topology, wiring |
//! | [`engine`] | `lvn-engine` | Parameters, sampler, generic integrator |
//! | [`dp`] | `lvn-dp` | DP model, run driver, observables, ensembles |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`lvn-core`).
///
/// Contains [`types::EpochId`], the [`types::StepError`] taxonomy, and the
/// [`types::LangevinModel`] trait that concrete models implement.
pub use lvn_core as types;

/// Lattice topology (`lvn-space`).
///
/// Provides the [`space::Space`] trait and the [`space::Line1D`] and
/// [`space::Grid2D`] backends.
pub use lvn_space as space;

/// Generic integrator and run configuration (`lvn-engine`).
///
/// [`engine::BaseLangevin`] steps any [`types::LangevinModel`];
/// [`engine::Parameters`] describes a run.
pub use lvn_engine as engine;

/// Directed percolation (`lvn-dp`).
///
/// [`dp::SimDP`] for single runs, [`dp::Ensemble`] for replica batches.
pub use lvn_dp as dp;

/// Common imports for typical lvn usage.
///
/// ```rust
/// use lvn::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use lvn_core::{Coefficients, EpochId, LangevinModel, Neighbourhood};

    // Errors
    pub use lvn_core::StepError;
    pub use lvn_dp::SimError;
    pub use lvn_engine::ConfigError;

    // Space
    pub use lvn_space::{EdgeBehavior, Space};

    // Engine
    pub use lvn_engine::{
        BaseLangevin, BoundaryCondition, BoundaryConditions, InitialCondition, IntegrationMethod,
        Lattice, Parameters, SplittingScheme, StepMetrics,
    };

    // DP
    pub use lvn_dp::{DpLangevin, Ensemble, EpochSample, RunSummary, SimDP};
}
