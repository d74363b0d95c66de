//! Directed-percolation Langevin simulation.
//!
//! [`SimDP`] drives a [`BaseLangevin`](lvn_engine::BaseLangevin)
//! integrator specialized to the DP equation
//!
//! ```text
//! d rho / dt = a rho - b rho^2 + D lap(rho) + gamma sqrt(rho) eta
//! ```
//!
//! and accumulates the observables a caller reads back after a run:
//! mean density per recorded epoch, epoch times, and (optionally) the
//! full density grid. [`ensemble`] runs independent replicas across
//! worker threads.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod ensemble;
pub mod error;
pub mod model;
pub mod observables;
pub mod sim;

pub use ensemble::{Ensemble, ReplicaOutcome, ReplicaRun};
pub use error::SimError;
pub use model::DpLangevin;
pub use observables::Observables;
pub use sim::{EpochSample, RunSummary, SimDP};
