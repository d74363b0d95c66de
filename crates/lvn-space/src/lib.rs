//! Lattice topologies for Langevin field simulations.
//!
//! This crate defines the [`Space`] trait, through which the integrator
//! discovers the neighbour structure of a lattice, along with the two
//! concrete backends used by the DP model and the precomputed
//! [`Wiring`] table the integrator iterates over every step.
//!
//! # Backends
//!
//! - [`Line1D`]: 1D line with configurable [`EdgeBehavior`]
//! - [`Grid2D`]: 2D 4-connected grid with an independent [`EdgeBehavior`]
//!   per axis (e.g. periodic in x, bounded in y)

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod error;
pub mod grid2d;
pub mod line1d;
pub mod space;
pub mod wiring;

#[cfg(test)]
pub(crate) mod compliance;

pub use edge::EdgeBehavior;
pub use error::SpaceError;
pub use grid2d::Grid2D;
pub use line1d::Line1D;
pub use space::{Side, Space};
pub use wiring::Wiring;
