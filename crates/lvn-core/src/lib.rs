//! Core types and traits for Langevin field simulations.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the abstractions shared by every other crate in the workspace:
//! epoch identifiers, the step error taxonomy, the coefficient bundle,
//! and the [`LangevinModel`] capability contract that concrete models
//! implement.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod model;

pub use error::StepError;
pub use id::{Coord, EpochId};
pub use model::{Coefficients, LangevinModel, Neighbourhood};
