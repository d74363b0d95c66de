//! Operator-splitting integrator for Langevin field equations.
//!
//! The central type is [`BaseLangevin`], a model-agnostic stochastic
//! integrator. Each step composes:
//!
//! 1. boundary conditions ([`boundary`]),
//! 2. the model's deterministic reaction and coupling terms, integrated
//!    with explicit Euler or classic RK4,
//! 3. an exact Poisson-Gamma sample of the linear term plus
//!    `sqrt(rho)` multiplicative noise ([`dornic`]).
//!
//! Configuration lives in [`Parameters`], validated up front by
//! [`Parameters::validate`]; random draws come from a per-instance
//! [`RandomSource`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod config;
pub mod dornic;
pub mod initial;
pub mod integrator;
pub mod metrics;
pub mod random;

pub use boundary::{BoundaryCondition, BoundaryConditions, BoundaryPlan};
pub use config::{
    Axis, ConfigError, IntegrationMethod, Lattice, Parameters, ParametersBuilder, SplittingScheme,
};
pub use dornic::LinearNoiseStep;
pub use initial::InitialCondition;
pub use integrator::BaseLangevin;
pub use metrics::StepMetrics;
pub use random::{RandomSource, SamplingError};
