//! Reusable model fixtures.
//!
//! Four models for integrator validation:
//!
//! - [`InertModel`]: no deterministic terms at all.
//! - [`DecayModel`]: linear-in-field decay with a fixed rate.
//! - [`NanAfterModel`]: returns NaN after N rate evaluations.
//! - [`RecordingModel`]: remembers the coefficients it was handed.

use std::sync::atomic::{AtomicUsize, Ordering};

use lvn_core::{Coefficients, LangevinModel, Neighbourhood};

/// Contributes nothing; only the stochastic sub-step moves the field.
#[derive(Clone, Copy, Debug, Default)]
pub struct InertModel;

impl LangevinModel for InertModel {
    fn name(&self) -> &str {
        "inert"
    }

    fn set_coefficients(&mut self, _coefficients: &Coefficients, _dx: f64) {}

    fn reaction_term(&self, _density: f64, _site: &Neighbourhood<'_>) -> f64 {
        0.0
    }

    fn diffusion_term(&self, _density: f64, _site: &Neighbourhood<'_>) -> f64 {
        0.0
    }
}

/// `d rho / dt = -rate * rho`, independent of the run's coefficients.
#[derive(Clone, Copy, Debug)]
pub struct DecayModel {
    pub rate: f64,
}

impl DecayModel {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

impl LangevinModel for DecayModel {
    fn name(&self) -> &str {
        "decay"
    }

    fn set_coefficients(&mut self, _coefficients: &Coefficients, _dx: f64) {}

    fn reaction_term(&self, density: f64, _site: &Neighbourhood<'_>) -> f64 {
        -self.rate * density
    }

    fn diffusion_term(&self, _density: f64, _site: &Neighbourhood<'_>) -> f64 {
        0.0
    }
}

/// Returns a finite rate for `finite_calls` evaluations, NaN after.
///
/// Counts with an `AtomicUsize` because rate evaluation takes `&self`.
#[derive(Debug)]
pub struct NanAfterModel {
    pub finite_calls: usize,
    calls: AtomicUsize,
}

impl NanAfterModel {
    pub fn new(finite_calls: usize) -> Self {
        Self {
            finite_calls,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many reaction evaluations have happened.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl LangevinModel for NanAfterModel {
    fn name(&self) -> &str {
        "nan-after"
    }

    fn set_coefficients(&mut self, _coefficients: &Coefficients, _dx: f64) {
        self.calls.store(0, Ordering::Relaxed);
    }

    fn reaction_term(&self, _density: f64, _site: &Neighbourhood<'_>) -> f64 {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        if n >= self.finite_calls {
            f64::NAN
        } else {
            0.0
        }
    }

    fn diffusion_term(&self, _density: f64, _site: &Neighbourhood<'_>) -> f64 {
        0.0
    }
}

/// Inert, but keeps the last `(coefficients, dx)` it received.
#[derive(Clone, Debug, Default)]
pub struct RecordingModel {
    pub seen: Option<(Coefficients, f64)>,
    pub prepares: usize,
}

impl LangevinModel for RecordingModel {
    fn name(&self) -> &str {
        "recording"
    }

    fn set_coefficients(&mut self, coefficients: &Coefficients, dx: f64) {
        self.seen = Some((*coefficients, dx));
        self.prepares += 1;
    }

    fn reaction_term(&self, _density: f64, _site: &Neighbourhood<'_>) -> f64 {
        0.0
    }

    fn diffusion_term(&self, _density: f64, _site: &Neighbourhood<'_>) -> f64 {
        0.0
    }
}
