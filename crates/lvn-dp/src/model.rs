//! The DP model's deterministic terms.

use lvn_core::{Coefficients, LangevinModel, Neighbourhood};

/// Quadratic saturation plus nearest-neighbour diffusion.
///
/// The linear growth `a rho` and the `sqrt(rho)` noise are not here:
/// the integrator samples them exactly.
///
/// ```text
/// reaction  = -b rho_i^2
/// diffusion = (D / dx^2) * sum_j (rho_j - rho_i)
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DpLangevin {
    quadratic: f64,
    /// `D / dx^2`.
    coupling: f64,
}

impl DpLangevin {
    /// A model with no coefficients yet; `prepare()` supplies them.
    pub fn new() -> Self {
        Self::default()
    }

    /// Quadratic coefficient `b` in use.
    pub fn quadratic(&self) -> f64 {
        self.quadratic
    }

    /// Diffusion rate per neighbour, `D / dx^2`.
    pub fn coupling(&self) -> f64 {
        self.coupling
    }
}

impl LangevinModel for DpLangevin {
    fn name(&self) -> &str {
        "dp"
    }

    fn set_coefficients(&mut self, coefficients: &Coefficients, dx: f64) {
        self.quadratic = coefficients.quadratic;
        self.coupling = coefficients.diffusion / (dx * dx);
    }

    fn reaction_term(&self, density: f64, _site: &Neighbourhood<'_>) -> f64 {
        -self.quadratic * density * density
    }

    fn diffusion_term(&self, density: f64, site: &Neighbourhood<'_>) -> f64 {
        self.coupling * site.laplacian(density)
    }

    /// Explicit stability limit of the coupling, `1 / (degree * D / dx^2)`.
    fn max_dt(&self, max_degree: usize) -> Option<f64> {
        if self.coupling > 0.0 && max_degree > 0 {
            Some(1.0 / (max_degree as f64 * self.coupling))
        } else {
            None
        }
    }
}
