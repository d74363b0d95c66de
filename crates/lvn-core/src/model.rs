//! The [`LangevinModel`] capability contract and its per-site view.
//!
//! A Langevin model of the DP class is written as
//!
//! ```text
//! d rho / dt = a rho + F(rho, neighbours) + gamma sqrt(rho) eta
//! ```
//!
//! The linear term `a rho` and the multiplicative noise are integrated
//! exactly by the engine's stochastic sub-step, so a model only supplies
//! the remaining deterministic terms `F`, split into a local reaction
//! part and a spatial coupling part.

/// Coefficients of the Langevin equation.
///
/// `linear` is the DP control parameter: the net local growth rate.
/// The remaining coefficients are non-negative in any valid run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coefficients {
    /// Linear growth rate `a`.
    pub linear: f64,
    /// Quadratic saturation rate `b`.
    pub quadratic: f64,
    /// Diffusion constant `D`.
    pub diffusion: f64,
    /// Multiplicative noise amplitude `gamma`.
    pub noise: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            linear: 1.0,
            quadratic: 2.0,
            diffusion: 0.1,
            noise: 1.0,
        }
    }
}

/// Read-only view of one lattice site and its nearest neighbours.
///
/// Borrowed from the integrator's current stage buffer, so values seen
/// through it are those of the sub-step being evaluated.
#[derive(Clone, Copy, Debug)]
pub struct Neighbourhood<'a> {
    field: &'a [f64],
    neighbours: &'a [usize],
}

impl<'a> Neighbourhood<'a> {
    /// Create a view over `field` for a site whose neighbours are the
    /// flat indices in `neighbours`.
    pub fn new(field: &'a [f64], neighbours: &'a [usize]) -> Self {
        Self { field, neighbours }
    }

    /// Number of neighbours (2 per interior axis, fewer at absorbing edges).
    pub fn degree(&self) -> usize {
        self.neighbours.len()
    }

    /// Iterate over neighbour densities in wiring order.
    pub fn values(&self) -> impl Iterator<Item = f64> + 'a {
        let (field, neighbours) = (self.field, self.neighbours);
        neighbours.iter().map(move |&j| field[j])
    }

    /// Sum of neighbour densities.
    pub fn sum(&self) -> f64 {
        self.values().sum()
    }

    /// Unscaled graph Laplacian: `sum_j (rho_j - rho_i)`.
    pub fn laplacian(&self, centre: f64) -> f64 {
        self.sum() - self.degree() as f64 * centre
    }
}

/// The model-specific part of a Langevin equation.
///
/// The integrator owns field state, sampling, and time bookkeeping; it
/// calls into the model once per site per deterministic stage and knows
/// nothing about the formulas.
///
/// # Contract
///
/// - `reaction_term` and `diffusion_term` MUST be pure functions of
///   their arguments and the coefficients last passed to
///   `set_coefficients`.
/// - Both return a rate (`d rho / dt` contribution), not an increment.
///
/// # Examples
///
/// A model with pure linear-in-field decay on top of the exact
/// stochastic part:
///
/// ```
/// use lvn_core::{Coefficients, LangevinModel, Neighbourhood};
///
/// struct Decay { rate: f64 }
///
/// impl LangevinModel for Decay {
///     fn name(&self) -> &str { "decay" }
///
///     fn set_coefficients(&mut self, c: &Coefficients, _dx: f64) {
///         self.rate = c.quadratic;
///     }
///
///     fn reaction_term(&self, density: f64, _site: &Neighbourhood<'_>) -> f64 {
///         -self.rate * density
///     }
///
///     fn diffusion_term(&self, _density: f64, _site: &Neighbourhood<'_>) -> f64 {
///         0.0
///     }
/// }
///
/// let field = [1.0, 2.0];
/// let wiring = [1usize];
/// let site = Neighbourhood::new(&field, &wiring);
/// let model = Decay { rate: 0.5 };
/// assert_eq!(model.reaction_term(1.0, &site), -0.5);
/// ```
pub trait LangevinModel: Send + 'static {
    /// Human-readable name for logs and summaries.
    fn name(&self) -> &str;

    /// Receive the run's coefficients and lattice spacing.
    ///
    /// Called once per `prepare()`, before any term is evaluated.
    fn set_coefficients(&mut self, coefficients: &Coefficients, dx: f64);

    /// Local reaction rate at a site.
    fn reaction_term(&self, density: f64, site: &Neighbourhood<'_>) -> f64;

    /// Spatial coupling rate at a site.
    fn diffusion_term(&self, density: f64, site: &Neighbourhood<'_>) -> f64;

    /// Largest stable `dt` for the explicit deterministic sub-step,
    /// given the maximum neighbour count on the lattice.
    ///
    /// Return `None` to impose no constraint.
    fn max_dt(&self, _max_degree: usize) -> Option<f64> {
        None
    }
}
