//! Run parameters, validation, and configuration error types.
//!
//! [`Parameters`] is the immutable input to a run. Build it with
//! [`Parameters::builder`] (which validates) or fill the public fields
//! directly and call [`validate()`](Parameters::validate) yourself; the
//! integrator re-validates in `prepare()` either way.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;
use lvn_core::Coefficients;
use lvn_space::{EdgeBehavior, Grid2D, Line1D, Space, SpaceError};

use crate::boundary::BoundaryConditions;
use crate::dornic::LinearNoiseStep;
use crate::initial::InitialCondition;
use crate::random::SamplingError;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating [`Parameters`] or preparing a run.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The lattice could not be constructed.
    Space(SpaceError),
    /// `dt` is NaN, infinite, zero, or negative.
    InvalidTimeStep {
        /// The invalid value.
        value: f64,
    },
    /// `dx` is NaN, infinite, zero, or negative.
    InvalidSpacing {
        /// The invalid value.
        value: f64,
    },
    /// The run has no integration steps.
    NoSteps,
    /// The sampling stride is zero.
    ZeroStride,
    /// A Langevin coefficient is out of range.
    InvalidCoefficient {
        /// Coefficient name.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// The divergence bound is not finite and positive.
    InvalidDensityBound {
        /// The invalid value.
        value: f64,
    },
    /// The initial condition does not fit the lattice.
    InvalidInitialCondition {
        /// Description of the problem.
        reason: String,
    },
    /// A boundary condition does not fit the lattice.
    InvalidBoundaryCondition {
        /// Description of the problem.
        reason: String,
    },
    /// `dt` exceeds the model's explicit stability limit.
    TimeStepTooLarge {
        /// Deterministic sub-step length.
        dt: f64,
        /// Largest stable sub-step reported by the model.
        max_dt: f64,
    },
    /// The stochastic sub-step coefficients are degenerate.
    UnstableSplitting {
        /// Description of the problem.
        reason: String,
    },
    /// Sampling the initial condition failed.
    Sampling(SamplingError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(e) => write!(f, "lattice: {e}"),
            Self::InvalidTimeStep { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::InvalidSpacing { value } => {
                write!(f, "dx must be finite and positive, got {value}")
            }
            Self::NoSteps => write!(f, "n_steps must be at least 1"),
            Self::ZeroStride => write!(f, "sample_stride must be at least 1"),
            Self::InvalidCoefficient { name, value } => {
                write!(f, "coefficient '{name}' out of range: {value}")
            }
            Self::InvalidDensityBound { value } => {
                write!(f, "density bound must be finite and positive, got {value}")
            }
            Self::InvalidInitialCondition { reason } => {
                write!(f, "invalid initial condition: {reason}")
            }
            Self::InvalidBoundaryCondition { reason } => {
                write!(f, "invalid boundary condition: {reason}")
            }
            Self::TimeStepTooLarge { dt, max_dt } => {
                write!(f, "deterministic sub-step {dt} exceeds stability limit {max_dt}")
            }
            Self::UnstableSplitting { reason } => write!(f, "unstable splitting: {reason}"),
            Self::Sampling(e) => write!(f, "initial condition sampling: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            Self::Sampling(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<SamplingError> for ConfigError {
    fn from(e: SamplingError) -> Self {
        Self::Sampling(e)
    }
}

// ── Lattice ────────────────────────────────────────────────────────

/// Named lattice direction, independent of coordinate order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The fast (column) direction.
    X,
    /// The slow (row) direction; absent on a line.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

/// Lattice shape and per-axis edge topology.
///
/// Flat cell indices are `x + y * nx` for both variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lattice {
    /// A 1D line of `nx` cells.
    Line {
        /// Number of cells.
        nx: u32,
        /// Edge topology at both ends.
        edge: EdgeBehavior,
    },
    /// A 2D `nx` by `ny` grid.
    Plane {
        /// Cells along x (columns).
        nx: u32,
        /// Cells along y (rows).
        ny: u32,
        /// Edge topology along x.
        edge_x: EdgeBehavior,
        /// Edge topology along y.
        edge_y: EdgeBehavior,
    },
}

impl Default for Lattice {
    fn default() -> Self {
        Self::Plane {
            nx: 16,
            ny: 16,
            edge_x: EdgeBehavior::Wrap,
            edge_y: EdgeBehavior::Wrap,
        }
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line { nx, edge } => write!(f, "{nx} ({edge:?})"),
            Self::Plane {
                nx,
                ny,
                edge_x,
                edge_y,
            } => write!(f, "{nx}x{ny} ({edge_x:?} x, {edge_y:?} y)"),
        }
    }
}

impl Lattice {
    /// Construct the lattice topology.
    pub fn build(&self) -> Result<Box<dyn Space>, SpaceError> {
        let space: Box<dyn Space> = match *self {
            Self::Line { nx, edge } => Box::new(Line1D::new(nx, edge)?),
            Self::Plane {
                nx,
                ny,
                edge_x,
                edge_y,
            } => Box::new(Grid2D::new(ny, nx, edge_y, edge_x)?),
        };
        Ok(space)
    }

    /// Number of spatial dimensions.
    pub fn ndim(&self) -> usize {
        match self {
            Self::Line { .. } => 1,
            Self::Plane { .. } => 2,
        }
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        match *self {
            Self::Line { nx, .. } => nx as usize,
            Self::Plane { nx, ny, .. } => nx as usize * ny as usize,
        }
    }

    /// Row-major buffer shape: `[nx]` or `[ny, nx]`.
    pub fn shape(&self) -> Vec<usize> {
        match *self {
            Self::Line { nx, .. } => vec![nx as usize],
            Self::Plane { nx, ny, .. } => vec![ny as usize, nx as usize],
        }
    }

    /// Coordinate axis carrying direction `axis`, if the lattice has it.
    pub fn coord_axis(&self, axis: Axis) -> Option<usize> {
        match (self, axis) {
            (Self::Line { .. }, Axis::X) => Some(0),
            (Self::Line { .. }, Axis::Y) => None,
            (Self::Plane { .. }, Axis::X) => Some(1),
            (Self::Plane { .. }, Axis::Y) => Some(0),
        }
    }

    /// Edge topology along `axis`, if the lattice has it.
    pub fn edge_of(&self, axis: Axis) -> Option<EdgeBehavior> {
        match (*self, axis) {
            (Self::Line { edge, .. }, Axis::X) => Some(edge),
            (Self::Line { .. }, Axis::Y) => None,
            (Self::Plane { edge_x, .. }, Axis::X) => Some(edge_x),
            (Self::Plane { edge_y, .. }, Axis::Y) => Some(edge_y),
        }
    }

    /// Flat index of cell `(x, y)`, or `None` outside the lattice.
    pub fn flat_index(&self, x: u32, y: u32) -> Option<usize> {
        match *self {
            Self::Line { nx, .. } => (x < nx && y == 0).then_some(x as usize),
            Self::Plane { nx, ny, .. } => {
                (x < nx && y < ny).then(|| x as usize + y as usize * nx as usize)
            }
        }
    }
}

// ── Method enums ───────────────────────────────────────────────────

/// Integrator for the deterministic sub-step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntegrationMethod {
    /// Explicit forward Euler.
    Euler,
    /// Classic fourth-order Runge-Kutta.
    #[default]
    RungeKutta,
}

/// Composition of the deterministic and stochastic operators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SplittingScheme {
    /// Deterministic over `dt`, then stochastic over `dt`.
    #[default]
    Lie,
    /// Deterministic `dt/2`, stochastic `dt`, deterministic `dt/2`.
    Strang,
}

// ── Parameters ─────────────────────────────────────────────────────

/// Complete, immutable configuration of one run.
///
/// `Default` reproduces a small periodic 16x16 run with
/// `a = 1, b = 2, D = 0.1, gamma = 1`, `dx = 0.5`, `dt = 0.01`.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameters {
    /// Lattice shape and topology.
    pub lattice: Lattice,
    /// Lattice spacing.
    pub dx: f64,
    /// Integration time step.
    pub dt: f64,
    /// Total integration steps in the run.
    pub n_steps: u64,
    /// Record observables every this many steps. Clamped to `n_steps`.
    pub sample_stride: u64,
    /// Seed for the run's random source.
    pub seed: u64,
    /// Langevin coefficients.
    pub coefficients: Coefficients,
    /// Initial density pattern.
    pub initial_condition: InitialCondition,
    /// Edge value conditions.
    pub boundary_conditions: BoundaryConditions,
    /// Deterministic sub-step integrator.
    pub integration_method: IntegrationMethod,
    /// Operator composition.
    pub splitting: SplittingScheme,
    /// Any density above this is reported as divergence.
    pub density_bound: f64,
    /// Whether to store full density snapshots at each record.
    pub record_grid: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            lattice: Lattice::default(),
            dx: 0.5,
            dt: 0.01,
            n_steps: 10_000,
            sample_stride: 1,
            seed: 1,
            coefficients: Coefficients::default(),
            initial_condition: InitialCondition::default(),
            boundary_conditions: BoundaryConditions::default(),
            integration_method: IntegrationMethod::default(),
            splitting: SplittingScheme::default(),
            density_bound: 1e12,
            record_grid: true,
        }
    }
}

fn finite_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidCoefficient { name, value });
    }
    Ok(())
}

impl Parameters {
    /// Start a builder from [`Parameters::default`].
    pub fn builder() -> ParametersBuilder {
        ParametersBuilder {
            params: Self::default(),
        }
    }

    /// Validate all invariants that do not depend on the model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Lattice must build (non-empty, representable).
        self.lattice.build()?;
        // 2. dt and dx finite and positive.
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep { value: self.dt });
        }
        if !self.dx.is_finite() || self.dx <= 0.0 {
            return Err(ConfigError::InvalidSpacing { value: self.dx });
        }
        // 3. Step budget and stride.
        if self.n_steps == 0 {
            return Err(ConfigError::NoSteps);
        }
        if self.sample_stride == 0 {
            return Err(ConfigError::ZeroStride);
        }
        // 4. Coefficients: a may take either sign, the rest are >= 0.
        let c = &self.coefficients;
        if !c.linear.is_finite() {
            return Err(ConfigError::InvalidCoefficient {
                name: "linear",
                value: c.linear,
            });
        }
        finite_non_negative("quadratic", c.quadratic)?;
        finite_non_negative("diffusion", c.diffusion)?;
        finite_non_negative("noise", c.noise)?;
        // 5. Divergence bound.
        if !self.density_bound.is_finite() || self.density_bound <= 0.0 {
            return Err(ConfigError::InvalidDensityBound {
                value: self.density_bound,
            });
        }
        // 6. Initial and boundary conditions fit the lattice.
        self.initial_condition
            .validate(&self.lattice)
            .map_err(|reason| ConfigError::InvalidInitialCondition { reason })?;
        self.boundary_conditions
            .validate(&self.lattice)
            .map_err(|reason| ConfigError::InvalidBoundaryCondition { reason })?;
        // 7. Stochastic sub-step coefficients are representable.
        LinearNoiseStep::new(c.linear, c.noise, self.dt)?;
        Ok(())
    }

    /// Stride actually used for recording: `sample_stride` clamped to
    /// `n_steps`.
    pub fn effective_stride(&self) -> u64 {
        self.sample_stride.min(self.n_steps).max(1)
    }

    /// Number of records a complete run produces.
    pub fn expected_records(&self) -> u64 {
        self.n_steps / self.effective_stride()
    }

    /// Simulated time at the end of a complete run.
    pub fn t_final(&self) -> f64 {
        self.n_steps as f64 * self.dt
    }

    /// The DP control parameter (the linear coefficient `a`).
    pub fn p(&self) -> f64 {
        self.coefficients.linear
    }

    /// Ordered human-readable report of the run configuration.
    pub fn summary(&self) -> IndexMap<&'static str, String> {
        let c = &self.coefficients;
        let mut out = IndexMap::new();
        out.insert("lattice", self.lattice.to_string());
        out.insert("cells", self.lattice.cell_count().to_string());
        out.insert("dx", self.dx.to_string());
        out.insert("dt", self.dt.to_string());
        out.insert("n_steps", self.n_steps.to_string());
        out.insert("t_final", self.t_final().to_string());
        out.insert("sample_stride", self.effective_stride().to_string());
        out.insert("seed", self.seed.to_string());
        out.insert("linear", c.linear.to_string());
        out.insert("quadratic", c.quadratic.to_string());
        out.insert("diffusion", c.diffusion.to_string());
        out.insert("noise", c.noise.to_string());
        out.insert("initial_condition", format!("{:?}", self.initial_condition));
        out.insert("boundary_conditions", format!("{:?}", self.boundary_conditions));
        out.insert("integration_method", format!("{:?}", self.integration_method));
        out.insert("splitting", format!("{:?}", self.splitting));
        out
    }
}

// ── ParametersBuilder ──────────────────────────────────────────────

/// Builder for [`Parameters`]; [`build`](Self::build) validates.
///
/// # Examples
///
/// ```
/// use lvn_engine::{InitialCondition, Lattice, Parameters};
/// use lvn_space::EdgeBehavior;
///
/// let params = Parameters::builder()
///     .lattice(Lattice::Line { nx: 64, edge: EdgeBehavior::Wrap })
///     .linear(1.2)
///     .noise(1.0)
///     .dt(0.05)
///     .dx(1.0)
///     .t_final(10.0)
///     .sample_stride(10)
///     .initial_condition(InitialCondition::Constant(0.5))
///     .build()
///     .unwrap();
/// assert_eq!(params.n_steps, 200);
/// assert_eq!(params.expected_records(), 20);
/// ```
#[derive(Clone, Debug)]
pub struct ParametersBuilder {
    params: Parameters,
}

impl ParametersBuilder {
    /// Set the lattice.
    pub fn lattice(mut self, lattice: Lattice) -> Self {
        self.params.lattice = lattice;
        self
    }

    /// Set the lattice spacing.
    pub fn dx(mut self, dx: f64) -> Self {
        self.params.dx = dx;
        self
    }

    /// Set the time step. Set this before [`t_final`](Self::t_final).
    pub fn dt(mut self, dt: f64) -> Self {
        self.params.dt = dt;
        self
    }

    /// Set the step budget directly.
    pub fn n_steps(mut self, n_steps: u64) -> Self {
        self.params.n_steps = n_steps;
        self
    }

    /// Set the step budget as `round(t_final / dt)` using the current `dt`.
    ///
    /// Non-finite or negative ratios leave a zero budget, which
    /// [`build`](Self::build) rejects.
    pub fn t_final(mut self, t_final: f64) -> Self {
        let ratio = (t_final / self.params.dt).round();
        self.params.n_steps = if ratio.is_finite() && ratio > 0.0 {
            ratio as u64
        } else {
            0
        };
        self
    }

    /// Set the recording stride.
    pub fn sample_stride(mut self, stride: u64) -> Self {
        self.params.sample_stride = stride;
        self
    }

    /// Set the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.params.seed = seed;
        self
    }

    /// Replace all coefficients.
    pub fn coefficients(mut self, coefficients: Coefficients) -> Self {
        self.params.coefficients = coefficients;
        self
    }

    /// Set the linear coefficient `a` (the DP control parameter).
    pub fn linear(mut self, a: f64) -> Self {
        self.params.coefficients.linear = a;
        self
    }

    /// Set the quadratic coefficient `b`.
    pub fn quadratic(mut self, b: f64) -> Self {
        self.params.coefficients.quadratic = b;
        self
    }

    /// Set the diffusion constant `D`.
    pub fn diffusion(mut self, d: f64) -> Self {
        self.params.coefficients.diffusion = d;
        self
    }

    /// Set the noise amplitude `gamma`.
    pub fn noise(mut self, gamma: f64) -> Self {
        self.params.coefficients.noise = gamma;
        self
    }

    /// Set the initial condition.
    pub fn initial_condition(mut self, ic: InitialCondition) -> Self {
        self.params.initial_condition = ic;
        self
    }

    /// Set the boundary conditions.
    pub fn boundary_conditions(mut self, bcs: BoundaryConditions) -> Self {
        self.params.boundary_conditions = bcs;
        self
    }

    /// Set the deterministic integrator.
    pub fn integration_method(mut self, method: IntegrationMethod) -> Self {
        self.params.integration_method = method;
        self
    }

    /// Set the operator composition.
    pub fn splitting(mut self, scheme: SplittingScheme) -> Self {
        self.params.splitting = scheme;
        self
    }

    /// Set the divergence bound.
    pub fn density_bound(mut self, bound: f64) -> Self {
        self.params.density_bound = bound;
        self
    }

    /// Enable or disable full-grid snapshots.
    pub fn record_grid(mut self, record: bool) -> Self {
        self.params.record_grid = record;
        self
    }

    /// Validate and return the parameters.
    pub fn build(self) -> Result<Parameters, ConfigError> {
        self.params.validate()?;
        Ok(self.params)
    }
}
