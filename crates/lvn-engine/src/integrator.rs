//! The model-agnostic operator-splitting integrator.

use std::time::Instant;

use lvn_core::{EpochId, LangevinModel, Neighbourhood, StepError};
use lvn_space::{Space, Wiring};
use smallvec::SmallVec;

use crate::boundary::BoundaryPlan;
use crate::config::{ConfigError, IntegrationMethod, Parameters, SplittingScheme};
use crate::dornic::LinearNoiseStep;
use crate::metrics::StepMetrics;
use crate::random::RandomSource;

/// Stage buffers for the deterministic sub-step, sized once per prepare.
#[derive(Debug, Default)]
struct Scratch {
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    aux1: Vec<f64>,
    aux2: Vec<f64>,
}

impl Scratch {
    fn new(n: usize, method: IntegrationMethod) -> Self {
        match method {
            // Euler needs only a rate buffer.
            IntegrationMethod::Euler => Self {
                k1: vec![0.0; n],
                ..Default::default()
            },
            IntegrationMethod::RungeKutta => Self {
                k1: vec![0.0; n],
                k2: vec![0.0; n],
                k3: vec![0.0; n],
                aux1: vec![0.0; n],
                aux2: vec![0.0; n],
            },
        }
    }
}

/// Everything that exists only between `prepare()` and the next prepare.
#[derive(Debug)]
struct Prepared {
    params: Parameters,
    shape: SmallVec<[u32; 2]>,
    wiring: Wiring,
    boundary: BoundaryPlan,
    noise_step: LinearNoiseStep,
    field: Vec<f64>,
    scratch: Scratch,
    epoch: EpochId,
    mean_density: f64,
    failure: Option<StepError>,
}

/// Operator-splitting integrator generic over a [`LangevinModel`].
///
/// Owns the density field, the random source, and time bookkeeping.
/// The model supplies only its deterministic terms; the linear term and
/// multiplicative noise are sampled exactly by [`LinearNoiseStep`].
///
/// # Lifecycle
///
/// 1. [`new`](Self::new) wraps a model. Nothing is allocated.
/// 2. [`prepare`](Self::prepare) validates parameters, builds the
///    lattice wiring, fills the initial field, and resets time to zero.
/// 3. [`step`](Self::step) advances one `dt`. Calling it before a
///    successful prepare returns [`StepError::NotPrepared`].
///
/// A numerical failure latches: later `step()` calls return the same
/// error until the next prepare.
///
/// # Examples
///
/// ```
/// use lvn_core::{Coefficients, LangevinModel, Neighbourhood};
/// use lvn_engine::{BaseLangevin, InitialCondition, Lattice, Parameters};
/// use lvn_space::EdgeBehavior;
///
/// struct Inert;
///
/// impl LangevinModel for Inert {
///     fn name(&self) -> &str { "inert" }
///     fn set_coefficients(&mut self, _: &Coefficients, _: f64) {}
///     fn reaction_term(&self, _: f64, _: &Neighbourhood<'_>) -> f64 { 0.0 }
///     fn diffusion_term(&self, _: f64, _: &Neighbourhood<'_>) -> f64 { 0.0 }
/// }
///
/// let params = Parameters::builder()
///     .lattice(Lattice::Line { nx: 8, edge: EdgeBehavior::Wrap })
///     .linear(0.0)
///     .noise(0.0)
///     .initial_condition(InitialCondition::Constant(0.5))
///     .n_steps(10)
///     .build()
///     .unwrap();
///
/// let mut sim = BaseLangevin::new(Inert);
/// sim.prepare(&params).unwrap();
/// sim.step().unwrap();
/// assert_eq!(sim.current_field(), &[0.5; 8]);
/// assert!((sim.current_time() - 0.01).abs() < 1e-15);
/// ```
pub struct BaseLangevin<M: LangevinModel> {
    model: M,
    rng: RandomSource,
    state: Option<Prepared>,
    last_metrics: StepMetrics,
}

impl<M: LangevinModel> BaseLangevin<M> {
    /// Wrap a model. Call [`prepare`](Self::prepare) before stepping.
    pub fn new(model: M) -> Self {
        Self {
            model,
            rng: RandomSource::new(0),
            state: None,
            last_metrics: StepMetrics::default(),
        }
    }

    /// The wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Validate `params` and initialize field, sampler, and clock.
    ///
    /// On error the integrator is left unprepared.
    pub fn prepare(&mut self, params: &Parameters) -> Result<(), ConfigError> {
        self.state = None;
        self.last_metrics = StepMetrics::default();
        params.validate()?;

        let space = params.lattice.build()?;
        let wiring = space.wiring();
        let det_h = match params.splitting {
            SplittingScheme::Lie => params.dt,
            SplittingScheme::Strang => 0.5 * params.dt,
        };

        self.model.set_coefficients(&params.coefficients, params.dx);
        if let Some(max_dt) = self.model.max_dt(wiring.max_degree()) {
            if det_h > max_dt {
                return Err(ConfigError::TimeStepTooLarge { dt: det_h, max_dt });
            }
        }

        let c = &params.coefficients;
        let noise_step = LinearNoiseStep::new(c.linear, c.noise, params.dt)?;
        let boundary = BoundaryPlan::new(&params.boundary_conditions, &params.lattice, &*space);

        self.rng.seed(params.seed);
        let n = space.cell_count();
        let mut field = vec![0.0; n];
        params
            .initial_condition
            .fill(&mut field, &params.lattice, &mut self.rng)?;
        let mean_density = mean(&field);

        tracing::info!(
            model = self.model.name(),
            lattice = %params.lattice,
            cells = n,
            seed = params.seed,
            mean_density,
            "integrator prepared"
        );

        self.state = Some(Prepared {
            params: params.clone(),
            shape: space.shape(),
            wiring,
            boundary,
            noise_step,
            field,
            scratch: Scratch::new(n, params.integration_method),
            epoch: EpochId(0),
            mean_density,
            failure: None,
        });
        Ok(())
    }

    /// Returns `true` once [`prepare`](Self::prepare) has succeeded.
    pub fn is_prepared(&self) -> bool {
        self.state.is_some()
    }

    /// Advance the field by one `dt`.
    pub fn step(&mut self) -> Result<StepMetrics, StepError> {
        let state = self.state.as_mut().ok_or(StepError::NotPrepared)?;
        if let Some(failure) = &state.failure {
            return Err(failure.clone());
        }

        let result = advance(&self.model, &mut self.rng, state);
        match result {
            Ok(metrics) => {
                self.last_metrics = metrics.clone();
                Ok(metrics)
            }
            Err(e) => {
                tracing::error!(epoch = %state.epoch, error = %e, "integration step failed");
                state.failure = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Simulated time of the current epoch; zero before prepare.
    pub fn current_time(&self) -> f64 {
        self.state
            .as_ref()
            .map_or(0.0, |s| s.epoch.time(s.params.dt))
    }

    /// Number of completed steps since prepare.
    pub fn current_epoch(&self) -> EpochId {
        self.state.as_ref().map_or(EpochId(0), |s| s.epoch)
    }

    /// The density field in flat row-major order; empty before prepare.
    pub fn current_field(&self) -> &[f64] {
        self.state
            .as_ref()
            .map(|s| s.field.as_slice())
            .unwrap_or(&[])
    }

    /// Lattice-mean density of the current field.
    pub fn mean_density(&self) -> f64 {
        self.state.as_ref().map_or(0.0, |s| s.mean_density)
    }

    /// Mean Poisson parameter per cell for the current field.
    ///
    /// Zero when the run is noise-free or unprepared.
    pub fn poisson_mean(&self) -> f64 {
        self.state
            .as_ref()
            .map_or(0.0, |s| s.noise_step.poisson_mean(s.mean_density))
    }

    /// The precomputed stochastic sub-step, once prepared.
    pub fn noise_step(&self) -> Option<&LinearNoiseStep> {
        self.state.as_ref().map(|s| &s.noise_step)
    }

    /// Lattice extent per coordinate axis; empty before prepare.
    pub fn shape(&self) -> &[u32] {
        self.state
            .as_ref()
            .map(|s| s.shape.as_slice())
            .unwrap_or(&[])
    }

    /// The parameters of the current run.
    pub fn parameters(&self) -> Option<&Parameters> {
        self.state.as_ref().map(|s| &s.params)
    }

    /// Metrics from the most recent successful step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }
}

impl<M: LangevinModel> std::fmt::Debug for BaseLangevin<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseLangevin")
            .field("model", &self.model.name())
            .field("prepared", &self.is_prepared())
            .field("epoch", &self.current_epoch())
            .field("mean_density", &self.mean_density())
            .finish()
    }
}

// ── Step internals ─────────────────────────────────────────────────

fn micros(since: Instant) -> u64 {
    since.elapsed().as_micros() as u64
}

fn mean(field: &[f64]) -> f64 {
    if field.is_empty() {
        return 0.0;
    }
    field.iter().sum::<f64>() / field.len() as f64
}

/// One full split step. Leaves `state` advanced on success.
fn advance<M: LangevinModel>(
    model: &M,
    rng: &mut RandomSource,
    state: &mut Prepared,
) -> Result<StepMetrics, StepError> {
    let start = Instant::now();
    let mut metrics = StepMetrics::default();
    let dt = state.params.dt;
    let method = state.params.integration_method;
    let bound = state.params.density_bound;
    let next = state.epoch.next();

    // 1. Boundary conditions act on the pre-step field.
    let t = Instant::now();
    state.boundary.apply(&mut state.field, state.epoch, dt);
    metrics.boundary_us = micros(t);

    // 2. Operator composition.
    match state.params.splitting {
        SplittingScheme::Lie => {
            let t = Instant::now();
            deterministic(model, &state.wiring, method, &mut state.field, &mut state.scratch, dt);
            metrics.clamped_cells += clamp_negative(&mut state.field);
            check_field(&state.field, bound, next)?;
            metrics.deterministic_us = micros(t);

            let t = Instant::now();
            stochastic(&state.noise_step, rng, &mut state.field, next)?;
            metrics.stochastic_us = micros(t);
        }
        SplittingScheme::Strang => {
            let half = 0.5 * dt;
            let t = Instant::now();
            deterministic(model, &state.wiring, method, &mut state.field, &mut state.scratch, half);
            metrics.clamped_cells += clamp_negative(&mut state.field);
            check_field(&state.field, bound, next)?;
            metrics.deterministic_us = micros(t);

            let t = Instant::now();
            stochastic(&state.noise_step, rng, &mut state.field, next)?;
            metrics.stochastic_us = micros(t);

            let t = Instant::now();
            deterministic(model, &state.wiring, method, &mut state.field, &mut state.scratch, half);
            metrics.clamped_cells += clamp_negative(&mut state.field);
            metrics.deterministic_us += micros(t);
        }
    }

    // 3. Post-step invariants.
    check_field(&state.field, bound, next)?;
    if metrics.clamped_cells > 0 {
        tracing::trace!(epoch = %next, cells = metrics.clamped_cells, "clamped negative densities");
    }

    state.epoch = next;
    state.mean_density = mean(&state.field);
    metrics.mean_density = state.mean_density;
    metrics.total_us = micros(start);
    Ok(metrics)
}

/// Evaluate the model's deterministic rate at every cell of `input`.
fn evaluate<M: LangevinModel>(model: &M, wiring: &Wiring, input: &[f64], out: &mut [f64]) {
    for (i, rate) in out.iter_mut().enumerate() {
        let rho = input[i];
        let site = Neighbourhood::new(input, wiring.neighbours(i));
        *rate = model.reaction_term(rho, &site) + model.diffusion_term(rho, &site);
    }
}

/// Integrate the deterministic terms over `h` in place.
fn deterministic<M: LangevinModel>(
    model: &M,
    wiring: &Wiring,
    method: IntegrationMethod,
    field: &mut [f64],
    scratch: &mut Scratch,
    h: f64,
) {
    let Scratch {
        k1,
        k2,
        k3,
        aux1,
        aux2,
    } = scratch;
    match method {
        IntegrationMethod::Euler => {
            evaluate(model, wiring, field, k1);
            for (rho, k) in field.iter_mut().zip(k1.iter()) {
                *rho += k * h;
            }
        }
        IntegrationMethod::RungeKutta => {
            let half = 0.5 * h;
            evaluate(model, wiring, field, k1);
            for i in 0..field.len() {
                aux1[i] = field[i] + k1[i] * half;
            }
            evaluate(model, wiring, aux1, k2);
            for i in 0..field.len() {
                aux2[i] = field[i] + k2[i] * half;
            }
            evaluate(model, wiring, aux2, k3);
            for i in 0..field.len() {
                aux1[i] = field[i] + k3[i] * h;
            }
            // k4 lands in aux2.
            evaluate(model, wiring, aux1, aux2);
            let sixth = h / 6.0;
            for i in 0..field.len() {
                field[i] += sixth * (k1[i] + 2.0 * (k2[i] + k3[i]) + aux2[i]);
            }
        }
    }
}

/// Exact linear + noise update at every cell, in flat order.
///
/// A density whose Poisson mean is past the sampler's range has run away
/// and is reported as divergence.
fn stochastic(
    step: &LinearNoiseStep,
    rng: &mut RandomSource,
    field: &mut [f64],
    epoch: EpochId,
) -> Result<(), StepError> {
    for (cell, rho) in field.iter_mut().enumerate() {
        if step.poisson_mean(*rho) > RandomSource::MAX_POISSON_MEAN {
            return Err(StepError::DensityDiverged {
                cell,
                value: *rho,
                epoch,
            });
        }
        *rho = step
            .apply(*rho, rng)
            .map_err(|e| StepError::SamplingFailed {
                cell,
                reason: e.to_string(),
            })?;
    }
    Ok(())
}

/// Clamp negatives to zero; returns how many cells were clamped.
fn clamp_negative(field: &mut [f64]) -> usize {
    let mut clamped = 0;
    for rho in field.iter_mut() {
        if *rho < 0.0 {
            *rho = 0.0;
            clamped += 1;
        }
    }
    clamped
}

fn check_field(field: &[f64], bound: f64, epoch: EpochId) -> Result<(), StepError> {
    for (cell, &value) in field.iter().enumerate() {
        if !value.is_finite() {
            return Err(StepError::NonFiniteDensity { cell, epoch });
        }
        if value > bound {
            return Err(StepError::DensityDiverged { cell, value, epoch });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Lattice;
    use crate::initial::InitialCondition;
    use lvn_core::Coefficients;
    use lvn_space::EdgeBehavior;

    /// Linear-in-field decay `-k rho`, no coupling.
    struct Decay {
        k: f64,
    }

    impl LangevinModel for Decay {
        fn name(&self) -> &str {
            "decay"
        }
        fn set_coefficients(&mut self, c: &Coefficients, _dx: f64) {
            self.k = c.quadratic;
        }
        fn reaction_term(&self, density: f64, _site: &Neighbourhood<'_>) -> f64 {
            -self.k * density
        }
        fn diffusion_term(&self, _density: f64, _site: &Neighbourhood<'_>) -> f64 {
            0.0
        }
    }

    /// Pure nearest-neighbour coupling with a stability limit.
    struct Coupling {
        d: f64,
    }

    impl LangevinModel for Coupling {
        fn name(&self) -> &str {
            "coupling"
        }
        fn set_coefficients(&mut self, c: &Coefficients, dx: f64) {
            self.d = c.diffusion / (dx * dx);
        }
        fn reaction_term(&self, _density: f64, _site: &Neighbourhood<'_>) -> f64 {
            0.0
        }
        fn diffusion_term(&self, density: f64, site: &Neighbourhood<'_>) -> f64 {
            self.d * site.laplacian(density)
        }
        fn max_dt(&self, max_degree: usize) -> Option<f64> {
            (self.d > 0.0 && max_degree > 0).then(|| 1.0 / (self.d * max_degree as f64))
        }
    }

    fn quiet(lattice: Lattice, ic: InitialCondition) -> Parameters {
        Parameters::builder()
            .lattice(lattice)
            .linear(0.0)
            .quadratic(0.0)
            .diffusion(0.0)
            .noise(0.0)
            .dx(1.0)
            .dt(0.1)
            .n_steps(100)
            .initial_condition(ic)
            .build()
            .unwrap()
    }

    fn single() -> Lattice {
        Lattice::Line {
            nx: 1,
            edge: EdgeBehavior::Absorb,
        }
    }

    #[test]
    fn step_before_prepare_is_sequencing_error() {
        let mut sim = BaseLangevin::new(Decay { k: 0.0 });
        match sim.step() {
            Err(StepError::NotPrepared) => {}
            other => panic!("expected NotPrepared, got {other:?}"),
        }
        assert!(sim.current_field().is_empty());
        assert_eq!(sim.current_time(), 0.0);
    }

    #[test]
    fn prepare_resets_clock_and_field() {
        let params = quiet(single(), InitialCondition::Constant(2.0));
        let mut sim = BaseLangevin::new(Decay { k: 0.0 });
        sim.prepare(&params).unwrap();
        for _ in 0..5 {
            sim.step().unwrap();
        }
        assert_eq!(sim.current_epoch(), EpochId(5));
        sim.prepare(&params).unwrap();
        assert_eq!(sim.current_epoch(), EpochId(0));
        assert_eq!(sim.current_time(), 0.0);
        assert_eq!(sim.current_field(), &[2.0]);
    }

    #[test]
    fn rk4_matches_exponential_decay() {
        let mut params = quiet(single(), InitialCondition::Constant(1.0));
        params.coefficients.quadratic = 1.0;
        let mut sim = BaseLangevin::new(Decay { k: 0.0 });
        sim.prepare(&params).unwrap();
        for _ in 0..10 {
            sim.step().unwrap();
        }
        let want = (-1.0f64).exp();
        assert!((sim.current_field()[0] - want).abs() < 1e-6);
    }

    #[test]
    fn euler_is_first_order() {
        let mut params = quiet(single(), InitialCondition::Constant(1.0));
        params.coefficients.quadratic = 1.0;
        params.integration_method = IntegrationMethod::Euler;
        let mut sim = BaseLangevin::new(Decay { k: 0.0 });
        sim.prepare(&params).unwrap();
        sim.step().unwrap();
        assert!((sim.current_field()[0] - 0.9).abs() < 1e-15);
    }

    #[test]
    fn strang_and_lie_agree_without_noise_or_growth() {
        let mut params = quiet(single(), InitialCondition::Constant(1.0));
        params.coefficients.quadratic = 1.0;
        let mut lie = BaseLangevin::new(Decay { k: 0.0 });
        lie.prepare(&params).unwrap();
        params.splitting = SplittingScheme::Strang;
        let mut strang = BaseLangevin::new(Decay { k: 0.0 });
        strang.prepare(&params).unwrap();
        for _ in 0..10 {
            lie.step().unwrap();
            strang.step().unwrap();
        }
        assert!((lie.current_field()[0] - strang.current_field()[0]).abs() < 1e-5);
    }

    #[test]
    fn coupling_conserves_mass_on_a_ring() {
        let lattice = Lattice::Line {
            nx: 8,
            edge: EdgeBehavior::Wrap,
        };
        let mut pattern = vec![0.0; 8];
        pattern[3] = 8.0;
        let mut params = quiet(lattice, InitialCondition::Pattern(pattern));
        params.coefficients.diffusion = 0.5;
        let mut sim = BaseLangevin::new(Coupling { d: 0.0 });
        sim.prepare(&params).unwrap();
        for _ in 0..50 {
            sim.step().unwrap();
        }
        let total: f64 = sim.current_field().iter().sum();
        assert!((total - 8.0).abs() < 1e-9, "total {total}");
        assert!((sim.mean_density() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn oversized_dt_rejected_by_model_limit() {
        let lattice = Lattice::Line {
            nx: 8,
            edge: EdgeBehavior::Wrap,
        };
        let mut params = quiet(lattice, InitialCondition::Constant(1.0));
        params.coefficients.diffusion = 10.0;
        let mut sim = BaseLangevin::new(Coupling { d: 0.0 });
        match sim.prepare(&params) {
            Err(ConfigError::TimeStepTooLarge { max_dt, .. }) => {
                assert!((max_dt - 0.05).abs() < 1e-12);
            }
            other => panic!("expected TimeStepTooLarge, got {other:?}"),
        }
        assert!(!sim.is_prepared());
        // Strang halves the deterministic sub-step.
        params.dt = 0.08;
        params.splitting = SplittingScheme::Strang;
        sim.prepare(&params).unwrap();
    }

    #[test]
    fn divergence_is_numerical_and_latches() {
        let mut params = quiet(single(), InitialCondition::Constant(1.0));
        params.coefficients.linear = 50.0;
        params.density_bound = 10.0;
        let mut sim = BaseLangevin::new(Decay { k: 0.0 });
        sim.prepare(&params).unwrap();
        let err = loop {
            if let Err(e) = sim.step() {
                break e;
            }
        };
        assert!(err.is_numerical(), "{err}");
        match &err {
            StepError::DensityDiverged { cell: 0, value, .. } => assert!(*value > 10.0),
            other => panic!("expected DensityDiverged, got {other:?}"),
        }
        assert_eq!(sim.step(), Err(err));
    }

    #[test]
    fn poisson_overflow_reports_divergence() {
        // mu is about 2e8 here, so mu * 1e11 is past the sampler's range
        // while the density is still under the bound.
        let mut params = quiet(single(), InitialCondition::Constant(1e11));
        params.coefficients.linear = 1.0;
        params.coefficients.noise = 1e-3;
        params.dt = 0.01;
        let mut sim = BaseLangevin::new(Decay { k: 0.0 });
        sim.prepare(&params).unwrap();
        assert!(sim.poisson_mean() > RandomSource::MAX_POISSON_MEAN);
        match sim.step() {
            Err(StepError::DensityDiverged { cell: 0, value, .. }) => assert_eq!(value, 1e11),
            other => panic!("expected DensityDiverged, got {other:?}"),
        }
    }

    #[test]
    fn noisy_steps_stay_non_negative() {
        let lattice = Lattice::Line {
            nx: 32,
            edge: EdgeBehavior::Wrap,
        };
        let params = Parameters::builder()
            .lattice(lattice)
            .linear(-0.5)
            .quadratic(1.0)
            .noise(2.0)
            .dx(1.0)
            .dt(0.1)
            .n_steps(200)
            .seed(99)
            .initial_condition(InitialCondition::RandomUniform { min: 0.0, max: 2.0 })
            .build()
            .unwrap();
        let mut sim = BaseLangevin::new(Decay { k: 0.0 });
        sim.prepare(&params).unwrap();
        for _ in 0..200 {
            sim.step().unwrap();
            assert!(sim
                .current_field()
                .iter()
                .all(|v| v.is_finite() && *v >= 0.0));
        }
        assert!(sim.poisson_mean() >= 0.0);
    }

    #[test]
    fn invalid_parameters_leave_integrator_unprepared() {
        let mut params = quiet(single(), InitialCondition::Constant(1.0));
        let mut sim = BaseLangevin::new(Decay { k: 0.0 });
        sim.prepare(&params).unwrap();
        params.dt = -1.0;
        match sim.prepare(&params) {
            Err(ConfigError::InvalidTimeStep { .. }) => {}
            other => panic!("expected InvalidTimeStep, got {other:?}"),
        }
        assert!(!sim.is_prepared());
        assert_eq!(sim.step(), Err(StepError::NotPrepared));
    }
}
