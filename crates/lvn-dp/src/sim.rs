//! The DP run driver.
//!
//! [`SimDP`] owns one [`BaseLangevin<DpLangevin>`] and the
//! [`Observables`] it fills. Runs follow a fixed ordering contract:
//!
//! ```text
//! new ──▶ prepare ──▶ run* ──▶ postprocess
//!            ▲                      │
//!            └──────────────────────┘
//! ```
//!
//! `run` may be called repeatedly to segment a run; its step budget is
//! the `n_steps` of the parameters. `postprocess` freezes the
//! accumulators until the next `prepare`.

use lvn_core::{EpochId, StepError};
use lvn_engine::{BaseLangevin, Parameters, StepMetrics};

use crate::error::SimError;
use crate::model::DpLangevin;
use crate::observables::Observables;

// ── Stage ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Constructed,
    Prepared,
    Finalized,
}

// ── EpochSample ────────────────────────────────────────────────────

/// State after one step, handed to the [`SimDP::run_while`] callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpochSample {
    /// Steps completed since prepare.
    pub epoch: EpochId,
    /// Simulated time, `epoch * dt`.
    pub time: f64,
    /// Lattice-mean density after the step.
    pub mean_density: f64,
    /// Whether this step produced a record.
    pub recorded: bool,
}

// ── RunSummary ─────────────────────────────────────────────────────

/// Aggregates computed by [`SimDP::postprocess`].
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// The DP control parameter `a`.
    pub p: f64,
    /// Seed the run was prepared with.
    pub seed: u64,
    /// Steps completed.
    pub steps: u64,
    /// Records taken.
    pub records: usize,
    /// Simulated time at the end of the run.
    pub final_time: f64,
    /// Lattice-mean density after `prepare()`.
    pub initial_mean: f64,
    /// Lattice-mean density at the end of the run.
    pub final_mean: f64,
    /// Average of the recorded means, or `final_mean` with no records.
    pub time_averaged_mean: f64,
    /// Largest mean seen, including the initial field.
    pub peak_mean: f64,
    /// First time the whole lattice was empty, if it ever was.
    pub absorbed_at: Option<f64>,
    /// Whether any density remains at the end.
    pub survived: bool,
}

// ── SimDP ──────────────────────────────────────────────────────────

/// Directed-percolation simulation with observable accumulation.
///
/// # Examples
///
/// ```
/// use lvn_dp::SimDP;
/// use lvn_engine::{InitialCondition, Lattice, Parameters};
/// use lvn_space::EdgeBehavior;
///
/// let params = Parameters::builder()
///     .lattice(Lattice::Line { nx: 32, edge: EdgeBehavior::Wrap })
///     .linear(1.0)
///     .dt(0.05)
///     .dx(1.0)
///     .n_steps(100)
///     .sample_stride(10)
///     .seed(3)
///     .initial_condition(InitialCondition::Constant(0.5))
///     .build()
///     .unwrap();
///
/// let mut sim = SimDP::new(params);
/// sim.prepare().unwrap();
/// sim.run(100).unwrap();
/// let summary = sim.postprocess().unwrap();
/// assert_eq!(summary.records, 10);
/// assert_eq!(sim.mean_densities().len(), 10);
/// assert_eq!(sim.density_grid().len(), 10 * 32);
/// ```
#[derive(Debug)]
pub struct SimDP {
    params: Parameters,
    core: BaseLangevin<DpLangevin>,
    observables: Observables,
    stage: Stage,
    initial_mean: f64,
    absorbed_at: Option<f64>,
    summary: Option<RunSummary>,
}

impl SimDP {
    /// Wrap `params`. Nothing is validated or allocated until
    /// [`prepare`](Self::prepare).
    pub fn new(params: Parameters) -> Self {
        Self {
            params,
            core: BaseLangevin::new(DpLangevin::new()),
            observables: Observables::default(),
            stage: Stage::Constructed,
            initial_mean: 0.0,
            absorbed_at: None,
            summary: None,
        }
    }

    /// The DP control parameter (the linear coefficient `a`).
    pub fn p(&self) -> f64 {
        self.params.p()
    }

    /// The run's parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Validate parameters, fill the initial field, and clear every
    /// accumulator. May be called again to restart from scratch.
    pub fn prepare(&mut self) -> Result<(), SimError> {
        self.stage = Stage::Constructed;
        self.summary = None;
        self.absorbed_at = None;
        self.observables = Observables::default();

        self.core.prepare(&self.params)?;
        let stride = self.params.effective_stride();
        if stride != self.params.sample_stride {
            tracing::warn!(
                requested = self.params.sample_stride,
                n_steps = self.params.n_steps,
                stride,
                "sample stride exceeds step budget; clamped"
            );
        }

        let capacity = usize::try_from(self.params.expected_records()).unwrap_or(usize::MAX);
        self.observables = Observables::new(
            self.core.current_field().len(),
            self.params.record_grid,
            capacity,
        );
        self.initial_mean = self.core.mean_density();
        if self.initial_mean == 0.0 {
            self.absorbed_at = Some(0.0);
        }
        self.stage = Stage::Prepared;
        Ok(())
    }

    /// Advance `steps` steps, recording every `sample_stride` global
    /// steps. Returns the number of steps taken.
    ///
    /// # Errors
    ///
    /// - [`StepError::NotPrepared`] before a successful `prepare()`.
    /// - [`StepError::AlreadyFinalized`] after `postprocess()`.
    /// - [`StepError::StepBudgetExceeded`] if `steps` would run past
    ///   `n_steps`; nothing is stepped.
    /// - A numerical [`StepError`] from the integrator. Records made
    ///   before the failure are kept.
    pub fn run(&mut self, steps: u64) -> Result<u64, SimError> {
        self.run_while(steps, |_| true)
    }

    /// As [`run`](Self::run), but calls `keep_going` after every step
    /// and stops early when it returns `false`.
    pub fn run_while<F>(&mut self, steps: u64, mut keep_going: F) -> Result<u64, SimError>
    where
        F: FnMut(&EpochSample) -> bool,
    {
        match self.stage {
            Stage::Constructed => return Err(StepError::NotPrepared.into()),
            Stage::Finalized => return Err(StepError::AlreadyFinalized.into()),
            Stage::Prepared => {}
        }
        let remaining = self.remaining_steps();
        if steps > remaining {
            return Err(StepError::StepBudgetExceeded {
                requested: steps,
                remaining,
            }
            .into());
        }

        let stride = self.params.effective_stride();
        for done in 1..=steps {
            self.core.step()?;
            let epoch = self.core.current_epoch();
            let sample = EpochSample {
                epoch,
                time: self.core.current_time(),
                mean_density: self.core.mean_density(),
                recorded: epoch.0 % stride == 0,
            };
            if sample.recorded {
                self.observables.record(
                    epoch,
                    sample.time,
                    sample.mean_density,
                    self.core.current_field(),
                );
                tracing::debug!(
                    epoch = %epoch,
                    time = sample.time,
                    mean_density = sample.mean_density,
                    "epoch recorded"
                );
            }
            if sample.mean_density == 0.0 && self.absorbed_at.is_none() {
                self.absorbed_at = Some(sample.time);
                tracing::debug!(epoch = %epoch, time = sample.time, "absorbing state reached");
            }
            if !keep_going(&sample) {
                return Ok(done);
            }
        }
        Ok(steps)
    }

    /// Run the rest of the step budget.
    pub fn run_to_end(&mut self) -> Result<u64, SimError> {
        self.run(self.remaining_steps())
    }

    /// Compute the [`RunSummary`] and freeze the accumulators.
    ///
    /// Calling it again before the next `prepare()` returns the same
    /// summary and changes nothing.
    pub fn postprocess(&mut self) -> Result<&RunSummary, SimError> {
        if self.stage == Stage::Constructed {
            return Err(StepError::NotPrepared.into());
        }
        if self.summary.is_none() {
            let summary = self.compute_summary();
            tracing::info!(
                p = summary.p,
                steps = summary.steps,
                records = summary.records,
                final_mean = summary.final_mean,
                survived = summary.survived,
                "run finalized"
            );
            self.summary = Some(summary);
            self.stage = Stage::Finalized;
        }
        self.summary
            .as_ref()
            .ok_or_else(|| SimError::Step(StepError::NotPrepared))
    }

    fn compute_summary(&self) -> RunSummary {
        let final_mean = self.core.mean_density();
        RunSummary {
            p: self.p(),
            seed: self.params.seed,
            steps: self.core.current_epoch().0,
            records: self.observables.len(),
            final_time: self.core.current_time(),
            initial_mean: self.initial_mean,
            final_mean,
            time_averaged_mean: self.observables.time_averaged_mean().unwrap_or(final_mean),
            peak_mean: self
                .observables
                .peak_mean()
                .map_or(self.initial_mean, |m| m.max(self.initial_mean)),
            absorbed_at: self.absorbed_at,
            survived: final_mean > 0.0,
        }
    }

    /// The summary, once [`postprocess`](Self::postprocess) has run.
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// Returns `true` between `postprocess()` and the next `prepare()`.
    pub fn is_finalized(&self) -> bool {
        self.stage == Stage::Finalized
    }

    // ── Accumulated output ─────────────────────────────────────────

    /// Recorded snapshots, flat `n_epochs() x cells`; empty before any
    /// record or with grid recording disabled.
    pub fn density_grid(&self) -> &[f64] {
        self.observables.grid()
    }

    /// Lattice-mean density per recorded epoch.
    pub fn mean_densities(&self) -> &[f64] {
        self.observables.means()
    }

    /// Simulated time per recorded epoch.
    pub fn time_epochs(&self) -> &[f64] {
        self.observables.times()
    }

    /// Recorded snapshot `i`.
    pub fn density_snapshot(&self, i: usize) -> Option<&[f64]> {
        self.observables.snapshot(i)
    }

    /// Number of records so far.
    pub fn n_epochs(&self) -> usize {
        self.observables.len()
    }

    /// All accumulators.
    pub fn observables(&self) -> &Observables {
        &self.observables
    }

    // ── Live state ─────────────────────────────────────────────────

    /// Simulated time now.
    pub fn current_time(&self) -> f64 {
        self.core.current_time()
    }

    /// Steps completed since prepare.
    pub fn current_epoch(&self) -> EpochId {
        self.core.current_epoch()
    }

    /// Current density field, flat row-major; empty before prepare.
    pub fn current_density(&self) -> &[f64] {
        self.core.current_field()
    }

    /// Lattice-mean density now.
    pub fn mean_density(&self) -> f64 {
        self.core.mean_density()
    }

    /// Lattice-mean density right after prepare.
    pub fn initial_mean_density(&self) -> f64 {
        self.initial_mean
    }

    /// Steps left in the budget; the full budget before prepare.
    pub fn remaining_steps(&self) -> u64 {
        self.params
            .n_steps
            .saturating_sub(self.core.current_epoch().0)
    }

    /// Timing and clamp counts of the latest step.
    pub fn last_metrics(&self) -> &StepMetrics {
        self.core.last_metrics()
    }

    /// The underlying integrator.
    pub fn integrator(&self) -> &BaseLangevin<DpLangevin> {
        &self.core
    }
}
