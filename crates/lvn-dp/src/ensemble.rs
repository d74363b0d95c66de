//! Independent replicas run across worker threads.
//!
//! Each replica is a full [`SimDP`] with its own field and random
//! source; nothing is shared between workers except the job and result
//! queues. Workers pull `(index, Parameters)` jobs from a crossbeam
//! channel and send back a [`ReplicaOutcome`]; the caller gets outcomes
//! in replica order whatever order they finished in.

use std::num::NonZeroUsize;
use std::thread;

use crate::error::SimError;
use crate::sim::{RunSummary, SimDP};
use lvn_engine::Parameters;

/// Output of one replica that ran to the end of its budget.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplicaRun {
    /// Aggregates from `postprocess()`.
    pub summary: RunSummary,
    /// Recorded mean densities.
    pub mean_densities: Vec<f64>,
    /// Recorded epoch times.
    pub time_epochs: Vec<f64>,
}

/// One replica's result, tagged with what distinguishes it.
#[derive(Debug, PartialEq)]
pub struct ReplicaOutcome {
    /// Position in the ensemble.
    pub index: usize,
    /// Seed the replica ran with.
    pub seed: u64,
    /// Linear coefficient the replica ran with.
    pub p: f64,
    /// The run, or why it failed.
    pub result: Result<ReplicaRun, SimError>,
}

/// A batch of independent runs.
#[derive(Clone, Debug)]
pub struct Ensemble {
    replicas: Vec<Parameters>,
    workers: usize,
}

impl Ensemble {
    /// An ensemble over explicit parameter sets.
    ///
    /// Uses one worker per available core by default.
    pub fn new(replicas: Vec<Parameters>) -> Self {
        let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        Self { replicas, workers }
    }

    /// `n` copies of `base` differing only in seed.
    ///
    /// Replica seeds are derived from `base.seed` and the replica index
    /// and are pairwise distinct for any base seed, zero included.
    pub fn replicate(base: &Parameters, n: usize) -> Self {
        let replicas = (0..n)
            .map(|i| {
                let mut params = base.clone();
                params.seed = replica_seed(base.seed, i);
                params
            })
            .collect();
        Self::new(replicas)
    }

    /// A sweep of the linear coefficient around `critical`.
    ///
    /// Half the replicas (rounded down) sit below `critical` and the
    /// rest at or above it, spaced `range / (n / 2)` apart. Values below
    /// zero are dropped, so the ensemble may hold fewer than `n`
    /// replicas. Replicas are ordered from largest `a` to smallest and
    /// seeded as in [`replicate`](Self::replicate).
    pub fn linear_sweep(base: &Parameters, critical: f64, range: f64, n: usize) -> Self {
        let below = n / 2;
        let above = n - below;
        let step = if below > 0 { range / below as f64 } else { 0.0 };

        let mut values: Vec<f64> = (1..=below)
            .rev()
            .map(|i| critical - step * i as f64)
            .chain((0..above).map(|i| critical + step * i as f64))
            .filter(|a| *a >= 0.0)
            .collect();
        values.reverse();

        let replicas = values
            .into_iter()
            .enumerate()
            .map(|(i, a)| {
                let mut params = base.clone();
                params.coefficients.linear = a;
                params.seed = replica_seed(base.seed, i);
                params
            })
            .collect();
        Self::new(replicas)
    }

    /// Cap the number of worker threads (at least one).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// The replica parameter sets, in order.
    pub fn replicas(&self) -> &[Parameters] {
        &self.replicas
    }

    /// Number of replicas.
    pub fn len(&self) -> usize {
        self.replicas.len()
    }

    /// Returns `true` if there is nothing to run.
    pub fn is_empty(&self) -> bool {
        self.replicas.is_empty()
    }

    /// Run every replica to the end of its budget.
    ///
    /// Blocks until all replicas finish. A failing replica does not stop
    /// the others; its error is reported in its outcome.
    pub fn run(&self) -> Vec<ReplicaOutcome> {
        if self.replicas.is_empty() {
            return Vec::new();
        }
        let workers = self.workers.min(self.replicas.len());
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, Parameters)>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<ReplicaOutcome>();

        for (index, params) in self.replicas.iter().enumerate() {
            // Receivers live until the scope below ends.
            let _ = job_tx.send((index, params.clone()));
        }
        drop(job_tx);

        thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    while let Ok((index, params)) = job_rx.recv() {
                        if result_tx.send(run_replica(index, params)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(result_tx);

        let mut slots: Vec<Option<ReplicaOutcome>> = Vec::new();
        slots.resize_with(self.replicas.len(), || None);
        for outcome in result_rx.iter() {
            let index = outcome.index;
            slots[index] = Some(outcome);
        }
        let outcomes: Vec<ReplicaOutcome> = slots.into_iter().flatten().collect();

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        tracing::info!(
            replicas = outcomes.len(),
            failed,
            workers,
            "ensemble finished"
        );
        outcomes
    }
}

/// Seed for replica `index`: a splitmix64 finalizer over a Weyl step
/// from `base`. The step constant is odd and the finalizer is a
/// bijection, so seeds never collide within an ensemble.
fn replica_seed(base: u64, index: usize) -> u64 {
    let mut z = base.wrapping_add(0x9E37_79B9_7F4A_7C15_u64.wrapping_mul(index as u64 + 1));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn drive(mut sim: SimDP) -> Result<ReplicaRun, SimError> {
    sim.prepare()?;
    sim.run_to_end()?;
    let summary = sim.postprocess()?.clone();
    Ok(ReplicaRun {
        summary,
        mean_densities: sim.mean_densities().to_vec(),
        time_epochs: sim.time_epochs().to_vec(),
    })
}

fn run_replica(index: usize, params: Parameters) -> ReplicaOutcome {
    let seed = params.seed;
    let p = params.p();
    let result = drive(SimDP::new(params));
    if let Err(e) = &result {
        tracing::warn!(index, seed, p, error = %e, "replica failed");
    }
    ReplicaOutcome {
        index,
        seed,
        p,
        result,
    }
}
