//! Per-step performance and health metrics for the integrator.

/// Timing and health data collected during a single step.
///
/// All durations are in microseconds. The integrator overwrites these
/// after each successful `step()`; callers read them from the value
/// returned by `step()` or from `last_metrics()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Time spent applying boundary conditions, in microseconds.
    pub boundary_us: u64,
    /// Time spent in the deterministic sub-step(s), in microseconds.
    pub deterministic_us: u64,
    /// Time spent in the stochastic sub-step, in microseconds.
    pub stochastic_us: u64,
    /// Cells whose deterministic update went negative and were clamped.
    pub clamped_cells: usize,
    /// Lattice-mean density after the step.
    pub mean_density: f64,
}
