//! Append-only accumulators filled at recorded epochs.

use lvn_core::EpochId;

/// Time series recorded every `sample_stride` steps.
///
/// The density grid is stored flat, `epochs x cells`, each snapshot in
/// the field's row-major order. With grid recording disabled only the
/// scalar series grow.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Observables {
    cells: usize,
    record_grid: bool,
    epochs: Vec<EpochId>,
    times: Vec<f64>,
    means: Vec<f64>,
    grid: Vec<f64>,
}

impl Observables {
    /// Empty accumulators for a lattice of `cells` sites, with room for
    /// `capacity` records.
    pub fn new(cells: usize, record_grid: bool, capacity: usize) -> Self {
        let grid_capacity = if record_grid { cells * capacity } else { 0 };
        Self {
            cells,
            record_grid,
            epochs: Vec::with_capacity(capacity),
            times: Vec::with_capacity(capacity),
            means: Vec::with_capacity(capacity),
            grid: Vec::with_capacity(grid_capacity),
        }
    }

    /// Append one record.
    pub(crate) fn record(&mut self, epoch: EpochId, time: f64, mean: f64, field: &[f64]) {
        debug_assert_eq!(field.len(), self.cells);
        self.epochs.push(epoch);
        self.times.push(time);
        self.means.push(mean);
        if self.record_grid {
            self.grid.extend_from_slice(field);
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns `true` before the first record.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Sites per snapshot.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Whether snapshots are being kept.
    pub fn records_grid(&self) -> bool {
        self.record_grid
    }

    /// Step counts at which records were taken.
    pub fn epochs(&self) -> &[EpochId] {
        &self.epochs
    }

    /// Simulated time of each record.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Lattice-mean density of each record.
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// All snapshots, flat `len() x cells()`; empty when not recording.
    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    /// Snapshot `i`, if recorded.
    pub fn snapshot(&self, i: usize) -> Option<&[f64]> {
        if !self.record_grid || i >= self.len() {
            return None;
        }
        let start = i * self.cells;
        self.grid.get(start..start + self.cells)
    }

    /// Mean of the recorded means; `None` before the first record.
    pub fn time_averaged_mean(&self) -> Option<f64> {
        if self.means.is_empty() {
            return None;
        }
        Some(self.means.iter().sum::<f64>() / self.means.len() as f64)
    }

    /// Largest recorded mean; `None` before the first record.
    pub fn peak_mean(&self) -> Option<f64> {
        self.means.iter().copied().reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_flat_epoch_major() {
        let mut obs = Observables::new(3, true, 2);
        obs.record(EpochId(2), 0.2, 1.0, &[1.0, 1.0, 1.0]);
        obs.record(EpochId(4), 0.4, 2.0, &[1.0, 2.0, 3.0]);
        assert_eq!(obs.len(), 2);
        assert_eq!(obs.grid(), &[1.0, 1.0, 1.0, 1.0, 2.0, 3.0]);
        assert_eq!(obs.snapshot(1), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(obs.snapshot(2), None);
        assert_eq!(obs.epochs(), &[EpochId(2), EpochId(4)]);
    }

    #[test]
    fn disabled_grid_keeps_scalars_only() {
        let mut obs = Observables::new(3, false, 1);
        obs.record(EpochId(1), 0.1, 0.5, &[0.5; 3]);
        assert!(obs.grid().is_empty());
        assert_eq!(obs.snapshot(0), None);
        assert_eq!(obs.means(), &[0.5]);
        assert_eq!(obs.times(), &[0.1]);
    }

    #[test]
    fn aggregates() {
        let mut obs = Observables::new(1, false, 3);
        assert_eq!(obs.time_averaged_mean(), None);
        assert_eq!(obs.peak_mean(), None);
        for (i, m) in [1.0, 3.0, 2.0].into_iter().enumerate() {
            obs.record(EpochId(i as u64 + 1), i as f64, m, &[m]);
        }
        assert_eq!(obs.time_averaged_mean(), Some(2.0));
        assert_eq!(obs.peak_mean(), Some(3.0));
    }
}
