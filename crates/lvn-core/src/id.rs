//! Strongly-typed identifiers and the [`Coord`] type alias.

use smallvec::SmallVec;
use std::fmt;

/// Monotonically increasing integration epoch counter.
///
/// `EpochId(0)` is the prepared initial state; every successful
/// integration step advances it by one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EpochId(pub u64);

impl EpochId {
    /// The epoch that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Simulation time of this epoch for a fixed step `dt`.
    ///
    /// Computed by multiplication rather than accumulation, so the
    /// time axis does not drift over long runs.
    pub fn time(self, dt: f64) -> f64 {
        self.0 as f64 * dt
    }
}

impl fmt::Display for EpochId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EpochId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A lattice coordinate, one component per axis.
///
/// Uses `SmallVec<[i32; 2]>` so 1D and 2D coordinates stay on the stack.
/// Components are `i32` so edge resolution can work with `-1` offsets.
pub type Coord = SmallVec<[i32; 2]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_time_is_multiplicative() {
        let dt = 0.1;
        let mut epoch = EpochId::default();
        for _ in 0..1000 {
            epoch = epoch.next();
        }
        assert_eq!(epoch, EpochId(1000));
        assert_eq!(epoch.time(dt), 1000.0 * dt);
    }

    #[test]
    fn epoch_display_and_from() {
        let epoch = EpochId::from(42);
        assert_eq!(epoch.to_string(), "42");
        assert!(EpochId(3) < EpochId(4));
    }
}
