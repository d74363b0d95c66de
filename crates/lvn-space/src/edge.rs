//! Spatial edge (boundary) topology for lattice backends.

/// How a lattice handles neighbours at its edges.
///
/// This controls *topology* only: which cells are wired together.
/// Boundary *values* (fixed density, injected flux) are applied by the
/// engine on top of whatever topology is chosen here.
///
/// # Examples
///
/// ```
/// use lvn_space::{EdgeBehavior, Grid2D, Space};
///
/// // Absorb: corner has 2 neighbours, interior has 4.
/// let bounded = Grid2D::new(4, 4, EdgeBehavior::Absorb, EdgeBehavior::Absorb).unwrap();
/// let corner: lvn_core::Coord = vec![0i32, 0].into();
/// let interior: lvn_core::Coord = vec![1i32, 1].into();
/// assert_eq!(bounded.neighbours(&corner).len(), 2);
/// assert_eq!(bounded.neighbours(&interior).len(), 4);
///
/// // Wrap: all cells have exactly 4 neighbours (torus).
/// let torus = Grid2D::new(4, 4, EdgeBehavior::Wrap, EdgeBehavior::Wrap).unwrap();
/// assert_eq!(torus.neighbours(&corner).len(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-bounds neighbour maps to the boundary cell (self-loop).
    ///
    /// For a Laplacian coupling this is a zero-flux (reflecting) edge.
    Clamp,
    /// Out-of-bounds neighbour wraps to the opposite side (periodic).
    Wrap,
    /// Out-of-bounds neighbour is omitted (fewer neighbours at edges).
    Absorb,
}

impl EdgeBehavior {
    /// Returns `true` for periodic edges, which have no boundary cells.
    pub fn is_periodic(self) -> bool {
        matches!(self, Self::Wrap)
    }

    /// Resolve a single axis position under this edge behaviour.
    ///
    /// Returns the in-range position, or `None` when an absorbing edge
    /// drops the neighbour.
    pub fn resolve(self, val: i32, len: u32) -> Option<i32> {
        let n = len as i32;
        if val >= 0 && val < n {
            return Some(val);
        }
        match self {
            Self::Absorb => None,
            Self::Clamp => Some(val.clamp(0, n - 1)),
            Self::Wrap => Some(val.rem_euclid(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_in_range_is_identity() {
        for edge in [EdgeBehavior::Absorb, EdgeBehavior::Clamp, EdgeBehavior::Wrap] {
            assert_eq!(edge.resolve(3, 5), Some(3));
        }
    }

    #[test]
    fn resolve_out_of_range() {
        assert_eq!(EdgeBehavior::Absorb.resolve(-1, 5), None);
        assert_eq!(EdgeBehavior::Absorb.resolve(5, 5), None);
        assert_eq!(EdgeBehavior::Clamp.resolve(-1, 5), Some(0));
        assert_eq!(EdgeBehavior::Clamp.resolve(5, 5), Some(4));
        assert_eq!(EdgeBehavior::Wrap.resolve(-1, 5), Some(4));
        assert_eq!(EdgeBehavior::Wrap.resolve(5, 5), Some(0));
    }

    #[test]
    fn only_wrap_is_periodic() {
        assert!(EdgeBehavior::Wrap.is_periodic());
        assert!(!EdgeBehavior::Clamp.is_periodic());
        assert!(!EdgeBehavior::Absorb.is_periodic());
    }
}
