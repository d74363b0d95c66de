//! 1D line lattice with configurable edge behavior.

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;
use crate::space::Space;
use lvn_core::Coord;
use smallvec::{smallvec, SmallVec};

/// A one-dimensional line lattice.
///
/// Each cell has coordinate `[i]` where `0 <= i < len`.
/// Boundary handling is controlled by [`EdgeBehavior`]:
/// - **Absorb**: end cells have a single neighbour (bounded line)
/// - **Clamp**: end cells self-loop (reflecting line)
/// - **Wrap**: periodic ring
///
/// # Examples
///
/// ```
/// use lvn_space::{Line1D, EdgeBehavior, Space};
///
/// let line = Line1D::new(5, EdgeBehavior::Absorb).unwrap();
/// assert_eq!(line.len(), 5);
/// assert_eq!(line.cell_count(), 5);
/// assert_eq!(line.ndim(), 1);
///
/// // Interior cell has two neighbours.
/// let coord: lvn_core::Coord = vec![2i32].into();
/// assert_eq!(line.neighbours(&coord).len(), 2);
///
/// // End cell (absorb) has only one neighbour.
/// let end: lvn_core::Coord = vec![0i32].into();
/// assert_eq!(line.neighbours(&end).len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line1D {
    len: u32,
    edge: EdgeBehavior,
}

impl Line1D {
    /// Maximum length: coordinates use `i32`, so `len` must fit.
    pub const MAX_LEN: u32 = i32::MAX as u32;

    /// Create a new 1D line with `len` cells and the given edge behavior.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if `len == 0`, or
    /// `Err(SpaceError::DimensionTooLarge)` if `len > i32::MAX`.
    pub fn new(len: u32, edge: EdgeBehavior) -> Result<Self, SpaceError> {
        if len == 0 {
            return Err(SpaceError::EmptySpace);
        }
        if len > Self::MAX_LEN {
            return Err(SpaceError::DimensionTooLarge {
                name: "len",
                value: len,
                max: Self::MAX_LEN,
            });
        }
        Ok(Self { len, edge })
    }

    /// Number of cells.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Always returns `false`: construction rejects `len == 0`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Edge behavior.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        self.edge
    }
}

impl Space for Line1D {
    fn ndim(&self) -> usize {
        1
    }

    fn cell_count(&self) -> usize {
        self.len as usize
    }

    fn shape(&self) -> SmallVec<[u32; 2]> {
        smallvec![self.len]
    }

    fn edge(&self, axis: usize) -> EdgeBehavior {
        assert_eq!(axis, 0, "Line1D has a single axis");
        self.edge
    }

    fn neighbours(&self, coord: &Coord) -> SmallVec<[Coord; 4]> {
        let i = coord[0];
        [i - 1, i + 1]
            .into_iter()
            .filter_map(|j| self.edge.resolve(j, self.len))
            .map(|j| smallvec![j])
            .collect()
    }

    fn canonical_ordering(&self) -> Vec<Coord> {
        (0..self.len as i32).map(|i| smallvec![i]).collect()
    }

    fn canonical_rank(&self, coord: &[i32]) -> Option<usize> {
        match coord {
            [i] if *i >= 0 && *i < self.len as i32 => Some(*i as usize),
            _ => None,
        }
    }
}
