//! The core [`Space`] trait.

use crate::edge::EdgeBehavior;
use crate::wiring::Wiring;
use lvn_core::Coord;
use smallvec::SmallVec;

/// Which end of an axis a boundary edge sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Coordinate 0 along the axis.
    Lower,
    /// Coordinate `len - 1` along the axis.
    Upper,
}

/// Lattice topology consumed by the integrator.
///
/// Cells are addressed by [`Coord`] and, once wired, by their flat
/// position in [`canonical_ordering`](Self::canonical_ordering), which is
/// row-major (the last coordinate component varies fastest). Field
/// buffers use the same flat layout.
///
/// # Thread Safety
///
/// Spaces are immutable after construction and are shared freely across
/// ensemble worker threads.
pub trait Space: Send + Sync + 'static {
    /// Number of spatial dimensions.
    fn ndim(&self) -> usize;

    /// Total number of cells in the space.
    fn cell_count(&self) -> usize;

    /// Extent along each axis, in coordinate order.
    fn shape(&self) -> SmallVec<[u32; 2]>;

    /// Edge behaviour along `axis`.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= ndim()`.
    fn edge(&self, axis: usize) -> EdgeBehavior;

    /// Enumerate the neighbours of a cell.
    ///
    /// Returns coordinates in a deterministic, backend-defined order.
    /// Clamped edges repeat the cell itself; absorbing edges omit the
    /// missing neighbour.
    fn neighbours(&self, coord: &Coord) -> SmallVec<[Coord; 4]>;

    /// All cells in deterministic canonical (row-major) order.
    fn canonical_ordering(&self) -> Vec<Coord>;

    /// Position of a coordinate in the canonical ordering.
    ///
    /// Returns `None` for coordinates of the wrong rank or out of bounds.
    fn canonical_rank(&self, coord: &[i32]) -> Option<usize>;

    /// Largest neighbour count over all cells.
    fn max_neighbour_degree(&self) -> usize {
        self.canonical_ordering()
            .iter()
            .map(|c| self.neighbours(c).len())
            .max()
            .unwrap_or(0)
    }

    /// Flat indices of the cells on one boundary edge.
    ///
    /// Returns an empty list for periodic axes, which have no boundary,
    /// and for `axis >= ndim()`.
    fn edge_cells(&self, axis: usize, side: Side) -> Vec<usize> {
        if axis >= self.ndim() || self.edge(axis).is_periodic() {
            return Vec::new();
        }
        let target = match side {
            Side::Lower => 0,
            Side::Upper => self.shape()[axis] as i32 - 1,
        };
        self.canonical_ordering()
            .iter()
            .enumerate()
            .filter(|(_, c)| c[axis] == target)
            .map(|(i, _)| i)
            .collect()
    }

    /// Precompute the flat neighbour table for the integrator.
    fn wiring(&self) -> Wiring {
        Wiring::from_space(self)
    }
}
