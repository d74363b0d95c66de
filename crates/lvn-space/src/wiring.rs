//! Flat neighbour table derived from a [`Space`].

use crate::space::Space;
use smallvec::SmallVec;

/// Per-cell neighbour lists in flat canonical indices.
///
/// Built once per prepare and borrowed by every deterministic stage, so
/// the hot loop never touches [`Coord`](lvn_core::Coord) values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wiring {
    neighbours: Vec<SmallVec<[usize; 4]>>,
}

impl Wiring {
    /// Resolve every cell's neighbours to canonical ranks.
    pub fn from_space<S: Space + ?Sized>(space: &S) -> Self {
        let neighbours = space
            .canonical_ordering()
            .iter()
            .map(|coord| {
                space
                    .neighbours(coord)
                    .iter()
                    .filter_map(|nb| space.canonical_rank(nb))
                    .collect()
            })
            .collect();
        Self { neighbours }
    }

    /// Number of cells in the table.
    pub fn len(&self) -> usize {
        self.neighbours.len()
    }

    /// Returns `true` if the table has no cells.
    pub fn is_empty(&self) -> bool {
        self.neighbours.is_empty()
    }

    /// Neighbour indices of cell `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    pub fn neighbours(&self, i: usize) -> &[usize] {
        &self.neighbours[i]
    }

    /// Largest neighbour count in the table.
    pub fn max_degree(&self) -> usize {
        self.neighbours.iter().map(|n| n.len()).max().unwrap_or(0)
    }
}
