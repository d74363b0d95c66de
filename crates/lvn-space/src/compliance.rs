//! Space trait compliance test helpers.
//!
//! These functions verify that a Space implementation satisfies the
//! invariants the integrator relies on. Reused by every backend's test
//! module.

use crate::space::{Side, Space};
use indexmap::IndexSet;

/// Assert that `b in neighbours(a)` implies `a in neighbours(b)`.
pub fn assert_neighbours_symmetric(space: &dyn Space) {
    for coord in space.canonical_ordering() {
        for nb in space.neighbours(&coord) {
            let nb_neighbours = space.neighbours(&nb);
            assert!(
                nb_neighbours.contains(&coord),
                "neighbour symmetry violated: {nb:?} in N({coord:?}) but {coord:?} not in N({nb:?})"
            );
        }
    }
}

/// Assert that two calls to `canonical_ordering` return the same result.
pub fn assert_canonical_ordering_deterministic(space: &dyn Space) {
    let a = space.canonical_ordering();
    let b = space.canonical_ordering();
    assert_eq!(a, b, "canonical_ordering is non-deterministic");
}

/// Assert that `canonical_ordering` returns exactly `cell_count` unique coords.
pub fn assert_canonical_ordering_complete(space: &dyn Space) {
    let ordering = space.canonical_ordering();
    assert_eq!(
        ordering.len(),
        space.cell_count(),
        "canonical_ordering length ({}) != cell_count ({})",
        ordering.len(),
        space.cell_count()
    );
    let unique: IndexSet<_> = ordering.iter().collect();
    assert_eq!(
        unique.len(),
        space.cell_count(),
        "canonical_ordering has duplicates"
    );
}

/// Assert that `canonical_rank` inverts `canonical_ordering`.
pub fn assert_rank_inverts_ordering(space: &dyn Space) {
    for (i, coord) in space.canonical_ordering().iter().enumerate() {
        assert_eq!(
            space.canonical_rank(coord),
            Some(i),
            "canonical_rank({coord:?}) disagrees with ordering position {i}"
        );
    }
}

/// Assert that the flat wiring agrees with `neighbours` cell by cell.
pub fn assert_wiring_matches_neighbours(space: &dyn Space) {
    let wiring = space.wiring();
    assert_eq!(wiring.len(), space.cell_count());
    for (i, coord) in space.canonical_ordering().iter().enumerate() {
        let expected: Vec<usize> = space
            .neighbours(coord)
            .iter()
            .map(|nb| space.canonical_rank(nb).expect("neighbour in bounds"))
            .collect();
        assert_eq!(wiring.neighbours(i), expected.as_slice(), "cell {coord:?}");
    }
    assert_eq!(wiring.max_degree(), space.max_neighbour_degree());
}

/// Assert that every edge cell actually sits on its edge.
pub fn assert_edge_cells_on_edge(space: &dyn Space) {
    let ordering = space.canonical_ordering();
    let shape = space.shape();
    for axis in 0..space.ndim() {
        for side in [Side::Lower, Side::Upper] {
            let cells = space.edge_cells(axis, side);
            if space.edge(axis).is_periodic() {
                assert!(cells.is_empty(), "periodic axis {axis} has edge cells");
                continue;
            }
            let want = match side {
                Side::Lower => 0,
                Side::Upper => shape[axis] as i32 - 1,
            };
            let per_edge = space.cell_count() / shape[axis] as usize;
            assert_eq!(cells.len(), per_edge, "axis {axis} {side:?}");
            for i in cells {
                assert_eq!(ordering[i][axis], want, "cell {i} not on {side:?} edge");
            }
        }
    }
}

/// Run all compliance checks on a space.
pub fn run_full_compliance(space: &dyn Space) {
    assert_neighbours_symmetric(space);
    assert_canonical_ordering_deterministic(space);
    assert_canonical_ordering_complete(space);
    assert_rank_inverts_ordering(space);
    assert_wiring_matches_neighbours(space);
    assert_edge_cells_on_edge(space);
}
