//! 2D square grid with 4-connected neighbourhood and per-axis edges.

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;
use crate::space::Space;
use lvn_core::Coord;
use smallvec::{smallvec, SmallVec};

/// A two-dimensional square grid with 4-connected neighbourhood.
///
/// Each cell has coordinate `[row, col]` where `0 <= row < rows` and
/// `0 <= col < cols`. Columns run along x, rows along y, so the flat
/// index of `[y, x]` is `x + y * cols`.
///
/// Unlike a uniform-edge grid, each axis carries its own
/// [`EdgeBehavior`]: a strip that is periodic along x and bounded along
/// y is `Grid2D::new(ny, nx, EdgeBehavior::Absorb, EdgeBehavior::Wrap)`.
///
/// # Examples
///
/// ```
/// use lvn_space::{EdgeBehavior, Grid2D, Space};
///
/// let strip = Grid2D::new(3, 8, EdgeBehavior::Absorb, EdgeBehavior::Wrap).unwrap();
/// assert_eq!(strip.cell_count(), 24);
///
/// // Top-left corner: wraps along x, bounded along y.
/// let corner: lvn_core::Coord = vec![0i32, 0].into();
/// assert_eq!(strip.neighbours(&corner).len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid2D {
    rows: u32,
    cols: u32,
    row_edge: EdgeBehavior,
    col_edge: EdgeBehavior,
}

impl Grid2D {
    /// Maximum dimension size: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create a `rows x cols` grid.
    ///
    /// `row_edge` governs the row axis (y), `col_edge` the column axis (x).
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if either dimension is 0, or
    /// `Err(SpaceError::DimensionTooLarge)` if either exceeds `i32::MAX`.
    pub fn new(
        rows: u32,
        cols: u32,
        row_edge: EdgeBehavior,
        col_edge: EdgeBehavior,
    ) -> Result<Self, SpaceError> {
        if rows == 0 || cols == 0 {
            return Err(SpaceError::EmptySpace);
        }
        for (name, value) in [("rows", rows), ("cols", cols)] {
            if value > Self::MAX_DIM {
                return Err(SpaceError::DimensionTooLarge {
                    name,
                    value,
                    max: Self::MAX_DIM,
                });
            }
        }
        Ok(Self {
            rows,
            cols,
            row_edge,
            col_edge,
        })
    }

    /// Number of rows (extent along y).
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns (extent along x).
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Always returns `false`: construction rejects empty grids.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn check_bounds(&self, coord: &Coord) -> Result<(i32, i32), SpaceError> {
        if coord.len() != 2 {
            return Err(SpaceError::CoordOutOfBounds {
                coord: coord.clone(),
                bounds: format!("expected 2D coordinate, got {}D", coord.len()),
            });
        }
        let (r, c) = (coord[0], coord[1]);
        if r < 0 || r >= self.rows as i32 || c < 0 || c >= self.cols as i32 {
            return Err(SpaceError::CoordOutOfBounds {
                coord: coord.clone(),
                bounds: format!("[0, {}) x [0, {})", self.rows, self.cols),
            });
        }
        Ok((r, c))
    }

    /// Flat index of an in-bounds `[row, col]` coordinate.
    pub fn flat_index(&self, coord: &Coord) -> Result<usize, SpaceError> {
        let (r, c) = self.check_bounds(coord)?;
        Ok(r as usize * self.cols as usize + c as usize)
    }
}

impl Space for Grid2D {
    fn ndim(&self) -> usize {
        2
    }

    fn cell_count(&self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }

    fn shape(&self) -> SmallVec<[u32; 2]> {
        smallvec![self.rows, self.cols]
    }

    fn edge(&self, axis: usize) -> EdgeBehavior {
        match axis {
            0 => self.row_edge,
            1 => self.col_edge,
            _ => panic!("Grid2D has two axes, got axis {axis}"),
        }
    }

    fn neighbours(&self, coord: &Coord) -> SmallVec<[Coord; 4]> {
        let (r, c) = (coord[0], coord[1]);
        let offsets: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        let mut result = SmallVec::new();
        for (dr, dc) in offsets {
            let nr = self.row_edge.resolve(r + dr, self.rows);
            let nc = self.col_edge.resolve(c + dc, self.cols);
            if let (Some(nr), Some(nc)) = (nr, nc) {
                result.push(smallvec![nr, nc]);
            }
        }
        result
    }

    fn canonical_ordering(&self) -> Vec<Coord> {
        let mut out = Vec::with_capacity(self.cell_count());
        for r in 0..self.rows as i32 {
            for c in 0..self.cols as i32 {
                out.push(smallvec![r, c]);
            }
        }
        out
    }

    fn canonical_rank(&self, coord: &[i32]) -> Option<usize> {
        match coord {
            [r, c] if *r >= 0 && *r < self.rows as i32 && *c >= 0 && *c < self.cols as i32 => {
                Some(*r as usize * self.cols as usize + *c as usize)
            }
            _ => None,
        }
    }
}
