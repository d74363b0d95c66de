//! Boundary conditions applied to lattice edges at the start of each step.
//!
//! Edge *topology* (which cells are neighbours) is fixed by the lattice's
//! [`EdgeBehavior`](lvn_space::EdgeBehavior). The conditions here act on
//! *values* of the edge cells of bounded axes: pinning them, or injecting
//! a constant flux.

use crate::config::{Axis, Lattice};
use lvn_core::EpochId;
use lvn_space::{Side, Space};

/// Condition on one lattice edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum BoundaryCondition {
    /// Edge cells evolve freely.
    #[default]
    Floating,
    /// Edge cells are reset to this density before every step.
    FixedValue(f64),
    /// This rate is added to edge cells before every step after the
    /// first, then clamped to `>= 0`.
    FixedFlux(f64),
}

/// Conditions for both ends of each axis.
///
/// Ordered `[lower, upper]` per axis. `y` must stay
/// [`Floating`](BoundaryCondition::Floating) on a 1D lattice, and any
/// periodic axis must be floating on both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundaryConditions {
    /// Conditions at `x = 0` and `x = nx - 1`.
    pub x: [BoundaryCondition; 2],
    /// Conditions at `y = 0` and `y = ny - 1`.
    pub y: [BoundaryCondition; 2],
}

impl BoundaryConditions {
    /// Same condition on every edge.
    pub fn uniform(condition: BoundaryCondition) -> Self {
        Self {
            x: [condition; 2],
            y: [condition; 2],
        }
    }

    fn by_axis(&self) -> [(Axis, [BoundaryCondition; 2]); 2] {
        [(Axis::X, self.x), (Axis::Y, self.y)]
    }

    /// Returns `true` if no edge carries a condition.
    pub fn is_floating(&self) -> bool {
        self.x
            .iter()
            .chain(self.y.iter())
            .all(|bc| *bc == BoundaryCondition::Floating)
    }

    /// Check the conditions against the lattice.
    pub fn validate(&self, lattice: &Lattice) -> Result<(), String> {
        for (axis, pair) in self.by_axis() {
            for bc in pair {
                match bc {
                    BoundaryCondition::Floating => continue,
                    BoundaryCondition::FixedValue(v) if !v.is_finite() || v < 0.0 => {
                        return Err(format!(
                            "fixed value on {axis} edge must be finite and >= 0, got {v}"
                        ));
                    }
                    BoundaryCondition::FixedFlux(v) if !v.is_finite() => {
                        return Err(format!("flux on {axis} edge must be finite, got {v}"));
                    }
                    _ => {}
                }
                match lattice.edge_of(axis) {
                    None => {
                        return Err(format!("{lattice} lattice has no {axis} axis"));
                    }
                    Some(edge) if edge.is_periodic() => {
                        return Err(format!("{axis} axis is periodic and has no edges"));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}

/// Boundary conditions resolved to flat cell lists for one lattice.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundaryPlan {
    edges: Vec<(Vec<usize>, BoundaryCondition)>,
}

impl BoundaryPlan {
    /// Resolve `conditions` against `space`, built from `lattice`.
    ///
    /// Floating edges are dropped, so a fully floating lattice yields an
    /// empty plan.
    pub fn new(conditions: &BoundaryConditions, lattice: &Lattice, space: &dyn Space) -> Self {
        let mut edges = Vec::new();
        for (axis, [lower, upper]) in conditions.by_axis() {
            let Some(coord_axis) = lattice.coord_axis(axis) else {
                continue;
            };
            for (side, bc) in [(Side::Lower, lower), (Side::Upper, upper)] {
                if bc != BoundaryCondition::Floating {
                    edges.push((space.edge_cells(coord_axis, side), bc));
                }
            }
        }
        Self { edges }
    }

    /// Returns `true` if there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Apply every edge in order (x lower, x upper, y lower, y upper).
    ///
    /// Flux is not injected at epoch 0 so the initial condition is
    /// integrated as given.
    pub fn apply(&self, field: &mut [f64], epoch: EpochId, dt: f64) {
        for (cells, bc) in &self.edges {
            match *bc {
                BoundaryCondition::Floating => {}
                BoundaryCondition::FixedValue(value) => {
                    for &i in cells {
                        field[i] = value;
                    }
                }
                BoundaryCondition::FixedFlux(rate) => {
                    if epoch == EpochId(0) {
                        continue;
                    }
                    for &i in cells {
                        field[i] = (field[i] + rate * dt).max(0.0);
                    }
                }
            }
        }
    }
}
