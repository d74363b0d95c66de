//! Initial density patterns.

use crate::config::Lattice;
use crate::random::{RandomSource, SamplingError};

/// How the density field is filled by `prepare()`.
///
/// Random patterns draw from the run's [`RandomSource`] in flat cell
/// order, so they are reproducible for a fixed seed.
#[derive(Clone, Debug, PartialEq)]
pub enum InitialCondition {
    /// Independent uniform draws in `[min, max)`.
    RandomUniform {
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (exclusive).
        max: f64,
    },
    /// Independent normal draws, truncated at zero.
    RandomGaussian {
        /// Mean of the draws.
        mean: f64,
        /// Standard deviation of the draws.
        std_dev: f64,
    },
    /// The same density everywhere.
    Constant(f64),
    /// Zero everywhere except one seeded cell.
    SingleSeed {
        /// Density of the seeded cell.
        value: f64,
        /// Column (x position).
        x: u32,
        /// Row (y position); must be 0 on a line.
        y: u32,
    },
    /// Caller-supplied densities in flat row-major order.
    Pattern(Vec<f64>),
}

impl Default for InitialCondition {
    fn default() -> Self {
        Self::RandomUniform { min: 0.0, max: 1.0 }
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{name} must be finite and >= 0, got {value}"));
    }
    Ok(())
}

impl InitialCondition {
    /// Check the pattern against the lattice.
    pub fn validate(&self, lattice: &Lattice) -> Result<(), String> {
        match self {
            Self::RandomUniform { min, max } => {
                non_negative("uniform min", *min)?;
                non_negative("uniform max", *max)?;
                if min > max {
                    return Err(format!("uniform min {min} exceeds max {max}"));
                }
            }
            Self::RandomGaussian { mean, std_dev } => {
                if !mean.is_finite() {
                    return Err(format!("gaussian mean must be finite, got {mean}"));
                }
                non_negative("gaussian std_dev", *std_dev)?;
            }
            Self::Constant(value) => non_negative("constant density", *value)?,
            Self::SingleSeed { value, x, y } => {
                non_negative("seed density", *value)?;
                lattice.flat_index(*x, *y).ok_or_else(|| {
                    format!("seed cell ({x}, {y}) lies outside the {lattice} lattice")
                })?;
            }
            Self::Pattern(values) => {
                if values.len() != lattice.cell_count() {
                    return Err(format!(
                        "pattern has {} values for {} cells",
                        values.len(),
                        lattice.cell_count()
                    ));
                }
                if let Some(i) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
                    return Err(format!("pattern value at cell {i} is {}", values[i]));
                }
            }
        }
        Ok(())
    }

    /// Overwrite `field` with this pattern.
    ///
    /// Assumes [`validate`](Self::validate) has passed for `lattice`.
    pub fn fill(
        &self,
        field: &mut [f64],
        lattice: &Lattice,
        rng: &mut RandomSource,
    ) -> Result<(), SamplingError> {
        match self {
            Self::RandomUniform { min, max } => {
                for rho in field.iter_mut() {
                    *rho = rng.uniform_range(*min, *max)?;
                }
            }
            Self::RandomGaussian { mean, std_dev } => {
                for rho in field.iter_mut() {
                    *rho = rng.gaussian(*mean, *std_dev)?.max(0.0);
                }
            }
            Self::Constant(value) => field.fill(*value),
            Self::SingleSeed { value, x, y } => {
                field.fill(0.0);
                if let Some(i) = lattice.flat_index(*x, *y) {
                    field[i] = *value;
                }
            }
            Self::Pattern(values) => field.copy_from_slice(values),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvn_space::EdgeBehavior;

    fn plane() -> Lattice {
        Lattice::Plane {
            nx: 4,
            ny: 3,
            edge_x: EdgeBehavior::Absorb,
            edge_y: EdgeBehavior::Absorb,
        }
    }

    #[test]
    fn single_seed_uses_x_plus_y_nx() {
        let lattice = plane();
        let ic = InitialCondition::SingleSeed {
            value: 2.5,
            x: 1,
            y: 2,
        };
        ic.validate(&lattice).unwrap();
        let mut field = vec![9.0; 12];
        ic.fill(&mut field, &lattice, &mut RandomSource::new(0))
            .unwrap();
        assert_eq!(field[1 + 2 * 4], 2.5);
        assert_eq!(field.iter().sum::<f64>(), 2.5);
    }

    #[test]
    fn seed_outside_lattice_rejected() {
        let ic = InitialCondition::SingleSeed {
            value: 1.0,
            x: 4,
            y: 0,
        };
        assert!(ic.validate(&plane()).is_err());
        let line = Lattice::Line {
            nx: 8,
            edge: EdgeBehavior::Wrap,
        };
        let off_axis = InitialCondition::SingleSeed {
            value: 1.0,
            x: 0,
            y: 1,
        };
        assert!(off_axis.validate(&line).is_err());
    }

    #[test]
    fn gaussian_is_truncated_at_zero() {
        let lattice = plane();
        let ic = InitialCondition::RandomGaussian {
            mean: 0.0,
            std_dev: 1.0,
        };
        let mut field = vec![0.0; 12];
        ic.fill(&mut field, &lattice, &mut RandomSource::new(4))
            .unwrap();
        assert!(field.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn uniform_respects_bounds_and_seed() {
        let lattice = plane();
        let ic = InitialCondition::RandomUniform { min: 0.2, max: 0.4 };
        let mut a = vec![0.0; 12];
        let mut b = vec![0.0; 12];
        ic.fill(&mut a, &lattice, &mut RandomSource::new(8)).unwrap();
        ic.fill(&mut b, &lattice, &mut RandomSource::new(8)).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (0.2..0.4).contains(v)));
    }

    #[test]
    fn pattern_must_match_cells() {
        let lattice = plane();
        assert!(InitialCondition::Pattern(vec![1.0; 11])
            .validate(&lattice)
            .is_err());
        let mut bad = vec![1.0; 12];
        bad[5] = -0.1;
        let err = InitialCondition::Pattern(bad).validate(&lattice).unwrap_err();
        assert!(err.contains("cell 5"), "{err}");
    }

    #[test]
    fn negative_constant_rejected() {
        assert!(InitialCondition::Constant(-1.0)
            .validate(&plane())
            .is_err());
        assert!(InitialCondition::RandomUniform { min: 0.5, max: 0.1 }
            .validate(&plane())
            .is_err());
    }
}
