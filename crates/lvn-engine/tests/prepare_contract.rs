//! Integration test: what `prepare()` hands the model and the field.

use lvn_core::Coefficients;
use lvn_engine::{
    BaseLangevin, BoundaryCondition, BoundaryConditions, ConfigError, InitialCondition, Lattice,
};
use lvn_space::{EdgeBehavior, SpaceError};
use lvn_test_utils::{quiet_builder, single_cell, spike, torus, DecayModel, RecordingModel};

#[test]
fn model_receives_coefficients_and_spacing() {
    let params = quiet_builder(torus(4), 10)
        .coefficients(Coefficients {
            linear: -0.3,
            quadratic: 1.5,
            diffusion: 0.2,
            noise: 0.7,
        })
        .dx(0.25)
        .build()
        .unwrap();
    let mut sim = BaseLangevin::new(RecordingModel::default());
    sim.prepare(&params).unwrap();
    let (c, dx) = sim.model().seen.unwrap();
    assert_eq!(c, params.coefficients);
    assert_eq!(dx, 0.25);
    assert_eq!(sim.model().prepares, 1);
    assert_eq!(sim.shape(), &[4, 4]);
    assert_eq!(sim.current_field().len(), 16);
}

#[test]
fn single_seed_lands_at_x_plus_y_nx() {
    let lattice = Lattice::Plane {
        nx: 5,
        ny: 3,
        edge_x: EdgeBehavior::Wrap,
        edge_y: EdgeBehavior::Wrap,
    };
    let params = quiet_builder(lattice, 1)
        .initial_condition(InitialCondition::SingleSeed {
            value: 3.0,
            x: 4,
            y: 2,
        })
        .build()
        .unwrap();
    let mut sim = BaseLangevin::new(RecordingModel::default());
    sim.prepare(&params).unwrap();
    assert_eq!(sim.current_field(), spike(15, 4 + 2 * 5, 3.0).as_slice());
    assert_eq!(sim.shape(), &[3, 5]);
}

#[test]
fn zero_size_lattice_is_a_space_error() {
    let mut params = quiet_builder(single_cell(), 1).build().unwrap();
    params.lattice = Lattice::Line {
        nx: 0,
        edge: EdgeBehavior::Absorb,
    };
    let mut sim = BaseLangevin::new(DecayModel::new(1.0));
    match sim.prepare(&params) {
        Err(ConfigError::Space(SpaceError::EmptySpace)) => {}
        other => panic!("expected Space(EmptySpace), got {other:?}"),
    }
}

#[test]
fn fixed_value_edges_hold_through_steps() {
    let lattice = Lattice::Line {
        nx: 6,
        edge: EdgeBehavior::Absorb,
    };
    let params = quiet_builder(lattice, 50)
        .diffusion(0.1)
        .boundary_conditions(BoundaryConditions {
            x: [BoundaryCondition::FixedValue(2.0), BoundaryCondition::Floating],
            ..Default::default()
        })
        .initial_condition(InitialCondition::Constant(0.0))
        .build()
        .unwrap();
    let mut sim = BaseLangevin::new(DecayModel::new(0.0));
    sim.prepare(&params).unwrap();
    // Applied at the start of a step, so visible after the first one.
    sim.step().unwrap();
    assert_eq!(sim.current_field()[0], 2.0);
    assert!(sim.current_field()[1..].iter().all(|v| *v == 0.0));
}
