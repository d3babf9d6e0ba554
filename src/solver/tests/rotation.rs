// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Rotational invariance: rotating the wind direction and the layout together must not change
//! the physics.

use approx::assert_relative_eq;

use crate::simulation::Simulation;

use super::test_setup::tandem_config;

/// A two by two square farm evaluated at 270 and 360 degrees. Rotating the wind by 90 degrees
/// maps the turbines onto each other, so the velocity sets must match under that index mapping.
#[test]
fn square_farm_matches_under_rotation() {
    let mut config = tandem_config();

    let spacing = 5.0 * 126.0;

    config.farm.layout_x = vec![0.0, 0.0, spacing, spacing];
    config.farm.layout_y = vec![0.0, spacing, 0.0, spacing];

    config.flow_field.wind_directions = vec![270.0, 360.0];
    config.flow_field.wind_speeds = vec![8.0];

    let mut simulation = Simulation::from_config(config).unwrap();
    simulation.solve().unwrap();

    let velocities = simulation.rotor_averaged_velocities().unwrap();

    // At 270 degrees turbines 2 and 3 are waked; at 360 degrees turbines 1 and 3 are waked.
    // The rotation maps 0 -> 2, 1 -> 0, 2 -> 3, 3 -> 1.
    assert_relative_eq!(velocities[[0, 0, 0]], velocities[[1, 0, 2]], max_relative = 1e-9);
    assert_relative_eq!(velocities[[0, 0, 1]], velocities[[1, 0, 0]], max_relative = 1e-9);
    assert_relative_eq!(velocities[[0, 0, 2]], velocities[[1, 0, 3]], max_relative = 1e-9);
    assert_relative_eq!(velocities[[0, 0, 3]], velocities[[1, 0, 1]], max_relative = 1e-9);
}

/// The same pairing must hold for the powers, which fold in the thrust and power curves.
#[test]
fn square_farm_powers_match_under_rotation() {
    let mut config = tandem_config();

    let spacing = 5.0 * 126.0;

    config.farm.layout_x = vec![0.0, 0.0, spacing, spacing];
    config.farm.layout_y = vec![0.0, spacing, 0.0, spacing];

    config.flow_field.wind_directions = vec![270.0, 360.0];
    config.flow_field.wind_speeds = vec![8.0];

    let mut simulation = Simulation::from_config(config).unwrap();
    simulation.solve().unwrap();

    let powers = simulation.turbine_powers().unwrap();

    assert_relative_eq!(powers[[0, 0, 0]], powers[[1, 0, 2]], max_relative = 1e-9);
    assert_relative_eq!(powers[[0, 0, 1]], powers[[1, 0, 0]], max_relative = 1e-9);
    assert_relative_eq!(powers[[0, 0, 2]], powers[[1, 0, 3]], max_relative = 1e-9);
    assert_relative_eq!(powers[[0, 0, 3]], powers[[1, 0, 1]], max_relative = 1e-9);
}

/// Two waked turbines, one per direction, must see identical inflow when the layout is rotated
/// with the wind.
#[test]
fn tandem_pair_is_direction_independent() {
    let mut config = tandem_config();

    config.farm.layout_x = vec![0.0, 630.0];
    config.farm.layout_y = vec![0.0, 0.0];
    config.flow_field.wind_directions = vec![270.0, 90.0];
    config.flow_field.wind_speeds = vec![8.0];

    let mut simulation = Simulation::from_config(config).unwrap();
    simulation.solve().unwrap();

    let velocities = simulation.rotor_averaged_velocities().unwrap();

    // From the west, turbine 1 is waked; from the east, turbine 0 is waked
    assert_relative_eq!(velocities[[0, 0, 1]], velocities[[1, 0, 0]], max_relative = 1e-9);
    assert_relative_eq!(velocities[[0, 0, 0]], velocities[[1, 0, 1]], max_relative = 1e-9);
}
