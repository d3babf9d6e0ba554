// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Optional wake model enhancements: transverse velocities, secondary steering and yaw added
//! recovery. All of them require the gauss velocity and deflection pair.

use crate::input::InputConfig;
use crate::simulation::Simulation;

fn gauss_tandem_config() -> InputConfig {
    let mut config = super::test_setup::tandem_config();

    config.wake.model_strings.velocity_model = "gauss".to_string();
    config.wake.model_strings.deflection_model = "gauss".to_string();
    config.flow_field.wind_speeds = vec![8.0];

    config
}

#[test]
fn transverse_velocities_appear_behind_a_yawed_turbine() {
    let mut config = gauss_tandem_config();
    config.wake.enable_transverse_velocities = true;

    let mut simulation = Simulation::from_config(config).unwrap();
    simulation.set_yaw_angles(&[20.0, 0.0, 0.0]).unwrap();
    simulation.solve().unwrap();

    let points_per_turbine = simulation.grid.points_per_turbine();
    let v = simulation.flow_field.v.condition_slice(0, 0);

    // The rotor of the second turbine samples a non-zero spanwise velocity
    let second_rotor = &v[points_per_turbine..2 * points_per_turbine];

    assert!(second_rotor.iter().any(|&value| value.abs() > 1e-6));

    // The most upstream rotor is untouched
    let first_rotor = &v[..points_per_turbine];

    assert!(first_rotor.iter().all(|&value| value == 0.0));
}

#[test]
fn transverse_velocities_stay_zero_when_disabled() {
    let mut simulation = Simulation::from_config(gauss_tandem_config()).unwrap();
    simulation.set_yaw_angles(&[20.0, 0.0, 0.0]).unwrap();
    simulation.solve().unwrap();

    assert!(simulation.flow_field.v.data.iter().all(|&value| value == 0.0));
    assert!(simulation.flow_field.w.data.iter().all(|&value| value == 0.0));
}

#[test]
fn yaw_added_recovery_speeds_up_wake_recovery() {
    let mut baseline_config = gauss_tandem_config();
    baseline_config.wake.enable_transverse_velocities = true;

    let mut recovery_config = baseline_config.clone();
    recovery_config.wake.enable_yaw_added_recovery = true;

    let mut baseline = Simulation::from_config(baseline_config).unwrap();
    baseline.set_yaw_angles(&[20.0, 0.0, 0.0]).unwrap();
    baseline.solve().unwrap();

    let mut with_recovery = Simulation::from_config(recovery_config).unwrap();
    with_recovery.set_yaw_angles(&[20.0, 0.0, 0.0]).unwrap();
    with_recovery.solve().unwrap();

    let baseline_velocities = baseline.rotor_averaged_velocities().unwrap();
    let recovery_velocities = with_recovery.rotor_averaged_velocities().unwrap();

    // The extra mixing widens the yawed wake, so the waked turbine recovers more inflow
    assert!(recovery_velocities[[0, 0, 1]] > baseline_velocities[[0, 0, 1]]);
}

#[test]
fn secondary_steering_changes_the_third_row() {
    let mut baseline_config = gauss_tandem_config();
    baseline_config.wake.enable_transverse_velocities = true;

    let mut steering_config = baseline_config.clone();
    steering_config.wake.enable_secondary_steering = true;

    let mut baseline = Simulation::from_config(baseline_config).unwrap();
    baseline.set_yaw_angles(&[20.0, 0.0, 0.0]).unwrap();
    baseline.solve().unwrap();

    let mut with_steering = Simulation::from_config(steering_config).unwrap();
    with_steering.set_yaw_angles(&[20.0, 0.0, 0.0]).unwrap();
    with_steering.solve().unwrap();

    let baseline_velocities = baseline.rotor_averaged_velocities().unwrap();
    let steering_velocities = with_steering.rotor_averaged_velocities().unwrap();

    // The second turbine is aligned, but the spanwise flow from the yawed upstream turbine
    // steers its wake, which moves the deficit seen by the third turbine
    let difference =
        (steering_velocities[[0, 0, 2]] - baseline_velocities[[0, 0, 2]]).abs();

    assert!(difference > 1e-6, "difference = {}", difference);

    for &value in &steering_velocities.data {
        assert!(value.is_finite() && value > 0.0);
    }
}

#[test]
fn enhancements_are_rejected_for_the_jensen_suite() {
    let mut config = super::test_setup::tandem_config();
    config.wake.enable_secondary_steering = true;

    assert!(Simulation::from_config(config).is_err());
}
