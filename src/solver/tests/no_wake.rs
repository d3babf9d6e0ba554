// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! The no-wake evaluation: every rotor sees the undisturbed background flow.

use approx::assert_relative_eq;

use super::test_setup::tandem_simulation;

#[test]
fn all_turbines_see_the_freestream_profile() {
    let mut simulation = tandem_simulation();

    simulation.solve_no_wake().unwrap();

    let velocities = simulation.rotor_averaged_velocities().unwrap();

    for s in 0..3 {
        let upstream = velocities[[0, s, 0]];

        // Identical turbines at identical hub heights: every rotor average equals the most
        // upstream one
        assert_eq!(velocities[[0, s, 1]], upstream);
        assert_eq!(velocities[[0, s, 2]], upstream);
    }

    // The 8 m/s rotor average of the sheared profile
    assert_relative_eq!(velocities[[0, 0, 0]], 7.9803783, max_relative = 1e-6);
}

#[test]
fn no_wake_turbulence_stays_ambient() {
    let mut simulation = tandem_simulation();

    simulation.solve_no_wake().unwrap();

    for &value in &simulation.flow_field.turbulence_intensity_field.data {
        assert_eq!(value, 0.06);
    }
}

#[test]
fn no_wake_powers_exceed_waked_powers() {
    let mut waked = tandem_simulation();
    waked.solve().unwrap();
    let waked_powers = waked.turbine_powers().unwrap();

    let mut unwaked = tandem_simulation();
    unwaked.solve_no_wake().unwrap();
    let unwaked_powers = unwaked.turbine_powers().unwrap();

    // Upstream turbine is identical, downstream turbines gain
    assert_eq!(unwaked_powers[[0, 0, 0]], waked_powers[[0, 0, 0]]);
    assert!(unwaked_powers[[0, 0, 1]] > waked_powers[[0, 0, 1]]);
    assert!(unwaked_powers[[0, 0, 2]] > waked_powers[[0, 0, 2]]);
}
