// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Transverse velocities behind a misaligned rotor and the corrections built on them.
//!
//! A yawed rotor sheds a counter rotating vortex pair from its top and bottom edges, and the
//! rotating wake itself acts as a vortex at hub height. These vortices, together with their
//! mirror images below the ground plane, induce lateral and vertical velocities downstream. Two
//! additional corrections use the same vortex structure: secondary steering infers the effective
//! yaw a downstream rotor experiences from the spanwise velocity it samples, and yaw added
//! recovery converts the extra kinetic energy of the transverse motion into turbulence mixing at
//! the source turbine.

use wakemath::type_aliases::Float;
use wakemath::statistics::{cubic_mean, mean};
use wakemath::trigonometry::{cosd, sind};

use std::f64::consts::PI;

use super::WakeSource;

/// Size of the Gaussian vortex cores relative to the rotor diameter
const VORTEX_CORE_RATIO: Float = 0.2;

/// Von Karman constant for the mixing length estimate of the eddy viscosity
const VON_KARMAN: Float = 0.41;

/// Gain applied to the turbulence mixing term of the yaw added recovery correction
pub const YAW_ADDED_RECOVERY_GAIN: Float = 2.0;

/// Lateral and vertical velocity induced at a sample point by the vortex system of `source`.
///
/// # Arguments
/// * `x`, `y`, `z` - position of the sample point in the wind aligned frame
/// * `source` - the turbine shedding the vortices
/// * `freestream_velocity` - mean undisturbed velocity, sets the convection time for the decay
/// * `dudz` - vertical gradient of the undisturbed velocity at the sample point, used in the
///   eddy viscosity that diffuses the vortices
pub fn vortex_velocities_at_point(
    x: Float,
    y: Float,
    z: Float,
    source: &WakeSource,
    freestream_velocity: Float,
    dudz: Float,
) -> (Float, Float) {
    let delta_x = x - source.x;

    if delta_x < 0.0 {
        return (0.0, 0.0);
    }

    let rotor_diameter = source.rotor_diameter;
    let hub_height = source.hub_height;
    let core_size = VORTEX_CORE_RATIO * rotor_diameter;

    let gamma_yaw = (PI as Float) / 8.0
        * rotor_diameter
        * source.rotor_averaged_velocity
        * source.thrust_coefficient
        * sind(source.yaw)
        * cosd(source.yaw);

    let induction = source.axial_induction;
    let gamma_wake_rotation = 0.5 * (PI as Float)
        * rotor_diameter
        * (induction - induction.powi(2))
        * source.rotor_averaged_velocity
        / source.tip_speed_ratio;

    // The vortex system and its ground images
    let vortices = [
        (gamma_yaw, hub_height + 0.5 * rotor_diameter),
        (-gamma_yaw, hub_height - 0.5 * rotor_diameter),
        (gamma_wake_rotation, hub_height),
        (-gamma_yaw, -(hub_height + 0.5 * rotor_diameter)),
        (gamma_yaw, -(hub_height - 0.5 * rotor_diameter)),
        (-gamma_wake_rotation, -hub_height),
    ];

    let lateral_offset = y - source.y;

    let mut v = 0.0;
    let mut w = 0.0;

    for (strength, vortex_height) in vortices {
        let vertical_offset = z - vortex_height;
        let radius_squared = lateral_offset.powi(2) + vertical_offset.powi(2);

        if radius_squared < 1e-12 {
            continue;
        }

        let core_shape = 1.0 - (-radius_squared / core_size.powi(2)).exp();
        let factor = strength / (2.0 * (PI as Float) * radius_squared) * core_shape;

        v += factor * vertical_offset;
        w += -factor * lateral_offset;
    }

    // Viscous decay of the vortices as they convect downstream
    let mixing_length_scale = rotor_diameter / 8.0;
    let mixing_length = if z > 0.0 {
        VON_KARMAN * z / (1.0 + VON_KARMAN * z / mixing_length_scale)
    } else {
        0.0
    };

    let eddy_viscosity = mixing_length.powi(2) * dudz.abs();

    let decay = core_size.powi(2)
        / (4.0 * eddy_viscosity * delta_x / freestream_velocity.max(1e-6) + core_size.powi(2));

    (v * decay, w * decay)
}

/// The yaw angle, in degrees, that would produce the observed mean spanwise velocity through the
/// counter rotating vortex pair. Used by secondary steering: the spanwise flow set up by an
/// upstream yawed turbine steers the wake of a downstream turbine even when that turbine itself
/// is aligned.
pub fn wake_added_yaw(
    rotor_averaged_velocity: Float,
    mean_spanwise_velocity: Float,
    thrust_coefficient: Float,
) -> Float {
    // Core factor of the vortex pair evaluated at the rotor edge distance
    let core_shape = 1.0 - (-(0.5 as Float).powi(2) / VORTEX_CORE_RATIO.powi(2)).exp();

    let denominator = rotor_averaged_velocity * thrust_coefficient * core_shape;

    if denominator.abs() < 1e-12 {
        return 0.0;
    }

    let argument = (-8.0 * mean_spanwise_velocity / denominator).clamp(-1.0, 1.0);

    (0.5 * argument.asin()).to_degrees()
}

/// Turbulence intensity added by the kinetic energy of the transverse velocities at the rotor,
/// from the turbulence kinetic energy round trip.
pub fn yaw_added_turbulence_mixing(
    u: &[Float],
    v: &[Float],
    w: &[Float],
    turbulence_intensity: Float,
) -> Float {
    let average_u = cubic_mean(u);

    if average_u <= 0.0 {
        return 0.0;
    }

    let kinetic_energy = (average_u * turbulence_intensity).powi(2) / (2.0 / 3.0);

    let u_term = (2.0 * kinetic_energy).sqrt();
    let v_term = mean(v);
    let w_term = mean(w);

    let total_kinetic_energy = 0.5 * (u_term.powi(2) + v_term.powi(2) + w_term.powi(2));

    let total_intensity = ((2.0 / 3.0) * total_kinetic_energy).sqrt() / average_u;

    (total_intensity - turbulence_intensity).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yawed_source(yaw: Float) -> WakeSource {
        WakeSource {
            x: 0.0,
            y: 0.0,
            hub_height: 90.0,
            rotor_diameter: 126.0,
            tip_speed_ratio: 8.0,
            yaw,
            tilt: 0.0,
            thrust_coefficient: 0.76,
            axial_induction: 0.25,
            turbulence_intensity: 0.06,
            wake_induced_mixing: 0.0,
            rotor_averaged_velocity: 8.0,
        }
    }

    #[test]
    fn yawed_rotor_pushes_the_flow_sideways_at_hub_height() {
        let source = yawed_source(20.0);

        let (v, _) = vortex_velocities_at_point(630.0, 0.0, 90.0, &source, 8.0, 0.01);

        assert!(v < 0.0, "v = {}", v);
    }

    #[test]
    fn opposite_yaw_mirrors_the_spanwise_velocity() {
        let positive = yawed_source(20.0);
        let negative = yawed_source(-20.0);

        // Evaluated slightly off the wake rotation centreline so only the yaw vortices differ
        let (v_pos, _) = vortex_velocities_at_point(630.0, 0.0, 90.0, &positive, 8.0, 0.01);
        let (v_neg, _) = vortex_velocities_at_point(630.0, 0.0, 90.0, &negative, 8.0, 0.01);

        // The wake rotation contribution is identical in both cases; the yaw part flips
        let (v_no_yaw, _) = vortex_velocities_at_point(630.0, 0.0, 90.0, &yawed_source(0.0), 8.0, 0.01);

        assert!((v_pos - v_no_yaw + (v_neg - v_no_yaw)).abs() < 1e-12);
    }

    #[test]
    fn aligned_rotor_still_induces_wake_rotation() {
        let source = yawed_source(0.0);

        let (v, _) = vortex_velocities_at_point(630.0, 0.0, 120.0, &source, 8.0, 0.01);

        assert!(v != 0.0);
    }

    #[test]
    fn vortices_decay_downstream() {
        let source = yawed_source(20.0);

        let (v_near, _) = vortex_velocities_at_point(315.0, 0.0, 90.0, &source, 8.0, 0.05);
        let (v_far, _) = vortex_velocities_at_point(3150.0, 0.0, 90.0, &source, 8.0, 0.05);

        assert!(v_near.abs() > v_far.abs());
    }

    #[test]
    fn no_transverse_velocities_upstream() {
        let source = yawed_source(20.0);

        let (v, w) = vortex_velocities_at_point(-315.0, 0.0, 90.0, &source, 8.0, 0.01);

        assert_eq!((v, w), (0.0, 0.0));
    }

    #[test]
    fn inferred_yaw_has_the_sign_of_the_upstream_yaw() {
        let source = yawed_source(20.0);

        let (v, _) = vortex_velocities_at_point(630.0, 0.0, 90.0, &source, 8.0, 0.01);

        let added_yaw = wake_added_yaw(8.0, v, 0.76);

        assert!(added_yaw > 0.0);
        assert!(added_yaw < 20.0);
    }

    #[test]
    fn no_mixing_without_transverse_motion() {
        let u = vec![8.0; 9];
        let zeros = vec![0.0; 9];

        let mixing = yaw_added_turbulence_mixing(&u, &zeros, &zeros, 0.06);

        assert!(mixing.abs() < 1e-12);
    }

    #[test]
    fn transverse_motion_adds_mixing() {
        let u = vec![8.0; 9];
        let v = vec![0.4; 9];
        let w = vec![-0.2; 9];

        let mixing = yaw_added_turbulence_mixing(&u, &v, &w, 0.06);

        assert!(mixing > 0.0);
    }
}
