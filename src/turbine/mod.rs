// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Turbine performance modelling.
//!
//! A turbine is described by its geometry and by tabulated power and thrust coefficient curves.
//! The operations in this module are pure: given a rotor-averaged inflow velocity and the yaw and
//! tilt misalignment angles, they return the thrust coefficient, the axial induction and the
//! electrical power of the turbine.

pub mod performance_table;
pub mod library;

use serde::{Deserialize, Serialize};

use wakemath::type_aliases::Float;
use wakemath::interpolation::linear_interpolation;
use wakemath::statistics::cubic_mean;
use wakemath::trigonometry::cosd;

use crate::error::Error;

use performance_table::PowerThrustTable;

use std::f64::consts::PI;

/// Lower and upper clamps applied to the thrust coefficient. The upper bound keeps the axial
/// induction calculation away from the square root singularity at Ct = 1.
const CT_MIN: Float = 0.0001;
const CT_MAX: Float = 0.9999;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// Description of a single turbine type: rotor geometry, performance exponents and the tabulated
/// power and thrust curves.
pub struct Turbine {
    pub turbine_type: String,
    /// Rotor diameter, measured in m
    pub rotor_diameter: Float,
    /// Hub height above the ground, measured in m
    pub hub_height: Float,
    /// Tip speed ratio, used by the transverse velocity model for the wake rotation strength
    #[serde(rename = "TSR")]
    pub tip_speed_ratio: Float,
    /// Exponent for the power loss due to yaw misalignment
    #[serde(rename = "pP")]
    pub p_p: Float,
    /// Exponent for the power loss due to tilt misalignment. This exponent is exposed in the same
    /// way as the yaw exponent, but its value has not been validated against measurements.
    #[serde(rename = "pT")]
    pub p_t: Float,
    /// Air density at which the power and thrust curves were measured, in kg/m^3
    pub ref_density_cp_ct: Float,
    pub power_thrust_table: PowerThrustTable,
    /// Power per unit air density at the tabulated wind speeds. Derived from the power
    /// coefficient column at load, so that power interpolation happens on the tabulated power
    /// curve rather than on the coefficient curve.
    #[serde(skip)]
    inner_power: Vec<Float>,
}

impl Turbine {
    pub fn from_json_string(json_string: &str) -> Result<Self, Error> {
        let mut turbine: Turbine = serde_json::from_str(json_string).map_err(|error| {
            Error::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("malformed turbine document: {}", error),
            ))
        })?;

        turbine.prepare()?;

        Ok(turbine)
    }

    pub fn from_json_file(file_path: &str) -> Result<Self, Error> {
        let json_string = std::fs::read_to_string(file_path)?;

        Self::from_json_string(&json_string)
    }

    /// Validates the turbine description and computes the derived inner power table. Must be
    /// called before any of the performance functions are used.
    pub fn prepare(&mut self) -> Result<(), Error> {
        if !(self.rotor_diameter > 0.0) {
            return Err(Error::ConfigError(format!(
                "turbine '{}' has a non-positive rotor diameter",
                self.turbine_type
            )));
        }

        if !(self.hub_height > 0.0) {
            return Err(Error::ConfigError(format!(
                "turbine '{}' has a non-positive hub height",
                self.turbine_type
            )));
        }

        if !(self.ref_density_cp_ct > 0.0) {
            return Err(Error::ConfigError(format!(
                "turbine '{}' has a non-positive reference density",
                self.turbine_type
            )));
        }

        self.power_thrust_table.validate(&self.turbine_type)?;

        let area = self.rotor_area();

        self.inner_power = self
            .power_thrust_table
            .wind_speed
            .iter()
            .zip(self.power_thrust_table.power.iter())
            .map(|(&v, &cp)| 0.5 * area * cp * v.powi(3))
            .collect();

        Ok(())
    }

    pub fn rotor_area(&self) -> Float {
        0.25 * (PI as Float) * self.rotor_diameter.powi(2)
    }

    /// The power-preserving average of the sample velocities on the rotor: the cube root of the
    /// mean cubed velocity.
    pub fn rotor_averaged_velocity(velocities: &[Float]) -> Float {
        cubic_mean(velocities)
    }

    /// Thrust coefficient at the given rotor-averaged velocity, reduced by yaw and tilt
    /// misalignment and clamped away from the limits 0 and 1.
    ///
    /// # Arguments
    /// * `velocity` - rotor-averaged inflow velocity in m/s
    /// * `yaw` - yaw misalignment in degrees
    /// * `tilt` - tilt misalignment in degrees
    pub fn thrust_coefficient(&self, velocity: Float, yaw: Float, tilt: Float) -> Float {
        let ct = self.power_thrust_table.thrust_coefficient(velocity) * cosd(yaw) * cosd(tilt);

        ct.clamp(CT_MIN, CT_MAX)
    }

    /// Axial induction derived from the thrust coefficient through one-dimensional momentum
    /// theory, corrected for misalignment.
    pub fn axial_induction(&self, velocity: Float, yaw: Float, tilt: Float) -> Float {
        let ct = self.thrust_coefficient(velocity, yaw, tilt);
        let misalignment = cosd(yaw) * cosd(tilt);

        0.5 / misalignment * (1.0 - (1.0 - ct * misalignment).max(0.0).sqrt())
    }

    /// Electrical power at the given rotor-averaged velocity and air density.
    ///
    /// The yaw and tilt losses enter through an effective velocity so that the interpolation
    /// happens on the tabulated power curve. A density different from the table reference is
    /// handled the same way, with the cube root of the density ratio folded into the effective
    /// velocity.
    pub fn power(&self, air_density: Float, velocity: Float, yaw: Float, tilt: Float) -> Float {
        let density_ratio = air_density / self.ref_density_cp_ct;

        let effective_velocity = density_ratio.cbrt()
            * velocity
            * cosd(yaw).powf(self.p_p / 3.0)
            * cosd(tilt).powf(self.p_t / 3.0);

        self.ref_density_cp_ct
            * linear_interpolation(
                effective_velocity,
                &self.power_thrust_table.wind_speed,
                &self.inner_power,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::library::turbine_from_name;

    use approx::assert_relative_eq;

    fn nrel_5mw() -> Turbine {
        turbine_from_name("nrel_5MW").unwrap()
    }

    #[test]
    fn thrust_coefficient_matches_tabulated_curve() {
        let turbine = nrel_5mw();

        assert_relative_eq!(
            turbine.thrust_coefficient(7.9803783, 0.0, 0.0),
            0.7634300,
            max_relative = 1e-5
        );
    }

    #[test]
    fn yaw_reduces_thrust_with_a_single_cosine_factor() {
        let turbine = nrel_5mw();

        let aligned = turbine.thrust_coefficient(8.0, 0.0, 0.0);
        let yawed = turbine.thrust_coefficient(8.0, 5.0, 0.0);

        assert_relative_eq!(yawed, aligned * cosd(5.0), max_relative = 1e-12);
    }

    #[test]
    fn thrust_coefficient_is_clamped_below_one() {
        let turbine = nrel_5mw();

        // The table reaches 0.99 near cut-in, which is inside the clamp range
        let ct = turbine.thrust_coefficient(3.0, 0.0, 0.0);

        assert!(ct > 0.0 && ct < 1.0);
    }

    #[test]
    fn axial_induction_from_momentum_theory() {
        let turbine = nrel_5mw();

        let ct = turbine.thrust_coefficient(7.9803783, 0.0, 0.0);
        let expected = 0.5 * (1.0 - (1.0 - ct).sqrt());

        assert_relative_eq!(turbine.axial_induction(7.9803783, 0.0, 0.0), expected, max_relative = 1e-12);
        assert_relative_eq!(turbine.axial_induction(7.9803783, 0.0, 0.0), 0.2568077, max_relative = 1e-5);
    }

    #[test]
    fn power_is_zero_outside_the_operating_range() {
        let turbine = nrel_5mw();

        assert_eq!(turbine.power(1.225, 2.0, 0.0, 0.0), 0.0);
        assert_eq!(turbine.power(1.225, 30.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn power_at_rated_region_is_plausible() {
        let turbine = nrel_5mw();

        let power = turbine.power(1.225, 8.0, 0.0, 0.0);

        assert!(power > 1.5e6 && power < 2.0e6, "power = {}", power);
    }

    #[test]
    fn yawing_reduces_power() {
        let turbine = nrel_5mw();

        let aligned = turbine.power(1.225, 8.0, 0.0, 0.0);
        let yawed = turbine.power(1.225, 8.0, 10.0, 0.0);

        assert!(yawed < aligned);
    }
}
