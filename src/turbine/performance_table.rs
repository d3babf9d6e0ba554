// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

use serde::{Deserialize, Serialize};

use wakemath::type_aliases::Float;
use wakemath::interpolation::linear_interpolation;

use crate::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// Tabulated performance curves of a turbine: power coefficient and thrust coefficient as
/// functions of the wind speed. Values are interpolated linearly and clamped to the end values
/// outside the tabulated range.
pub struct PowerThrustTable {
    /// Wind speeds for the tabulated values, in m/s. Must be strictly increasing.
    pub wind_speed: Vec<Float>,
    /// Power coefficients at the tabulated wind speeds
    pub power: Vec<Float>,
    /// Thrust coefficients at the tabulated wind speeds
    pub thrust: Vec<Float>,
}

impl PowerThrustTable {
    pub fn validate(&self, turbine_type: &str) -> Result<(), Error> {
        if self.wind_speed.is_empty() {
            return Err(Error::ConfigError(format!(
                "turbine '{}' has an empty power and thrust table",
                turbine_type
            )));
        }

        if self.wind_speed.len() != self.power.len() || self.wind_speed.len() != self.thrust.len() {
            return Err(Error::ConfigError(format!(
                "turbine '{}' has power and thrust columns of unequal length",
                turbine_type
            )));
        }

        for window in self.wind_speed.windows(2) {
            if !(window[1] > window[0]) {
                return Err(Error::DomainError(format!(
                    "turbine '{}' has non-increasing wind speeds in its performance table",
                    turbine_type
                )));
            }
        }

        Ok(())
    }

    pub fn power_coefficient(&self, velocity: Float) -> Float {
        linear_interpolation(velocity, &self.wind_speed, &self.power)
    }

    pub fn thrust_coefficient(&self, velocity: Float) -> Float {
        linear_interpolation(velocity, &self.wind_speed, &self.thrust)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> PowerThrustTable {
        PowerThrustTable {
            wind_speed: vec![4.0, 8.0, 12.0],
            power: vec![0.3, 0.45, 0.35],
            thrust: vec![0.9, 0.76, 0.5],
        }
    }

    #[test]
    fn interpolation_clamps_outside_the_table() {
        let table = small_table();

        assert_eq!(table.thrust_coefficient(0.0), 0.9);
        assert_eq!(table.thrust_coefficient(100.0), 0.5);
    }

    #[test]
    fn unequal_column_lengths_are_rejected() {
        let mut table = small_table();
        table.power.pop();

        assert!(table.validate("test").is_err());
    }

    #[test]
    fn non_monotonic_wind_speeds_are_rejected() {
        let mut table = small_table();
        table.wind_speed[2] = 6.0;

        assert!(table.validate("test").is_err());
    }
}
