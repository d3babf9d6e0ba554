// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Gaussian wake model with empirically tuned width growth.
//!
//! Unlike the self-similar Gauss model, there is no separate near wake region: the wake width
//! starts at a fixed fraction of the rotor diameter and grows piecewise linearly with downstream
//! distance. The growth rate changes at tabulated breakpoints, blended over a smoothing length so
//! the width stays differentiable. Wake-induced mixing from upstream turbines speeds up the
//! growth through a velocity mixing gain. A mirror wake below the ground plane is included, and
//! the profile centre honours a vertical deflection, which allows tilt-driven wake steering. The
//! magnitude of that vertical deflection has not been validated.

use serde::{Deserialize, Serialize};

use wakemath::type_aliases::Float;
use wakemath::trigonometry::cosd;

use super::super::WakeSource;
use super::gauss::veer_skewed_exponent;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmpiricalGaussDeficit {
    /// Wake width growth rates per region, one more entry than `breakpoints_D`
    #[serde(default = "EmpiricalGaussDeficit::default_wake_expansion_rates")]
    pub wake_expansion_rates: Vec<Float>,
    /// Downstream distances, in rotor diameters, where the growth rate changes
    #[serde(rename = "breakpoints_D", default = "EmpiricalGaussDeficit::default_breakpoints_d")]
    pub breakpoints_d: Vec<Float>,
    /// Initial wake width as a fraction of the rotor diameter
    #[serde(rename = "sigma_0_D", default = "EmpiricalGaussDeficit::default_sigma_0_d")]
    pub sigma_0_d: Float,
    /// Length, in rotor diameters, over which rate changes are blended
    #[serde(rename = "smoothing_length_D", default = "EmpiricalGaussDeficit::default_smoothing_length_d")]
    pub smoothing_length_d: Float,
    /// How strongly wake-induced mixing accelerates the width growth
    #[serde(default = "EmpiricalGaussDeficit::default_mixing_gain_velocity")]
    pub mixing_gain_velocity: Float,
}

impl EmpiricalGaussDeficit {
    pub fn default_wake_expansion_rates() -> Vec<Float> {vec![0.023, 0.008]}
    pub fn default_breakpoints_d() -> Vec<Float> {vec![10.0]}
    pub fn default_sigma_0_d() -> Float {0.28}
    pub fn default_smoothing_length_d() -> Float {2.0}
    pub fn default_mixing_gain_velocity() -> Float {2.0}

    pub fn deficit_at_point(
        &self,
        x: Float,
        y: Float,
        z: Float,
        deflection_y: Float,
        deflection_z: Float,
        source: &WakeSource,
        wind_veer: Float,
    ) -> Float {
        let delta_x = x - source.x;

        if delta_x <= 0.1 {
            return 0.0;
        }

        let rotor_diameter = source.rotor_diameter;

        let sigma_y0 = self.sigma_0_d * rotor_diameter * cosd(source.yaw);
        let sigma_z0 = self.sigma_0_d * rotor_diameter * cosd(source.tilt);

        let sigma_y = self.wake_width(delta_x, sigma_y0, source);
        let sigma_z = self.wake_width(delta_x, sigma_z0, source);

        let lateral_offset = y - source.y - deflection_y;
        let vertical_offset = z - source.hub_height - deflection_z;

        let direct = gaussian_profile(
            source,
            wind_veer,
            sigma_y,
            sigma_z,
            lateral_offset,
            vertical_offset,
        );

        // Mirror wake below the ground plane, combined in root sum of squares with the direct
        // wake
        let mirrored_vertical_offset = z + source.hub_height + deflection_z;

        let mirror = gaussian_profile(
            source,
            wind_veer,
            sigma_y,
            sigma_z,
            lateral_offset,
            mirrored_vertical_offset,
        );

        (direct.powi(2) + mirror.powi(2)).sqrt()
    }

    /// Piecewise linear wake width with soft breakpoints.
    fn wake_width(&self, delta_x: Float, sigma_0: Float, source: &WakeSource) -> Float {
        let rotor_diameter = source.rotor_diameter;
        let smoothing_length = self.smoothing_length_d * rotor_diameter;

        let mut sigma = (self.wake_expansion_rates[0]
            + self.mixing_gain_velocity * source.wake_induced_mixing)
            * delta_x
            + sigma_0;

        for (region, &breakpoint_d) in self.breakpoints_d.iter().enumerate() {
            let rate_change =
                self.wake_expansion_rates[region + 1] - self.wake_expansion_rates[region];

            let argument = (delta_x - breakpoint_d * rotor_diameter) / smoothing_length;

            sigma += rate_change * smoothing_length * softplus(argument);
        }

        sigma
    }

    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.wake_expansion_rates.len() != self.breakpoints_d.len() + 1 {
            return Err(crate::error::Error::ConfigError(format!(
                "empirical_gauss needs one more wake expansion rate than breakpoints, got {} \
                 rates and {} breakpoints",
                self.wake_expansion_rates.len(),
                self.breakpoints_d.len()
            )));
        }

        Ok(())
    }
}

impl Default for EmpiricalGaussDeficit {
    fn default() -> Self {
        Self {
            wake_expansion_rates: Self::default_wake_expansion_rates(),
            breakpoints_d: Self::default_breakpoints_d(),
            sigma_0_d: Self::default_sigma_0_d(),
            smoothing_length_d: Self::default_smoothing_length_d(),
            mixing_gain_velocity: Self::default_mixing_gain_velocity(),
        }
    }
}

/// Gaussian deficit profile with a momentum conserving amplitude.
fn gaussian_profile(
    source: &WakeSource,
    wind_veer: Float,
    sigma_y: Float,
    sigma_z: Float,
    lateral_offset: Float,
    vertical_offset: Float,
) -> Float {
    let radial_exponent =
        veer_skewed_exponent(wind_veer, sigma_y, sigma_z, lateral_offset, vertical_offset);

    let normalised_width = 8.0 * sigma_y * sigma_z / source.rotor_diameter.powi(2);

    let amplitude = 1.0
        - (1.0 - source.thrust_coefficient * cosd(source.yaw) * cosd(source.tilt)
            / normalised_width)
            .clamp(0.0, 1.0)
            .sqrt();

    amplitude * (-radial_exponent).exp()
}

/// Numerically stable `ln(1 + exp(x))`.
fn softplus(x: Float) -> Float {
    if x > 20.0 {
        x
    } else {
        x.exp().ln_1p()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_source() -> WakeSource {
        WakeSource {
            x: 0.0,
            y: 0.0,
            hub_height: 90.0,
            rotor_diameter: 126.0,
            tip_speed_ratio: 8.0,
            yaw: 0.0,
            tilt: 0.0,
            thrust_coefficient: 0.76,
            axial_induction: 0.25,
            turbulence_intensity: 0.06,
            wake_induced_mixing: 0.0,
            rotor_averaged_velocity: 8.0,
        }
    }

    #[test]
    fn width_growth_rate_drops_after_the_breakpoint() {
        let model = EmpiricalGaussDeficit::default();
        let source = test_source();

        let sigma_0 = model.sigma_0_d * source.rotor_diameter;

        let early_rate =
            model.wake_width(253.0, sigma_0, &source) - model.wake_width(252.0, sigma_0, &source);
        let late_rate = model.wake_width(5041.0, sigma_0, &source)
            - model.wake_width(5040.0, sigma_0, &source);

        assert!(early_rate > late_rate);
        assert!((early_rate - model.wake_expansion_rates[0]).abs() < 0.005);
        assert!((late_rate - model.wake_expansion_rates[1]).abs() < 0.001);
    }

    #[test]
    fn mixing_widens_the_wake() {
        let model = EmpiricalGaussDeficit::default();

        let calm = test_source();
        let mut mixed = test_source();
        mixed.wake_induced_mixing = 0.05;

        let sigma_0 = model.sigma_0_d * calm.rotor_diameter;

        assert!(model.wake_width(630.0, sigma_0, &mixed) > model.wake_width(630.0, sigma_0, &calm));
    }

    #[test]
    fn vertical_deflection_moves_the_profile_peak() {
        let model = EmpiricalGaussDeficit::default();
        let source = test_source();

        let at_hub = model.deficit_at_point(630.0, 0.0, 90.0, 0.0, 20.0, &source, 0.0);
        let at_deflected_centre = model.deficit_at_point(630.0, 0.0, 110.0, 0.0, 20.0, &source, 0.0);

        assert!(at_deflected_centre > at_hub);
    }

    #[test]
    fn mirror_wake_strengthens_the_deficit_near_the_ground() {
        let model = EmpiricalGaussDeficit::default();
        let source = test_source();

        // At equal distance below and above hub height, the point closer to the ground sees a
        // larger deficit because of the mirrored wake
        let low = model.deficit_at_point(1890.0, 0.0, 30.0, 0.0, 0.0, &source, 0.0);
        let high = model.deficit_at_point(1890.0, 0.0, 150.0, 0.0, 0.0, &source, 0.0);

        assert!(low > high);
    }

    #[test]
    fn mismatched_rates_and_breakpoints_are_rejected() {
        let model = EmpiricalGaussDeficit {
            wake_expansion_rates: vec![0.023],
            ..Default::default()
        };

        assert!(model.validate().is_err());
    }
}
