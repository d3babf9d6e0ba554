// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Self-similar Gaussian wake model.
//!
//! The wake is divided into a near wake and a far wake at the onset distance x0, which depends on
//! the thrust coefficient, the local turbulence intensity and the yaw angle. In the far wake the
//! width grows linearly with a rate proportional to the turbulence intensity; in the near wake
//! the width ramps linearly between the pressure-recovery width at the rotor and the far wake
//! starting width. The deficit amplitude conserves momentum through the Gaussian profile.

use serde::{Deserialize, Serialize};

use wakemath::type_aliases::Float;
use wakemath::trigonometry::{cosd, sind};

use super::super::WakeSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GaussDeficit {
    /// Near wake onset sensitivity to turbulence intensity
    #[serde(default = "GaussDeficit::default_alpha")]
    pub alpha: Float,
    /// Near wake onset sensitivity to thrust
    #[serde(default = "GaussDeficit::default_beta")]
    pub beta: Float,
    /// Wake expansion rate per unit turbulence intensity
    #[serde(default = "GaussDeficit::default_ka")]
    pub ka: Float,
    /// Baseline wake expansion rate
    #[serde(default = "GaussDeficit::default_kb")]
    pub kb: Float,
}

impl GaussDeficit {
    pub fn default_alpha() -> Float {0.58}
    pub fn default_beta() -> Float {0.077}
    pub fn default_ka() -> Float {0.38}
    pub fn default_kb() -> Float {0.004}

    pub fn deficit_at_point(
        &self,
        x: Float,
        y: Float,
        z: Float,
        deflection_y: Float,
        source: &WakeSource,
        wind_veer: Float,
    ) -> Float {
        let delta_x = x - source.x;

        // A small margin behind the rotor plane keeps the source itself out of its own wake
        if delta_x <= 0.1 {
            return 0.0;
        }

        // Opposite sign convention in this model
        let yaw = -source.yaw;

        let ct = source.thrust_coefficient;
        let rotor_diameter = source.rotor_diameter;
        let turbulence_intensity = source.turbulence_intensity;

        // Velocity ratios directly behind the rotor, normalised by the inflow
        let u_rotor_ratio =
            ct * cosd(yaw) / (2.0 * (1.0 - (1.0 - ct * cosd(yaw)).max(0.0).sqrt()));
        let u_core_ratio = (1.0 - ct).max(0.0).sqrt();

        // Initial wake widths
        let sigma_z0 = rotor_diameter * 0.5 * (u_rotor_ratio / (1.0 + u_core_ratio)).sqrt();
        let sigma_y0 = sigma_z0 * cosd(yaw) * cosd(wind_veer);

        // Onset of the far wake
        let x0 = near_wake_length(
            rotor_diameter,
            yaw,
            ct,
            turbulence_intensity,
            self.alpha,
            self.beta,
        );

        let expansion_rate = self.ka * turbulence_intensity + self.kb;

        let (sigma_y, sigma_z) = if delta_x < x0 {
            // Linear ramps between the pressure recovery width at the rotor plane and the far
            // wake starting width
            let ramp_up = delta_x / x0;
            let ramp_down = (x0 - delta_x) / x0;

            let recovery_width = 0.501 * rotor_diameter * (ct / 2.0).sqrt();

            (
                ramp_down * recovery_width + ramp_up * sigma_y0,
                ramp_down * recovery_width + ramp_up * sigma_z0,
            )
        } else {
            (
                expansion_rate * (delta_x - x0) + sigma_y0,
                expansion_rate * (delta_x - x0) + sigma_z0,
            )
        };

        let radial_exponent = veer_skewed_exponent(
            wind_veer,
            sigma_y,
            sigma_z,
            y - source.y - deflection_y,
            z - source.hub_height,
        );

        let amplitude = 1.0
            - (1.0
                - (ct * cosd(yaw) / (8.0 * sigma_y * sigma_z / rotor_diameter.powi(2))))
                .clamp(0.0, 1.0)
                .sqrt();

        amplitude * (-radial_exponent).exp()
    }
}

impl Default for GaussDeficit {
    fn default() -> Self {
        Self {
            alpha: Self::default_alpha(),
            beta: Self::default_beta(),
            ka: Self::default_ka(),
            kb: Self::default_kb(),
        }
    }
}

/// Distance from the rotor to the onset of the far wake.
pub fn near_wake_length(
    rotor_diameter: Float,
    yaw: Float,
    ct: Float,
    turbulence_intensity: Float,
    alpha: Float,
    beta: Float,
) -> Float {
    let sqrt_term = (1.0 - ct).max(0.0).sqrt();

    rotor_diameter * cosd(yaw) * (1.0 + sqrt_term)
        / ((2.0 as Float).sqrt()
            * (4.0 * alpha * turbulence_intensity + 2.0 * beta * (1.0 - sqrt_term)))
}

/// Quadratic form of the Gaussian exponent, skewed by wind veer. Reduces to the standard
/// elliptical exponent when the veer is zero.
pub fn veer_skewed_exponent(
    wind_veer: Float,
    sigma_y: Float,
    sigma_z: Float,
    lateral_offset: Float,
    vertical_offset: Float,
) -> Float {
    let a = cosd(wind_veer).powi(2) / (2.0 * sigma_y.powi(2))
        + sind(wind_veer).powi(2) / (2.0 * sigma_z.powi(2));
    let b = -sind(2.0 * wind_veer) / (4.0 * sigma_y.powi(2))
        + sind(2.0 * wind_veer) / (4.0 * sigma_z.powi(2));
    let c = sind(wind_veer).powi(2) / (2.0 * sigma_y.powi(2))
        + cosd(wind_veer).powi(2) / (2.0 * sigma_z.powi(2));

    a * lateral_offset.powi(2) - 2.0 * b * lateral_offset * vertical_offset
        + c * vertical_offset.powi(2)
}
