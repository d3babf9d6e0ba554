// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Wake deflection consistent with the self-similar Gauss deficit model.
//!
//! The wake skew angle behind a yawed rotor sets an initial deflection that grows linearly to the
//! end of the near wake. In the far wake the deflection follows a logarithmic expression in the
//! growing wake widths, so the centreline asymptotically approaches a straight line.

use serde::{Deserialize, Serialize};

use wakemath::type_aliases::Float;
use wakemath::trigonometry::cosd;

use super::super::WakeSource;
use super::super::velocity::gauss::near_wake_length;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GaussDeflection {
    /// Constant lateral offset added to the deflection
    #[serde(default)]
    pub ad: Float,
    /// Near wake onset sensitivity to turbulence intensity
    #[serde(default = "GaussDeflection::default_alpha")]
    pub alpha: Float,
    /// Lateral offset added per unit downstream distance
    #[serde(default)]
    pub bd: Float,
    /// Near wake onset sensitivity to thrust
    #[serde(default = "GaussDeflection::default_beta")]
    pub beta: Float,
    /// Gain on the wake skew angle
    #[serde(default = "GaussDeflection::default_dm")]
    pub dm: Float,
    /// Wake expansion rate per unit turbulence intensity
    #[serde(default = "GaussDeflection::default_ka")]
    pub ka: Float,
    /// Baseline wake expansion rate
    #[serde(default = "GaussDeflection::default_kb")]
    pub kb: Float,
}

impl GaussDeflection {
    pub fn default_alpha() -> Float {0.58}
    pub fn default_beta() -> Float {0.077}
    pub fn default_dm() -> Float {1.0}
    pub fn default_ka() -> Float {0.38}
    pub fn default_kb() -> Float {0.004}

    /// Lateral displacement of the wake centreline at the given streamwise position.
    pub fn deflection_at_point(&self, x: Float, source: &WakeSource, wind_veer: Float) -> Float {
        let delta_x = x - source.x;

        if delta_x <= 0.0 {
            return 0.0;
        }

        // Opposite sign convention in this model
        let yaw = -source.yaw;

        let ct = source.thrust_coefficient;
        let rotor_diameter = source.rotor_diameter;
        let turbulence_intensity = source.turbulence_intensity;

        let x0 = near_wake_length(
            rotor_diameter,
            yaw,
            ct,
            turbulence_intensity,
            self.alpha,
            self.beta,
        );

        // Wake skew angle, in radians
        let skew_angle = self.dm * (0.3 * yaw.to_radians() / cosd(yaw))
            * (1.0 - (1.0 - ct * cosd(yaw)).max(0.0).sqrt());

        // Deflection at the end of the near wake
        let deflection_x0 = skew_angle.tan() * x0;

        let linear_offset = self.ad + self.bd * delta_x;

        if delta_x <= x0 {
            return (delta_x / x0) * deflection_x0 + linear_offset;
        }

        let u_core_ratio = (1.0 - ct).max(0.0).sqrt();

        let deficit_ratio_0 = 1.0 - u_core_ratio;
        let momentum_0 = deficit_ratio_0 * (2.0 - deficit_ratio_0);
        let energy_0 = deficit_ratio_0.powi(2) - 3.0 * ((1.0 / 12.0) as Float).exp() * deficit_ratio_0
            + 3.0 * ((1.0 / 3.0) as Float).exp();

        let u_rotor_ratio =
            ct * cosd(yaw) / (2.0 * (1.0 - (1.0 - ct * cosd(yaw)).max(0.0).sqrt()));

        let sigma_z0 = rotor_diameter * 0.5 * (u_rotor_ratio / (1.0 + u_core_ratio)).sqrt();
        let sigma_y0 = sigma_z0 * cosd(yaw) * cosd(wind_veer);

        let ky = self.ka * turbulence_intensity + self.kb;
        let kz = ky;

        let sigma_y = ky * (delta_x - x0) + sigma_y0;
        let sigma_z = kz * (delta_x - x0) + sigma_z0;

        let sqrt_momentum = momentum_0.max(0.0).sqrt();
        let width_growth = (sigma_y * sigma_z / (sigma_y0 * sigma_z0)).max(0.0).sqrt();

        let log_numerator = (1.6 + sqrt_momentum) * (1.6 * width_growth - sqrt_momentum);
        let log_denominator = (1.6 - sqrt_momentum) * (1.6 * width_growth + sqrt_momentum);

        let far_wake_term = skew_angle * energy_0 / 5.2
            * (sigma_y0 * sigma_z0 / (ky * kz * momentum_0)).max(0.0).sqrt()
            * (log_numerator / log_denominator).ln();

        deflection_x0 + far_wake_term + linear_offset
    }
}

impl Default for GaussDeflection {
    fn default() -> Self {
        Self {
            ad: 0.0,
            alpha: Self::default_alpha(),
            bd: 0.0,
            beta: Self::default_beta(),
            dm: Self::default_dm(),
            ka: Self::default_ka(),
            kb: Self::default_kb(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

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
    fn no_deflection_without_yaw() {
        let model = GaussDeflection::default();
        let source = yawed_source(0.0);

        assert_eq!(model.deflection_at_point(630.0, &source, 0.0), 0.0);
    }

    #[test]
    fn deflection_magnitude_grows_downstream() {
        let model = GaussDeflection::default();
        let source = yawed_source(20.0);

        let near = model.deflection_at_point(189.0, &source, 0.0).abs();
        let mid = model.deflection_at_point(630.0, &source, 0.0).abs();
        let far = model.deflection_at_point(1890.0, &source, 0.0).abs();

        assert!(near < mid);
        assert!(mid < far);
    }

    #[test]
    fn opposite_yaw_mirrors_the_deflection() {
        let model = GaussDeflection::default();

        let positive = model.deflection_at_point(630.0, &yawed_source(15.0), 0.0);
        let negative = model.deflection_at_point(630.0, &yawed_source(-15.0), 0.0);

        assert_relative_eq!(positive, -negative, max_relative = 1e-12);
    }

    #[test]
    fn deflection_is_continuous_at_the_near_wake_end() {
        let model = GaussDeflection::default();
        let source = yawed_source(20.0);

        let x0 = near_wake_length(126.0, -20.0, 0.76, 0.06, model.alpha, model.beta);

        let just_before = model.deflection_at_point(x0 - 0.01, &source, 0.0);
        let just_after = model.deflection_at_point(x0 + 0.01, &source, 0.0);

        assert_relative_eq!(just_before, just_after, epsilon = 5e-3);
    }
}
