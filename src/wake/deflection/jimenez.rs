// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Analytic wake deflection after Jimenez.
//!
//! The initial skew angle of the wake behind a yawed rotor is proportional to the thrust and the
//! yaw angle. Integrating the skew over the downstream distance, with the wake expanding at the
//! rate `kd`, gives a closed form lateral displacement that saturates far downstream.

use serde::{Deserialize, Serialize};

use wakemath::type_aliases::Float;
use wakemath::trigonometry::{cosd, sind};

use super::super::WakeSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JimenezDeflection {
    /// Constant lateral offset added to the deflection
    #[serde(default)]
    pub ad: Float,
    /// Lateral offset added per unit downstream distance
    #[serde(default)]
    pub bd: Float,
    /// Wake spreading rate used in the deflection integral
    #[serde(default = "JimenezDeflection::default_kd")]
    pub kd: Float,
}

impl JimenezDeflection {
    pub fn default_kd() -> Float {0.05}

    /// Lateral displacement of the wake centreline at the given streamwise position.
    pub fn deflection_at_point(&self, x: Float, source: &WakeSource) -> Float {
        let delta_x = x - source.x;

        if delta_x <= 0.0 {
            return 0.0;
        }

        let rotor_diameter = source.rotor_diameter;

        // Initial skew angle of the wake behind the rotor
        let skew_angle =
            0.5 * cosd(source.yaw) * sind(source.yaw) * source.thrust_coefficient;

        let expansion = 2.0 * self.kd * delta_x / rotor_diameter + 1.0;

        let numerator = 15.0 * expansion.powi(4) + skew_angle.powi(2);
        let denominator = (30.0 * self.kd / rotor_diameter) * expansion.powi(5);

        let displacement = skew_angle * numerator / denominator
            - skew_angle * rotor_diameter * (15.0 + skew_angle.powi(2)) / (30.0 * self.kd);

        displacement + self.ad + self.bd * delta_x
    }
}

impl Default for JimenezDeflection {
    fn default() -> Self {
        Self {
            ad: 0.0,
            bd: 0.0,
            kd: Self::default_kd(),
        }
    }
}
