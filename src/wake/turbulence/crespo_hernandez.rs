// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Added turbulence intensity after Crespo and Hernandez.
//!
//! A power law in the axial induction of the wake source, the ambient turbulence intensity and
//! the normalised downstream distance. The distance exponent is negative, so the added
//! turbulence decays downstream.

use serde::{Deserialize, Serialize};

use wakemath::type_aliases::Float;

use super::super::WakeSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrespoHernandez {
    /// Exponent on the ambient turbulence intensity
    #[serde(default = "CrespoHernandez::default_initial")]
    pub initial: Float,
    /// Leading factor
    #[serde(default = "CrespoHernandez::default_constant")]
    pub constant: Float,
    /// Exponent on the axial induction
    #[serde(default = "CrespoHernandez::default_ai")]
    pub ai: Float,
    /// Exponent on the normalised downstream distance
    #[serde(default = "CrespoHernandez::default_downstream")]
    pub downstream: Float,
}

impl CrespoHernandez {
    pub fn default_initial() -> Float {0.1}
    pub fn default_constant() -> Float {0.5}
    pub fn default_ai() -> Float {0.8}
    pub fn default_downstream() -> Float {-0.32}

    pub fn added_turbulence_intensity(
        &self,
        delta_x: Float,
        ambient_turbulence_intensity: Float,
        source: &WakeSource,
    ) -> Float {
        if delta_x <= 0.0 {
            return 0.0;
        }

        self.constant
            * source.axial_induction.powf(self.ai)
            * ambient_turbulence_intensity.powf(self.initial)
            * (delta_x / source.rotor_diameter).powf(self.downstream)
    }
}

impl Default for CrespoHernandez {
    fn default() -> Self {
        Self {
            initial: Self::default_initial(),
            constant: Self::default_constant(),
            ai: Self::default_ai(),
            downstream: Self::default_downstream(),
        }
    }
}
