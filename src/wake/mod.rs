// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Analytic wake models.
//!
//! Three pluggable model families describe the wake behind a turbine: the velocity deficit, the
//! lateral and vertical deflection of the wake centreline, and the turbulence added to the flow.
//! A fourth family combines the deficit of a new wake with the deficits already present. Each
//! family is represented as an enum over its variants, resolved once from the model names in the
//! configuration, so the solver dispatches without any string lookups.
//!
//! All models are pure functions of the state of the upstream turbine and the position of the
//! sample point, expressed in the wind aligned frame.

pub mod velocity;
pub mod deflection;
pub mod turbulence;
pub mod combination;
pub mod transverse_velocity;

use serde::{Deserialize, Serialize};

use wakemath::type_aliases::Float;

use crate::error::Error;

use velocity::jensen::JensenDeficit;
use velocity::gauss::GaussDeficit;
use velocity::empirical_gauss::EmpiricalGaussDeficit;
use deflection::jimenez::JimenezDeflection;
use deflection::gauss::GaussDeflection;
use turbulence::crespo_hernandez::CrespoHernandez;
use combination::{CombinationModel, SosfsCombination};

#[derive(Debug, Clone)]
/// State of an upstream turbine as seen by the wake models: its position in the wind aligned
/// frame, its geometry, and the aerodynamic quantities computed when the solver visited it.
pub struct WakeSource {
    /// Streamwise position of the rotor centre
    pub x: Float,
    /// Lateral position of the rotor centre
    pub y: Float,
    pub hub_height: Float,
    pub rotor_diameter: Float,
    pub tip_speed_ratio: Float,
    /// Effective yaw in degrees, including any secondary steering contribution
    pub yaw: Float,
    /// Tilt in degrees
    pub tilt: Float,
    pub thrust_coefficient: Float,
    pub axial_induction: Float,
    /// Rotor-averaged turbulence intensity at the source
    pub turbulence_intensity: Float,
    /// Turbulence intensity above ambient at the source, used as the mixing measure by the
    /// empirical Gauss wake width
    pub wake_induced_mixing: Float,
    /// Rotor-averaged streamwise velocity at the source
    pub rotor_averaged_velocity: Float,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelStrings {
    #[serde(default = "ModelStrings::default_velocity_model")]
    pub velocity_model: String,
    #[serde(default = "ModelStrings::default_deflection_model")]
    pub deflection_model: String,
    #[serde(default = "ModelStrings::default_turbulence_model")]
    pub turbulence_model: String,
    #[serde(default = "ModelStrings::default_combination_model")]
    pub combination_model: String,
}

impl ModelStrings {
    pub fn default_velocity_model() -> String {"gauss".to_string()}
    pub fn default_deflection_model() -> String {"gauss".to_string()}
    pub fn default_turbulence_model() -> String {"crespo_hernandez".to_string()}
    pub fn default_combination_model() -> String {"sosfs".to_string()}
}

impl Default for ModelStrings {
    fn default() -> Self {
        Self {
            velocity_model: Self::default_velocity_model(),
            deflection_model: Self::default_deflection_model(),
            turbulence_model: Self::default_turbulence_model(),
            combination_model: Self::default_combination_model(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VelocityParameters {
    #[serde(default)]
    pub jensen: JensenDeficit,
    #[serde(default)]
    pub gauss: GaussDeficit,
    #[serde(default)]
    pub empirical_gauss: EmpiricalGaussDeficit,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeflectionParameters {
    #[serde(default)]
    pub jimenez: JimenezDeflection,
    #[serde(default)]
    pub gauss: GaussDeflection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurbulenceParameters {
    #[serde(default)]
    pub crespo_hernandez: CrespoHernandez,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CombinationParameters {
    #[serde(default)]
    pub sosfs: SosfsCombination,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WakeConfig {
    #[serde(default)]
    pub model_strings: ModelStrings,
    #[serde(default)]
    pub enable_secondary_steering: bool,
    #[serde(default)]
    pub enable_yaw_added_recovery: bool,
    #[serde(default)]
    pub enable_transverse_velocities: bool,
    #[serde(default)]
    pub wake_velocity_parameters: VelocityParameters,
    #[serde(default)]
    pub wake_deflection_parameters: DeflectionParameters,
    #[serde(default)]
    pub wake_turbulence_parameters: TurbulenceParameters,
    #[serde(default)]
    pub wake_combination_parameters: CombinationParameters,
}

#[derive(Debug, Clone)]
pub enum VelocityDeficitModel {
    Jensen(JensenDeficit),
    Gauss(GaussDeficit),
    EmpiricalGauss(EmpiricalGaussDeficit),
}

impl VelocityDeficitModel {
    /// Fraction of the locally undisturbed inflow removed by the wake of `source` at the given
    /// sample point. Non-negative, and zero at and upstream of the source.
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
        match self {
            VelocityDeficitModel::Jensen(model) =>
                model.deficit_at_point(x, y, z, deflection_y, source),
            VelocityDeficitModel::Gauss(model) =>
                model.deficit_at_point(x, y, z, deflection_y, source, wind_veer),
            VelocityDeficitModel::EmpiricalGauss(model) =>
                model.deficit_at_point(x, y, z, deflection_y, deflection_z, source, wind_veer),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DeflectionModel {
    Jimenez(JimenezDeflection),
    Gauss(GaussDeflection),
}

impl DeflectionModel {
    /// Lateral and vertical offsets of the wake centreline of `source` at the given streamwise
    /// position.
    pub fn deflection_at_point(
        &self,
        x: Float,
        source: &WakeSource,
        wind_veer: Float,
    ) -> (Float, Float) {
        match self {
            DeflectionModel::Jimenez(model) => (model.deflection_at_point(x, source), 0.0),
            DeflectionModel::Gauss(model) => (model.deflection_at_point(x, source, wind_veer), 0.0),
        }
    }
}

#[derive(Debug, Clone)]
pub enum TurbulenceModel {
    CrespoHernandez(CrespoHernandez),
}

impl TurbulenceModel {
    /// Turbulence intensity added by the wake of `source` at the given downstream distance.
    pub fn added_turbulence_intensity(
        &self,
        delta_x: Float,
        ambient_turbulence_intensity: Float,
        source: &WakeSource,
    ) -> Float {
        match self {
            TurbulenceModel::CrespoHernandez(model) =>
                model.added_turbulence_intensity(delta_x, ambient_turbulence_intensity, source),
        }
    }
}

#[derive(Debug, Clone)]
/// The resolved wake model suite. Parameters are read-only after construction; the models hold no
/// state between evaluations.
pub struct WakeModels {
    pub velocity_model: VelocityDeficitModel,
    pub deflection_model: DeflectionModel,
    pub turbulence_model: TurbulenceModel,
    pub combination_model: CombinationModel,
    pub enable_secondary_steering: bool,
    pub enable_yaw_added_recovery: bool,
    pub enable_transverse_velocities: bool,
}

impl WakeModels {
    pub fn from_config(config: &WakeConfig) -> Result<Self, Error> {
        let velocity_model = match config.model_strings.velocity_model.as_str() {
            "jensen" => {
                VelocityDeficitModel::Jensen(config.wake_velocity_parameters.jensen.clone())
            }
            "gauss" => VelocityDeficitModel::Gauss(config.wake_velocity_parameters.gauss.clone()),
            "empirical_gauss" => VelocityDeficitModel::EmpiricalGauss(
                config.wake_velocity_parameters.empirical_gauss.clone(),
            ),
            name => {
                return Err(Error::ConfigError(format!(
                    "unknown velocity model: '{}'",
                    name
                )))
            }
        };

        let deflection_model = match config.model_strings.deflection_model.as_str() {
            "jimenez" => {
                DeflectionModel::Jimenez(config.wake_deflection_parameters.jimenez.clone())
            }
            "gauss" => DeflectionModel::Gauss(config.wake_deflection_parameters.gauss.clone()),
            name => {
                return Err(Error::ConfigError(format!(
                    "unknown deflection model: '{}'",
                    name
                )))
            }
        };

        let turbulence_model = match config.model_strings.turbulence_model.as_str() {
            "crespo_hernandez" => TurbulenceModel::CrespoHernandez(
                config.wake_turbulence_parameters.crespo_hernandez.clone(),
            ),
            name => {
                return Err(Error::ConfigError(format!(
                    "unknown turbulence model: '{}'",
                    name
                )))
            }
        };

        let combination_model = match config.model_strings.combination_model.as_str() {
            "sosfs" => CombinationModel::Sosfs(config.wake_combination_parameters.sosfs.clone()),
            name => {
                return Err(Error::ConfigError(format!(
                    "unknown combination model: '{}'",
                    name
                )))
            }
        };

        let any_enhancement = config.enable_secondary_steering
            || config.enable_yaw_added_recovery
            || config.enable_transverse_velocities;

        let gauss_pair = matches!(velocity_model, VelocityDeficitModel::Gauss(_))
            && matches!(deflection_model, DeflectionModel::Gauss(_));

        if any_enhancement && !gauss_pair {
            return Err(Error::ConfigError(
                "secondary steering, yaw added recovery and transverse velocities require the \
                 gauss velocity and deflection models"
                    .to_string(),
            ));
        }

        Ok(Self {
            velocity_model,
            deflection_model,
            turbulence_model,
            combination_model,
            enable_secondary_steering: config.enable_secondary_steering,
            enable_yaw_added_recovery: config.enable_yaw_added_recovery,
            enable_transverse_velocities: config.enable_transverse_velocities,
        })
    }
}
