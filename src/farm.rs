// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! The farm: turbine positions, turbine definitions and control angles.

use serde::{Deserialize, Serialize};

use wakemath::type_aliases::Float;
use wakemath::arrays::Array3;

use crate::error::Error;
use crate::turbine::Turbine;
use crate::turbine::library::turbine_from_name;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FarmConfig {
    #[serde(default = "FarmConfig::default_layout_x")]
    pub layout_x: Vec<Float>,
    #[serde(default = "FarmConfig::default_layout_y")]
    pub layout_y: Vec<Float>,
    /// Turbine definitions, either by name or as inline documents. A single entry is shared by
    /// all turbines; otherwise one entry per turbine is required.
    #[serde(default = "FarmConfig::default_turbine_type")]
    pub turbine_type: Vec<TurbineTypeInput>,
}

impl FarmConfig {
    pub fn default_layout_x() -> Vec<Float> {vec![0.0, 630.0]}
    pub fn default_layout_y() -> Vec<Float> {vec![0.0, 0.0]}
    pub fn default_turbine_type() -> Vec<TurbineTypeInput> {
        vec![TurbineTypeInput::Name("nrel_5MW".to_string())]
    }
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            layout_x: Self::default_layout_x(),
            layout_y: Self::default_layout_y(),
            turbine_type: Self::default_turbine_type(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurbineTypeInput {
    Name(String),
    Definition(Box<Turbine>),
}

impl TurbineTypeInput {
    fn resolve(&self) -> Result<Turbine, Error> {
        match self {
            TurbineTypeInput::Name(name) => turbine_from_name(name),
            TurbineTypeInput::Definition(turbine) => {
                let mut turbine = (**turbine).clone();
                turbine.prepare()?;

                Ok(turbine)
            }
        }
    }
}

#[derive(Debug, Clone)]
/// Turbine positions and control angles, in layout order. The yaw and tilt tensors carry one
/// value per flow condition and turbine, so that control settings can vary over the wind rose.
pub struct Farm {
    pub layout_x: Vec<Float>,
    pub layout_y: Vec<Float>,
    /// One turbine definition per position
    pub turbines: Vec<Turbine>,
    /// Yaw misalignment in degrees, shape `[D, S, T]`
    pub yaw_angles: Array3<Float>,
    /// Tilt misalignment in degrees, shape `[D, S, T]`
    pub tilt_angles: Array3<Float>,
}

impl Farm {
    pub fn from_config(
        config: &FarmConfig,
        n_wind_directions: usize,
        n_wind_speeds: usize,
    ) -> Result<Self, Error> {
        if config.layout_x.len() != config.layout_y.len() {
            return Err(Error::ConfigError(format!(
                "layout_x and layout_y have different lengths: {} vs {}",
                config.layout_x.len(),
                config.layout_y.len()
            )));
        }

        if config.layout_x.is_empty() {
            return Err(Error::ConfigError("the farm has no turbines".to_string()));
        }

        for (&x, &y) in config.layout_x.iter().zip(config.layout_y.iter()) {
            if !x.is_finite() || !y.is_finite() {
                return Err(Error::ConfigError(
                    "turbine positions must be finite".to_string(),
                ));
            }
        }

        let n_turbines = config.layout_x.len();

        let turbines: Vec<Turbine> = if config.turbine_type.len() == 1 {
            let turbine = config.turbine_type[0].resolve()?;

            vec![turbine; n_turbines]
        } else if config.turbine_type.len() == n_turbines {
            config
                .turbine_type
                .iter()
                .map(|input| input.resolve())
                .collect::<Result<_, _>>()?
        } else {
            return Err(Error::ConfigError(format!(
                "turbine_type must have 1 or {} entries, got {}",
                n_turbines,
                config.turbine_type.len()
            )));
        };

        let angle_shape = [n_wind_directions, n_wind_speeds, n_turbines];

        Ok(Self {
            layout_x: config.layout_x.clone(),
            layout_y: config.layout_y.clone(),
            turbines,
            yaw_angles: Array3::new_default(angle_shape),
            tilt_angles: Array3::new_default(angle_shape),
        })
    }

    pub fn n_turbines(&self) -> usize {
        self.layout_x.len()
    }

    /// Sets one yaw angle per turbine, broadcast over all flow conditions.
    pub fn set_yaw_angles(&mut self, yaw_angles: &[Float]) -> Result<(), Error> {
        let shape = self.yaw_angles.shape();

        if yaw_angles.len() != shape[2] {
            return Err(Error::ConfigError(format!(
                "expected {} yaw angles, got {}",
                shape[2],
                yaw_angles.len()
            )));
        }

        for &yaw in yaw_angles {
            if !(-90.0..=90.0).contains(&yaw) {
                return Err(Error::ConfigError(format!(
                    "yaw angles must be within [-90, 90] degrees, got {}",
                    yaw
                )));
            }
        }

        for d in 0..shape[0] {
            for s in 0..shape[1] {
                self.yaw_angles
                    .inner_slice_mut(d, s)
                    .copy_from_slice(yaw_angles);
            }
        }

        Ok(())
    }

    /// Sets one tilt angle per turbine, broadcast over all flow conditions.
    pub fn set_tilt_angles(&mut self, tilt_angles: &[Float]) -> Result<(), Error> {
        let shape = self.tilt_angles.shape();

        if tilt_angles.len() != shape[2] {
            return Err(Error::ConfigError(format!(
                "expected {} tilt angles, got {}",
                shape[2],
                tilt_angles.len()
            )));
        }

        for d in 0..shape[0] {
            for s in 0..shape[1] {
                self.tilt_angles
                    .inner_slice_mut(d, s)
                    .copy_from_slice(tilt_angles);
            }
        }

        Ok(())
    }
}
