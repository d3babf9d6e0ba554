// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! The background flow and the velocity tensors mutated by the wake solver.
//!
//! The flow field holds one `[D, S, T, G, G]` tensor per velocity component plus the turbulence
//! intensity field, all in sorted turbine order. The initial streamwise velocity follows a power
//! law shear profile; the lateral and vertical components start at zero and are only populated
//! when the transverse velocity model is enabled.

use serde::{Deserialize, Serialize};

use wakemath::type_aliases::Float;
use wakemath::arrays::Array5;

use crate::error::Error;
use crate::grid::TurbineGrid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowFieldConfig {
    #[serde(default = "FlowFieldConfig::default_air_density")]
    pub air_density: Float,
    #[serde(default = "FlowFieldConfig::default_reference_wind_height")]
    pub reference_wind_height: Float,
    #[serde(default)]
    pub turbulence_intensity: TurbulenceIntensityInput,
    #[serde(default = "FlowFieldConfig::default_wind_directions")]
    pub wind_directions: Vec<Float>,
    #[serde(default = "FlowFieldConfig::default_wind_shear")]
    pub wind_shear: Float,
    #[serde(default = "FlowFieldConfig::default_wind_speeds")]
    pub wind_speeds: Vec<Float>,
    #[serde(default)]
    pub wind_veer: Float,
}

impl FlowFieldConfig {
    pub fn default_air_density() -> Float {1.225}
    pub fn default_reference_wind_height() -> Float {90.0}
    pub fn default_wind_directions() -> Vec<Float> {vec![270.0]}
    pub fn default_wind_shear() -> Float {0.12}
    pub fn default_wind_speeds() -> Vec<Float> {vec![8.0]}

    pub fn n_wind_directions(&self) -> usize {
        self.wind_directions.len()
    }

    pub fn n_wind_speeds(&self) -> usize {
        self.wind_speeds.len()
    }

    /// The undisturbed turbulence intensity for the given flow condition.
    pub fn ambient_turbulence_intensity(&self, direction_index: usize, speed_index: usize) -> Float {
        match &self.turbulence_intensity {
            TurbulenceIntensityInput::Uniform(value) => *value,
            TurbulenceIntensityInput::ByCondition(values) => values[direction_index][speed_index],
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.wind_directions.is_empty() {
            return Err(Error::ConfigError("wind_directions is empty".to_string()));
        }

        if self.wind_speeds.is_empty() {
            return Err(Error::ConfigError("wind_speeds is empty".to_string()));
        }

        for &direction in &self.wind_directions {
            if !direction.is_finite() {
                return Err(Error::ConfigError(format!(
                    "non-finite wind direction: {}",
                    direction
                )));
            }
        }

        for &speed in &self.wind_speeds {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(Error::DomainError(format!(
                    "wind speeds must be positive and finite, got {}",
                    speed
                )));
            }
        }

        if !self.air_density.is_finite() || self.air_density <= 0.0 {
            return Err(Error::ConfigError(format!(
                "air_density must be positive, got {}",
                self.air_density
            )));
        }

        if !self.reference_wind_height.is_finite() || self.reference_wind_height <= 0.0 {
            return Err(Error::DomainError(format!(
                "reference_wind_height must be positive, got {}",
                self.reference_wind_height
            )));
        }

        if !self.wind_shear.is_finite() || self.wind_shear < 0.0 {
            return Err(Error::ConfigError(format!(
                "wind_shear must be non-negative, got {}",
                self.wind_shear
            )));
        }

        if !self.wind_veer.is_finite() {
            return Err(Error::ConfigError("wind_veer must be finite".to_string()));
        }

        match &self.turbulence_intensity {
            TurbulenceIntensityInput::Uniform(value) => {
                if !value.is_finite() || *value < 0.0 {
                    return Err(Error::ConfigError(format!(
                        "turbulence_intensity must be non-negative, got {}",
                        value
                    )));
                }
            }
            TurbulenceIntensityInput::ByCondition(values) => {
                if values.len() != self.wind_directions.len() {
                    return Err(Error::ConfigError(
                        "turbulence_intensity table must have one row per wind direction"
                            .to_string(),
                    ));
                }

                for row in values {
                    if row.len() != self.wind_speeds.len() {
                        return Err(Error::ConfigError(
                            "turbulence_intensity table must have one column per wind speed"
                                .to_string(),
                        ));
                    }

                    for &value in row {
                        if !value.is_finite() || value < 0.0 {
                            return Err(Error::ConfigError(format!(
                                "turbulence_intensity must be non-negative, got {}",
                                value
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for FlowFieldConfig {
    fn default() -> Self {
        Self {
            air_density: Self::default_air_density(),
            reference_wind_height: Self::default_reference_wind_height(),
            turbulence_intensity: Default::default(),
            wind_directions: Self::default_wind_directions(),
            wind_shear: Self::default_wind_shear(),
            wind_speeds: Self::default_wind_speeds(),
            wind_veer: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
/// The ambient turbulence intensity, either a single value for all flow conditions or one value
/// per (wind direction, wind speed) pair.
pub enum TurbulenceIntensityInput {
    Uniform(Float),
    ByCondition(Vec<Vec<Float>>),
}

impl Default for TurbulenceIntensityInput {
    fn default() -> Self {
        Self::Uniform(0.06)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Lifecycle of the flow field within one evaluation. Results can only be read in the `Used`
/// state; a new solve transitions back through `Initialized`.
pub enum FlowFieldState {
    Initialized,
    Solving,
    Used,
}

#[derive(Debug, Clone)]
pub struct FlowField {
    /// Undisturbed streamwise velocity at every sample point, from the shear profile
    pub u_initial: Array5<Float>,
    /// Streamwise velocity, reduced by wake deficits during a solve
    pub u: Array5<Float>,
    pub v: Array5<Float>,
    pub w: Array5<Float>,
    pub turbulence_intensity_field: Array5<Float>,
    pub state: FlowFieldState,
}

impl FlowField {
    pub fn new(grid: &TurbineGrid, config: &FlowFieldConfig) -> Result<Self, Error> {
        let shape = grid.z.shape();

        let mut flow_field = Self {
            u_initial: Array5::new_default(shape),
            u: Array5::new_default(shape),
            v: Array5::new_default(shape),
            w: Array5::new_default(shape),
            turbulence_intensity_field: Array5::new_default(shape),
            state: FlowFieldState::Initialized,
        };

        flow_field.initialize(grid, config)?;

        Ok(flow_field)
    }

    /// Fills the velocity tensors with the undisturbed background flow and resets the state to
    /// `Initialized`. The sample point heights are taken from the grid, which must have the same
    /// shape as the flow field.
    pub fn initialize(&mut self, grid: &TurbineGrid, config: &FlowFieldConfig) -> Result<(), Error> {
        let shape = grid.z.shape();

        if shape != self.u.shape() {
            return Err(Error::StateError(
                "flow field and grid shapes do not match".to_string(),
            ));
        }

        let [n_directions, n_speeds, _, _, _] = shape;

        let Self {
            u_initial,
            u,
            v,
            w,
            turbulence_intensity_field,
            state,
        } = self;

        for d in 0..n_directions {
            for s in 0..n_speeds {
                let wind_speed = config.wind_speeds[s];
                let ambient_turbulence = config.ambient_turbulence_intensity(d, s);

                let z = grid.z.condition_slice(d, s);
                let u_initial_slice = u_initial.condition_slice_mut(d, s);

                for (point, &height) in u_initial_slice.iter_mut().zip(z.iter()) {
                    *point = wind_speed
                        * (height.max(0.0) / config.reference_wind_height).powf(config.wind_shear);
                }

                u.condition_slice_mut(d, s)
                    .copy_from_slice(u_initial.condition_slice(d, s));

                for value in v.condition_slice_mut(d, s) {
                    *value = 0.0;
                }

                for value in w.condition_slice_mut(d, s) {
                    *value = 0.0;
                }

                for value in turbulence_intensity_field.condition_slice_mut(d, s) {
                    *value = ambient_turbulence;
                }
            }
        }

        *state = FlowFieldState::Initialized;

        Ok(())
    }
}
