// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! The top level configuration document.
//!
//! Every section falls back to documented defaults when missing, so an empty document `{}` is a
//! valid configuration describing two NREL 5 MW turbines in tandem at 8 m/s from the west.
//! Unknown keys anywhere in the document are rejected.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::farm::FarmConfig;
use crate::flow_field::FlowFieldConfig;
use crate::wake::WakeConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "InputConfig::default_floris_version")]
    pub floris_version: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub farm: FarmConfig,
    #[serde(default)]
    pub flow_field: FlowFieldConfig,
    #[serde(default)]
    pub wake: WakeConfig,
}

impl InputConfig {
    pub fn default_name() -> String {"DEFAULT".to_string()}
    pub fn default_floris_version() -> String {"v3.4.0".to_string()}

    pub fn from_json_string(json_string: &str) -> Result<Self, Error> {
        let config: InputConfig = serde_json::from_str(json_string).map_err(|error| {
            Error::ConfigError(format!("invalid configuration document: {}", error))
        })?;

        config.validate()?;

        Ok(config)
    }

    pub fn from_json_file(file_path: &str) -> Result<Self, Error> {
        let json_string = std::fs::read_to_string(file_path)?;

        Self::from_json_string(&json_string)
    }

    /// Eager validation of everything that can be checked without building the simulation.
    pub fn validate(&self) -> Result<(), Error> {
        self.solver.validate()?;
        self.flow_field.validate()?;
        self.wake.wake_velocity_parameters.empirical_gauss.validate()?;

        Ok(())
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            description: String::new(),
            floris_version: Self::default_floris_version(),
            logging: Default::default(),
            solver: Default::default(),
            farm: Default::default(),
            flow_field: Default::default(),
            wake: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverType {
    TurbineGrid,
    FlowFieldGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverConfig {
    /// Grid type used for the turbine performance solve. Plane sampling always uses a flow field
    /// grid on top of a turbine grid solve, so both values lead to the same turbine results.
    #[serde(rename = "type", default = "SolverConfig::default_solver_type")]
    pub solver_type: SolverType,
    /// Number of sample points per rotor axis; each rotor gets the square of this
    #[serde(default = "SolverConfig::default_turbine_grid_points")]
    pub turbine_grid_points: usize,
}

impl SolverConfig {
    pub fn default_solver_type() -> SolverType {SolverType::TurbineGrid}
    pub fn default_turbine_grid_points() -> usize {3}

    pub fn validate(&self) -> Result<(), Error> {
        if self.turbine_grid_points < 1 {
            return Err(Error::ConfigError(
                "turbine_grid_points must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            solver_type: Self::default_solver_type(),
            turbine_grid_points: Self::default_turbine_grid_points(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub console: LogOutputConfig,
    #[serde(default = "LogOutputConfig::disabled")]
    pub file: LogOutputConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console: Default::default(),
            file: LogOutputConfig::disabled(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogOutputConfig {
    #[serde(default = "LogOutputConfig::default_enable")]
    pub enable: bool,
    #[serde(default = "LogOutputConfig::default_level")]
    pub level: String,
}

impl LogOutputConfig {
    pub fn default_enable() -> bool {true}
    pub fn default_level() -> String {"WARNING".to_string()}

    pub fn disabled() -> Self {
        Self {
            enable: false,
            level: Self::default_level(),
        }
    }

    /// Maps the configured level name to a `log` crate level filter. The library itself only
    /// emits records; installing a logger is left to the application.
    pub fn level_filter(&self) -> log::LevelFilter {
        if !self.enable {
            return log::LevelFilter::Off;
        }

        match self.level.to_ascii_uppercase().as_str() {
            "DEBUG" => log::LevelFilter::Debug,
            "INFO" => log::LevelFilter::Info,
            "WARNING" | "WARN" => log::LevelFilter::Warn,
            "ERROR" => log::LevelFilter::Error,
            _ => log::LevelFilter::Warn,
        }
    }
}

impl Default for LogOutputConfig {
    fn default() -> Self {
        Self {
            enable: Self::default_enable(),
            level: Self::default_level(),
        }
    }
}
