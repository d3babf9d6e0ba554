// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! The public interface for running wake simulations.
//!
//! A `Simulation` owns the farm, the sample point grid, the flow field and the resolved wake
//! models. It is built from a configuration document, solved in place, and then queried for the
//! per-turbine results. All result tensors have shape `[D, S, T]` with the turbine axis in the
//! original layout order.

use std::time::Instant;

use wakemath::type_aliases::Float;
use wakemath::arrays::Array3;
use wakemath::statistics::cubic_mean;

use crate::error::Error;
use crate::farm::{Farm, TurbineTypeInput};
use crate::flow_field::{FlowField, FlowFieldState, TurbulenceIntensityInput};
use crate::grid::{rotation_center, TurbineGrid};
use crate::grid::flow_field_grid::{CutPlane, FlowFieldGrid, PlaneOrientation};
use crate::input::InputConfig;
use crate::solver::{self, SolveOptions};
use crate::wake::{WakeModels, WakeSource};

#[derive(Debug, Clone)]
pub struct Simulation {
    pub config: InputConfig,
    pub farm: Farm,
    pub grid: TurbineGrid,
    pub flow_field: FlowField,
    pub wake_models: WakeModels,
    condition_chunk_size: Option<usize>,
    wake_sources: Vec<Vec<WakeSource>>,
    last_solve_was_no_wake: bool,
}

impl Simulation {
    pub fn from_config(config: InputConfig) -> Result<Self, Error> {
        config.validate()?;

        let n_directions = config.flow_field.n_wind_directions();
        let n_speeds = config.flow_field.n_wind_speeds();

        let farm = Farm::from_config(&config.farm, n_directions, n_speeds)?;

        let grid = TurbineGrid::new(
            &farm,
            &config.flow_field.wind_directions,
            n_speeds,
            config.solver.turbine_grid_points,
        );

        let flow_field = FlowField::new(&grid, &config.flow_field)?;

        let wake_models = WakeModels::from_config(&config.wake)?;

        log::info!(
            "loaded simulation '{}': {} turbines, {} wind directions, {} wind speeds",
            config.name,
            farm.n_turbines(),
            n_directions,
            n_speeds
        );

        Ok(Self {
            config,
            farm,
            grid,
            flow_field,
            wake_models,
            condition_chunk_size: None,
            wake_sources: Vec::new(),
            last_solve_was_no_wake: false,
        })
    }

    /// Creates a simulation from a JSON configuration document.
    pub fn from_json_string(json_string: &str) -> Result<Self, Error> {
        let config = InputConfig::from_json_string(json_string)?;

        Self::from_config(config)
    }

    pub fn from_json_file(file_path: &str) -> Result<Self, Error> {
        let config = InputConfig::from_json_file(file_path)?;

        Self::from_config(config)
    }

    pub fn n_wind_directions(&self) -> usize {
        self.config.flow_field.n_wind_directions()
    }

    pub fn n_wind_speeds(&self) -> usize {
        self.config.flow_field.n_wind_speeds()
    }

    pub fn n_turbines(&self) -> usize {
        self.farm.n_turbines()
    }

    /// Sets one yaw angle per turbine, broadcast over all flow conditions. Invalidates any
    /// previously solved results.
    pub fn set_yaw_angles(&mut self, yaw_angles: &[Float]) -> Result<(), Error> {
        self.farm.set_yaw_angles(yaw_angles)?;
        self.flow_field.state = FlowFieldState::Initialized;

        Ok(())
    }

    /// Sets one tilt angle per turbine, broadcast over all flow conditions. Invalidates any
    /// previously solved results.
    pub fn set_tilt_angles(&mut self, tilt_angles: &[Float]) -> Result<(), Error> {
        self.farm.set_tilt_angles(tilt_angles)?;
        self.flow_field.state = FlowFieldState::Initialized;

        Ok(())
    }

    /// Limits how many flow conditions are solved at a time. Chunked execution produces results
    /// identical to whole-batch execution; the chunk size only bounds the working set.
    pub fn set_condition_chunk_size(&mut self, chunk_size: Option<usize>) {
        self.condition_chunk_size = chunk_size;
    }

    /// Computes the waked flow field for all flow conditions.
    pub fn solve(&mut self) -> Result<(), Error> {
        self.run_solver(false)
    }

    /// Computes the undisturbed flow field for all flow conditions: every rotor sees the sheared
    /// background profile.
    pub fn solve_no_wake(&mut self) -> Result<(), Error> {
        self.run_solver(true)
    }

    fn run_solver(&mut self, no_wake: bool) -> Result<(), Error> {
        self.flow_field.initialize(&self.grid, &self.config.flow_field)?;

        let options = SolveOptions {
            no_wake,
            condition_chunk_size: self.condition_chunk_size,
        };

        let start = Instant::now();

        self.wake_sources = solver::solve(
            &self.farm,
            &self.grid,
            &mut self.flow_field,
            &self.config.flow_field,
            &self.wake_models,
            &options,
        );

        self.last_solve_was_no_wake = no_wake;

        log::debug!(
            "solved {} flow conditions over {} turbines in {:.3} s",
            self.n_wind_directions() * self.n_wind_speeds(),
            self.n_turbines(),
            start.elapsed().as_secs_f64()
        );

        Ok(())
    }

    fn ensure_solved(&self) -> Result<(), Error> {
        if self.flow_field.state != FlowFieldState::Used {
            return Err(Error::StateError(
                "results requested before the flow field was solved".to_string(),
            ));
        }

        Ok(())
    }

    /// Rotor-averaged streamwise velocity per turbine, `[D, S, T]` in layout order.
    pub fn rotor_averaged_velocities(&self) -> Result<Array3<Float>, Error> {
        self.ensure_solved()?;

        Ok(self.map_sorted_turbines(|_, _, _, velocity| velocity))
    }

    /// Thrust coefficient per turbine, `[D, S, T]` in layout order.
    pub fn turbine_thrust_coefficients(&self) -> Result<Array3<Float>, Error> {
        self.ensure_solved()?;

        Ok(self.map_sorted_turbines(|turbine, yaw, tilt, velocity| {
            turbine.thrust_coefficient(velocity, yaw, tilt)
        }))
    }

    /// Axial induction per turbine, `[D, S, T]` in layout order.
    pub fn axial_inductions(&self) -> Result<Array3<Float>, Error> {
        self.ensure_solved()?;

        Ok(self.map_sorted_turbines(|turbine, yaw, tilt, velocity| {
            turbine.axial_induction(velocity, yaw, tilt)
        }))
    }

    /// Electrical power per turbine in W, `[D, S, T]` in layout order.
    pub fn turbine_powers(&self) -> Result<Array3<Float>, Error> {
        self.ensure_solved()?;

        let air_density = self.config.flow_field.air_density;

        Ok(self.map_sorted_turbines(|turbine, yaw, tilt, velocity| {
            turbine.power(air_density, velocity, yaw, tilt)
        }))
    }

    /// Evaluates a per-turbine quantity from the solved flow field and permutes it back to
    /// layout order.
    fn map_sorted_turbines<F>(&self, f: F) -> Array3<Float>
    where
        F: Fn(&crate::turbine::Turbine, Float, Float, Float) -> Float,
    {
        let n_directions = self.n_wind_directions();
        let n_speeds = self.n_wind_speeds();
        let n_turbines = self.n_turbines();
        let points_per_turbine = self.grid.points_per_turbine();

        let mut result = Array3::new_default([n_directions, n_speeds, n_turbines]);

        for d in 0..n_directions {
            for s in 0..n_speeds {
                let u = self.flow_field.u.condition_slice(d, s);

                for i in 0..n_turbines {
                    let layout_index = self.grid.sorted_indices[[d, i]];

                    let block = i * points_per_turbine..(i + 1) * points_per_turbine;
                    let velocity = cubic_mean(&u[block]);

                    let turbine = &self.farm.turbines[layout_index];
                    let yaw = self.farm.yaw_angles[[d, s, layout_index]];
                    let tilt = self.farm.tilt_angles[[d, s, layout_index]];

                    result[[d, s, layout_index]] = f(turbine, yaw, tilt, velocity);
                }
            }
        }

        result
    }

    /// Samples the solved wake field on a plane, for visualization. Requires a completed solve;
    /// the plane points are passive and do not change the turbine results.
    pub fn sample_plane(
        &self,
        orientation: PlaneOrientation,
        coordinate: Float,
        bounds: [Float; 4],
        resolution: [usize; 2],
    ) -> Result<CutPlane, Error> {
        self.ensure_solved()?;

        let center = rotation_center(&self.farm.layout_x, &self.farm.layout_y);

        let plane = FlowFieldGrid::new(
            orientation,
            coordinate,
            bounds,
            resolution,
            &self.config.flow_field.wind_directions,
            self.n_wind_speeds(),
            center,
        )?;

        let no_sources: Vec<Vec<WakeSource>>;

        let sources: &[Vec<WakeSource>] = if self.last_solve_was_no_wake {
            no_sources = vec![Vec::new(); self.n_wind_directions() * self.n_wind_speeds()];
            &no_sources
        } else {
            &self.wake_sources
        };

        let (u, v, w) = solver::sample_plane_velocities(
            &plane,
            sources,
            &self.config.flow_field,
            &self.wake_models,
        );

        Ok(CutPlane {
            orientation,
            coordinate,
            x1: plane.x1,
            x2: plane.x2,
            u,
            v,
            w,
        })
    }

    /// Replaces parts of the configuration and rebuilds the farm, the grid and the flow field.
    /// Wake model parameters persist. Yaw and tilt angles are reset to zero when the farm is
    /// rebuilt.
    pub fn reset(&mut self, overrides: ResetOverrides) -> Result<(), Error> {
        let mut config = self.config.clone();

        if let Some(layout_x) = overrides.layout_x {
            config.farm.layout_x = layout_x;
        }

        if let Some(layout_y) = overrides.layout_y {
            config.farm.layout_y = layout_y;
        }

        if let Some(turbine_type) = overrides.turbine_type {
            config.farm.turbine_type = turbine_type;
        }

        if let Some(wind_directions) = overrides.wind_directions {
            config.flow_field.wind_directions = wind_directions;
        }

        if let Some(wind_speeds) = overrides.wind_speeds {
            config.flow_field.wind_speeds = wind_speeds;
        }

        if let Some(wind_shear) = overrides.wind_shear {
            config.flow_field.wind_shear = wind_shear;
        }

        if let Some(wind_veer) = overrides.wind_veer {
            config.flow_field.wind_veer = wind_veer;
        }

        if let Some(turbulence_intensity) = overrides.turbulence_intensity {
            config.flow_field.turbulence_intensity = turbulence_intensity;
        }

        if let Some(air_density) = overrides.air_density {
            config.flow_field.air_density = air_density;
        }

        if let Some(reference_wind_height) = overrides.reference_wind_height {
            config.flow_field.reference_wind_height = reference_wind_height;
        }

        if let Some(turbine_grid_points) = overrides.turbine_grid_points {
            config.solver.turbine_grid_points = turbine_grid_points;
        }

        config.validate()?;

        let n_directions = config.flow_field.n_wind_directions();
        let n_speeds = config.flow_field.n_wind_speeds();

        let farm = Farm::from_config(&config.farm, n_directions, n_speeds)?;

        let grid = TurbineGrid::new(
            &farm,
            &config.flow_field.wind_directions,
            n_speeds,
            config.solver.turbine_grid_points,
        );

        let flow_field = FlowField::new(&grid, &config.flow_field)?;

        self.config = config;
        self.farm = farm;
        self.grid = grid;
        self.flow_field = flow_field;
        self.wake_sources = Vec::new();
        self.last_solve_was_no_wake = false;

        log::info!(
            "reset simulation '{}': {} turbines, {} wind directions, {} wind speeds",
            self.config.name,
            self.n_turbines(),
            n_directions,
            n_speeds
        );

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// Optional overrides applied by [Simulation::reset]. Fields left as `None` keep their current
/// values.
pub struct ResetOverrides {
    pub layout_x: Option<Vec<Float>>,
    pub layout_y: Option<Vec<Float>>,
    pub turbine_type: Option<Vec<TurbineTypeInput>>,
    pub wind_directions: Option<Vec<Float>>,
    pub wind_speeds: Option<Vec<Float>>,
    pub wind_shear: Option<Float>,
    pub wind_veer: Option<Float>,
    pub turbulence_intensity: Option<TurbulenceIntensityInput>,
    pub air_density: Option<Float>,
    pub reference_wind_height: Option<Float>,
    pub turbine_grid_points: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_cannot_be_read_before_solving() {
        let simulation = Simulation::from_config(InputConfig::default()).unwrap();

        assert!(matches!(
            simulation.rotor_averaged_velocities(),
            Err(Error::StateError(_))
        ));
        assert!(matches!(simulation.turbine_powers(), Err(Error::StateError(_))));
    }

    #[test]
    fn changing_yaw_angles_invalidates_results() {
        let mut simulation = Simulation::from_config(InputConfig::default()).unwrap();

        simulation.solve().unwrap();
        assert!(simulation.rotor_averaged_velocities().is_ok());

        simulation.set_yaw_angles(&[10.0, 0.0]).unwrap();

        assert!(matches!(
            simulation.rotor_averaged_velocities(),
            Err(Error::StateError(_))
        ));
    }

    #[test]
    fn result_tensors_have_the_expected_shape() {
        let mut config = InputConfig::default();
        config.flow_field.wind_directions = vec![270.0, 315.0];
        config.flow_field.wind_speeds = vec![8.0, 9.0, 10.0];

        let mut simulation = Simulation::from_config(config).unwrap();
        simulation.solve().unwrap();

        let velocities = simulation.rotor_averaged_velocities().unwrap();

        assert_eq!(velocities.shape(), [2, 3, 2]);

        for &value in &velocities.data {
            assert!(value.is_finite() && value >= 0.0);
        }
    }

    #[test]
    fn sample_plane_requires_a_solved_state() {
        let simulation = Simulation::from_config(InputConfig::default()).unwrap();

        let result = simulation.sample_plane(
            PlaneOrientation::Horizontal,
            90.0,
            [-200.0, 1200.0, -200.0, 200.0],
            [20, 10],
        );

        assert!(matches!(result, Err(Error::StateError(_))));
    }

    #[test]
    fn horizontal_plane_shows_the_wake_behind_a_turbine() {
        let mut simulation = Simulation::from_config(InputConfig::default()).unwrap();
        simulation.solve().unwrap();

        let plane = simulation
            .sample_plane(
                PlaneOrientation::Horizontal,
                90.0,
                [-630.0, 1890.0, -315.0, 315.0],
                [9, 5],
            )
            .unwrap();

        // Wind from the west: points upstream of the first turbine are undisturbed, points on
        // the centreline behind it are waked
        let upstream = plane.u[[0, 0, 0, 0, 2]];
        let downstream = plane.u[[0, 0, 0, 4, 2]];

        assert_eq!(upstream, 8.0);
        assert!(downstream < 8.0);
    }

    #[test]
    fn reset_with_new_wind_speeds_rebuilds_the_tensors() {
        let mut simulation = Simulation::from_config(InputConfig::default()).unwrap();

        simulation
            .reset(ResetOverrides {
                wind_speeds: Some(vec![6.0, 8.0, 10.0]),
                ..Default::default()
            })
            .unwrap();

        simulation.solve().unwrap();

        let velocities = simulation.rotor_averaged_velocities().unwrap();

        assert_eq!(velocities.shape(), [1, 3, 2]);
    }
}
