// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! The sequential wake superposition solver.
//!
//! Turbines are visited from upstream to downstream. For each turbine the rotor-averaged inflow
//! is read from the current state of the flow field, its thrust coefficient and axial induction
//! are computed, and its wake is superimposed on the sample points of all turbines strictly
//! downstream. The turbine loop is inherently sequential; the flow conditions along the two
//! leading tensor axes are independent and are executed per condition, in chunks, or in parallel
//! when the `parallel` feature is enabled. The result does not depend on how the conditions are
//! grouped.

use wakemath::type_aliases::Float;
use wakemath::arrays::Array5;
use wakemath::statistics::{cubic_mean, mean};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::farm::Farm;
use crate::flow_field::{FlowField, FlowFieldConfig, FlowFieldState};
use crate::grid::TurbineGrid;
use crate::grid::flow_field_grid::FlowFieldGrid;
use crate::wake::{WakeModels, WakeSource};
use crate::wake::transverse_velocity::{
    vortex_velocities_at_point,
    wake_added_yaw,
    yaw_added_turbulence_mixing,
    YAW_ADDED_RECOVERY_GAIN,
};

/// Absolute velocity deficit, in m/s, above which a sample point counts as waked when computing
/// the wake overlap fraction for the added turbulence.
const WAKE_OVERLAP_THRESHOLD: Float = 0.05;

/// Downstream extent, in rotor diameters, over which a wake adds turbulence.
const TURBULENCE_INFLUENCE_LENGTH_D: Float = 15.0;

/// Lateral extent, in rotor diameters, over which a wake adds turbulence.
const TURBULENCE_INFLUENCE_WIDTH_D: Float = 2.0;

#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    /// Skip the wake superposition so every rotor sees the undisturbed background flow
    pub no_wake: bool,
    /// Number of flow conditions processed per chunk. `None` processes all conditions in one
    /// chunk. Chunked execution produces identical results to whole-batch execution.
    pub condition_chunk_size: Option<usize>,
}

/// One flow condition's mutable slices plus the per-turbine state collected while solving it.
struct ConditionTask<'a> {
    direction_index: usize,
    speed_index: usize,
    u: &'a mut [Float],
    v: &'a mut [Float],
    w: &'a mut [Float],
    turbulence_intensity: &'a mut [Float],
    sources: Vec<WakeSource>,
}

// Shared read-only inputs for all condition tasks.
struct SolveContext<'a> {
    farm: &'a Farm,
    grid: &'a TurbineGrid,
    u_initial: &'a Array5<Float>,
    flow_config: &'a FlowFieldConfig,
    wake_models: &'a WakeModels,
    no_wake: bool,
}

/// Runs the wake solver over all flow conditions. The flow field must be initialized; on return
/// it is in the `Used` state. The per-turbine wake source states are returned in sorted order,
/// one vector per flow condition in row-major (direction, speed) order, so that planes can be
/// sampled later without solving again.
pub fn solve(
    farm: &Farm,
    grid: &TurbineGrid,
    flow_field: &mut FlowField,
    flow_config: &FlowFieldConfig,
    wake_models: &WakeModels,
    options: &SolveOptions,
) -> Vec<Vec<WakeSource>> {
    let n_speeds = flow_config.n_wind_speeds();

    flow_field.state = FlowFieldState::Solving;

    let FlowField {
        u_initial,
        u,
        v,
        w,
        turbulence_intensity_field,
        state,
    } = flow_field;

    let context = SolveContext {
        farm,
        grid,
        u_initial,
        flow_config,
        wake_models,
        no_wake: options.no_wake,
    };

    let u_slices = u.condition_slices_mut();
    let v_slices = v.condition_slices_mut();
    let w_slices = w.condition_slices_mut();
    let turbulence_slices = turbulence_intensity_field.condition_slices_mut();

    let mut tasks: Vec<ConditionTask> = u_slices
        .into_iter()
        .zip(v_slices)
        .zip(w_slices)
        .zip(turbulence_slices)
        .enumerate()
        .map(|(pair_index, (((u, v), w), turbulence_intensity))| ConditionTask {
            direction_index: pair_index / n_speeds,
            speed_index: pair_index % n_speeds,
            u,
            v,
            w,
            turbulence_intensity,
            sources: Vec::new(),
        })
        .collect();

    let chunk_size = options
        .condition_chunk_size
        .unwrap_or(tasks.len())
        .max(1);

    for chunk in tasks.chunks_mut(chunk_size) {
        #[cfg(feature = "parallel")]
        chunk
            .par_iter_mut()
            .for_each(|task| solve_condition(task, &context));

        #[cfg(not(feature = "parallel"))]
        for task in chunk.iter_mut() {
            solve_condition(task, &context);
        }
    }

    *state = FlowFieldState::Used;

    tasks.into_iter().map(|task| task.sources).collect()
}

/// Solves one flow condition: the sequential turbine loop.
fn solve_condition(task: &mut ConditionTask, context: &SolveContext) {
    let d = task.direction_index;
    let s = task.speed_index;

    let grid = context.grid;
    let wake_models = context.wake_models;

    let n_turbines = grid.n_turbines();
    let points_per_turbine = grid.points_per_turbine();

    let x = grid.x.condition_slice(d, s);
    let y = grid.y.condition_slice(d, s);
    let z = grid.z.condition_slice(d, s);
    let u_initial = context.u_initial.condition_slice(d, s);

    let order = grid.sorted_indices.row(d);

    let ambient_turbulence = context.flow_config.ambient_turbulence_intensity(d, s);
    let wind_veer = context.flow_config.wind_veer;
    let wind_shear = context.flow_config.wind_shear;
    let freestream_velocity = mean(u_initial);

    // Accumulated absolute velocity deficit at every sample point
    let mut wake_field = vec![0.0 as Float; n_turbines * points_per_turbine];

    task.sources.reserve(n_turbines);

    for i in 0..n_turbines {
        let layout_index = order[i];
        let turbine = &context.farm.turbines[layout_index];

        let yaw = context.farm.yaw_angles[[d, s, layout_index]];
        let tilt = context.farm.tilt_angles[[d, s, layout_index]];

        let block = i * points_per_turbine..(i + 1) * points_per_turbine;

        let rotor_averaged_velocity = cubic_mean(&task.u[block.clone()]);

        let thrust_coefficient = turbine.thrust_coefficient(rotor_averaged_velocity, yaw, tilt);
        let axial_induction = turbine.axial_induction(rotor_averaged_velocity, yaw, tilt);

        let rotor_averaged_turbulence = mean(&task.turbulence_intensity[block.clone()]);

        let rotor_center_x = mean(&x[block.clone()]);
        let rotor_center_y = mean(&y[block.clone()]);

        let mut effective_yaw = yaw;

        if wake_models.enable_secondary_steering {
            let mean_spanwise_velocity = mean(&task.v[block.clone()]);

            effective_yaw += wake_added_yaw(
                rotor_averaged_velocity,
                mean_spanwise_velocity,
                thrust_coefficient,
            );
        }

        let mut source = WakeSource {
            x: rotor_center_x,
            y: rotor_center_y,
            hub_height: turbine.hub_height,
            rotor_diameter: turbine.rotor_diameter,
            tip_speed_ratio: turbine.tip_speed_ratio,
            yaw: effective_yaw,
            tilt,
            thrust_coefficient,
            axial_induction,
            turbulence_intensity: rotor_averaged_turbulence,
            wake_induced_mixing: 0.0,
            rotor_averaged_velocity,
        };

        if wake_models.enable_yaw_added_recovery {
            // The turbine's own vortex system stirs its wake. Sample it on the rotor, convert
            // the transverse kinetic energy to turbulence and feed it back into the source state
            // so the wake models see the faster recovery.
            let mut v_rotor = Vec::with_capacity(points_per_turbine);
            let mut w_rotor = Vec::with_capacity(points_per_turbine);

            for point in block.clone() {
                let dudz = velocity_gradient(wind_shear, u_initial[point], z[point]);

                let (vortex_v, vortex_w) = vortex_velocities_at_point(
                    x[point],
                    y[point],
                    z[point],
                    &source,
                    freestream_velocity,
                    dudz,
                );

                v_rotor.push(task.v[point] + vortex_v);
                w_rotor.push(task.w[point] + vortex_w);
            }

            let mixing = yaw_added_turbulence_mixing(
                &task.u[block.clone()],
                &v_rotor,
                &w_rotor,
                rotor_averaged_turbulence,
            );

            source.turbulence_intensity =
                rotor_averaged_turbulence + YAW_ADDED_RECOVERY_GAIN * mixing;

            for point in block.clone() {
                task.turbulence_intensity[point] =
                    task.turbulence_intensity[point].max(source.turbulence_intensity);
            }
        }

        source.wake_induced_mixing = (source.turbulence_intensity.powi(2)
            - ambient_turbulence.powi(2))
        .max(0.0)
        .sqrt();

        if !context.no_wake {
            apply_wake(
                task,
                &source,
                &mut wake_field,
                x,
                y,
                z,
                u_initial,
                ambient_turbulence,
                wind_veer,
                wind_shear,
                freestream_velocity,
                i,
                n_turbines,
                points_per_turbine,
                wake_models,
            );
        }

        task.sources.push(source);
    }
}

/// Superimposes the wake of one turbine on the sample points of all turbines strictly downstream
/// of it in the sorted frame.
fn apply_wake(
    task: &mut ConditionTask,
    source: &WakeSource,
    wake_field: &mut [Float],
    x: &[Float],
    y: &[Float],
    z: &[Float],
    u_initial: &[Float],
    ambient_turbulence: Float,
    wind_veer: Float,
    wind_shear: Float,
    freestream_velocity: Float,
    source_position: usize,
    n_turbines: usize,
    points_per_turbine: usize,
    wake_models: &WakeModels,
) {
    let rotor_diameter = source.rotor_diameter;

    for j in source_position + 1..n_turbines {
        let block = j * points_per_turbine..(j + 1) * points_per_turbine;

        // Velocity deficit, combined with the deficits already present
        let mut waked_points = 0;

        for point in block.clone() {
            let (deflection_y, deflection_z) =
                wake_models
                    .deflection_model
                    .deflection_at_point(x[point], source, wind_veer);

            let deficit_fraction = wake_models.velocity_model.deficit_at_point(
                x[point],
                y[point],
                z[point],
                deflection_y,
                deflection_z,
                source,
                wind_veer,
            );

            let deficit = deficit_fraction * u_initial[point];

            if deficit > WAKE_OVERLAP_THRESHOLD {
                waked_points += 1;
            }

            wake_field[point] = wake_models
                .combination_model
                .combine(wake_field[point], deficit);

            task.u[point] = u_initial[point] - wake_field[point];
        }

        let area_overlap = waked_points as Float / points_per_turbine as Float;

        // Wake-added turbulence, weighted by the overlap and gated to the region of influence.
        // The update is an elementwise maximum, so the turbulence field never decreases.
        for point in block.clone() {
            let delta_x = x[point] - source.x;

            let in_influence_region = delta_x > 0.0
                && delta_x <= TURBULENCE_INFLUENCE_LENGTH_D * rotor_diameter
                && (source.y - y[point]).abs() < TURBULENCE_INFLUENCE_WIDTH_D * rotor_diameter;

            if !in_influence_region {
                continue;
            }

            let added = area_overlap
                * wake_models.turbulence_model.added_turbulence_intensity(
                    delta_x,
                    ambient_turbulence,
                    source,
                );

            let combined = (ambient_turbulence.powi(2) + added.powi(2)).sqrt();

            task.turbulence_intensity[point] = task.turbulence_intensity[point].max(combined);
        }

        // Transverse velocities accumulate linearly
        if wake_models.enable_transverse_velocities {
            for point in block.clone() {
                let dudz = velocity_gradient(wind_shear, u_initial[point], z[point]);

                let (vortex_v, vortex_w) = vortex_velocities_at_point(
                    x[point],
                    y[point],
                    z[point],
                    source,
                    freestream_velocity,
                    dudz,
                );

                task.v[point] += vortex_v;
                task.w[point] += vortex_w;
            }
        }
    }
}

/// Vertical gradient of the power law shear profile.
fn velocity_gradient(wind_shear: Float, velocity: Float, height: Float) -> Float {
    if height > 1e-6 {
        wind_shear * velocity / height
    } else {
        0.0
    }
}

/// Evaluates the solved wake field on a sampling plane. The per-turbine source states must come
/// from a completed solve on the turbine grid; the plane points are passive and do not influence
/// the wakes.
pub fn sample_plane_velocities(
    plane: &FlowFieldGrid,
    sources_by_condition: &[Vec<WakeSource>],
    flow_config: &FlowFieldConfig,
    wake_models: &WakeModels,
) -> (Array5<Float>, Array5<Float>, Array5<Float>) {
    let shape = plane.z.shape();

    let mut u = Array5::new_default(shape);
    let mut v = Array5::new_default(shape);
    let mut w = Array5::new_default(shape);

    let n_directions = shape[0];
    let n_speeds = shape[1];

    for d in 0..n_directions {
        for s in 0..n_speeds {
            let wind_speed = flow_config.wind_speeds[s];
            let wind_veer = flow_config.wind_veer;
            let wind_shear = flow_config.wind_shear;

            let x = plane.x.condition_slice(d, s);
            let y = plane.y.condition_slice(d, s);
            let z = plane.z.condition_slice(d, s);

            let sources = &sources_by_condition[d * n_speeds + s];

            let u_slice = u.condition_slice_mut(d, s);

            // Undisturbed background profile on the plane
            let u_initial: Vec<Float> = z
                .iter()
                .map(|&height| {
                    wind_speed
                        * (height.max(0.0) / flow_config.reference_wind_height)
                            .powf(wind_shear)
                })
                .collect();

            let mut wake_field = vec![0.0 as Float; u_initial.len()];

            for source in sources {
                for point in 0..u_initial.len() {
                    let (deflection_y, deflection_z) = wake_models
                        .deflection_model
                        .deflection_at_point(x[point], source, wind_veer);

                    let deficit_fraction = wake_models.velocity_model.deficit_at_point(
                        x[point],
                        y[point],
                        z[point],
                        deflection_y,
                        deflection_z,
                        source,
                        wind_veer,
                    );

                    wake_field[point] = wake_models
                        .combination_model
                        .combine(wake_field[point], deficit_fraction * u_initial[point]);
                }
            }

            for point in 0..u_initial.len() {
                u_slice[point] = u_initial[point] - wake_field[point];
            }

            if wake_models.enable_transverse_velocities {
                let freestream_velocity = mean(&u_initial);

                let v_slice = v.condition_slice_mut(d, s);
                let w_slice = w.condition_slice_mut(d, s);

                for source in sources {
                    for point in 0..u_initial.len() {
                        let dudz = velocity_gradient(wind_shear, u_initial[point], z[point]);

                        let (vortex_v, vortex_w) = vortex_velocities_at_point(
                            x[point],
                            y[point],
                            z[point],
                            source,
                            freestream_velocity,
                            dudz,
                        );

                        v_slice[point] += vortex_v;
                        w_slice[point] += vortex_w;
                    }
                }
            }
        }
    }

    (u, v, w)
}

#[cfg(test)]
mod tests;
