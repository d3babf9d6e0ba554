// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Construction of the sample point grids used by the wake solver.
//!
//! For each wind direction, the farm layout is rotated about the centre of its bounding box so
//! that the incoming wind is aligned with the positive x axis. Each turbine then receives a
//! square grid of sample points on its rotor disc, and the turbine axis of all grid tensors is
//! reordered from upstream to downstream.

pub mod flow_field_grid;

use wakemath::type_aliases::Float;
use wakemath::arrays::{Array2, Array5};
use wakemath::sorting::{argsort, inverse_permutation};
use wakemath::statistics::{max, min};
use wakemath::trigonometry::{cosd, sind};

use crate::farm::Farm;

/// Ratio between the extent of the sample grid and the rotor radius. The grid covers the inner
/// half of the rotor, which is where the bulk of the power is produced.
const GRID_RADIUS_RATIO: Float = 0.5;

/// Angle, in degrees, that the farm must be rotated by so that the given wind direction is
/// aligned with the positive x axis.
pub fn wind_deviation_from_west(wind_direction: Float) -> Float {
    let offset = (wind_direction - 270.0).rem_euclid(360.0);

    (-(offset + 360.0)).rem_euclid(360.0)
}

/// Centre of the bounding box of the turbine positions, used as the centre of rotation for all
/// wind directions.
pub fn rotation_center(layout_x: &[Float], layout_y: &[Float]) -> (Float, Float) {
    let x_center = 0.5 * (min(layout_x) + max(layout_x));
    let y_center = 0.5 * (min(layout_y) + max(layout_y));

    (x_center, y_center)
}

/// Rotates a horizontal position about the given centre.
pub fn rotate_position(
    x: Float,
    y: Float,
    center: (Float, Float),
    angle_deg: Float,
) -> (Float, Float) {
    let x_offset = x - center.0;
    let y_offset = y - center.1;

    let x_rotated = x_offset * cosd(angle_deg) - y_offset * sind(angle_deg) + center.0;
    let y_rotated = x_offset * sind(angle_deg) + y_offset * cosd(angle_deg) + center.1;

    (x_rotated, y_rotated)
}

/// Evenly spaced offsets across the sampled part of the rotor disc.
fn disc_offsets(rotor_diameter: Float, grid_resolution: usize) -> Vec<Float> {
    let disc_radius = GRID_RADIUS_RATIO * 0.5 * rotor_diameter;

    if grid_resolution == 1 {
        return vec![0.0];
    }

    (0..grid_resolution)
        .map(|k| {
            -disc_radius
                + 2.0 * disc_radius * (k as Float) / ((grid_resolution - 1) as Float)
        })
        .collect()
}

#[derive(Debug, Clone)]
/// Sample points on every rotor disc, rotated into the wind aligned frame of each wind direction
/// and sorted from upstream to downstream along the turbine axis.
pub struct TurbineGrid {
    /// Streamwise position of every sample point, shape `[D, S, T, G, G]`, sorted turbine order
    pub x: Array5<Float>,
    /// Lateral position, varying along the fourth axis of the tensor
    pub y: Array5<Float>,
    /// Height above ground, varying along the fifth axis of the tensor
    pub z: Array5<Float>,
    /// `sorted_indices[[d, i]]` is the layout index of the i-th most upstream turbine in wind
    /// direction d
    pub sorted_indices: Array2<usize>,
    /// Inverse permutation of `sorted_indices` per wind direction
    pub unsorted_indices: Array2<usize>,
    pub grid_resolution: usize,
}

impl TurbineGrid {
    pub fn new(
        farm: &Farm,
        wind_directions: &[Float],
        n_wind_speeds: usize,
        grid_resolution: usize,
    ) -> Self {
        let n_directions = wind_directions.len();
        let n_turbines = farm.n_turbines();

        let center = rotation_center(&farm.layout_x, &farm.layout_y);

        let shape = [
            n_directions,
            n_wind_speeds,
            n_turbines,
            grid_resolution,
            grid_resolution,
        ];

        let mut x = Array5::new_default(shape);
        let mut y = Array5::new_default(shape);
        let mut z = Array5::new_default(shape);

        let mut sorted_indices = Array2::new_default([n_directions, n_turbines]);
        let mut unsorted_indices = Array2::new_default([n_directions, n_turbines]);

        for d in 0..n_directions {
            let angle = wind_deviation_from_west(wind_directions[d]);

            let rotated: Vec<(Float, Float)> = farm
                .layout_x
                .iter()
                .zip(farm.layout_y.iter())
                .map(|(&turbine_x, &turbine_y)| {
                    rotate_position(turbine_x, turbine_y, center, angle)
                })
                .collect();

            let x_rotated: Vec<Float> = rotated.iter().map(|position| position.0).collect();

            let order = argsort(&x_rotated);
            let inverse = inverse_permutation(&order);

            sorted_indices.row_mut(d).copy_from_slice(&order);
            unsorted_indices.row_mut(d).copy_from_slice(&inverse);

            for (i, &layout_index) in order.iter().enumerate() {
                let turbine = &farm.turbines[layout_index];
                let offsets = disc_offsets(turbine.rotor_diameter, grid_resolution);

                let (turbine_x, turbine_y) = rotated[layout_index];
                let hub_height = turbine.hub_height;

                for s in 0..n_wind_speeds {
                    for j in 0..grid_resolution {
                        for k in 0..grid_resolution {
                            x[[d, s, i, j, k]] = turbine_x;
                            y[[d, s, i, j, k]] = turbine_y + offsets[j];
                            z[[d, s, i, j, k]] = hub_height + offsets[k];
                        }
                    }
                }
            }
        }

        Self {
            x,
            y,
            z,
            sorted_indices,
            unsorted_indices,
            grid_resolution,
        }
    }

    pub fn n_turbines(&self) -> usize {
        self.x.shape()[2]
    }

    /// Number of sample points per rotor disc.
    pub fn points_per_turbine(&self) -> usize {
        self.grid_resolution * self.grid_resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farm::FarmConfig;

    use approx::assert_relative_eq;

    fn tandem_farm() -> Farm {
        let config = FarmConfig {
            layout_x: vec![630.0, 0.0, 1260.0],
            layout_y: vec![0.0, 0.0, 0.0],
            ..Default::default()
        };

        Farm::from_config(&config, 1, 1).unwrap()
    }

    #[test]
    fn west_wind_sorts_by_increasing_x() {
        let farm = tandem_farm();
        let grid = TurbineGrid::new(&farm, &[270.0], 1, 3);

        assert_eq!(grid.sorted_indices.row(0), &[1, 0, 2]);

        for i in 1..grid.n_turbines() {
            assert!(grid.x[[0, 0, i, 0, 0]] > grid.x[[0, 0, i - 1, 0, 0]]);
        }
    }

    #[test]
    fn east_wind_reverses_the_order() {
        let farm = tandem_farm();
        let grid = TurbineGrid::new(&farm, &[90.0], 1, 3);

        assert_eq!(grid.sorted_indices.row(0), &[2, 0, 1]);
    }

    #[test]
    fn ties_keep_the_layout_order() {
        let config = FarmConfig {
            layout_x: vec![0.0, 0.0, 0.0],
            layout_y: vec![0.0, 378.0, 756.0],
            ..Default::default()
        };
        let farm = Farm::from_config(&config, 1, 1).unwrap();

        let grid = TurbineGrid::new(&farm, &[270.0], 1, 2);

        assert_eq!(grid.sorted_indices.row(0), &[0, 1, 2]);
    }

    #[test]
    fn unsorted_indices_invert_sorted_indices() {
        let farm = tandem_farm();
        let grid = TurbineGrid::new(&farm, &[225.0], 1, 2);

        for i in 0..grid.n_turbines() {
            let layout_index = grid.sorted_indices[[0, i]];

            assert_eq!(grid.unsorted_indices[[0, layout_index]], i);
        }
    }

    #[test]
    fn rotor_grid_covers_half_the_rotor_radius() {
        let farm = tandem_farm();
        let grid = TurbineGrid::new(&farm, &[270.0], 1, 5);

        let hub_height = farm.turbines[0].hub_height;
        let expected_extent = 0.25 * farm.turbines[0].rotor_diameter;

        assert_relative_eq!(grid.z[[0, 0, 0, 0, 0]], hub_height - expected_extent);
        assert_relative_eq!(grid.z[[0, 0, 0, 0, 4]], hub_height + expected_extent);
        assert_relative_eq!(grid.z[[0, 0, 0, 0, 2]], hub_height);
    }

    #[test]
    fn rotation_preserves_pairwise_distances() {
        let farm = tandem_farm();
        let grid = TurbineGrid::new(&farm, &[313.0], 1, 2);

        let dx = grid.x[[0, 0, 1, 0, 0]] - grid.x[[0, 0, 0, 0, 0]];
        let dy = grid.y[[0, 0, 1, 0, 0]] - grid.y[[0, 0, 0, 0, 0]];

        assert_relative_eq!((dx * dx + dy * dy).sqrt(), 630.0, max_relative = 1e-10);
    }
}
