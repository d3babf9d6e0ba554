// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Regular planar grids for sampling the flow field, primarily for visualization.

use serde::{Deserialize, Serialize};

use wakemath::type_aliases::Float;
use wakemath::arrays::Array5;

use crate::error::Error;

use super::{rotate_position, wind_deviation_from_west};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Orientation of a sampling plane, named by the direction the plane extends in.
pub enum PlaneOrientation {
    /// Horizontal plane at a fixed height
    Horizontal,
    /// Vertical plane at a fixed x position, spanning y and z
    CrossStream,
    /// Vertical plane at a fixed y position, spanning x and z
    Streamwise,
}

#[derive(Debug, Clone)]
/// Sample points of a planar cut through the flow field. The points are stored as a single
/// pseudo-rotor per flow condition, shape `[D, S, 1, n1, n2]`, so that the tensors partition into
/// per-condition slices the same way the turbine grid tensors do. The horizontal coordinates are
/// rotated into the wind aligned frame of each wind direction; the plane itself is specified in
/// the layout frame.
pub struct FlowFieldGrid {
    pub x: Array5<Float>,
    pub y: Array5<Float>,
    pub z: Array5<Float>,
    pub orientation: PlaneOrientation,
    pub coordinate: Float,
    /// Coordinates along the first plane axis, in the layout frame
    pub x1: Vec<Float>,
    /// Coordinates along the second plane axis, in the layout frame
    pub x2: Vec<Float>,
}

impl FlowFieldGrid {
    /// Builds a sampling plane.
    ///
    /// # Arguments
    /// * `orientation` - which coordinate is held fixed
    /// * `coordinate` - the value of the fixed coordinate
    /// * `bounds` - `[min1, max1, min2, max2]` for the two in-plane axes, layout frame
    /// * `resolution` - number of points along each in-plane axis
    /// * `wind_directions` - one rotated copy of the plane is created per direction
    /// * `rotation_center` - centre of the farm bounding box
    pub fn new(
        orientation: PlaneOrientation,
        coordinate: Float,
        bounds: [Float; 4],
        resolution: [usize; 2],
        wind_directions: &[Float],
        n_wind_speeds: usize,
        rotation_center: (Float, Float),
    ) -> Result<Self, Error> {
        if resolution[0] < 2 || resolution[1] < 2 {
            return Err(Error::ConfigError(
                "plane resolution must be at least 2 points per axis".to_string(),
            ));
        }

        if !(bounds[1] > bounds[0]) || !(bounds[3] > bounds[2]) {
            return Err(Error::ConfigError(
                "plane bounds must span a non-empty range on both axes".to_string(),
            ));
        }

        let x1 = linspace(bounds[0], bounds[1], resolution[0]);
        let x2 = linspace(bounds[2], bounds[3], resolution[1]);

        let n_directions = wind_directions.len();
        let shape = [n_directions, n_wind_speeds, 1, resolution[0], resolution[1]];

        let mut x = Array5::new_default(shape);
        let mut y = Array5::new_default(shape);
        let mut z = Array5::new_default(shape);

        for d in 0..n_directions {
            let angle = wind_deviation_from_west(wind_directions[d]);

            for j in 0..resolution[0] {
                for k in 0..resolution[1] {
                    let (layout_x, layout_y, height) = match orientation {
                        PlaneOrientation::Horizontal => (x1[j], x2[k], coordinate),
                        PlaneOrientation::CrossStream => (coordinate, x1[j], x2[k]),
                        PlaneOrientation::Streamwise => (x1[j], coordinate, x2[k]),
                    };

                    let (rotated_x, rotated_y) =
                        rotate_position(layout_x, layout_y, rotation_center, angle);

                    for s in 0..n_wind_speeds {
                        x[[d, s, 0, j, k]] = rotated_x;
                        y[[d, s, 0, j, k]] = rotated_y;
                        z[[d, s, 0, j, k]] = height;
                    }
                }
            }
        }

        Ok(Self {
            x,
            y,
            z,
            orientation,
            coordinate,
            x1,
            x2,
        })
    }
}

#[derive(Debug, Clone)]
/// Velocities sampled on a planar cut through the solved flow field. The tensors have shape
/// `[D, S, 1, n1, n2]`; the axis coordinates are in the layout frame. The lateral and vertical
/// components are zero unless the transverse velocity model is enabled.
pub struct CutPlane {
    pub orientation: PlaneOrientation,
    pub coordinate: Float,
    pub x1: Vec<Float>,
    pub x2: Vec<Float>,
    pub u: Array5<Float>,
    pub v: Array5<Float>,
    pub w: Array5<Float>,
}

fn linspace(start: Float, end: Float, n: usize) -> Vec<Float> {
    (0..n)
        .map(|i| start + (end - start) * (i as Float) / ((n - 1) as Float))
        .collect()
}
