// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! The Jensen top-hat wake model.
//!
//! The wake is a cone that expands linearly with the distance behind the rotor. Inside the cone
//! the deficit is uniform at each downstream distance and decays with the square of the expanded
//! wake diameter; outside it is zero.

use serde::{Deserialize, Serialize};

use wakemath::type_aliases::Float;

use super::super::WakeSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JensenDeficit {
    /// Wake expansion rate
    #[serde(default = "JensenDeficit::default_we")]
    pub we: Float,
}

impl JensenDeficit {
    pub fn default_we() -> Float {0.05}

    pub fn deficit_at_point(
        &self,
        x: Float,
        y: Float,
        z: Float,
        deflection_y: Float,
        source: &WakeSource,
    ) -> Float {
        let delta_x = x - source.x;

        if delta_x <= 0.0 {
            return 0.0;
        }

        let rotor_diameter = source.rotor_diameter;
        let boundary = self.we * delta_x + 0.5 * rotor_diameter;

        let lateral_offset = y - source.y - deflection_y;
        let vertical_offset = z - source.hub_height;

        if lateral_offset.abs() > boundary || vertical_offset.abs() > boundary {
            return 0.0;
        }

        let expansion_factor =
            (rotor_diameter / (rotor_diameter + 2.0 * self.we * delta_x)).powi(2);

        2.0 * source.axial_induction * expansion_factor
    }
}

impl Default for JensenDeficit {
    fn default() -> Self {
        Self {
            we: Self::default_we(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn test_source() -> WakeSource {
        WakeSource {
            x: 0.0,
            y: 0.0,
            hub_height: 90.0,
            rotor_diameter: 126.0,
            tip_speed_ratio: 8.0,
            yaw: 0.0,
            tilt: 0.0,
            thrust_coefficient: 0.76,
            axial_induction: 0.25,
            turbulence_intensity: 0.06,
            wake_induced_mixing: 0.0,
            rotor_averaged_velocity: 8.0,
        }
    }

    #[test]
    fn centreline_deficit_five_diameters_downstream() {
        let model = JensenDeficit::default();
        let source = test_source();

        // D / (D + 2 we dx) = 126 / 189 = 2/3, squared 4/9
        let deficit = model.deficit_at_point(630.0, 0.0, 90.0, 0.0, &source);

        assert_relative_eq!(deficit, 2.0 * 0.25 * 4.0 / 9.0, max_relative = 1e-12);
    }

    #[test]
    fn no_deficit_upstream_or_at_the_source() {
        let model = JensenDeficit::default();
        let source = test_source();

        assert_eq!(model.deficit_at_point(-100.0, 0.0, 90.0, 0.0, &source), 0.0);
        assert_eq!(model.deficit_at_point(0.0, 0.0, 90.0, 0.0, &source), 0.0);
    }

    #[test]
    fn no_deficit_outside_the_expanding_boundary() {
        let model = JensenDeficit::default();
        let source = test_source();

        // Boundary at 630 m downstream: 0.05 * 630 + 63 = 94.5 m
        assert!(model.deficit_at_point(630.0, 94.0, 90.0, 0.0, &source) > 0.0);
        assert_eq!(model.deficit_at_point(630.0, 95.0, 90.0, 0.0, &source), 0.0);
        assert_eq!(model.deficit_at_point(630.0, 0.0, 90.0 + 95.0, 0.0, &source), 0.0);
    }

    #[test]
    fn deflection_shifts_the_wake_laterally() {
        let model = JensenDeficit::default();
        let source = test_source();

        let centred = model.deficit_at_point(630.0, 0.0, 90.0, 0.0, &source);
        let shifted = model.deficit_at_point(630.0, -200.0, 90.0, -10.0, &source);

        assert_eq!(centred, model.deficit_at_point(630.0, -10.0, 90.0, -10.0, &source));
        assert_eq!(shifted, 0.0);
    }
}
