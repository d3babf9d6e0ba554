// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Built-in turbine definitions.
//!
//! Configuration documents reference turbine types by name. Names are first resolved against the
//! built-in definitions in this module, so that the default configuration is self-contained and
//! does not depend on external files.

use wakemath::type_aliases::Float;

use crate::error::Error;

use super::Turbine;
use super::performance_table::PowerThrustTable;

/// Resolves a turbine type name to a built-in definition. The returned turbine is validated and
/// ready to use.
pub fn turbine_from_name(name: &str) -> Result<Turbine, Error> {
    let mut turbine = match name {
        "nrel_5MW" => nrel_5mw(),
        _ => {
            return Err(Error::ConfigError(format!(
                "unknown turbine type: '{}'. Built-in types are: nrel_5MW",
                name
            )))
        }
    };

    turbine.prepare()?;

    Ok(turbine)
}

/// The NREL 5 MW reference turbine.
pub fn nrel_5mw() -> Turbine {
    let wind_speed: Vec<Float> = vec![
        0.0, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0, 5.5, 6.0, 6.5, 7.0, 7.5, 8.0, 8.5, 9.0, 9.5,
        10.0, 10.5, 11.0, 11.5, 12.0, 12.5, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0, 19.0, 20.0, 21.0,
        22.0, 23.0, 24.0, 25.0, 25.01, 25.02, 50.0,
    ];

    let power: Vec<Float> = vec![
        0.0, 0.0, 0.0, 0.178085, 0.289075, 0.349022, 0.384728, 0.406059, 0.420228, 0.428823,
        0.433873, 0.436223, 0.436845, 0.436575, 0.436511, 0.436561, 0.436517, 0.435903, 0.434673,
        0.433323, 0.430466, 0.378869, 0.335199, 0.297991, 0.238397, 0.196103, 0.163159, 0.137378,
        0.116575, 0.099777, 0.085862, 0.074352, 0.064692, 0.056611, 0.049617, 0.043633, 0.0, 0.0,
        0.0,
    ];

    let thrust: Vec<Float> = vec![
        0.0, 0.0, 0.0, 0.99, 0.99, 0.97373036, 0.92826162, 0.89210543, 0.86100905, 0.835423,
        0.81237673, 0.79225789, 0.77584769, 0.7629228, 0.76156073, 0.76261984, 0.76169723,
        0.75232027, 0.74026851, 0.72987175, 0.70701647, 0.54054532, 0.45509459, 0.39343381,
        0.30656192, 0.24909993, 0.20626514, 0.17329465, 0.1475602, 0.12744441, 0.11111113,
        0.09800115, 0.08741765, 0.07841984, 0.07073475, 0.06402954, 0.0, 0.0, 0.0,
    ];

    Turbine {
        turbine_type: "nrel_5MW".to_string(),
        rotor_diameter: 126.0,
        hub_height: 90.0,
        tip_speed_ratio: 8.0,
        p_p: 1.88,
        p_t: 1.88,
        ref_density_cp_ct: 1.225,
        power_thrust_table: PowerThrustTable {
            wind_speed,
            power,
            thrust,
        },
        inner_power: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_turbine_is_resolved_by_name() {
        let turbine = turbine_from_name("nrel_5MW").unwrap();

        assert_eq!(turbine.rotor_diameter, 126.0);
        assert_eq!(turbine.hub_height, 90.0);
    }

    #[test]
    fn unknown_turbine_name_is_a_config_error() {
        assert!(turbine_from_name("unknown_10MW").is_err());
    }
}
