// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)

//! Combination of a new wake deficit with the deficits already present in the flow.

use serde::{Deserialize, Serialize};

use wakemath::type_aliases::Float;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// Sum of squares, freestream scaled: deficits expressed in absolute velocity units are combined
/// in root sum of squares. Commutative, so the order in which wakes are added does not matter.
pub struct SosfsCombination {}

impl SosfsCombination {
    pub fn combine(&self, existing_deficit: Float, new_deficit: Float) -> Float {
        (existing_deficit.powi(2) + new_deficit.powi(2)).sqrt()
    }
}

#[derive(Debug, Clone)]
pub enum CombinationModel {
    Sosfs(SosfsCombination),
}

impl CombinationModel {
    pub fn combine(&self, existing_deficit: Float, new_deficit: Float) -> Float {
        match self {
            CombinationModel::Sosfs(model) => model.combine(existing_deficit, new_deficit),
        }
    }
}
