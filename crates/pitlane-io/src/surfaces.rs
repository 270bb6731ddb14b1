// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reader for `surfaces.txt`.

use std::path::Path;

use pitlane_core::Diagnostics;
use pitlane_data::{Surface, SurfaceType};

use crate::config::{ConfigNode, ConfigTree};
use crate::error::ConfigError;

/// Reads the surface table of a track.
///
/// Every top-level section whose name starts with `surface` becomes one
/// entry, in document order. A missing file is not an error: the result is
/// empty and the caller falls back to built-in surfaces.
pub fn load_surfaces(path: &Path, diagnostics: &mut Diagnostics) -> Result<Vec<Surface>, ConfigError> {
    if !path.is_file() {
        diagnostics.info(format!(
            "Can't find surfaces configfile: {}",
            path.display()
        ));
        return Ok(Vec::new());
    }

    let tree = ConfigTree::load(path)?;
    let surfaces = parse_surfaces(&tree, &path.display().to_string(), diagnostics);
    diagnostics.info(format!(
        "Loaded surfaces file, {} surfaces.",
        surfaces.len()
    ));
    Ok(surfaces)
}

/// Builds surfaces from an already parsed document.
pub fn parse_surfaces(tree: &ConfigTree, source: &str, diagnostics: &mut Diagnostics) -> Vec<Surface> {
    tree.root()
        .children()
        .iter()
        .filter(|section| section.name().starts_with("surface"))
        .map(|section| parse_surface(section, source, diagnostics))
        .collect()
}

fn parse_surface(section: &ConfigNode, source: &str, diagnostics: &mut Diagnostics) -> Surface {
    let type_name: String = section.get("Type").unwrap_or_default();
    let mut field = |key: &str| -> f32 {
        section.get(key).unwrap_or_else(|| {
            diagnostics.warn(format!(
                "Missing or invalid {key} in {} of {source}",
                section.name()
            ));
            0.0
        })
    };

    let mut bump_wave_length = field("BumpWaveLength");
    let bump_amplitude = field("BumpAmplitude");
    let friction_non_tread = field("FrictionNonTread");
    let friction_tread = field("FrictionTread");
    let roll_resistance_coefficient = field("RollResistanceCoefficient");
    let rolling_drag = field("RollingDrag");

    // Bump computations divide by the wave length.
    if bump_wave_length <= 0.0 {
        diagnostics.warn(format!(
            "Surface Type = {type_name} has BumpWaveLength = {bump_wave_length} in {source}"
        ));
        bump_wave_length = 1.0;
    }

    Surface {
        surface_type: SurfaceType::from_name(&type_name),
        bump_wave_length,
        bump_amplitude,
        friction_non_tread,
        friction_tread,
        roll_resistance_coefficient,
        rolling_drag,
    }
}
