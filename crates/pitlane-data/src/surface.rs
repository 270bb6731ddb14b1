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

//! Physical surface definitions referenced by collision shapes.

use serde::{Deserialize, Serialize};

/// The material class of a track surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurfaceType {
    /// Unknown or unspecified material.
    #[default]
    None,
    /// Paved road.
    Asphalt,
    /// Grass verge.
    Grass,
    /// Gravel trap.
    Gravel,
    /// Concrete run-off.
    Concrete,
    /// Sand.
    Sand,
    /// Cobblestones.
    Cobbles,
}

impl SurfaceType {
    /// Maps an authored type name to a surface type, `None` if unknown.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "asphalt" => SurfaceType::Asphalt,
            "grass" => SurfaceType::Grass,
            "gravel" => SurfaceType::Gravel,
            "concrete" => SurfaceType::Concrete,
            "sand" => SurfaceType::Sand,
            "cobbles" => SurfaceType::Cobbles,
            _ => SurfaceType::None,
        }
    }
}

/// A physical surface: friction, bump and drag parameters.
///
/// Immutable once built. The surface table is indexed by position and index
/// 0 is the fallback for out-of-range references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Material class.
    pub surface_type: SurfaceType,
    /// Wave length of the bump profile, always `> 0`.
    pub bump_wave_length: f32,
    /// Amplitude of the bump profile.
    pub bump_amplitude: f32,
    /// Friction for non-tyre contact.
    pub friction_non_tread: f32,
    /// Friction for tyre contact.
    pub friction_tread: f32,
    /// Rolling resistance coefficient.
    pub roll_resistance_coefficient: f32,
    /// Rolling drag.
    pub rolling_drag: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            surface_type: SurfaceType::None,
            bump_wave_length: 1.0,
            bump_amplitude: 0.0,
            friction_non_tread: 1.0,
            friction_tread: 1.0,
            roll_resistance_coefficient: 1.0,
            rolling_drag: 0.0,
        }
    }
}
