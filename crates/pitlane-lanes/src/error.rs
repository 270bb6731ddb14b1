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

//! Error types of the loading lanes.

use pitlane_io::ConfigError;
use thiserror::Error;

/// Errors raised while reading an explicit collision shape description.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The `type` key names an unsupported primitive.
    #[error("Unknown collision shape type `{0}`")]
    UnknownType(String),

    /// A dimension is zero or negative.
    #[error("Collision shape `{shape}` has a non-positive {parameter}")]
    NonPositive {
        /// Shape type.
        shape: &'static str,
        /// Offending parameter.
        parameter: &'static str,
    },

    /// A key is missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while resolving start positions and lap sectors.
#[derive(Debug, Error)]
pub enum LapError {
    /// The track defines no start position.
    #[error("Track defines no start position")]
    NoStartPositions,

    /// A start position or orientation is malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A lap sequence does not hold a road and a patch index.
    #[error("Lap sequence {0} must hold a road and a patch index")]
    InvalidLapSequence(usize),

    /// A lap sequence names a road that does not exist.
    #[error("Lap sequence {sequence} references road {road}, track has {roads}")]
    RoadOutOfRange {
        /// Sequence number.
        sequence: usize,
        /// Road index.
        road: usize,
        /// Number of roads.
        roads: usize,
    },

    /// A lap sequence names a patch that does not exist.
    #[error("Lap sequence {sequence} references patch {patch}, road has {patches}")]
    PatchOutOfRange {
        /// Sequence number.
        sequence: usize,
        /// Patch index.
        patch: usize,
        /// Number of patches in the road.
        patches: usize,
    },
}

/// Errors raised by a racing line solver.
#[derive(Debug, Error)]
pub enum RacingLineError {
    /// The strip is too short to hold a racing line.
    #[error("Road strip has {0} patches, a racing line needs at least 3")]
    TooFewPatches(usize),

    /// The strip does not close on itself.
    #[error("Road strip is not a closed loop")]
    OpenStrip,
}
