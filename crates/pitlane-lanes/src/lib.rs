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

//! # Pitlane Lanes
//!
//! The work units a track load is made of. Each lane turns one kind of
//! input (an object section, a body, a road strip, the track metadata) into
//! scene and physics state inside a [`pitlane_data::TrackData`].

#![warn(missing_docs)]

pub mod body_lane;
pub mod collision_lane;
pub mod error;
pub mod lap_lane;
pub mod racing_line_lane;

pub use body_lane::{resolve_model, Body, BodyBuilder, BodyContext, BodyOptions};
pub use collision_lane::{CollisionIntegrator, Placement};
pub use error::{LapError, RacingLineError, ShapeError};
pub use lap_lane::{load_lap_sections, load_start_positions};
pub use racing_line_lane::{CenterlineSolver, RacingLineBuilder, RacingLineSolver};
