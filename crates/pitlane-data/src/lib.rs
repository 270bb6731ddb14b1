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

//! # Pitlane Data
//!
//! The in-memory representation of a loaded track: surfaces, road strips,
//! meshes and textures, the static/dynamic scene graph and the arenas that
//! own every physics primitive.

#![warn(missing_docs)]

pub mod model;
pub mod physics;
pub mod road;
pub mod scene;
pub mod surface;
pub mod texture;
pub mod track;

pub use model::{MeshMetrics, Model, VertexArray};
pub use physics::{PhysicsStore, RecordingWorld, RegisteredObject};
pub use road::{PatchRef, RoadPatch, RoadStrip};
pub use scene::{DrawLayer, DrawList, Drawable, NodeHandle, SceneNode};
pub use surface::{Surface, SurfaceType};
pub use texture::{Texture, TextureInfo};
pub use track::{StartPosition, TrackData};
