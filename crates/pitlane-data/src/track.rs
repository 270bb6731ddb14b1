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

//! The shared aggregate a track load populates.

use pitlane_core::asset::AssetHandle;
use pitlane_core::math::{Quaternion, Vec3};
use serde::Serialize;

use crate::model::Model;
use crate::physics::PhysicsStore;
use crate::road::{PatchRef, RoadPatch, RoadStrip};
use crate::scene::{NodeHandle, SceneNode};
use crate::surface::Surface;
use crate::texture::Texture;

/// A start grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StartPosition {
    /// World position of the car.
    pub position: Vec3,
    /// World orientation of the car.
    pub orientation: Quaternion,
}

/// Everything known about a track once it has been loaded.
///
/// The loader is the only writer until `loaded` is set. Consumers must not
/// read the aggregate before that.
#[derive(Debug, Default)]
pub struct TrackData {
    /// Surface table, index 0 is the fallback.
    pub surfaces: Vec<Surface>,
    /// Road strips.
    pub roads: Vec<RoadStrip>,
    /// Start grid, first entry is pole position.
    pub start_positions: Vec<StartPosition>,
    /// Lap timing sectors, entry 0 is the start/finish line.
    pub lap: Vec<PatchRef>,
    /// Scene root for static geometry.
    pub static_node: SceneNode,
    /// Scene root for dynamic bodies.
    pub dynamic_node: SceneNode,
    /// Scene root for racing line geometry.
    pub racingline_node: SceneNode,
    /// Texture applied to racing line drawables.
    pub racingline_texture: Option<AssetHandle<Texture>>,
    /// Every model the scene draws: resolved object models, combined
    /// meshes and racing line ribbons.
    pub models: Vec<AssetHandle<Model>>,
    /// Physics primitives owned by the track.
    pub physics: PhysicsStore,
    /// Nodes of `dynamic_node` tracking dynamic bodies, in creation order.
    pub body_nodes: Vec<NodeHandle>,
    /// The track is driven backwards.
    pub reverse: bool,
    /// Face culling enabled for track geometry.
    pub cull: bool,
    /// Skyboxes follow the camera height.
    pub vertical_tracking_skyboxes: bool,
    /// Set once loading finished successfully.
    pub loaded: bool,
}

impl TrackData {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a patch reference.
    pub fn patch(&self, at: PatchRef) -> Option<&RoadPatch> {
        self.roads.get(at.road)?.patches().get(at.patch)
    }

    /// Number of road patches over all strips.
    pub fn patch_count(&self) -> usize {
        self.roads.iter().map(RoadStrip::len).sum()
    }

    /// Discards everything, including committed physics objects.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
