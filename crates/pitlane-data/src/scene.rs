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

//! A minimal scene graph: nodes own a transform, a set of draw lists and
//! child nodes addressed by [`NodeHandle`].

use pitlane_core::asset::AssetHandle;
use pitlane_core::math::Vec3;
use pitlane_core::physics::Isometry;
use serde::{Deserialize, Serialize};

use crate::model::Model;
use crate::texture::Texture;

/// Stable handle to a child of a [`SceneNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeHandle(pub u32);

/// Selects one of the draw lists of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawLayer {
    /// Opaque geometry.
    NormalNoBlend,
    /// Alpha blended geometry.
    NormalBlend,
    /// Opaque geometry rendered without lighting.
    NormalNoBlendNoLighting,
    /// Alpha blended sky geometry.
    SkyboxBlend,
    /// Opaque sky geometry.
    SkyboxNoBlend,
}

impl DrawLayer {
    /// Every layer, in render order.
    pub const ALL: [DrawLayer; 5] = [
        DrawLayer::SkyboxNoBlend,
        DrawLayer::SkyboxBlend,
        DrawLayer::NormalNoBlend,
        DrawLayer::NormalNoBlendNoLighting,
        DrawLayer::NormalBlend,
    ];

    /// Picks the draw list for a set of material flags.
    ///
    /// Skyboxes always go to a sky list; blending takes precedence over the
    /// lighting flag otherwise.
    pub fn select(blend: bool, no_lighting: bool, skybox: bool) -> Self {
        match (skybox, blend) {
            (true, true) => DrawLayer::SkyboxBlend,
            (true, false) => DrawLayer::SkyboxNoBlend,
            (false, true) => DrawLayer::NormalBlend,
            (false, false) if no_lighting => DrawLayer::NormalNoBlendNoLighting,
            (false, false) => DrawLayer::NormalNoBlend,
        }
    }
}

/// A renderable instance of a model.
#[derive(Debug, Clone)]
pub struct Drawable {
    /// The mesh to draw.
    pub model: AssetHandle<Model>,
    /// Diffuse texture.
    pub diffuse: Option<AssetHandle<Texture>>,
    /// Auxiliary texture.
    pub misc1: Option<AssetHandle<Texture>>,
    /// Normal map.
    pub misc2: Option<AssetHandle<Texture>>,
    /// Bounding sphere center in node space.
    pub center: Vec3,
    /// Bounding sphere radius.
    pub radius: f32,
    /// Draw with polygon offset.
    pub decal: bool,
    /// Back-face culling.
    pub cull: bool,
    /// Follow the camera height (skyboxes).
    pub vertical_track: bool,
}

impl Drawable {
    /// A drawable with bounds taken from the model metrics and default flags.
    pub fn new(model: AssetHandle<Model>) -> Self {
        let center = model.center();
        let radius = model.radius();
        Self {
            model,
            diffuse: None,
            misc1: None,
            misc2: None,
            center,
            radius,
            decal: false,
            cull: true,
            vertical_track: false,
        }
    }
}

/// The draw lists of a node.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    normal_noblend: Vec<Drawable>,
    normal_blend: Vec<Drawable>,
    normal_noblend_nolighting: Vec<Drawable>,
    skybox_blend: Vec<Drawable>,
    skybox_noblend: Vec<Drawable>,
}

impl DrawList {
    /// The drawables of one layer.
    pub fn layer(&self, layer: DrawLayer) -> &[Drawable] {
        match layer {
            DrawLayer::NormalNoBlend => &self.normal_noblend,
            DrawLayer::NormalBlend => &self.normal_blend,
            DrawLayer::NormalNoBlendNoLighting => &self.normal_noblend_nolighting,
            DrawLayer::SkyboxBlend => &self.skybox_blend,
            DrawLayer::SkyboxNoBlend => &self.skybox_noblend,
        }
    }

    fn layer_mut(&mut self, layer: DrawLayer) -> &mut Vec<Drawable> {
        match layer {
            DrawLayer::NormalNoBlend => &mut self.normal_noblend,
            DrawLayer::NormalBlend => &mut self.normal_blend,
            DrawLayer::NormalNoBlendNoLighting => &mut self.normal_noblend_nolighting,
            DrawLayer::SkyboxBlend => &mut self.skybox_blend,
            DrawLayer::SkyboxNoBlend => &mut self.skybox_noblend,
        }
    }

    /// Appends a drawable to a layer.
    pub fn push(&mut self, layer: DrawLayer, drawable: Drawable) {
        self.layer_mut(layer).push(drawable);
    }

    /// Total number of drawables across all layers.
    pub fn len(&self) -> usize {
        DrawLayer::ALL.iter().map(|l| self.layer(*l).len()).sum()
    }

    /// Returns `true` if no layer holds a drawable.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every drawable.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A node of the scene graph.
#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    /// Transform relative to the parent node.
    pub transform: Isometry,
    /// Drawables attached to this node.
    pub drawlist: DrawList,
    children: Vec<SceneNode>,
}

impl SceneNode {
    /// Creates an empty node with the given transform.
    pub fn with_transform(transform: Isometry) -> Self {
        Self {
            transform,
            ..Self::default()
        }
    }

    /// Adds an empty child node and returns its handle.
    pub fn add_node(&mut self) -> NodeHandle {
        self.children.push(SceneNode::default());
        NodeHandle(self.children.len() as u32 - 1)
    }

    /// Adds a child node with the given transform and returns it.
    pub fn push_child(&mut self, transform: Isometry) -> &mut SceneNode {
        let handle = self.add_node();
        let node = &mut self.children[handle.0 as usize];
        node.transform = transform;
        node
    }

    /// Looks up a child node.
    pub fn node(&self, handle: NodeHandle) -> Option<&SceneNode> {
        self.children.get(handle.0 as usize)
    }

    /// Looks up a child node mutably.
    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut SceneNode> {
        self.children.get_mut(handle.0 as usize)
    }

    /// The direct children of this node.
    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Number of drawables in this node and all of its descendants.
    pub fn drawable_count(&self) -> usize {
        self.drawlist.len()
            + self
                .children
                .iter()
                .map(SceneNode::drawable_count)
                .sum::<usize>()
    }

    /// Removes every drawable and child.
    pub fn clear(&mut self) {
        self.drawlist.clear();
        self.children.clear();
    }
}
