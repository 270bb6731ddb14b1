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

//! Object Body Builder
//!
//! Resolves the model, textures, render flags and collision shape of one
//! object section. Bodies are memoised by name for the duration of a load,
//! so a body shared by many objects is only built once.

mod shape;

pub use shape::load_collision_shape;

use std::path::{Path, PathBuf};

use ahash::AHashMap;
use pitlane_core::asset::AssetHandle;
use pitlane_core::math::Vec3;
use pitlane_core::physics::{CollisionShape, ShapeId};
use pitlane_core::Diagnostics;
use pitlane_data::{DrawLayer, Drawable, Model, Texture, TextureInfo, TrackData};
use pitlane_io::{ConfigNode, ContentCache, JpkArchive, LegacyObject};

use crate::error::ShapeError;

/// Bodies lighter than this are static scenery.
pub const STATIC_MASS_THRESHOLD: f32 = 1e-3;

/// A resolved object body, ready to be placed in the scene.
#[derive(Debug, Clone)]
pub struct Body {
    /// Name the body was built under.
    pub name: String,
    /// Render state.
    pub drawable: Drawable,
    /// Draw list the drawable goes to.
    pub layer: DrawLayer,
    /// Mass in kg, below [`STATIC_MASS_THRESHOLD`] for static bodies.
    pub mass: f32,
    /// Whether a collision shape was built.
    pub collidable: bool,
    /// Local inertia of the collision shape.
    pub inertia: Vec3,
    /// Mass center relative to the body origin.
    pub center: Vec3,
    /// Collision shape owned by the track.
    pub shape: Option<ShapeId>,
}

impl Body {
    /// Returns `true` for static scenery.
    pub fn is_static(&self) -> bool {
        self.mass < STATIC_MASS_THRESHOLD
    }
}

/// Settings shared by every body of a load.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyOptions {
    /// Directory holding object models and textures.
    pub objects_dir: PathBuf,
    /// Anisotropic filtering level for object textures.
    pub anisotropy: u32,
    /// Shadow-only bodies are dropped when dynamic shadows are rendered.
    pub dynamic_shadows: bool,
}

/// The collaborators a body is built with.
pub struct BodyContext<'a> {
    /// Model and texture resolution.
    pub content: &'a mut ContentCache,
    /// Object archive, preferred over loose files when present.
    pub pack: Option<&'a mut JpkArchive>,
    /// Receives models, meshes and shapes.
    pub track: &'a mut TrackData,
    /// Informational and error streams.
    pub diagnostics: &'a mut Diagnostics,
}

/// Builds and memoises object bodies.
#[derive(Debug)]
pub struct BodyBuilder {
    options: BodyOptions,
    bodies: AHashMap<String, Body>,
}

impl BodyBuilder {
    /// Creates a builder with an empty memo.
    pub fn new(options: BodyOptions) -> Self {
        Self {
            options,
            bodies: AHashMap::new(),
        }
    }

    /// The options the builder was created with.
    pub fn options(&self) -> &BodyOptions {
        &self.options
    }

    /// Number of distinct bodies built so far.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns `true` if no body has been built yet.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Forgets every memoised body.
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Builds the body described by `section`.
    ///
    /// `name` identifies the body. When the section lives in its own named
    /// section or file (`inline == false`), the part of `name` up to the last
    /// `/` is prepended to the model and texture names.
    ///
    /// Returns `Ok(None)` when the body is skipped: a shadow-only body with
    /// dynamic shadows enabled, or a model that cannot be resolved.
    pub fn build(
        &mut self,
        section: &ConfigNode,
        name: &str,
        inline: bool,
        ctx: &mut BodyContext<'_>,
    ) -> Result<Option<Body>, ShapeError> {
        if let Some(body) = self.bodies.get(name) {
            return Ok(Some(body.clone()));
        }

        let mut model_name: String = section.get("model").unwrap_or_default();
        let mut textures = texture_slots(section.get("texture").unwrap_or_default());
        let clampuv: i32 = section.get("clampuv").unwrap_or(0);
        let mipmap: bool = section.get("mipmap").unwrap_or(true);
        let skybox: bool = section.get("skybox").unwrap_or(false);
        let alphablend: bool = section.get("alphablend").unwrap_or(false);
        let doublesided: bool = section.get("doublesided").unwrap_or(false);
        let isashadow: bool = section.get("isashadow").unwrap_or(false);
        let nolighting: bool = section.get("nolighting").unwrap_or(false);

        if !inline {
            if let Some(split) = name.rfind('/') {
                let prefix = &name[..=split];
                model_name.insert_str(0, prefix);
                textures[0].insert_str(0, prefix);
                for texture in textures[1..].iter_mut().filter(|t| !t.is_empty()) {
                    texture.insert_str(0, prefix);
                }
            }
        }

        if self.options.dynamic_shadows && isashadow {
            return Ok(None);
        }

        let Some(model) = resolve_model(&self.options.objects_dir, &model_name, ctx) else {
            ctx.diagnostics.info(format!(
                "Failed to load body {name} model {model_name}"
            ));
            return Ok(None);
        };
        ctx.track.models.push(model.clone());

        let mut body = Body {
            name: name.to_string(),
            drawable: Drawable::new(model.clone()),
            layer: DrawLayer::select(alphablend, nolighting, skybox),
            mass: 0.0,
            collidable: false,
            inertia: Vec3::ZERO,
            center: Vec3::ZERO,
            shape: None,
        };

        if let Some(mass) = section.get::<f32>("mass") {
            body.mass = mass;
            body.collidable = true;
            self.load_shape(section, &model, &mut body, ctx)?;
        }

        let info = TextureInfo::from_flags(mipmap, self.options.anisotropy, clampuv);
        let dir = &self.options.objects_dir;
        body.drawable.diffuse = load_texture(dir, &textures[0], info, ctx);
        if !textures[1].is_empty() {
            body.drawable.misc1 = load_texture(dir, &textures[1], info, ctx);
        }
        if !textures[2].is_empty() {
            body.drawable.misc2 = load_texture(dir, &textures[2], info.as_normal_map(), ctx);
        }

        body.drawable.decal = alphablend;
        body.drawable.cull = ctx.track.cull && !doublesided;
        body.drawable.vertical_track = skybox && ctx.track.vertical_tracking_skyboxes;

        self.bodies.insert(name.to_string(), body.clone());
        Ok(Some(body))
    }

    fn load_shape(
        &self,
        section: &ConfigNode,
        model: &Model,
        body: &mut Body,
        ctx: &mut BodyContext<'_>,
    ) -> Result<(), ShapeError> {
        if body.is_static() {
            let mesh = ctx.track.physics.add_mesh(model.vertex_array().to_triangle_mesh());
            let surface = surface_index(
                section.get("surface").unwrap_or(0),
                &body.name,
                ctx.track,
                ctx.diagnostics,
            );
            body.shape = Some(
                ctx.track
                    .physics
                    .add_shape(CollisionShape::TriangleMesh { mesh, surface }),
            );
            return Ok(());
        }

        let mut center: Vec3 = section.try_get("mass-center")?.unwrap_or(Vec3::ZERO);
        let shape = match load_collision_shape(section, -center)? {
            Some(shape) => shape,
            None => {
                // Fall back to the model bounding box around its center.
                center += model.center();
                CollisionShape::Box {
                    half_extents: model.size() * 0.5,
                }
            }
        };

        body.inertia = shape.local_inertia(body.mass);
        body.center = center;
        body.shape = Some(ctx.track.physics.add_shape(shape));
        Ok(())
    }

    /// Builds the body of a legacy object around its resolved model.
    ///
    /// Legacy objects are always static. Their misc textures are found by
    /// naming convention next to the diffuse texture.
    pub fn build_legacy(
        &self,
        object: &LegacyObject,
        model: AssetHandle<Model>,
        ctx: &mut BodyContext<'_>,
    ) -> Body {
        let dir = &self.options.objects_dir;
        let info = TextureInfo::from_flags(object.mipmap, self.options.anisotropy, object.clamptexture);
        let blend = object.transparent_blend == 1;

        let mut drawable = Drawable::new(model.clone());
        drawable.diffuse = load_texture(dir, &object.texture, info, ctx);
        let stem = texture_stem(&object.texture);
        let misc1 = format!("{stem}-misc1.png");
        if dir.join(&misc1).is_file() {
            drawable.misc1 = load_texture(dir, &misc1, info, ctx);
        }
        let misc2 = format!("{stem}-misc2.png");
        if dir.join(&misc2).is_file() {
            drawable.misc2 = load_texture(dir, &misc2, info.as_normal_map(), ctx);
        }
        drawable.decal = blend;
        drawable.cull = ctx.track.cull && object.transparent_blend != 2;
        drawable.vertical_track = object.skybox && ctx.track.vertical_tracking_skyboxes;

        let shape = object.collideable.then(|| {
            let mesh = ctx.track.physics.add_mesh(model.vertex_array().to_triangle_mesh());
            let surface = surface_index(object.surface, &object.model, ctx.track, ctx.diagnostics);
            ctx.track
                .physics
                .add_shape(CollisionShape::TriangleMesh { mesh, surface })
        });

        Body {
            name: object.model.clone(),
            drawable,
            layer: DrawLayer::select(blend, object.nolighting, object.skybox),
            mass: 0.0,
            collidable: object.collideable,
            inertia: Vec3::ZERO,
            center: Vec3::ZERO,
            shape,
        }
    }
}

/// Splits a texture list into its diffuse, misc1 and normal map slots.
fn texture_slots(names: Vec<String>) -> [String; 3] {
    let mut slots: [String; 3] = Default::default();
    for (slot, name) in slots.iter_mut().zip(names) {
        *slot = name;
    }
    slots
}

/// The texture name without its four character extension.
fn texture_stem(texture: &str) -> &str {
    let cut = texture.len().saturating_sub(4);
    texture.get(..cut).unwrap_or(texture)
}

/// Resolves a model, from the object archive when it holds `name` and from
/// `dir` otherwise.
pub fn resolve_model(dir: &Path, name: &str, ctx: &mut BodyContext<'_>) -> Option<AssetHandle<Model>> {
    if let Some(pack) = ctx.pack.as_deref_mut() {
        if pack.contains(name) {
            match ctx.content.load_model_from_pack(dir, name, pack) {
                Ok(model) => return Some(model),
                Err(err) => log::debug!("{err}"),
            }
        }
    }
    match ctx.content.load_model(dir, name) {
        Ok(model) => Some(model),
        Err(err) => {
            log::debug!("{err}");
            None
        }
    }
}

fn load_texture(
    dir: &Path,
    name: &str,
    info: TextureInfo,
    ctx: &mut BodyContext<'_>,
) -> Option<AssetHandle<Texture>> {
    match ctx.content.load_texture(dir, name, info) {
        Ok(texture) => Some(texture),
        Err(err) => {
            ctx.diagnostics.warn(format!("Failed to load texture {name}: {err}"));
            None
        }
    }
}

/// Validates a surface reference, falling back to surface 0.
fn surface_index(raw: i32, owner: &str, track: &TrackData, diagnostics: &mut Diagnostics) -> usize {
    match usize::try_from(raw) {
        Ok(index) if index < track.surfaces.len() => index,
        _ => {
            diagnostics.warn(format!(
                "{owner} references surface {raw}, track has {}; using surface 0",
                track.surfaces.len()
            ));
            0
        }
    }
}
