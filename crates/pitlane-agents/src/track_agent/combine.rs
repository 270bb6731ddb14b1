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

//! Merging of legacy objects that share a texture.
//!
//! Many small decorations drawn with the same texture collapse into one
//! mesh, one draw call and one collision shape. The map lives for one
//! object pass and is drained when the pass completes.

use std::collections::BTreeMap;
use std::path::Path;

use pitlane_core::asset::AssetHandle;
use pitlane_data::{Model, VertexArray};
use pitlane_io::{ContentCache, LegacyObject};

/// One merged object, keyed by texture in [`CombiningMap`].
#[derive(Debug)]
pub(crate) struct CombinedObject {
    /// The object whose flags the merged object uses.
    pub object: LegacyObject,
    /// Concatenated geometry of every merged object.
    pub mesh: VertexArray,
    /// A model already stored under the texture key by an earlier load.
    /// Such an entry is final and is not merged into.
    pub cached: Option<AssetHandle<Model>>,
}

/// Legacy objects waiting to be merged, keyed by texture name.
#[derive(Debug, Default)]
pub(crate) struct CombiningMap {
    entries: BTreeMap<String, CombinedObject>,
}

impl CombiningMap {
    /// Merges `object` into the entry of its texture.
    ///
    /// Geometry is concatenated onto an entry that is not cached. Otherwise
    /// the object starts a new entry, picking up a model previously stored
    /// under its texture key.
    pub(crate) fn add(
        &mut self,
        object: LegacyObject,
        model: &Model,
        dir: &Path,
        content: &ContentCache,
    ) {
        if let Some(entry) = self.entries.get_mut(&object.texture) {
            if entry.cached.is_none() {
                entry.mesh += model.vertex_array();
                return;
            }
        }

        let cached = content.get_model(dir, &object.texture);
        self.entries.insert(
            object.texture.clone(),
            CombinedObject {
                mesh: model.vertex_array().clone(),
                object,
                cached,
            },
        );
    }

    /// Number of merged objects.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is waiting to be merged.
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Takes every entry in texture order, leaving the map empty.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (String, CombinedObject)> {
        std::mem::take(&mut self.entries).into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn object(model: &str, texture: &str) -> LegacyObject {
        LegacyObject {
            model: model.into(),
            texture: texture.into(),
            ..LegacyObject::default()
        }
    }

    fn mesh(vertices: usize) -> Model {
        let mut mesh = VertexArray::default();
        for i in 0..vertices {
            mesh.vertices.extend([i as f32, 0.0, 0.0]);
            mesh.normals.extend([0.0, 0.0, 1.0]);
            mesh.tex_coords.extend([0.0, 0.0]);
        }
        mesh.faces.extend([0, 1, 2]);
        Model::from_vertex_array(mesh)
    }

    #[test]
    fn test_merge_is_additive() {
        let dir = PathBuf::from("objects");
        let content = ContentCache::new();
        let mut map = CombiningMap::default();
        map.add(object("a.obj", "shared.png"), &mesh(3), &dir, &content);
        map.add(object("b.obj", "shared.png"), &mesh(4), &dir, &content);
        map.add(object("c.obj", "other.png"), &mesh(5), &dir, &content);
        map.add(object("d.obj", "shared.png"), &mesh(3), &dir, &content);
        assert_eq!(map.len(), 2);

        let entries: Vec<_> = map.drain().collect();
        assert_eq!(map.len(), 0);
        assert_eq!(entries[0].0, "other.png");
        assert_eq!(entries[0].1.mesh.vertex_count(), 5);
        assert_eq!(entries[1].0, "shared.png");
        assert_eq!(entries[1].1.mesh.vertex_count(), 10);
        assert_eq!(entries[1].1.mesh.triangle_count(), 3);
        // The first object of a key provides the flags.
        assert_eq!(entries[1].1.object.model, "a.obj");
    }

    #[test]
    fn test_merge_keeps_attributes_aligned() {
        let dir = PathBuf::from("objects");
        let content = ContentCache::new();
        let bare = Model::from_vertex_array(VertexArray {
            vertices: vec![0.0; 9],
            faces: vec![0, 1, 2],
            ..VertexArray::default()
        });

        let mut map = CombiningMap::default();
        map.add(object("a.obj", "shared.png"), &bare, &dir, &content);
        map.add(object("b.obj", "shared.png"), &mesh(4), &dir, &content);

        let entries: Vec<_> = map.drain().collect();
        let merged = &entries[0].1.mesh;
        assert_eq!(merged.vertex_count(), 7);
        assert_eq!(merged.normals.len(), 7 * 3);
        assert_eq!(merged.tex_coords.len(), 7 * 2);
        assert!(merged.normals[..9].iter().all(|n| *n == 0.0));
        assert_eq!(merged.normals[9..12], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_cached_entry_is_not_merged() {
        let dir = PathBuf::from("objects");
        let mut content = ContentCache::new();
        let stored = content.store_model(&dir, "shared.png", mesh(6).vertex_array().clone());

        let mut map = CombiningMap::default();
        map.add(object("a.obj", "shared.png"), &mesh(3), &dir, &content);
        map.add(object("b.obj", "shared.png"), &mesh(4), &dir, &content);

        let entries: Vec<_> = map.drain().collect();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0].1;
        assert!(AssetHandle::ptr_eq(entry.cached.as_ref().unwrap(), &stored));
        assert_eq!(entry.object.model, "b.obj");
        assert_eq!(entry.mesh.vertex_count(), 4);
    }
}
