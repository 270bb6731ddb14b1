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

//! Shared content cache resolving models, textures and config documents by
//! directory and logical name.
//!
//! Every asset is parsed at most once per cache: a second request for the
//! same name returns the handle created by the first.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use pitlane_core::asset::AssetHandle;
use pitlane_data::{Model, Texture, TextureInfo, VertexArray};

use crate::config::ConfigTree;
use crate::error::ContentError;
use crate::pack::JpkArchive;

/// Parses raw file bytes into a mesh.
pub trait ModelLoader: Send + Sync {
    /// Parses a byte slice into vertex buffers.
    fn load(&self, bytes: &[u8]) -> Result<VertexArray, Box<dyn Error + Send + Sync>>;
}

/// Loader for Wavefront OBJ meshes. Every object of the file is merged into
/// one vertex array; materials are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjLoader;

impl ModelLoader for ObjLoader {
    fn load(&self, bytes: &[u8]) -> Result<VertexArray, Box<dyn Error + Send + Sync>> {
        let (models, _materials) = tobj::load_obj_buf(
            &mut std::io::Cursor::new(bytes),
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
            |_| Ok((Vec::new(), AHashMap::new())),
        )?;

        if models.is_empty() {
            return Err("No models found in OBJ file".into());
        }

        let mut mesh = VertexArray::default();
        for model in models {
            mesh += &VertexArray {
                vertices: model.mesh.positions,
                normals: model.mesh.normals,
                tex_coords: model.mesh.texcoords,
                faces: model.mesh.indices,
            };
        }
        Ok(mesh)
    }
}

/// Resolves content by name and keeps every resolved asset alive.
pub struct ContentCache {
    models: AHashMap<PathBuf, AssetHandle<Model>>,
    textures: AHashMap<PathBuf, AssetHandle<Texture>>,
    configs: AHashMap<PathBuf, AssetHandle<ConfigTree>>,
    loaders: AHashMap<String, Box<dyn ModelLoader>>,
    models_parsed: usize,
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCache {
    /// Creates a cache with the OBJ loader registered.
    pub fn new() -> Self {
        let mut cache = Self {
            models: AHashMap::new(),
            textures: AHashMap::new(),
            configs: AHashMap::new(),
            loaders: AHashMap::new(),
            models_parsed: 0,
        };
        cache.register_loader("obj", ObjLoader);
        cache
    }

    /// Registers a model loader for a file extension (without the dot).
    pub fn register_loader(&mut self, extension: &str, loader: impl ModelLoader + 'static) {
        self.loaders
            .insert(extension.to_ascii_lowercase(), Box::new(loader));
    }

    /// Number of model files parsed so far.
    pub fn models_parsed(&self) -> usize {
        self.models_parsed
    }

    /// Returns a model that has already been resolved or stored.
    pub fn get_model(&self, dir: &Path, name: &str) -> Option<AssetHandle<Model>> {
        self.models.get(&dir.join(name)).cloned()
    }

    /// Resolves a model from `dir/name`.
    pub fn load_model(&mut self, dir: &Path, name: &str) -> Result<AssetHandle<Model>, ContentError> {
        let path = dir.join(name);
        if let Some(model) = self.models.get(&path) {
            return Ok(model.clone());
        }
        if !path.is_file() {
            return Err(ContentError::NotFound(path));
        }
        let bytes = fs::read(&path).map_err(|source| ContentError::Io {
            path: path.clone(),
            source,
        })?;
        self.parse_model(path, name, &bytes)
    }

    /// Resolves a model stored in an archive under `name`.
    pub fn load_model_from_pack(
        &mut self,
        dir: &Path,
        name: &str,
        pack: &mut JpkArchive,
    ) -> Result<AssetHandle<Model>, ContentError> {
        let path = dir.join(name);
        if let Some(model) = self.models.get(&path) {
            return Ok(model.clone());
        }
        let bytes = pack.read(name)?;
        self.parse_model(path, name, &bytes)
    }

    fn parse_model(
        &mut self,
        key: PathBuf,
        name: &str,
        bytes: &[u8],
    ) -> Result<AssetHandle<Model>, ContentError> {
        let extension = Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let loader = self
            .loaders
            .get(&extension)
            .ok_or_else(|| ContentError::UnsupportedFormat(name.to_string()))?;
        let mesh = loader.load(bytes).map_err(|err| ContentError::Parse {
            name: name.to_string(),
            message: err.to_string(),
        })?;

        self.models_parsed += 1;
        log::debug!("Parsed model {}", key.display());
        let model = AssetHandle::new(Model::from_vertex_array(mesh));
        self.models.insert(key, model.clone());
        Ok(model)
    }

    /// Stores a generated mesh under `dir/name`, replacing any previous entry.
    pub fn store_model(&mut self, dir: &Path, name: &str, mesh: VertexArray) -> AssetHandle<Model> {
        let model = AssetHandle::new(Model::from_vertex_array(mesh));
        self.models.insert(dir.join(name), model.clone());
        model
    }

    /// Resolves a texture file. Only its presence is checked here, decoding
    /// happens on upload.
    pub fn load_texture(
        &mut self,
        dir: &Path,
        name: &str,
        info: TextureInfo,
    ) -> Result<AssetHandle<Texture>, ContentError> {
        let path = dir.join(name);
        if let Some(texture) = self.textures.get(&path) {
            return Ok(texture.clone());
        }
        if name.is_empty() || !path.is_file() {
            return Err(ContentError::NotFound(path));
        }
        let texture = AssetHandle::new(Texture {
            name: name.to_string(),
            path: path.clone(),
            info,
        });
        self.textures.insert(path, texture.clone());
        Ok(texture)
    }

    /// Resolves a config document from `dir/name`. The root node of the
    /// document is named after `name`.
    pub fn load_config(&mut self, dir: &Path, name: &str) -> Result<AssetHandle<ConfigTree>, ContentError> {
        let path = dir.join(name);
        if let Some(config) = self.configs.get(&path) {
            return Ok(config.clone());
        }
        if !path.is_file() {
            return Err(ContentError::NotFound(path));
        }
        let mut tree = ConfigTree::load(&path)?;
        tree.set_name(name);
        let config = AssetHandle::new(tree);
        self.configs.insert(path, config.clone());
        Ok(config)
    }

    /// Drops every cached asset. Handles held elsewhere stay valid.
    pub fn clear(&mut self) {
        self.models.clear();
        self.textures.clear();
        self.configs.clear();
    }
}
