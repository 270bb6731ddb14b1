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

//! Texture references and sampling options.
//!
//! Decoding and GPU upload happen elsewhere; a `Texture` only records which
//! file was resolved and how it must be sampled.

use std::path::PathBuf;

use pitlane_core::asset::Asset;

/// Sampling options requested for a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// Generate mipmaps.
    pub mipmap: bool,
    /// Anisotropic filtering level, 0 disables it.
    pub anisotropy: u32,
    /// Repeat along U, otherwise clamp.
    pub repeat_u: bool,
    /// Repeat along V, otherwise clamp.
    pub repeat_v: bool,
    /// The texture holds a normal map.
    pub normal_map: bool,
}

impl Default for TextureInfo {
    fn default() -> Self {
        Self {
            mipmap: true,
            anisotropy: 0,
            repeat_u: true,
            repeat_v: true,
            normal_map: false,
        }
    }
}

impl TextureInfo {
    /// Builds sampling options from authored flags.
    ///
    /// Mipmapping is forced on whenever anisotropic filtering is requested.
    /// `clamp` 1 clamps both axes, 2 clamps U and 3 clamps V.
    pub fn from_flags(mipmap: bool, anisotropy: u32, clamp: i32) -> Self {
        Self {
            mipmap: mipmap || anisotropy > 0,
            anisotropy,
            repeat_u: clamp != 1 && clamp != 2,
            repeat_v: clamp != 1 && clamp != 3,
            normal_map: false,
        }
    }

    /// Same options, flagged as a normal map.
    pub fn as_normal_map(self) -> Self {
        Self {
            normal_map: true,
            ..self
        }
    }
}

/// A resolved texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Logical name relative to the directory it was resolved from.
    pub name: String,
    /// Where the texture data lives (file or archive entry).
    pub path: PathBuf,
    /// Sampling options.
    pub info: TextureInfo,
}

impl Asset for Texture {}
