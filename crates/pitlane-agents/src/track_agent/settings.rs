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

//! Loader settings, loadable from a RON file.

use std::fs;
use std::path::{Path, PathBuf};

use pitlane_io::LegacyParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Surfaces file, relative to the track directory.
pub const SURFACES_FILE: &str = "surfaces.txt";
/// Roads file, relative to the track directory.
pub const ROADS_FILE: &str = "roads.trk";
/// Track metadata file, relative to the track directory.
pub const TRACK_FILE: &str = "track.txt";
/// Object directory, relative to the track directory.
pub const OBJECTS_DIR: &str = "objects";
/// Modern object tree, relative to the object directory.
pub const OBJECTS_FILE: &str = "objects.txt";
/// Legacy object list, relative to the object directory.
pub const LIST_FILE: &str = "list.txt";
/// Object archive, relative to the object directory.
pub const PACK_FILE: &str = "objects.jpk";
/// Racing line texture, relative to the texture directory.
pub const RACINGLINE_TEXTURE: &str = "racingline.png";

/// Errors raised while reading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file could not be read.
    #[error("Failed to read settings {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid RON.
    #[error("Invalid settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Everything a track load is parameterised by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Directory of the track package.
    pub track_path: PathBuf,
    /// Directory holding shared textures such as the racing line texture.
    pub texture_dir: PathBuf,
    /// Anisotropic filtering level; any level above 0 forces mipmaps.
    pub anisotropy: u32,
    /// Drive the track in reverse.
    pub reverse: bool,
    /// Simulate massive objects. When off they are frozen in place.
    pub dynamic_objects: bool,
    /// Dynamic shadows are rendered, so shadow-only objects are dropped.
    pub dynamic_shadows: bool,
    /// Merge legacy objects sharing a texture into one mesh.
    pub aggressive_combining: bool,
    /// Gather static collision shapes into one compound track shape.
    pub compound_track_shape: bool,
    /// Objects loaded per [`crate::TrackLoader::continue_load`] call.
    pub objects_per_step: usize,
    /// Accepted field counts of the legacy object list.
    pub legacy_params: LegacyParams,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            track_path: PathBuf::new(),
            texture_dir: PathBuf::new(),
            anisotropy: 0,
            reverse: false,
            dynamic_objects: true,
            dynamic_shadows: false,
            aggressive_combining: false,
            compound_track_shape: false,
            objects_per_step: 1,
            legacy_params: LegacyParams::default(),
        }
    }
}

impl LoaderSettings {
    /// Settings for the track in `track_path`, with textures in its
    /// `textures` subdirectory.
    pub fn new(track_path: impl Into<PathBuf>) -> Self {
        let track_path = track_path.into();
        Self {
            texture_dir: track_path.join("textures"),
            track_path,
            ..Self::default()
        }
    }

    /// Parses settings from RON text. Missing fields keep their defaults.
    pub fn from_ron(text: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(text)?)
    }

    /// Reads settings from a RON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    /// The object directory of the track.
    pub fn objects_dir(&self) -> PathBuf {
        self.track_path.join(OBJECTS_DIR)
    }
}
