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

//! Errors that abort a track load.

use std::path::PathBuf;

use pitlane_io::{ConfigError, ContentError, ObjectListError};
use pitlane_lanes::{LapError, ShapeError};
use thiserror::Error;

use super::agent::LoaderState;

/// A condition fatal to the current load.
///
/// Once a loader has returned one of these it is in
/// [`LoaderState::Failed`] and every later call returns
/// [`TrackLoadError::Aborted`].
#[derive(Debug, Error)]
pub enum TrackLoadError {
    /// `track.txt` is missing or malformed.
    #[error("Can't load track configfile {path}: {source}")]
    TrackConfig {
        /// Path of the metadata file.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: ConfigError,
    },

    /// Start positions or lap sectors are missing or invalid.
    #[error(transparent)]
    Lap(#[from] LapError),

    /// Neither an object tree nor an object list was found.
    #[error("No object tree or object list in {0}")]
    NoObjectSource(PathBuf),

    /// The legacy object list is malformed.
    #[error(transparent)]
    ObjectList(#[from] ObjectListError),

    /// An object does not reference a body.
    #[error("Object {object} has no body")]
    MissingBody {
        /// Name of the object section.
        object: String,
    },

    /// An external body file could not be loaded.
    #[error("Failed to load body {body} of object {object}: {source}")]
    BodyFile {
        /// Name of the object section.
        object: String,
        /// File the body was expected in.
        body: String,
        /// What went wrong.
        #[source]
        source: ContentError,
    },

    /// The collision shape description of a body is invalid.
    #[error("Invalid collision shape for body {body}: {source}")]
    Shape {
        /// Name of the body.
        body: String,
        /// What went wrong.
        #[source]
        source: ShapeError,
    },

    /// The position or rotation of an object is malformed.
    #[error("Invalid placement of object {object}: {source}")]
    Placement {
        /// Name of the object section.
        object: String,
        /// What went wrong.
        #[source]
        source: ConfigError,
    },

    /// The requested operation is not valid in the current state.
    #[error("Track loader cannot do this while {0:?}")]
    InvalidState(LoaderState),

    /// The load failed earlier and must not be resumed.
    #[error("Track load was aborted")]
    Aborted,
}
