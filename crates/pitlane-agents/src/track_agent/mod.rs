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

//! Acts as the agent for track loading.
//!
//! [`TrackLoader::begin_load`] runs the eager part of a load (surfaces, roads,
//! racing lines, track metadata, start grid and lap sectors) and opens the
//! object source. The objects are then loaded incrementally by
//! [`TrackLoader::continue_load`], which is meant to be called once per frame
//! until it reports [`LoadProgress::Complete`].
//!
//! At most one resumption is in flight per loader instance; the loader is
//! the unit of mutual exclusion.

mod agent;
mod combine;
mod error;
mod settings;
mod source;

pub use agent::{LoadProgress, LoaderState, TrackLoader};
pub use error::TrackLoadError;
pub use settings::{LoaderSettings, SettingsError};
