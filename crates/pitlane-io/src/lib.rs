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

//! # Pitlane IO
//!
//! Readers for the files a track package is made of, the JPK archive format
//! and the content cache that resolves models and textures by name.

#![warn(missing_docs)]

pub mod config;
pub mod content;
pub mod error;
pub mod object_list;
pub mod pack;
pub mod roads;
pub mod surfaces;
pub mod tokens;

pub use config::{ConfigNode, ConfigTree, ConfigValue, SectionRef};
pub use content::{ContentCache, ModelLoader, ObjLoader};
pub use error::{ConfigError, ContentError, ObjectListError, PackError, RoadsError};
pub use object_list::{LegacyObject, LegacyParams, ObjectList};
pub use pack::JpkArchive;
pub use roads::{BezierStripReader, RoadStripReader};
pub use tokens::Tokenizer;
