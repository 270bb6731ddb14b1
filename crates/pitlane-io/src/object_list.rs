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

//! Reader for the legacy flat object list (`objects/list.txt`).
//!
//! The first token is the number of fields per object. Each record then
//! lists, in order: model, texture, mipmap, nolighting, skybox,
//! transparent_blend, bump_wavelength, bump_amplitude, driveable,
//! collideable, friction_notread, friction_tread, rolling_resistance,
//! rolling_drag, isashadow, clamptexture, surface. The bump, driveable,
//! friction and rolling fields are obsolete and skipped.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigValue;
use crate::error::ObjectListError;
use crate::tokens::Tokenizer;

const MODEL: usize = 0;
const TEXTURE: usize = 1;
const MIPMAP: usize = 2;
const NOLIGHTING: usize = 3;
const SKYBOX: usize = 4;
const TRANSPARENT_BLEND: usize = 5;
const COLLIDEABLE: usize = 9;
const ISASHADOW: usize = 14;
const CLAMPTEXTURE: usize = 15;
const SURFACE: usize = 16;

/// Field counts accepted in the list header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyParams {
    /// Field count of the current format.
    pub expected: usize,
    /// Smallest field count of an older format still accepted.
    pub minimum: usize,
}

impl Default for LegacyParams {
    fn default() -> Self {
        Self {
            expected: 17,
            minimum: 14,
        }
    }
}

/// One record of the legacy object list.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyObject {
    /// Model file name.
    pub model: String,
    /// Diffuse texture name, also the combining key.
    pub texture: String,
    pub mipmap: bool,
    pub nolighting: bool,
    pub skybox: bool,
    /// 1 blends, 2 renders double sided.
    pub transparent_blend: i32,
    pub collideable: bool,
    /// Only casts a shadow.
    pub isashadow: bool,
    /// 1 clamps both axes, 2 clamps U, 3 clamps V.
    pub clamptexture: i32,
    /// Index into the surface table.
    pub surface: i32,
}

impl Default for LegacyObject {
    fn default() -> Self {
        Self {
            model: String::new(),
            texture: String::new(),
            mipmap: true,
            nolighting: false,
            skybox: false,
            transparent_blend: 0,
            collideable: false,
            isashadow: false,
            clamptexture: 0,
            surface: 0,
        }
    }
}

/// Sequential reader over the records of an object list.
#[derive(Debug)]
pub struct ObjectList {
    tokens: Tokenizer,
    params_per_object: usize,
    records_read: usize,
}

impl ObjectList {
    /// Opens a list file and validates its header.
    pub fn open(path: &Path, params: LegacyParams) -> Result<Self, ObjectListError> {
        Self::parse(read(path)?, params)
    }

    /// Reads a list from text and validates its header.
    ///
    /// Headers below `params.minimum` are rejected. Records shorter than
    /// `params.expected` leave the missing fields at their defaults and
    /// extra trailing fields are discarded.
    pub fn parse(text: impl Into<String>, params: LegacyParams) -> Result<Self, ObjectListError> {
        let mut tokens = Tokenizer::new(text);
        let params_per_object = match tokens.next_parsed::<usize>() {
            Some(Ok(count)) => count,
            _ => return Err(ObjectListError::MissingHeader),
        };
        // A record holds at least its model name.
        let minimum = params.minimum.max(1);
        if params_per_object < minimum {
            return Err(ObjectListError::TooFewParams {
                found: params_per_object,
                minimum,
            });
        }
        if params_per_object != params.expected {
            log::info!(
                "Object list has {} params per object, expected {}",
                params_per_object,
                params.expected
            );
        }
        Ok(Self {
            tokens,
            params_per_object,
            records_read: 0,
        })
    }

    /// Declared number of fields per record.
    pub fn params_per_object(&self) -> usize {
        self.params_per_object
    }

    /// Reads the next record, `None` once the list is exhausted.
    pub fn next_object(&mut self) -> Result<Option<LegacyObject>, ObjectListError> {
        let Some(model) = self.tokens.next() else {
            return Ok(None);
        };
        let mut fields = vec![model];
        fields.extend(self.tokens.by_ref().take(self.params_per_object - 1));

        let record = self.records_read;
        self.records_read += 1;

        let mut object = LegacyObject::default();
        for (index, value) in fields.into_iter().enumerate() {
            match index {
                MODEL => object.model = value,
                TEXTURE => object.texture = value,
                MIPMAP => object.mipmap = field(record, "mipmap", value)?,
                NOLIGHTING => object.nolighting = field(record, "nolighting", value)?,
                SKYBOX => object.skybox = field(record, "skybox", value)?,
                TRANSPARENT_BLEND => {
                    object.transparent_blend = field(record, "transparent_blend", value)?
                }
                COLLIDEABLE => object.collideable = field(record, "collideable", value)?,
                ISASHADOW => object.isashadow = field(record, "isashadow", value)?,
                CLAMPTEXTURE => object.clamptexture = field(record, "clamptexture", value)?,
                SURFACE => object.surface = field(record, "surface", value)?,
                _ => {}
            }
        }
        Ok(Some(object))
    }
}

fn field<T: ConfigValue>(record: usize, name: &'static str, value: String) -> Result<T, ObjectListError> {
    T::from_config(&value).ok_or(ObjectListError::InvalidField {
        record,
        field: name,
        value,
    })
}

fn read(path: &Path) -> Result<String, ObjectListError> {
    fs::read_to_string(path).map_err(|source| ObjectListError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Counts the records of a list by scanning it once.
///
/// Returns 0 if the header is missing or not a positive number.
pub fn count_objects(text: &str) -> usize {
    let mut tokens = Tokenizer::new(text);
    let params_per_object = match tokens.next_parsed::<usize>() {
        Some(Ok(count)) if count > 0 => count,
        _ => return 0,
    };
    let mut count = 0;
    while tokens.next_token().is_some() {
        tokens.by_ref().take(params_per_object - 1).for_each(drop);
        count += 1;
    }
    count
}

/// Counts the records of a list file.
pub fn count_objects_in(path: &Path) -> Result<usize, ObjectListError> {
    Ok(count_objects(&read(path)?))
}
