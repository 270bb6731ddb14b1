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

//! Reader for `roads.trk`.
//!
//! The file starts with the number of strips. Each strip is a patch count
//! followed by 16 control points per patch, `x y z` each, row-major with row
//! 0 on the front edge.

use std::fs;
use std::path::Path;

use pitlane_core::math::Vec3;
use pitlane_data::{RoadPatch, RoadStrip};

use crate::error::RoadsError;
use crate::tokens::Tokenizer;

/// Builds one road strip from a token stream.
pub trait RoadStripReader {
    /// Reads the next strip, reversing its driving direction if asked.
    fn read_strip(&self, tokens: &mut Tokenizer, reverse: bool) -> Result<RoadStrip, RoadsError>;
}

/// Reads strips of bicubic bezier patches.
#[derive(Debug, Clone, Copy, Default)]
pub struct BezierStripReader;

impl RoadStripReader for BezierStripReader {
    fn read_strip(&self, tokens: &mut Tokenizer, reverse: bool) -> Result<RoadStrip, RoadsError> {
        let count: usize = next(tokens, "patch count")?;
        let mut patches = Vec::with_capacity(count);
        for _ in 0..count {
            let mut points = [[Vec3::ZERO; 4]; 4];
            for point in points.iter_mut().flatten() {
                let x = next(tokens, "control point")?;
                let y = next(tokens, "control point")?;
                let z = next(tokens, "control point")?;
                *point = Vec3::new(x, y, z);
            }
            patches.push(RoadPatch::new(points));
        }
        Ok(RoadStrip::new(patches, reverse))
    }
}

fn next<T: std::str::FromStr>(tokens: &mut Tokenizer, what: &'static str) -> Result<T, RoadsError> {
    match tokens.next_parsed() {
        Some(Ok(value)) => Ok(value),
        Some(Err(token)) => Err(RoadsError::InvalidToken { what, token }),
        None => Err(RoadsError::UnexpectedEof(what)),
    }
}

/// Reads every strip of a roads file.
pub fn read_roads(
    path: &Path,
    reverse: bool,
    reader: &dyn RoadStripReader,
) -> Result<Vec<RoadStrip>, RoadsError> {
    let text = fs::read_to_string(path).map_err(|source| RoadsError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_roads(&text, reverse, reader)
}

/// Reads every strip from already loaded text.
pub fn parse_roads(
    text: &str,
    reverse: bool,
    reader: &dyn RoadStripReader,
) -> Result<Vec<RoadStrip>, RoadsError> {
    let mut tokens = Tokenizer::new(text);
    let count: usize = next(&mut tokens, "road count")?;
    (0..count)
        .map(|_| reader.read_strip(&mut tokens, reverse))
        .collect()
}
