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

//! Racing-Line Builder
//!
//! Computes a racing line for each road strip through a pluggable solver
//! and emits a textured ribbon along it into the racing line scene node.
//! Strips the solver cannot handle still get a ribbon along their center.

use pitlane_core::asset::AssetHandle;
use pitlane_core::math::{Vec3, EPSILON};
use pitlane_data::{DrawLayer, Drawable, Model, RoadPatch, RoadStrip, TrackData, VertexArray};

use crate::error::RacingLineError;

/// Half the width of the racing line ribbon.
const RIBBON_HALF_WIDTH: f32 = 0.25;

/// Computes one racing line point per patch of a strip.
pub trait RacingLineSolver {
    /// Returns the racing line points, in patch order.
    fn solve(&self, strip: &RoadStrip) -> Result<Vec<Vec3>, RacingLineError>;
}

/// Relaxes a line across each patch towards the average of its neighbours,
/// which shortens it while keeping it on the road.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterlineSolver {
    /// Number of relaxation passes.
    pub iterations: usize,
    /// Fraction of the remaining distance moved per pass.
    pub stiffness: f32,
    /// Fraction of the road width kept clear on each side.
    pub margin: f32,
}

impl Default for CenterlineSolver {
    fn default() -> Self {
        Self {
            iterations: 200,
            stiffness: 0.5,
            margin: 0.1,
        }
    }
}

impl RacingLineSolver for CenterlineSolver {
    fn solve(&self, strip: &RoadStrip) -> Result<Vec<Vec3>, RacingLineError> {
        let n = strip.len();
        if n < 3 {
            return Err(RacingLineError::TooFewPatches(n));
        }
        if !strip.is_closed() {
            return Err(RacingLineError::OpenStrip);
        }

        let edges: Vec<(Vec3, Vec3)> = strip.patches().iter().map(lateral_edge).collect();
        let lo = self.margin.clamp(0.0, 0.5);
        let hi = 1.0 - lo;
        let mut t = vec![0.5f32; n];

        let at = |t: &[f32], i: usize| {
            let (left, right) = edges[i];
            left + (right - left) * t[i]
        };

        for _ in 0..self.iterations {
            for i in 0..n {
                let prev = at(&t, (i + n - 1) % n);
                let next = at(&t, (i + 1) % n);
                let target = (prev + next) * 0.5;
                let (left, right) = edges[i];
                let across = right - left;
                let width2 = across.length_squared();
                if width2 < EPSILON {
                    continue;
                }
                let wanted = ((target - left).dot(across) / width2).clamp(lo, hi);
                t[i] += self.stiffness * (wanted - t[i]);
            }
        }

        Ok((0..n).map(|i| at(&t, i)).collect())
    }
}

/// The segment across the middle of a patch, left to right.
fn lateral_edge(patch: &RoadPatch) -> (Vec3, Vec3) {
    (
        (patch.fl() + patch.bl()) * 0.5,
        (patch.fr() + patch.br()) * 0.5,
    )
}

/// Emits racing line data and geometry into a track.
#[derive(Debug, Default)]
pub struct RacingLineBuilder;

impl RacingLineBuilder {
    /// Creates a builder.
    pub fn new() -> Self {
        Self
    }

    /// Solves and draws the racing line of every road strip.
    ///
    /// Returns how many strips received a solved racing line.
    pub fn build(&self, track: &mut TrackData, solver: &dyn RacingLineSolver) -> usize {
        let mut solved = 0;
        for (index, road) in track.roads.iter_mut().enumerate() {
            match solver.solve(road) {
                Ok(points) => {
                    for (patch, point) in road.patches_mut().iter_mut().zip(points) {
                        patch.racing_line = Some(point);
                    }
                    solved += 1;
                }
                Err(err) => log::debug!("No racing line for road {index}: {err}"),
            }
        }

        for index in 0..track.roads.len() {
            let Some(mesh) = ribbon(&track.roads[index]) else {
                continue;
            };
            let model = AssetHandle::new(Model::from_vertex_array(mesh));
            track.models.push(model.clone());

            let mut drawable = Drawable::new(model);
            drawable.diffuse = track.racingline_texture.clone();
            drawable.decal = true;
            track
                .racingline_node
                .drawlist
                .push(DrawLayer::NormalBlend, drawable);
        }
        solved
    }
}

/// A flat ribbon through the racing line points of a strip, one quad per
/// patch. Patches without a racing line contribute their center.
fn ribbon(strip: &RoadStrip) -> Option<VertexArray> {
    let patches = strip.patches();
    if patches.is_empty() {
        return None;
    }
    let point = |patch: &RoadPatch| patch.racing_line.unwrap_or_else(|| patch.center());

    let mut mesh = VertexArray::default();
    for patch in patches {
        let start = point(patch);
        let end = match patch.next_patch.and_then(|next| patches.get(next)) {
            Some(next) => point(next),
            None => (patch.fl() + patch.fr()) * 0.5,
        };
        let (left, right) = lateral_edge(patch);
        let side = (right - left).normalize() * RIBBON_HALF_WIDTH;
        let normal = (end - start).cross(side).normalize();

        let base = mesh.vertex_count() as u32;
        for (corner, u, v) in [
            (start - side, 0.0, 0.0),
            (start + side, 1.0, 0.0),
            (end - side, 0.0, 1.0),
            (end + side, 1.0, 1.0),
        ] {
            mesh.vertices.extend_from_slice(&[corner.x, corner.y, corner.z]);
            mesh.normals.extend_from_slice(&[normal.x, normal.y, normal.z]);
            mesh.tex_coords.extend_from_slice(&[u, v]);
        }
        mesh.faces
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }
    Some(mesh)
}
