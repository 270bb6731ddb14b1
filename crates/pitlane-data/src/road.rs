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

//! Road strips made of bicubic bezier patches.
//!
//! Patches form a logical ring through their `next_patch` links. The links
//! are indices into the owning strip, so a malformed ring can be detected by
//! counting steps rather than by chasing pointers.

use pitlane_core::math::Vec3;
use serde::{Deserialize, Serialize};

/// Squared distance under which two patch corners are considered joined.
const JOIN_TOLERANCE_SQ: f32 = 1e-4;

/// Identifies one patch of one road strip of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatchRef {
    /// Index of the strip in the track's road list.
    pub road: usize,
    /// Index of the patch inside the strip.
    pub patch: usize,
}

impl PatchRef {
    /// Creates a new patch reference.
    pub fn new(road: usize, patch: usize) -> Self {
        Self { road, patch }
    }
}

/// A 4x4 bezier patch covering one segment of a drivable lane.
///
/// Row 0 is the front edge (in driving direction), row 3 the back edge;
/// column 0 is the left side, column 3 the right side.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadPatch {
    /// Control points, row-major.
    pub points: [[Vec3; 4]; 4],
    /// Length of the patch along the driving direction.
    pub length: f32,
    /// Accumulated distance from the lap start. Only meaningful on the strip
    /// holding the first lap sector.
    pub dist_from_start: f32,
    /// Index of the following patch in the same strip, if any.
    pub next_patch: Option<usize>,
    /// Racing line point for this patch, once computed.
    pub racing_line: Option<Vec3>,
}

impl RoadPatch {
    /// Creates a patch from its control points and measures its length.
    pub fn new(points: [[Vec3; 4]; 4]) -> Self {
        let mut patch = Self {
            points,
            length: 0.0,
            dist_from_start: 0.0,
            next_patch: None,
            racing_line: None,
        };
        patch.length = patch.measure_length();
        patch
    }

    /// Creates a flat patch by bilinear interpolation of its four corners.
    pub fn from_corners(fl: Vec3, fr: Vec3, bl: Vec3, br: Vec3) -> Self {
        let mut points = [[Vec3::ZERO; 4]; 4];
        for (i, row) in points.iter_mut().enumerate() {
            let v = i as f32 / 3.0;
            let left = fl + (bl - fl) * v;
            let right = fr + (br - fr) * v;
            for (j, point) in row.iter_mut().enumerate() {
                *point = left + (right - left) * (j as f32 / 3.0);
            }
        }
        Self::new(points)
    }

    /// Front-left corner.
    pub fn fl(&self) -> Vec3 {
        self.points[0][0]
    }

    /// Front-right corner.
    pub fn fr(&self) -> Vec3 {
        self.points[0][3]
    }

    /// Back-left corner.
    pub fn bl(&self) -> Vec3 {
        self.points[3][0]
    }

    /// Back-right corner.
    pub fn br(&self) -> Vec3 {
        self.points[3][3]
    }

    /// Average of the four corners.
    pub fn center(&self) -> Vec3 {
        (self.fl() + self.fr() + self.bl() + self.br()) * 0.25
    }

    /// Width of the back edge.
    pub fn width(&self) -> f32 {
        self.bl().distance_squared(self.br()).sqrt()
    }

    fn measure_length(&self) -> f32 {
        let front = (self.fl() + self.fr()) * 0.5;
        let back = (self.bl() + self.br()) * 0.5;
        front.distance_squared(back).sqrt()
    }

    /// Turns the patch around so it is driven in the opposite direction.
    pub fn reverse(&mut self) {
        let old = self.points;
        for (i, row) in self.points.iter_mut().enumerate() {
            for (j, point) in row.iter_mut().enumerate() {
                *point = old[3 - i][3 - j];
            }
        }
    }

    fn joins(&self, next: &RoadPatch) -> bool {
        self.fl().distance_squared(next.bl()) < JOIN_TOLERANCE_SQ
            && self.fr().distance_squared(next.br()) < JOIN_TOLERANCE_SQ
    }
}

/// An ordered sequence of patches forming one drivable lane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoadStrip {
    patches: Vec<RoadPatch>,
    closed: bool,
}

impl RoadStrip {
    /// Builds a strip, optionally reversing its driving direction, and links
    /// consecutive patches.
    pub fn new(mut patches: Vec<RoadPatch>, reverse: bool) -> Self {
        if reverse {
            patches.reverse();
            patches.iter_mut().for_each(RoadPatch::reverse);
        }

        let count = patches.len();
        for (i, patch) in patches.iter_mut().enumerate() {
            patch.next_patch = (i + 1 < count).then_some(i + 1);
        }

        let closed = count > 2 && patches[count - 1].joins(&patches[0]);
        if closed {
            patches[count - 1].next_patch = Some(0);
        }

        Self { patches, closed }
    }

    /// The patches of the strip in driving order.
    pub fn patches(&self) -> &[RoadPatch] {
        &self.patches
    }

    /// Mutable access to the patches.
    pub fn patches_mut(&mut self) -> &mut [RoadPatch] {
        &mut self.patches
    }

    /// Returns `true` if the last patch links back to the first.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of patches in the strip.
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Returns `true` if the strip has no patches.
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}
