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

//! Lap/Start Metadata Resolver
//!
//! Reads the start grid and the lap timing sectors from `track.txt` and
//! adapts both when the track is driven in reverse.

use pitlane_core::math::{degrees_to_radians, direction, Quaternion, Vec3, FRAC_PI_2, PI};
use pitlane_core::Diagnostics;
use pitlane_data::{PatchRef, RoadStrip, StartPosition, TrackData};
use pitlane_io::ConfigNode;

use crate::error::LapError;

/// Squared distance beyond which no patch is considered for sector 0.
const LAP0_SEARCH_RADIUS_SQ: f32 = 1e7;

/// Converts authored start orientation angles (degrees) to an orientation.
///
/// The Euler rotation is re-expressed in the engine basis by moving its
/// vector part one axis over, then turned 90 degrees about the vertical axis
/// because authored grids historically face the wrong way.
pub fn start_orientation(angles: Vec3) -> Quaternion {
    let q = Quaternion::from_euler_zyx(
        degrees_to_radians(angles.x),
        degrees_to_radians(angles.y),
        degrees_to_radians(angles.z),
    );
    let orient = Quaternion::new(q.z, q.x, q.y, q.w);
    Quaternion::from_axis_angle(direction::UP, FRAC_PI_2) * orient
}

/// Reads `start position N` / `start orientation N` pairs until a position
/// is missing.
///
/// Positions are authored as `y, z, x`. Reversal turns every slot around
/// and reverses the grid order.
pub fn load_start_positions(info: &ConfigNode, reverse: bool) -> Result<Vec<StartPosition>, LapError> {
    let mut positions = Vec::new();
    for n in 0.. {
        let Some(raw) = info.try_get::<Vec3>(&format!("start position {n}"))? else {
            break;
        };
        let angles = info
            .try_get::<Vec3>(&format!("start orientation {n}"))?
            .unwrap_or(Vec3::ZERO);
        positions.push(StartPosition {
            position: Vec3::new(raw.z, raw.x, raw.y),
            orientation: start_orientation(angles),
        });
    }

    if positions.is_empty() {
        return Err(LapError::NoStartPositions);
    }

    if reverse {
        let turn = Quaternion::from_axis_angle(direction::UP, PI);
        for slot in positions.iter_mut() {
            slot.orientation = turn * slot.orientation;
        }
        positions.reverse();
    }
    Ok(positions)
}

/// Resolves the lap timing sectors into patch references and computes the
/// distance from the start line for the strip holding sector 0.
///
/// A track without `lap sequences` loads without lap timing.
pub fn load_lap_sections(
    info: &ConfigNode,
    track: &mut TrackData,
    diagnostics: &mut Diagnostics,
) -> Result<(), LapError> {
    let count: usize = info.try_get("lap sequences")?.unwrap_or(0);

    track.lap.clear();
    for sequence in 0..count {
        let raw: Vec<f32> = info.require(&format!("lap sequence {sequence}"))?;
        let (road, patch) = index_pair(&raw).ok_or(LapError::InvalidLapSequence(sequence))?;

        let strip = track.roads.get(road).ok_or(LapError::RoadOutOfRange {
            sequence,
            road,
            roads: track.roads.len(),
        })?;
        let patches = strip.len();
        if patch >= patches {
            return Err(LapError::PatchOutOfRange {
                sequence,
                patch,
                patches,
            });
        }

        let patch = if track.reverse {
            (patches - patch) % patches
        } else {
            patch
        };
        track.lap.push(PatchRef::new(road, patch));
    }

    if track.lap.is_empty() {
        diagnostics.info("No lap sequence found. Lap timing will not be possible.");
        return Ok(());
    }

    if track.reverse {
        // Keep sector 0 in place; 1 2 3 4 becomes 1 4 3 2.
        track.lap[1..].reverse();
        if let Some(lap0) = patch_ahead_of_start(track) {
            track.lap[0] = lap0;
        }
    }

    let start = track.lap[0];
    if let Some(strip) = track.roads.get_mut(start.road) {
        if !accumulate_distance(strip, start.patch) {
            diagnostics.warn(format!(
                "Patch ring of road {} does not lead back to the start line",
                start.road
            ));
        }
    }

    diagnostics.info(format!("Track timing sectors: {count}"));
    Ok(())
}

/// Reads the road and patch index of a lap sequence. Trailing values are
/// ignored.
fn index_pair(raw: &[f32]) -> Option<(usize, usize)> {
    match raw {
        [road, patch, ..] if *road >= 0.0 && *patch >= 0.0 => Some((*road as usize, *patch as usize)),
        _ => None,
    }
}

/// Finds the nearest patch ahead of the pole position.
///
/// Road geometry is stored in the authored `y, z, x` basis, so the pole
/// position and heading are mapped back into it first.
fn patch_ahead_of_start(track: &TrackData) -> Option<PatchRef> {
    let pole = track.start_positions.first()?;
    let dir = pole.orientation.rotate_vec3(direction::FORWARD);
    let pos = pole.position;
    let bpos = Vec3::new(pos.y, pos.z, pos.x);
    let bdir = Vec3::new(dir.y, dir.z, dir.x);

    let mut best = None;
    let mut min_len2 = LAP0_SEARCH_RADIUS_SQ;
    for (road, strip) in track.roads.iter().enumerate() {
        for (index, patch) in strip.patches().iter().enumerate() {
            let offset = patch.bl() - bpos;
            let len2 = offset.length_squared();
            if offset.dot(bdir) > 0.0 && len2 < min_len2 {
                min_len2 = len2;
                best = Some(PatchRef::new(road, index));
            }
        }
    }
    best
}

/// Walks the patch ring from `start`, storing the distance from the start
/// line in every patch.
///
/// The walk takes at most one step per patch. Returns `false` if the ring
/// did not close on `start` within that bound (open strips end normally).
fn accumulate_distance(strip: &mut RoadStrip, start: usize) -> bool {
    let bound = strip.len();
    let patches = strip.patches_mut();
    let Some(first) = patches.get_mut(start) else {
        return false;
    };
    first.dist_from_start = 0.0;
    let mut total = first.length;
    let mut current = first.next_patch;

    for _ in 0..bound {
        match current {
            None => return true,
            Some(index) if index == start => return true,
            Some(index) => {
                let Some(patch) = patches.get_mut(index) else {
                    return false;
                };
                patch.dist_from_start = total;
                total += patch.length;
                current = patch.next_patch;
            }
        }
    }
    false
}
