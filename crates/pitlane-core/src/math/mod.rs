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

//! Foundational math library for the track pipeline.
//!
//! The track files are authored in a right-handed, Z-up basis where `+X` is
//! the forward direction of a car placed at a start position.

/// A small constant used for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, PI};

/// Multiplicative factor to convert degrees to radians.
pub const DEG_TO_RAD: f32 = PI / 180.0;

pub mod geometry;
pub mod quaternion;
pub mod vector;

pub use self::geometry::Aabb;
pub use self::quaternion::Quaternion;
pub use self::vector::Vec3;

/// Basis directions of the engine coordinate system.
pub mod direction {
    use super::Vec3;

    /// Forward direction of a car in its rest orientation.
    pub const FORWARD: Vec3 = Vec3::X;
    /// Vertical axis.
    pub const UP: Vec3 = Vec3::Z;
}

/// Converts an angle from degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}
