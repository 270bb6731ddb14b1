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

//! # Physics Contracts
//!
//! Shape, collision object and motion state descriptions produced by the
//! track loader, and the [`CollisionWorld`] contract through which they are
//! registered with a simulation.
//!
//! Ownership is arena based: the track data owns every mesh, shape, object
//! and motion state and hands out the typed ids below. A `CollisionWorld`
//! only ever receives ids and borrowed views, never ownership.

use serde::{Deserialize, Serialize};

use crate::math::{Aabb, Quaternion, Vec3};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the arena slot this id refers to.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(
    /// Stable handle to a triangle mesh owned by the track data.
    MeshId
);
arena_id!(
    /// Stable handle to a collision shape owned by the track data.
    ShapeId
);
arena_id!(
    /// Stable handle to a collision object or rigid body owned by the track data.
    CollisionObjectId
);
arena_id!(
    /// Stable handle to a motion state owned by the track data.
    MotionStateId
);

/// A rigid transform: rotation followed by translation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Isometry {
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation.
    pub rotation: Quaternion,
}

impl Isometry {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quaternion::IDENTITY,
    };

    /// Creates a new transform.
    pub fn new(translation: Vec3, rotation: Quaternion) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Transforms a point from local to parent space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.rotate_vec3(point) + self.translation
    }

    /// Returns `true` if the transform is (numerically) the identity.
    pub fn is_identity(&self) -> bool {
        self.translation.length_squared() < 1e-12
            && self.rotation.same_rotation(Quaternion::IDENTITY, 1e-6)
    }
}

/// An indexed triangle soup used by static collision shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Triangles as vertex index triples.
    pub triangles: Vec<[u32; 3]>,
}

/// A child of a compound shape, placed relative to the compound origin.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundChild {
    /// Placement of the child inside the compound.
    pub transform: Isometry,
    /// The child shape.
    pub shape: CollisionShape,
}

/// Supported collision shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    /// A static triangle mesh tagged with the index of its track surface.
    TriangleMesh {
        /// The mesh the shape is built on.
        mesh: MeshId,
        /// Index into the track surface table.
        surface: usize,
    },
    /// Box with half-extents.
    Box {
        /// Half of the box size on each axis.
        half_extents: Vec3,
    },
    /// Sphere with radius.
    Sphere {
        /// Sphere radius.
        radius: f32,
    },
    /// Capsule aligned with the local Z axis.
    Capsule {
        /// Half of the distance between the two cap centers.
        half_height: f32,
        /// Cap radius.
        radius: f32,
    },
    /// Several shapes rigidly attached to one another.
    Compound {
        /// The child shapes.
        children: Vec<CompoundChild>,
    },
}

impl CollisionShape {
    /// Returns the surface index carried by the shape, if any.
    ///
    /// Simulation code uses this tag to look up friction and bump data.
    pub fn surface(&self) -> Option<usize> {
        match self {
            CollisionShape::TriangleMesh { surface, .. } => Some(*surface),
            _ => None,
        }
    }

    /// Local bounding box of a primitive or compound shape.
    ///
    /// Triangle meshes are not self-describing and return `None`.
    pub fn local_aabb(&self) -> Option<Aabb> {
        match self {
            CollisionShape::TriangleMesh { .. } => None,
            CollisionShape::Box { half_extents } => {
                Some(Aabb::from_center_half_extents(Vec3::ZERO, *half_extents))
            }
            CollisionShape::Sphere { radius } => Some(Aabb::from_center_half_extents(
                Vec3::ZERO,
                Vec3::ONE * *radius,
            )),
            CollisionShape::Capsule {
                half_height,
                radius,
            } => Some(Aabb::from_center_half_extents(
                Vec3::ZERO,
                Vec3::new(*radius, *radius, half_height + radius),
            )),
            CollisionShape::Compound { children } => children
                .iter()
                .filter_map(|child| {
                    let local = child.shape.local_aabb()?;
                    Aabb::from_points(
                        box_corners(&local).map(|c| child.transform.transform_point(c)),
                    )
                })
                .reduce(|a, b| a.merge(&b)),
        }
    }

    /// Computes the diagonal of the local inertia tensor for a given mass.
    ///
    /// Spheres and boxes use their exact tensors; capsules and compounds are
    /// approximated by their bounding box. Triangle meshes are static only.
    pub fn local_inertia(&self, mass: f32) -> Vec3 {
        match self {
            CollisionShape::TriangleMesh { .. } => Vec3::ZERO,
            CollisionShape::Sphere { radius } => Vec3::ONE * (0.4 * mass * radius * radius),
            _ => match self.local_aabb() {
                Some(aabb) => box_inertia(aabb.size(), mass),
                None => Vec3::ZERO,
            },
        }
    }
}

fn box_inertia(size: Vec3, mass: f32) -> Vec3 {
    let (lx2, ly2, lz2) = (size.x * size.x, size.y * size.y, size.z * size.z);
    Vec3::new(ly2 + lz2, lx2 + lz2, lx2 + ly2) * (mass / 12.0)
}

fn box_corners(aabb: &Aabb) -> [Vec3; 8] {
    let (a, b) = (aabb.min, aabb.max);
    [
        Vec3::new(a.x, a.y, a.z),
        Vec3::new(b.x, a.y, a.z),
        Vec3::new(a.x, b.y, a.z),
        Vec3::new(b.x, b.y, a.z),
        Vec3::new(a.x, a.y, b.z),
        Vec3::new(b.x, a.y, b.z),
        Vec3::new(a.x, b.y, b.z),
        Vec3::new(b.x, b.y, b.z),
    ]
}

/// Whether the simulation integrates an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationState {
    /// The object takes part in the simulation.
    Active,
    /// The object only participates in collision queries and is never moved.
    DisableSimulation,
}

/// Persistent transform record read by the simulation on every step.
///
/// Stored in the track data arena so that it outlives the rigid body that
/// references it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionState {
    /// World position of the visual origin.
    pub position: Vec3,
    /// World rotation.
    pub rotation: Quaternion,
    /// Offset from the mass center back to the visual origin.
    pub mass_center_offset: Vec3,
}

/// Simulation parameters of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBodyParams {
    /// Mass in kg.
    pub mass: f32,
    /// Diagonal of the local inertia tensor.
    pub inertia: Vec3,
    /// Friction coefficient.
    pub friction: f32,
    /// Contact processing threshold; zero reports contacts immediately.
    pub contact_processing_threshold: f32,
    /// The motion state driving the body.
    pub motion_state: MotionStateId,
}

/// What kind of physics object a [`CollisionObject`] is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionObjectKind {
    /// A collision-only object.
    Static,
    /// A dynamic rigid body.
    Rigid(RigidBodyParams),
}

/// A collision object or rigid body as registered with a [`CollisionWorld`].
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionObject {
    /// The shape of the object.
    pub shape: ShapeId,
    /// Initial world transform.
    pub transform: Isometry,
    /// Simulation activation.
    pub activation: ActivationState,
    /// Surface tag copied from the shape, used for friction lookups.
    pub surface: Option<usize>,
    /// Static object or rigid body.
    pub kind: CollisionObjectKind,
}

/// Interface contract for a physics world receiving track objects.
///
/// Implementations hold non-owning references (ids) only. An id is always
/// registered after the object it names has been stored by its owner.
pub trait CollisionWorld {
    /// Registers a collision-only object.
    fn add_collision_object(&mut self, id: CollisionObjectId, object: &CollisionObject);

    /// Registers a dynamic rigid body.
    fn add_rigid_body(&mut self, id: CollisionObjectId, object: &CollisionObject);
}
