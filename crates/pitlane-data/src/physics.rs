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

//! Ownership arenas for physics primitives.
//!
//! The track data is the sole owner of every mesh, shape, motion state and
//! collision object. Physics worlds only ever receive ids into these arenas.

use pitlane_core::physics::{
    CollisionObject, CollisionObjectId, CollisionObjectKind, CollisionShape, CollisionWorld,
    Isometry, MeshId, MotionState, MotionStateId, ShapeId, TriangleMesh,
};

/// Arenas owning the physics primitives of a track.
#[derive(Debug, Clone, Default)]
pub struct PhysicsStore {
    meshes: Vec<TriangleMesh>,
    shapes: Vec<CollisionShape>,
    motion_states: Vec<MotionState>,
    objects: Vec<CollisionObject>,
}

impl PhysicsStore {
    /// Creates empty arenas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a triangle mesh.
    pub fn add_mesh(&mut self, mesh: TriangleMesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() as u32 - 1)
    }

    /// Takes ownership of a collision shape.
    pub fn add_shape(&mut self, shape: CollisionShape) -> ShapeId {
        self.shapes.push(shape);
        ShapeId(self.shapes.len() as u32 - 1)
    }

    /// Takes ownership of a motion state.
    pub fn add_motion_state(&mut self, state: MotionState) -> MotionStateId {
        self.motion_states.push(state);
        MotionStateId(self.motion_states.len() as u32 - 1)
    }

    /// Takes ownership of a collision object.
    pub fn add_object(&mut self, object: CollisionObject) -> CollisionObjectId {
        self.objects.push(object);
        CollisionObjectId(self.objects.len() as u32 - 1)
    }

    /// Looks up a mesh.
    pub fn mesh(&self, id: MeshId) -> Option<&TriangleMesh> {
        self.meshes.get(id.index())
    }

    /// Looks up a shape.
    pub fn shape(&self, id: ShapeId) -> Option<&CollisionShape> {
        self.shapes.get(id.index())
    }

    /// Looks up a motion state.
    pub fn motion_state(&self, id: MotionStateId) -> Option<&MotionState> {
        self.motion_states.get(id.index())
    }

    /// Looks up a collision object.
    pub fn object(&self, id: CollisionObjectId) -> Option<&CollisionObject> {
        self.objects.get(id.index())
    }

    /// All owned meshes.
    pub fn meshes(&self) -> &[TriangleMesh] {
        &self.meshes
    }

    /// All owned shapes.
    pub fn shapes(&self) -> &[CollisionShape] {
        &self.shapes
    }

    /// All owned motion states.
    pub fn motion_states(&self) -> &[MotionState] {
        &self.motion_states
    }

    /// All owned collision objects.
    pub fn objects(&self) -> &[CollisionObject] {
        &self.objects
    }

    /// Releases every primitive at once.
    pub fn clear(&mut self) {
        self.meshes.clear();
        self.shapes.clear();
        self.motion_states.clear();
        self.objects.clear();
    }
}

/// One registration received by a [`RecordingWorld`].
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredObject {
    /// Id of the object in the owning store.
    pub id: CollisionObjectId,
    /// `true` for rigid bodies, `false` for collision-only objects.
    pub rigid: bool,
    /// Initial world transform.
    pub transform: Isometry,
    /// Surface tag of the object.
    pub surface: Option<usize>,
}

/// A headless [`CollisionWorld`] that records every registration.
#[derive(Debug, Clone, Default)]
pub struct RecordingWorld {
    registered: Vec<RegisteredObject>,
}

impl RecordingWorld {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registrations in insertion order.
    pub fn registered(&self) -> &[RegisteredObject] {
        &self.registered
    }

    /// Number of rigid bodies registered.
    pub fn rigid_body_count(&self) -> usize {
        self.registered.iter().filter(|r| r.rigid).count()
    }

    /// Number of collision-only objects registered.
    pub fn static_object_count(&self) -> usize {
        self.registered.iter().filter(|r| !r.rigid).count()
    }

    fn record(&mut self, id: CollisionObjectId, object: &CollisionObject, rigid: bool) {
        log::trace!("Registering collision object {:?} (rigid: {})", id, rigid);
        self.registered.push(RegisteredObject {
            id,
            rigid,
            transform: object.transform,
            surface: object.surface,
        });
    }
}

impl CollisionWorld for RecordingWorld {
    fn add_collision_object(&mut self, id: CollisionObjectId, object: &CollisionObject) {
        self.record(id, object, false);
    }

    fn add_rigid_body(&mut self, id: CollisionObjectId, object: &CollisionObject) {
        debug_assert!(matches!(object.kind, CollisionObjectKind::Rigid(_)));
        self.record(id, object, true);
    }
}
