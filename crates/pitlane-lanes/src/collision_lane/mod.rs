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

//! Collision Integrator
//!
//! Places a built body in the scene graph and turns it into a static
//! collision object, a rigid body or a child of the compound track shape.
//! Every physics primitive is stored in the track's arenas before its id is
//! handed to the collision world.

use pitlane_core::math::{Quaternion, Vec3};
use pitlane_core::physics::{
    ActivationState, CollisionObject, CollisionObjectId, CollisionObjectKind, CollisionShape,
    CollisionWorld, CompoundChild, Isometry, MotionState, RigidBodyParams, ShapeId,
};
use pitlane_data::{SceneNode, TrackData};

use crate::body_lane::Body;

/// Friction applied to every rigid body.
pub const RIGID_BODY_FRICTION: f32 = 0.9;

/// Where an object is placed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    /// World position of the object origin.
    pub position: Vec3,
    /// World rotation.
    pub rotation: Quaternion,
    /// The object carries its own transform. Static geometry without one is
    /// pre-transformed and added straight to the static root.
    pub instanced: bool,
}

/// Turns bodies into scene nodes and physics objects.
#[derive(Debug, Default)]
pub struct CollisionIntegrator {
    dynamic_objects: bool,
    track_shape: Option<Vec<CompoundChild>>,
}

impl CollisionIntegrator {
    /// Creates an integrator.
    ///
    /// With `dynamic_objects` off, massive bodies are frozen in place. With
    /// `compound_track_shape` on, static collidables are gathered into one
    /// compound shape inserted by [`CollisionIntegrator::finish`].
    pub fn new(dynamic_objects: bool, compound_track_shape: bool) -> Self {
        Self {
            dynamic_objects,
            track_shape: compound_track_shape.then(Vec::new),
        }
    }

    /// Adds a body to the scene and, if collidable, to the physics world.
    pub fn integrate(
        &mut self,
        body: &Body,
        placement: Placement,
        track: &mut TrackData,
        world: &mut dyn CollisionWorld,
    ) {
        let Placement {
            mut position,
            rotation,
            instanced,
        } = placement;

        if body.is_static() {
            if instanced {
                let node = track
                    .static_node
                    .push_child(Isometry::new(position, rotation));
                add_body(node, body);
            } else {
                add_body(&mut track.static_node, body);
            }

            if let Some(shape) = body.shape.filter(|_| body.collidable) {
                self.add_static(shape, Isometry::new(position, rotation), track, world);
            }
            return;
        }

        // Rotation happens around the mass center, not the body origin.
        position = position - body.center + rotation.rotate_vec3(body.center);
        let transform = Isometry::new(position, rotation);

        if self.dynamic_objects {
            if let Some(shape) = body.shape {
                let motion_state = track.physics.add_motion_state(MotionState {
                    position,
                    rotation,
                    mass_center_offset: -body.center,
                });
                let object = CollisionObject {
                    shape,
                    transform,
                    activation: ActivationState::Active,
                    surface: None,
                    kind: CollisionObjectKind::Rigid(RigidBodyParams {
                        mass: body.mass,
                        inertia: body.inertia,
                        friction: RIGID_BODY_FRICTION,
                        contact_processing_threshold: 0.0,
                        motion_state,
                    }),
                };
                let id = track.physics.add_object(object);
                if let Some(object) = track.physics.object(id) {
                    world.add_rigid_body(id, object);
                }
            }

            let handle = track.dynamic_node.add_node();
            if let Some(node) = track.dynamic_node.node_mut(handle) {
                node.transform = transform;
                add_body(node, body);
            }
            track.body_nodes.push(handle);
        } else {
            if let Some(shape) = body.shape {
                insert_static_object(shape, transform, track, world);
            }
            add_body(track.static_node.push_child(transform), body);
        }
    }

    fn add_static(
        &mut self,
        shape: ShapeId,
        transform: Isometry,
        track: &mut TrackData,
        world: &mut dyn CollisionWorld,
    ) {
        match self.track_shape.as_mut() {
            Some(children) => {
                if let Some(shape) = track.physics.shape(shape) {
                    children.push(CompoundChild {
                        transform,
                        shape: shape.clone(),
                    });
                }
            }
            None => {
                insert_static_object(shape, transform, track, world);
            }
        }
    }

    /// Inserts the compound track shape, if the integrator gathers one.
    ///
    /// Only the first call inserts anything.
    pub fn finish(
        &mut self,
        track: &mut TrackData,
        world: &mut dyn CollisionWorld,
    ) -> Option<CollisionObjectId> {
        let children = self.track_shape.take()?;
        log::debug!("Track shape has {} child shapes", children.len());
        let shape = track
            .physics
            .add_shape(CollisionShape::Compound { children });
        Some(insert_static_object(shape, Isometry::IDENTITY, track, world))
    }
}

fn insert_static_object(
    shape: ShapeId,
    transform: Isometry,
    track: &mut TrackData,
    world: &mut dyn CollisionWorld,
) -> CollisionObjectId {
    let surface = track.physics.shape(shape).and_then(CollisionShape::surface);
    let id = track.physics.add_object(CollisionObject {
        shape,
        transform,
        activation: ActivationState::DisableSimulation,
        surface,
        kind: CollisionObjectKind::Static,
    });
    if let Some(object) = track.physics.object(id) {
        world.add_collision_object(id, object);
    }
    id
}

fn add_body(node: &mut SceneNode, body: &Body) {
    node.drawlist.push(body.layer, body.drawable.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pitlane_core::asset::AssetHandle;
    use pitlane_core::math::{direction, FRAC_PI_2};
    use pitlane_data::{DrawLayer, Drawable, Model, RecordingWorld, VertexArray};

    fn body(mass: f32, center: Vec3, track: &mut TrackData, shape: Option<CollisionShape>) -> Body {
        Body {
            name: "test".into(),
            drawable: Drawable::new(AssetHandle::new(Model::from_vertex_array(
                VertexArray::default(),
            ))),
            layer: DrawLayer::NormalNoBlend,
            mass,
            collidable: shape.is_some(),
            inertia: Vec3::ONE,
            center,
            shape: shape.map(|s| track.physics.add_shape(s)),
        }
    }

    fn trimesh(track: &mut TrackData, surface: usize) -> CollisionShape {
        let mesh = track.physics.add_mesh(Default::default());
        CollisionShape::TriangleMesh { mesh, surface }
    }

    #[test]
    fn test_render_only_body() {
        let mut track = TrackData::new();
        let mut world = RecordingWorld::new();
        let body = body(0.0, Vec3::ZERO, &mut track, None);

        CollisionIntegrator::new(true, false).integrate(&body, Placement::default(), &mut track, &mut world);
        assert!(world.registered().is_empty());
        assert_eq!(track.static_node.drawlist.len(), 1);
    }

    #[test]
    fn test_static_collidable_keeps_surface_tag() {
        let mut track = TrackData::new();
        let mut world = RecordingWorld::new();
        let shape = trimesh(&mut track, 2);
        let body = body(0.0, Vec3::ZERO, &mut track, Some(shape));
        let placement = Placement {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quaternion::IDENTITY,
            instanced: true,
        };

        CollisionIntegrator::new(true, false).integrate(&body, placement, &mut track, &mut world);
        assert_eq!(world.static_object_count(), 1);
        let object = &track.physics.objects()[0];
        assert_eq!(object.activation, ActivationState::DisableSimulation);
        assert_eq!(object.surface, Some(2));
        assert_eq!(track.static_node.children().len(), 1);
        assert_eq!(track.static_node.children()[0].transform.translation, placement.position);
    }

    #[test]
    fn test_dynamic_body_tracks_mass_center() {
        let mut track = TrackData::new();
        let mut world = RecordingWorld::new();
        let center = Vec3::new(1.0, 0.0, 0.0);
        let body = body(10.0, center, &mut track, Some(CollisionShape::Sphere { radius: 1.0 }));
        let placement = Placement {
            position: Vec3::new(5.0, 0.0, 0.0),
            rotation: Quaternion::from_axis_angle(direction::UP, FRAC_PI_2),
            instanced: true,
        };

        CollisionIntegrator::new(true, false).integrate(&body, placement, &mut track, &mut world);

        assert_eq!(world.rigid_body_count(), 1);
        let state = track.physics.motion_states()[0];
        // 5 - 1 + rotate(1, 0, 0) = (4, 1, 0)
        assert_relative_eq!(state.position.x, 4.0, epsilon = 1e-5);
        assert_relative_eq!(state.position.y, 1.0, epsilon = 1e-5);
        assert_eq!(state.mass_center_offset, -center);
        match track.physics.objects()[0].kind {
            CollisionObjectKind::Rigid(params) => {
                assert_relative_eq!(params.friction, RIGID_BODY_FRICTION);
                assert_eq!(params.contact_processing_threshold, 0.0);
            }
            CollisionObjectKind::Static => panic!("expected a rigid body"),
        }
        assert_eq!(track.body_nodes.len(), 1);
        assert_eq!(track.dynamic_node.drawable_count(), 1);
    }

    #[test]
    fn test_frozen_body_uses_corrected_transform() {
        let mut track = TrackData::new();
        let mut world = RecordingWorld::new();
        let center = Vec3::new(0.0, 1.0, 0.0);
        let body = body(10.0, center, &mut track, Some(CollisionShape::Sphere { radius: 1.0 }));
        let placement = Placement {
            position: Vec3::ZERO,
            rotation: Quaternion::from_axis_angle(direction::UP, FRAC_PI_2),
            instanced: false,
        };

        CollisionIntegrator::new(false, false).integrate(&body, placement, &mut track, &mut world);

        assert_eq!(world.rigid_body_count(), 0);
        assert_eq!(world.static_object_count(), 1);
        let registered = &world.registered()[0];
        // 0 - (0, 1, 0) + (-1, 0, 0)
        assert_relative_eq!(registered.transform.translation.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(registered.transform.translation.y, -1.0, epsilon = 1e-5);
        assert!(track.physics.motion_states().is_empty());
        assert_eq!(track.static_node.children().len(), 1);
    }

    #[test]
    fn test_compound_track_shape() {
        let mut track = TrackData::new();
        let mut world = RecordingWorld::new();
        let mut integrator = CollisionIntegrator::new(true, true);
        for surface in 0..3 {
            let shape = trimesh(&mut track, surface);
            let body = body(0.0, Vec3::ZERO, &mut track, Some(shape));
            integrator.integrate(&body, Placement::default(), &mut track, &mut world);
        }
        assert!(world.registered().is_empty());

        let id = integrator.finish(&mut track, &mut world).unwrap();
        assert_eq!(world.static_object_count(), 1);
        let object = track.physics.object(id).unwrap();
        match track.physics.shape(object.shape) {
            Some(CollisionShape::Compound { children }) => assert_eq!(children.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
        assert!(integrator.finish(&mut track, &mut world).is_none());
        assert!(CollisionIntegrator::new(true, false)
            .finish(&mut track, &mut world)
            .is_none());
    }
}
