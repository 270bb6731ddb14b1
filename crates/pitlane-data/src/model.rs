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

//! CPU-side meshes and their bounding metrics.

use std::ops::{Add, AddAssign};

use pitlane_core::asset::Asset;
use pitlane_core::math::{Aabb, Vec3};
use pitlane_core::physics::TriangleMesh;

/// Extra margin added to the bounding radius of a mesh.
const RADIUS_MARGIN: f32 = 0.001;

/// Flat vertex buffers of a triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexArray {
    /// Positions, three floats per vertex.
    pub vertices: Vec<f32>,
    /// Normals, three floats per vertex (may be empty).
    pub normals: Vec<f32>,
    /// Texture coordinates, two floats per vertex (may be empty).
    pub tex_coords: Vec<f32>,
    /// Triangle list indices into the vertex buffers.
    pub faces: Vec<u32>,
}

impl VertexArray {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.faces.len() / 3
    }

    /// Iterates over vertex positions.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
    }

    /// Converts the buffers into a collision triangle mesh.
    pub fn to_triangle_mesh(&self) -> TriangleMesh {
        TriangleMesh {
            vertices: self.positions().collect(),
            triangles: self
                .faces
                .chunks_exact(3)
                .map(|f| [f[0], f[1], f[2]])
                .collect(),
        }
    }
}

impl AddAssign<&VertexArray> for VertexArray {
    /// Appends `rhs`. Vertices are not deduplicated and the faces of `rhs`
    /// are re-indexed past the existing vertices.
    ///
    /// An attribute present on only one side is zero-filled on the other, so
    /// normals and texture coordinates stay aligned with their vertices.
    fn add_assign(&mut self, rhs: &VertexArray) {
        let own = self.vertex_count();
        let added = rhs.vertex_count();
        append_attribute(&mut self.normals, own, &rhs.normals, added, 3);
        append_attribute(&mut self.tex_coords, own, &rhs.tex_coords, added, 2);
        self.vertices.extend_from_slice(&rhs.vertices[..added * 3]);
        let offset = own as u32;
        self.faces.extend(rhs.faces.iter().map(|f| f + offset));
    }
}

impl Add for &VertexArray {
    type Output = VertexArray;

    /// Concatenates two meshes into a new one.
    fn add(self, rhs: Self) -> VertexArray {
        let mut merged = self.clone();
        merged += rhs;
        merged
    }
}

/// Appends a per-vertex attribute of `width` floats. A buffer that does not
/// cover all of its vertices counts as missing; if both sides miss it the
/// attribute is dropped.
fn append_attribute(dst: &mut Vec<f32>, own: usize, src: &[f32], added: usize, width: usize) {
    let dst_has = !dst.is_empty() && dst.len() == own * width;
    let src_has = !src.is_empty() && src.len() == added * width;
    if !dst_has && !src_has {
        dst.clear();
        return;
    }
    dst.resize(own * width, 0.0);
    if src_has {
        dst.extend_from_slice(src);
    } else {
        dst.resize((own + added) * width, 0.0);
    }
}

/// Bounding metrics of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshMetrics {
    /// Axis aligned bounds of the vertices.
    pub bounds: Aabb,
    /// Bounding sphere radius around the bounds center.
    pub radius: f32,
}

/// A renderable mesh with its cached metrics.
#[derive(Debug, Clone, Default)]
pub struct Model {
    mesh: VertexArray,
    metrics: Option<MeshMetrics>,
}

impl Asset for Model {}

impl Model {
    /// Builds a model and generates its metrics.
    pub fn from_vertex_array(mesh: VertexArray) -> Self {
        let metrics = Aabb::from_points(mesh.positions()).map(|bounds| MeshMetrics {
            bounds,
            radius: bounds.size().length() * 0.5 + RADIUS_MARGIN,
        });
        Self { mesh, metrics }
    }

    /// The mesh buffers.
    pub fn vertex_array(&self) -> &VertexArray {
        &self.mesh
    }

    /// Returns `true` once metrics have been generated for a non-empty mesh.
    pub fn have_mesh_metrics(&self) -> bool {
        self.metrics.is_some()
    }

    /// Bounding metrics, if the mesh has any vertices.
    pub fn metrics(&self) -> Option<&MeshMetrics> {
        self.metrics.as_ref()
    }

    /// Size of the bounding box, zero for an empty mesh.
    pub fn size(&self) -> Vec3 {
        self.metrics.map_or(Vec3::ZERO, |m| m.bounds.size())
    }

    /// Center of the bounding box, zero for an empty mesh.
    pub fn center(&self) -> Vec3 {
        self.metrics.map_or(Vec3::ZERO, |m| m.bounds.center())
    }

    /// Bounding sphere radius, zero for an empty mesh.
    pub fn radius(&self) -> f32 {
        self.metrics.map_or(0.0, |m| m.radius)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// A single triangle translated by `offset` along x.
    pub(crate) fn triangle(offset: f32) -> VertexArray {
        VertexArray {
            vertices: vec![
                offset, 0.0, 0.0, //
                offset + 1.0, 0.0, 0.0, //
                offset, 2.0, 0.0,
            ],
            normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            tex_coords: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            faces: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_merge_is_additive() {
        let a = triangle(0.0);
        let b = triangle(5.0);
        let merged = &a + &b;
        assert_eq!(merged.vertex_count(), a.vertex_count() + b.vertex_count());
        assert_eq!(merged.faces, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(merged.tex_coords.len(), 12);
    }

    #[test]
    fn test_merge_pads_missing_attributes() {
        let mut bare = triangle(0.0);
        bare.normals.clear();
        bare.tex_coords.clear();
        let full = triangle(5.0);

        let merged = &bare + &full;
        assert_eq!(merged.vertex_count(), 6);
        assert_eq!(merged.normals.len(), 6 * 3);
        assert_eq!(merged.tex_coords.len(), 6 * 2);
        assert!(merged.normals[..9].iter().all(|n| *n == 0.0));
        assert_eq!(merged.normals[9..], full.normals[..]);
        assert_eq!(merged.tex_coords[6..], full.tex_coords[..]);

        let merged = &full + &bare;
        assert_eq!(merged.normals.len(), 6 * 3);
        assert_eq!(merged.normals[..9], full.normals[..]);
        assert!(merged.normals[9..].iter().all(|n| *n == 0.0));
    }

    #[test]
    fn test_merge_without_attributes_stays_bare() {
        let mut bare = triangle(0.0);
        bare.normals.clear();
        bare.tex_coords.clear();

        let mut merged = VertexArray::default();
        merged += &bare;
        merged += &bare;
        assert_eq!(merged.vertex_count(), 6);
        assert!(merged.normals.is_empty());
        assert!(merged.tex_coords.is_empty());
        assert_eq!(merged.faces, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_model_metrics() {
        let model = Model::from_vertex_array(triangle(0.0));
        assert!(model.have_mesh_metrics());
        assert_eq!(model.size(), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(model.center(), Vec3::new(0.5, 1.0, 0.0));
        assert_relative_eq!(model.radius(), 5.0f32.sqrt() * 0.5 + RADIUS_MARGIN);
    }

    #[test]
    fn test_empty_model_has_no_metrics() {
        let model = Model::from_vertex_array(VertexArray::default());
        assert!(!model.have_mesh_metrics());
        assert_eq!(model.radius(), 0.0);
    }

    #[test]
    fn test_triangle_mesh_conversion() {
        let mesh = triangle(0.0).to_triangle_mesh();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.triangles, vec![[0, 1, 2]]);
    }
}
