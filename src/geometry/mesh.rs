// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polygon mesh representation and utilities

use super::quad::{newell_normal, Diagonal, QuadFace};
use super::BoundingBox;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Vertex with position and normal
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }

    /// Vertex with no normal yet; call [`Mesh::recompute_normals`] afterwards
    pub fn at(position: Point3<f64>) -> Self {
        Self::new(position, Vector3::zeros())
    }
}

/// Polygon defined by an ordered loop of vertex indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub indices: Vec<usize>,
    /// Selection flag, used to scope processing to part of the mesh
    #[serde(default)]
    pub selected: bool,
}

impl Face {
    pub fn new(indices: Vec<usize>) -> Self {
        Self {
            indices,
            selected: false,
        }
    }

    pub fn arity(&self) -> usize {
        self.indices.len()
    }

    pub fn is_quad(&self) -> bool {
        self.indices.len() == 4
    }

    pub fn is_triangle(&self) -> bool {
        self.indices.len() == 3
    }
}

/// Polygon mesh with arbitrary face arity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face and return its index
    pub fn add_face(&mut self, face: Face) -> usize {
        let index = self.faces.len();
        self.faces.push(face);
        index
    }

    /// Compute bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_vertices(&self.vertices)
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get face count
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Number of triangles after fan-triangulating every face
    pub fn triangle_count(&self) -> usize {
        self.faces
            .iter()
            .map(|f| f.arity().saturating_sub(2))
            .sum()
    }

    /// Mark the given faces as selected; out-of-range indices are ignored.
    /// Returns how many faces were selected.
    pub fn select_faces(&mut self, indices: &[usize]) -> usize {
        let mut count = 0;
        for &index in indices {
            if let Some(face) = self.faces.get_mut(index) {
                if !face.selected {
                    face.selected = true;
                    count += 1;
                }
            }
        }
        count
    }

    pub fn clear_selection(&mut self) {
        for face in &mut self.faces {
            face.selected = false;
        }
    }

    /// Indices of quad faces in storage order
    pub fn quad_faces(&self, selected_only: bool) -> Vec<usize> {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_quad() && (!selected_only || f.selected))
            .map(|(i, _)| i)
            .collect()
    }

    /// Positions of a quad face, or `None` if the face is not a quad
    pub fn quad(&self, face_index: usize) -> Option<QuadFace> {
        let face = self.faces.get(face_index)?;
        if !face.is_quad() {
            return None;
        }
        let mut positions = [Point3::origin(); 4];
        for (slot, &index) in positions.iter_mut().zip(&face.indices) {
            *slot = self.vertices.get(index)?.position;
        }
        Some(QuadFace::new(positions))
    }

    fn face_positions(&self, face: &Face) -> Vec<Point3<f64>> {
        face.indices
            .iter()
            .filter_map(|&i| self.vertices.get(i).map(|v| v.position))
            .collect()
    }

    /// Unit face normal (zero vector for degenerate faces)
    pub fn face_normal(&self, face_index: usize) -> Vector3<f64> {
        let Some(face) = self.faces.get(face_index) else {
            return Vector3::zeros();
        };
        let normal = newell_normal(&self.face_positions(face));
        normal.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
    }

    /// Cut a quad along a diagonal, connecting two of its existing vertices.
    ///
    /// The quad is replaced in place by the first triangle and the second
    /// triangle is appended, so indices of all other faces stay valid.
    /// Winding is preserved. Returns the index of the appended triangle, or
    /// `None` if `face_index` is not a quad.
    pub fn split_quad(&mut self, face_index: usize, diagonal: Diagonal) -> Option<usize> {
        let face = self.faces.get(face_index)?;
        if !face.is_quad() {
            return None;
        }
        let corners = &face.indices;
        let selected = face.selected;
        let [first, second] = QuadFace::split_corners(diagonal);
        let first = Face {
            indices: first.iter().map(|&c| corners[c]).collect(),
            selected,
        };
        let second = Face {
            indices: second.iter().map(|&c| corners[c]).collect(),
            selected,
        };
        self.faces[face_index] = first;
        Some(self.add_face(second))
    }

    /// Fan triangulation of every face, skipping faces with fewer than 3 corners
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        let mut triangles = Vec::with_capacity(self.triangle_count());
        for face in &self.faces {
            let idx = &face.indices;
            for i in 1..idx.len().saturating_sub(1) {
                triangles.push([idx[0], idx[i], idx[i + 1]]);
            }
        }
        triangles
    }

    /// Recompute vertex normals as the area-weighted average of adjacent face normals
    pub fn recompute_normals(&mut self) {
        if self.vertices.is_empty() || self.faces.is_empty() {
            return;
        }

        let mut normal_sums: Vec<Vector3<f64>> = vec![Vector3::zeros(); self.vertices.len()];

        for face in &self.faces {
            // Newell's normal length is already proportional to the face area
            let face_normal = newell_normal(&self.face_positions(face));
            if face_normal.norm() > 1e-10 {
                for &idx in &face.indices {
                    if let Some(sum) = normal_sums.get_mut(idx) {
                        *sum += face_normal;
                    }
                }
            }
        }

        for (vertex, sum) in self.vertices.iter_mut().zip(normal_sums) {
            let length = sum.norm();
            vertex.normal = if length > 1e-10 {
                sum / length
            } else {
                Vector3::new(0.0, 0.0, 1.0)
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use approx::assert_relative_eq;

    fn square() -> Mesh {
        let mut mesh = Mesh::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            mesh.add_vertex(Vertex::at(Point3::new(x, y, 0.0)));
        }
        mesh.add_face(Face::new(vec![0, 1, 2, 3]));
        mesh
    }

    #[test]
    fn test_split_quad_preserves_other_faces() {
        let mut mesh = Primitive::grid(2.0, 2.0, 2, 1).to_mesh();
        let before = mesh.faces[1].clone();

        let appended = mesh.split_quad(0, Diagonal::B).unwrap();

        assert_eq!(appended, 2);
        assert_eq!(mesh.faces[1], before);
        assert!(mesh.faces[0].is_triangle());
        assert!(mesh.faces[2].is_triangle());
        assert_eq!(mesh.quad_faces(false), vec![1]);
    }

    #[test]
    fn test_split_quad_keeps_winding() {
        let mut mesh = square();
        mesh.split_quad(0, Diagonal::A).unwrap();
        assert_eq!(mesh.faces[0].indices, vec![0, 1, 2]);
        assert_eq!(mesh.faces[1].indices, vec![0, 2, 3]);
        assert_relative_eq!(mesh.face_normal(0), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(mesh.face_normal(1), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_split_rejects_non_quads() {
        let mut mesh = square();
        mesh.split_quad(0, Diagonal::A).unwrap();
        assert!(mesh.split_quad(0, Diagonal::A).is_none());
        assert!(mesh.split_quad(42, Diagonal::B).is_none());
    }

    #[test]
    fn test_fan_triangles() {
        let mesh = square();
        assert_eq!(mesh.triangles(), vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_selection_scopes_quads() {
        let mut mesh = Primitive::grid(3.0, 1.0, 3, 1).to_mesh();
        assert_eq!(mesh.select_faces(&[2, 0, 99]), 2);
        assert_eq!(mesh.quad_faces(true), vec![0, 2]);
        assert_eq!(mesh.quad_faces(false), vec![0, 1, 2]);
        mesh.clear_selection();
        assert!(mesh.quad_faces(true).is_empty());
    }

    #[test]
    fn test_recompute_normals() {
        let mut mesh = Primitive::cube(2.0, true).to_mesh();
        mesh.recompute_normals();

        // Each cube corner averages three axis normals pointing outward
        for vertex in &mesh.vertices {
            assert_relative_eq!(vertex.normal.norm(), 1.0, epsilon = 1e-9);
            assert!(vertex.normal.dot(&vertex.position.coords) > 0.0);
        }
    }
}
