// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Quad face view and diagonal candidates
//!
//! A quad is four positions in cyclic order `v0, v1, v2, v3`. Diagonal A
//! connects `v0-v2`, diagonal B connects `v1-v3`.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Corner pairs forming the four boundary edges of a quad
pub const QUAD_EDGES: [(usize, usize); 4] = [(0, 1), (1, 2), (2, 3), (3, 0)];

/// One of the two diagonals of a quad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Diagonal {
    /// Connects corners 0 and 2
    A,
    /// Connects corners 1 and 3
    B,
}

impl Diagonal {
    /// Both diagonals, in evaluation order
    pub const ALL: [Diagonal; 2] = [Diagonal::A, Diagonal::B];

    /// Corner indices joined by this diagonal
    pub const fn corners(self) -> (usize, usize) {
        match self {
            Diagonal::A => (0, 2),
            Diagonal::B => (1, 3),
        }
    }

    /// Short label used in status output
    pub const fn label(self) -> &'static str {
        match self {
            Diagonal::A => "0-2",
            Diagonal::B => "1-3",
        }
    }

    /// True if `corner` is one of this diagonal's endpoints
    pub const fn touches(self, corner: usize) -> bool {
        let (a, b) = self.corners();
        corner == a || corner == b
    }
}

impl fmt::Display for Diagonal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Four ordered corner positions of a quad, in mesh-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadFace {
    pub positions: [Point3<f64>; 4],
}

impl QuadFace {
    pub fn new(positions: [Point3<f64>; 4]) -> Self {
        Self { positions }
    }

    pub fn vertex(&self, corner: usize) -> &Point3<f64> {
        &self.positions[corner % 4]
    }

    /// Vector along boundary edge `edge` (0..4), from its start to its end corner
    pub fn edge_vector(&self, edge: usize) -> Vector3<f64> {
        let (a, b) = QUAD_EDGES[edge % 4];
        self.positions[b] - self.positions[a]
    }

    /// Vector from the first to the second corner of a diagonal
    pub fn diagonal_vector(&self, diagonal: Diagonal) -> Vector3<f64> {
        let (a, b) = diagonal.corners();
        self.positions[b] - self.positions[a]
    }

    /// Midpoint of a diagonal
    pub fn midpoint(&self, diagonal: Diagonal) -> Point3<f64> {
        let (a, b) = diagonal.corners();
        nalgebra::center(&self.positions[a], &self.positions[b])
    }

    /// Distance between the two diagonal midpoints.
    ///
    /// Zero for any planar parallelogram; grows as the quad warps.
    pub fn center_distance(&self) -> f64 {
        (self.midpoint(Diagonal::A) - self.midpoint(Diagonal::B)).norm()
    }

    /// Unnormalized Newell normal (length equals twice the projected area)
    pub fn raw_normal(&self) -> Vector3<f64> {
        newell_normal(&self.positions)
    }

    /// Unit face normal, or the zero vector when the face has no usable normal
    pub fn normal(&self) -> Vector3<f64> {
        let n = self.raw_normal();
        let len = n.norm();
        if len > 0.0 {
            n / len
        } else {
            Vector3::zeros()
        }
    }

    /// Surface area as the sum of the two fan triangles from `v0`
    pub fn area(&self) -> f64 {
        let [p0, p1, p2, p3] = &self.positions;
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let e3 = p3 - p0;
        0.5 * (e1.cross(&e2).norm() + e2.cross(&e3).norm())
    }

    /// Signed distance of a corner to the plane through `v0` with the face normal
    pub fn plane_distance(&self, corner: usize) -> f64 {
        let normal = self.normal();
        (self.vertex(corner) - self.positions[0]).dot(&normal)
    }

    /// Corners of the two triangles produced by cutting along `diagonal`
    pub fn split_corners(diagonal: Diagonal) -> [[usize; 3]; 2] {
        match diagonal {
            Diagonal::A => [[0, 1, 2], [0, 2, 3]],
            Diagonal::B => [[1, 2, 3], [1, 3, 0]],
        }
    }
}

/// Newell's method over a closed polygon; robust for non-planar loops
pub(crate) fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    for (i, current) in points.iter().enumerate() {
        let next = &points[(i + 1) % points.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}
