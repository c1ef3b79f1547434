// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric guards that reject faces before any target query is issued
//!
//! All tolerances are absolute, in the mesh's own length units.

use crate::error::GuardFailure;
use crate::geometry::{Diagonal, QuadFace, QUAD_EDGES};

/// Length, area and cross-product tolerance for degeneracy checks
pub const GEOMETRY_EPSILON: f64 = 1e-7;

/// Default corner-to-plane tolerance for [`is_nearly_coplanar`]
pub const COPLANAR_TOLERANCE: f64 = 1e-5;

/// Near-zero area, vanishing normal, or `v0->v1` collinear with `v0->v2`
pub fn is_degenerate(face: &QuadFace) -> bool {
    if face.area() < GEOMETRY_EPSILON {
        return true;
    }
    if face.normal().norm() < GEOMETRY_EPSILON {
        return true;
    }
    let to_v1 = face.positions[1] - face.positions[0];
    let to_v2 = face.positions[2] - face.positions[0];
    to_v1.cross(&to_v2).norm() < GEOMETRY_EPSILON
}

pub fn has_zero_length_edge(face: &QuadFace) -> bool {
    (0..QUAD_EDGES.len()).any(|edge| face.edge_vector(edge).norm() < GEOMETRY_EPSILON)
}

/// True if the diagonal runs parallel to a boundary edge sharing none of its
/// endpoints.
///
/// This is a parallelism proxy, not a segment intersection test. On a quad
/// every boundary edge touches one end of each diagonal, so the candidate
/// edge set is empty and the check never fires.
pub fn self_intersects(diagonal: Diagonal, face: &QuadFace) -> bool {
    let direction = face.diagonal_vector(diagonal);
    QUAD_EDGES
        .iter()
        .enumerate()
        .filter(|(_, (a, b))| !diagonal.touches(*a) && !diagonal.touches(*b))
        .any(|(edge, _)| direction.cross(&face.edge_vector(edge)).norm() < GEOMETRY_EPSILON)
}

/// Every corner lies within `threshold` of the plane through `v0` with the face normal
pub fn is_nearly_coplanar(face: &QuadFace, threshold: f64) -> bool {
    (0..4).all(|corner| face.plane_distance(corner).abs() <= threshold)
}

/// Whole-face guards, checked once before a face is evaluated
pub fn check_face(face: &QuadFace) -> Result<(), GuardFailure> {
    if has_zero_length_edge(face) {
        return Err(GuardFailure::ZeroLengthEdge);
    }
    if is_degenerate(face) {
        return Err(GuardFailure::Degenerate);
    }
    Ok(())
}

/// Face guards plus the per-diagonal parallelism check
pub fn check_diagonal(face: &QuadFace, diagonal: Diagonal) -> Result<(), GuardFailure> {
    check_face(face)?;
    if self_intersects(diagonal, face) {
        return Err(GuardFailure::SelfIntersecting);
    }
    Ok(())
}
