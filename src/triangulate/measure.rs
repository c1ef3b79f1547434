// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Distance from a diagonal's midpoint to the target surface

use super::guards::{check_diagonal, is_nearly_coplanar};
use crate::config::TriangulateConfig;
use crate::geometry::{world_direction, Diagonal, QuadFace};
use crate::target::{SurfaceHit, TargetSurface};
use nalgebra::Matrix4;
use std::fmt;
use tracing::debug;

/// Measured distance to the target, or no usable measurement at all.
///
/// `Unbounded` orders after every finite distance and equal to itself, so a
/// plain `<=` comparison implements "missing measurements lose, ties go to
/// the first candidate".
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Distance {
    Finite(f64),
    Unbounded,
}

impl Distance {
    /// Wrap a raw value; negative or non-finite input becomes `Unbounded`
    pub fn new(value: f64) -> Self {
        if value.is_finite() && value >= 0.0 {
            Distance::Finite(value)
        } else {
            Distance::Unbounded
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Distance::Unbounded)
    }

    /// Raw value, with `Unbounded` mapped to infinity
    pub fn value(&self) -> f64 {
        match self {
            Distance::Finite(d) => *d,
            Distance::Unbounded => f64::INFINITY,
        }
    }

    pub fn scaled(self, factor: f64) -> Self {
        match self {
            Distance::Finite(d) => Distance::new(d * factor),
            Distance::Unbounded => Distance::Unbounded,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => fmt::Display::fmt(d, f),
            Distance::Unbounded => f.write_str("inf"),
        }
    }
}

/// Distance from the midpoint of `diagonal` to the nearest front-facing point
/// on `target`, measured in world space.
///
/// `matrix_world` maps the face's local coordinates into world space. Guard
/// failures and query misses come back as [`Distance::Unbounded`].
pub fn measure_diagonal<T>(
    face: &QuadFace,
    diagonal: Diagonal,
    matrix_world: &Matrix4<f64>,
    target: &T,
    config: &TriangulateConfig,
) -> Distance
where
    T: TargetSurface + ?Sized,
{
    if let Err(reason) = check_diagonal(face, diagonal) {
        debug!(%diagonal, %reason, "Diagonal rejected by guard");
        return Distance::Unbounded;
    }

    let origin = matrix_world.transform_point(&face.midpoint(diagonal));
    let Some(normal) = world_direction(matrix_world, &face.normal()) else {
        return Distance::Unbounded;
    };

    let mut candidates: Vec<SurfaceHit> = Vec::with_capacity(3);
    candidates.extend(target.nearest_point(&origin));
    let radius = config.search_radius();
    candidates.extend(target.ray_cast(&origin, &normal, radius));
    if config.cast_both_directions {
        candidates.extend(target.ray_cast(&origin, &-normal, radius));
    }

    let closest = candidates
        .into_iter()
        .filter(|hit| hit.normal.dot(&normal) > 0.0)
        .min_by(|a, b| a.distance.total_cmp(&b.distance));

    let Some(hit) = closest else {
        debug!(%diagonal, "No front-facing target point");
        return Distance::Unbounded;
    };

    if let Some(radius) = radius {
        if hit.distance > radius {
            debug!(
                %diagonal,
                distance = hit.distance,
                radius,
                "Target point outside search radius"
            );
            return Distance::Unbounded;
        }
    }

    let mut distance = Distance::new(hit.distance);
    if is_nearly_coplanar(face, config.coplanar_tolerance) {
        distance = distance.scaled(config.coplanar_penalty);
    }

    debug!(
        %diagonal,
        midpoint = ?origin,
        closest = ?hit.point,
        %distance,
        "Measured diagonal"
    );
    distance
}
