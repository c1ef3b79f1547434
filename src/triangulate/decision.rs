// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-face decision: keep the quad, cut one of its diagonals, or skip it

use super::guards::check_face;
use super::measure::{measure_diagonal, Distance};
use crate::config::TriangulateConfig;
use crate::error::GuardFailure;
use crate::geometry::{Diagonal, QuadFace};
use crate::target::TargetSurface;
use nalgebra::Matrix4;
use std::fmt;

/// Outcome for one quad face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Diagonal midpoints are within the planarity threshold
    KeepQuad,
    /// Cut along the given diagonal
    Cut(Diagonal),
    /// Face failed a guard and is left untouched
    AbortDegenerate(GuardFailure),
}

impl Decision {
    pub fn diagonal(&self) -> Option<Diagonal> {
        match self {
            Decision::Cut(diagonal) => Some(*diagonal),
            _ => None,
        }
    }

    pub fn is_cut(&self) -> bool {
        matches!(self, Decision::Cut(_))
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::KeepQuad => f.write_str("keep quad"),
            Decision::Cut(diagonal) => write!(f, "cut {diagonal}"),
            Decision::AbortDegenerate(reason) => write!(f, "skipped ({reason})"),
        }
    }
}

/// Decision plus the numbers that led to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub decision: Decision,
    /// Distance between the two diagonal midpoints, in local space
    pub center_distance: f64,
    /// Measured distances for diagonals A and B, when measurement happened
    pub distances: Option<(Distance, Distance)>,
}

/// Ties, including two unbounded distances, go to diagonal A
pub fn choose_diagonal(distance_a: Distance, distance_b: Distance) -> Diagonal {
    if distance_a <= distance_b {
        Diagonal::A
    } else {
        Diagonal::B
    }
}

/// Evaluate one quad against the target
pub fn evaluate_quad<T>(
    face: &QuadFace,
    matrix_world: &Matrix4<f64>,
    target: &T,
    config: &TriangulateConfig,
) -> Evaluation
where
    T: TargetSurface + ?Sized,
{
    let center_distance = face.center_distance();

    if let Err(reason) = check_face(face) {
        return Evaluation {
            decision: Decision::AbortDegenerate(reason),
            center_distance,
            distances: None,
        };
    }

    if center_distance <= config.planarity_threshold {
        return Evaluation {
            decision: Decision::KeepQuad,
            center_distance,
            distances: None,
        };
    }

    let distance_a = measure_diagonal(face, Diagonal::A, matrix_world, target, config);
    let distance_b = measure_diagonal(face, Diagonal::B, matrix_world, target, config);

    Evaluation {
        decision: Decision::Cut(choose_diagonal(distance_a, distance_b)),
        center_distance,
        distances: Some((distance_a, distance_b)),
    }
}
