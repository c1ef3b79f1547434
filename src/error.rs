// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for triangulation runs

use thiserror::Error;

/// Errors that stop a triangulation run before any face is processed
#[derive(Debug, Error)]
pub enum TriangulateError {
    /// The active object has no vertices or faces
    #[error("No active mesh object")]
    NoActiveMesh,

    /// No target surface was configured
    #[error("No target object selected")]
    NoTarget,

    /// The target mesh has nothing to measure against
    #[error("Target mesh '{0}' has no triangles")]
    EmptyTarget(String),

    /// A transform that cannot be inverted (zero scale on some axis)
    #[error("Object '{0}' has a singular world matrix")]
    SingularTransform(String),

    /// Nothing to do in the current scope
    #[error("No quad faces found{}", scope_suffix(.selected_only))]
    NoQuadFaces { selected_only: bool },

    /// A numeric setting is out of range
    #[error("Invalid value for {name}: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

fn scope_suffix(selected_only: &bool) -> &'static str {
    if *selected_only {
        " (in selection)"
    } else {
        ""
    }
}

/// Why a single face was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuardFailure {
    /// Near-zero area, vanishing normal, or collinear leading edges
    #[error("degenerate face")]
    Degenerate,

    /// At least one boundary edge is shorter than the geometry tolerance
    #[error("zero-length edge")]
    ZeroLengthEdge,

    /// A diagonal runs parallel to a boundary edge it does not touch
    #[error("self-intersecting diagonal")]
    SelfIntersecting,
}

/// Result type for triangulation setup
pub type TriangulateResult<T> = std::result::Result<T, TriangulateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            TriangulateError::NoTarget.to_string(),
            "No target object selected"
        );
        assert_eq!(
            TriangulateError::NoQuadFaces { selected_only: true }.to_string(),
            "No quad faces found (in selection)"
        );
        assert_eq!(
            TriangulateError::NoQuadFaces { selected_only: false }.to_string(),
            "No quad faces found"
        );

        let err = TriangulateError::InvalidParameter {
            name: "planarity_threshold",
            value: -1.0,
            reason: "must be >= 0",
        };
        assert!(err.to_string().contains("planarity_threshold"));
        assert_eq!(GuardFailure::ZeroLengthEdge.to_string(), "zero-length edge");
    }
}
