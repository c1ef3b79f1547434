// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Target-aware quad triangulation
//!
//! Each quad is cut along the diagonal whose midpoint lies closer to the
//! target surface, so the resulting triangles hug the target. Faces that are
//! already flat enough stay quads; degenerate faces are skipped untouched.

mod decision;
mod guards;
mod measure;
mod session;
mod status;

pub use decision::{choose_diagonal, evaluate_quad, Decision, Evaluation};
pub use guards::{
    check_diagonal, check_face, has_zero_length_edge, is_degenerate, is_nearly_coplanar,
    self_intersects, COPLANAR_TOLERANCE, GEOMETRY_EPSILON,
};
pub use measure::{measure_diagonal, Distance};
pub use session::{FaceReport, RunSummary, Triangulator};
pub use status::{StatusBoard, STATUS_LINES};
