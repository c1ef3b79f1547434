// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! tritarget
//!
//! Target-aware quad triangulation. Each quad of a polygon mesh is split along
//! the diagonal whose midpoint lies closer to a second "target" surface, so
//! the triangulated mesh follows the target's shape. Nearly flat quads are
//! kept, degenerate ones are skipped.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod target;
pub mod triangulate;

pub use config::TriangulateConfig;
pub use error::{GuardFailure, TriangulateError, TriangulateResult};
pub use geometry::{Diagonal, Mesh, Primitive, QuadFace, SceneObject};
pub use target::{MeshTarget, SurfaceHit, TargetSurface};
pub use triangulate::{Decision, Distance, FaceReport, RunSummary, Triangulator};

use anyhow::{Context, Result};
use std::path::Path;

/// Triangulate every quad in scope of `object` toward `target`
pub fn triangulate_object<T>(
    object: &mut SceneObject,
    target: &T,
    config: TriangulateConfig,
) -> TriangulateResult<RunSummary>
where
    T: TargetSurface + ?Sized,
{
    let mut triangulator = Triangulator::new(object, Some(target), config)?;
    triangulator.by_ref().for_each(drop);
    Ok(triangulator.finish())
}

/// Load `source`, triangulate it toward the mesh in `target`, and write `output`
pub fn triangulate_file(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: TriangulateConfig,
) -> Result<RunSummary> {
    let runner = cli::Runner::new(config);
    let object = runner.load_source(source.as_ref())?;
    let target = runner.load_target(target.as_ref())?;
    let result = runner.run(object, &target, |_, _| {})?;
    io::save_mesh(&result.object.mesh, output.as_ref())
        .with_context(|| format!("Failed to save {:?}", output.as_ref()))?;
    Ok(result.summary)
}
