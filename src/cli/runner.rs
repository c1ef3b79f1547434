// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end triangulation runs for the command line

use crate::config::TriangulateConfig;
use crate::geometry::SceneObject;
use crate::io;
use crate::target::MeshTarget;
use crate::triangulate::{FaceReport, RunSummary, StatusBoard, Triangulator};
use anyhow::{Context, Result};
use nalgebra::Matrix4;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of a triangulation run
pub struct RunResult {
    pub object: SceneObject,
    pub summary: RunSummary,
    pub duration: Duration,
    /// World-space distance between the object and target bounding boxes
    pub target_gap: f64,
}

/// Runner for loading inputs and driving a [`Triangulator`] to completion
pub struct Runner {
    config: TriangulateConfig,
    faces: Option<Vec<usize>>,
    limit: Option<usize>,
    target_matrix: Matrix4<f64>,
}

impl Runner {
    pub fn new(config: TriangulateConfig) -> Self {
        Self {
            config,
            faces: None,
            limit: None,
            target_matrix: Matrix4::identity(),
        }
    }

    /// Restrict processing to these face indices
    pub fn with_faces(mut self, faces: Vec<usize>) -> Self {
        self.faces = Some(faces);
        self
    }

    /// Stop after this many faces, leaving the rest untouched
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_target_matrix(mut self, matrix: Matrix4<f64>) -> Self {
        self.target_matrix = matrix;
        self
    }

    /// Search radius the run's target gap exceeds, if any.
    ///
    /// When this is `Some`, every diagonal measured unbounded.
    pub fn out_of_reach(&self, result: &RunResult) -> Option<f64> {
        self.config
            .search_radius()
            .filter(|radius| result.target_gap > *radius)
    }

    /// Load the mesh to triangulate; the object is named after the file stem
    pub fn load_source(&self, path: &Path) -> Result<SceneObject> {
        let mesh = io::load_mesh(path)
            .with_context(|| format!("Failed to load source mesh: {:?}", path))?;
        Ok(SceneObject::new(object_name(path), mesh))
    }

    /// Load the target mesh and place it with the configured matrix
    pub fn load_target(&self, path: &Path) -> Result<SceneObject> {
        let mesh = io::load_mesh(path)
            .with_context(|| format!("Failed to load target mesh: {:?}", path))?;
        Ok(SceneObject::new(object_name(path), mesh).with_matrix(self.target_matrix))
    }

    /// Triangulate `object` toward `target`, calling `on_face` after every face
    pub fn run<F>(
        &self,
        mut object: SceneObject,
        target: &SceneObject,
        mut on_face: F,
    ) -> Result<RunResult>
    where
        F: FnMut(&FaceReport, &StatusBoard),
    {
        let mut config = self.config.clone();
        if let Some(faces) = &self.faces {
            object.mesh.clear_selection();
            object.mesh.select_faces(faces);
            config.selected_only = true;
        }

        let target_gap = object
            .mesh
            .bounding_box()
            .transformed(&object.matrix_world)
            .gap(&target.mesh.bounding_box().transformed(&target.matrix_world));
        debug!(gap = target_gap, "Measured object to target gap");

        let surface = MeshTarget::from_object(target)
            .with_context(|| format!("Failed to prepare target: {}", target.name))?;

        let source_name = object.name.clone();
        let start = Instant::now();
        let mut triangulator = Triangulator::new(&mut object, Some(&surface), config)
            .with_context(|| {
                format!("Cannot triangulate {} toward {}", source_name, target.name)
            })?;

        let limit = self.limit.unwrap_or(usize::MAX);
        let mut processed = 0;
        while processed < limit {
            let Some(report) = triangulator.next() else {
                break;
            };
            on_face(&report, triangulator.status());
            processed += 1;
        }

        let summary = triangulator.finish();
        Ok(RunResult {
            object,
            summary,
            duration: start.elapsed(),
            target_gap,
        })
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(TriangulateConfig::default())
    }
}

fn object_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{placement, Primitive};
    use nalgebra::Vector3;

    fn bumpy_grid() -> SceneObject {
        let mut mesh = Primitive::grid(2.0, 2.0, 4, 4).to_mesh();
        for (i, vertex) in mesh.vertices.iter_mut().enumerate() {
            if i % 2 == 1 {
                vertex.position.z = 0.05;
            }
        }
        SceneObject::new("grid", mesh)
    }

    fn floor() -> SceneObject {
        SceneObject::new("floor", Primitive::plane(10.0).to_mesh())
            .with_matrix(placement(Vector3::new(0.0, 0.0, -0.2), 1.0))
    }

    #[test]
    fn test_run_to_completion() {
        let mut seen = 0;
        let result = Runner::default()
            .run(bumpy_grid(), &floor(), |report, status| {
                seen += 1;
                assert_eq!(report.position, seen);
                assert!(!status.is_empty());
            })
            .unwrap();

        assert_eq!(seen, 16);
        assert!(result.summary.is_complete());
        assert_eq!(result.summary.cut_a + result.summary.cut_b, 16);
        assert_eq!(result.object.mesh.face_count(), 32);
        assert!((result.target_gap - 0.2).abs() < 1e-9);
        assert_eq!(Runner::default().out_of_reach(&result), None);
    }

    #[test]
    fn test_limit_and_face_scope() {
        let result = Runner::default()
            .with_faces(vec![0, 5, 10, 15])
            .with_limit(3)
            .run(bumpy_grid(), &floor(), |_, _| {})
            .unwrap();

        assert_eq!(result.summary.total, 4);
        assert_eq!(result.summary.processed(), 3);
        assert_eq!(result.object.mesh.face_count(), 16 + 3);
        assert!(result.object.mesh.faces[15].is_quad());
    }

    #[test]
    fn test_far_target_still_runs() {
        let far = SceneObject::new("far", Primitive::plane(10.0).to_mesh())
            .with_matrix(placement(Vector3::new(0.0, 0.0, -50.0), 1.0));
        let result = Runner::default().run(bumpy_grid(), &far, |_, _| {}).unwrap();

        assert!(result.target_gap > 1.0);
        assert_eq!(Runner::default().out_of_reach(&result), Some(1.0));
        let unlimited = Runner::new(TriangulateConfig {
            max_distance: 0.0,
            ..Default::default()
        });
        assert_eq!(unlimited.out_of_reach(&result), None);
        // Every measurement is unbounded, so every tie goes to 0-2
        assert_eq!(result.summary.cut_a, 16);
    }

    #[test]
    fn test_setup_error_is_reported() {
        let flat = SceneObject::new("flat", Primitive::plane(1.0).to_mesh());
        let empty = SceneObject::new("empty", crate::geometry::Mesh::new());
        let err = Runner::default().run(flat, &empty, |_, _| {}).err().unwrap();
        assert!(format!("{err:#}").contains("empty"));
    }

    #[test]
    fn test_object_name_from_path() {
        assert_eq!(object_name(Path::new("scans/head.obj")), "head");
        assert_eq!(object_name(Path::new("")), "mesh");
    }
}
