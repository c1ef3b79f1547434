// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Step-at-a-time triangulation over the quads of one object
//!
//! The face list is captured up front in storage order. Each call to `next`
//! evaluates one face and commits its cut immediately. Stopping early is
//! cancellation: faces already cut stay cut, the rest stay quads.

use super::decision::{evaluate_quad, Decision, Evaluation};
use super::measure::Distance;
use super::status::StatusBoard;
use crate::config::TriangulateConfig;
use crate::error::{GuardFailure, TriangulateError, TriangulateResult};
use crate::geometry::{Diagonal, Mesh, SceneObject};
use crate::target::TargetSurface;
use tracing::{debug, info, warn};

/// What happened to one face
#[derive(Debug, Clone, PartialEq)]
pub struct FaceReport {
    /// Index of the face in the mesh
    pub face: usize,
    /// 1-based position in the processing queue
    pub position: usize,
    /// Length of the processing queue
    pub total: usize,
    pub evaluation: Evaluation,
    /// Index of the triangle appended by a cut
    pub new_face: Option<usize>,
}

impl FaceReport {
    pub fn decision(&self) -> Decision {
        self.evaluation.decision
    }
}

/// Tally of a run, complete or cancelled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub kept: usize,
    pub cut_a: usize,
    pub cut_b: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.kept + self.cut_a + self.cut_b + self.skipped
    }

    pub fn remaining(&self) -> usize {
        self.total - self.processed()
    }

    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    fn record(&mut self, decision: Decision) {
        match decision {
            Decision::KeepQuad => self.kept += 1,
            Decision::Cut(Diagonal::A) => self.cut_a += 1,
            Decision::Cut(Diagonal::B) => self.cut_b += 1,
            Decision::AbortDegenerate(_) => self.skipped += 1,
        }
    }
}

/// Lazy, single-pass triangulation of an object's quads toward a target
pub struct Triangulator<'a, T: TargetSurface + ?Sized> {
    object: &'a mut SceneObject,
    target: &'a T,
    config: TriangulateConfig,
    queue: Vec<usize>,
    cursor: usize,
    status: StatusBoard,
    summary: RunSummary,
}

impl<'a, T: TargetSurface + ?Sized> Triangulator<'a, T> {
    /// Validate the setup and capture the faces to process.
    ///
    /// Fails before touching the mesh if the configuration is invalid, the
    /// object has no geometry, no target is given, or there are no quads in
    /// scope.
    pub fn new(
        object: &'a mut SceneObject,
        target: Option<&'a T>,
        config: TriangulateConfig,
    ) -> TriangulateResult<Self> {
        config.validate()?;
        if object.mesh.is_empty() {
            return Err(TriangulateError::NoActiveMesh);
        }
        let target = target.ok_or(TriangulateError::NoTarget)?;

        let queue = object.mesh.quad_faces(config.selected_only);
        if queue.is_empty() {
            return Err(TriangulateError::NoQuadFaces {
                selected_only: config.selected_only,
            });
        }

        info!(
            object = %object.name,
            quads = queue.len(),
            max_distance = config.max_distance,
            planarity_threshold = config.planarity_threshold,
            "Starting triangulation"
        );

        let summary = RunSummary {
            total: queue.len(),
            ..Default::default()
        };

        Ok(Self {
            object,
            target,
            config,
            queue,
            cursor: 0,
            status: StatusBoard::new(),
            summary,
        })
    }

    pub fn total(&self) -> usize {
        self.queue.len()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len() - self.cursor
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn mesh(&self) -> &Mesh {
        &self.object.mesh
    }

    /// End the run, processed or not: recompute normals and clear the status display
    pub fn finish(mut self) -> RunSummary {
        self.object.mesh.recompute_normals();
        self.status.clear();

        if self.summary.is_complete() {
            info!(object = %self.object.name, summary = ?self.summary, "Triangulation finished");
        } else {
            info!(
                object = %self.object.name,
                remaining = self.summary.remaining(),
                "Triangulation cancelled"
            );
        }
        self.summary
    }

    fn process(&mut self, face: usize) -> FaceReport {
        let position = self.cursor;
        let total = self.queue.len();
        let header = format!("Face: {position}/{total}");

        let evaluation = match self.object.mesh.quad(face) {
            Some(quad) => {
                evaluate_quad(&quad, &self.object.matrix_world, self.target, &self.config)
            }
            None => Evaluation {
                decision: Decision::AbortDegenerate(GuardFailure::Degenerate),
                center_distance: 0.0,
                distances: None,
            },
        };

        let mut new_face = None;
        match evaluation.decision {
            Decision::KeepQuad => {
                self.status.replace([
                    header,
                    format!("Diagonal center distance: {:.4}", evaluation.center_distance),
                    format!("Below threshold: {:.4}", self.config.planarity_threshold),
                    "Keeping as quad".to_string(),
                ]);
            }
            Decision::Cut(diagonal) => {
                new_face = self.object.mesh.split_quad(face, diagonal);
                let (a, b) = evaluation
                    .distances
                    .unwrap_or((Distance::Unbounded, Distance::Unbounded));
                debug!(face, %diagonal, distance_a = %a, distance_b = %b, "Cut quad");
                self.status.replace([
                    header,
                    format!("Center distance: {:.4}", evaluation.center_distance),
                    format!("Distances 0-2: {a:.4} | 1-3: {b:.4}"),
                    format!("Selected: {diagonal}"),
                ]);
            }
            Decision::AbortDegenerate(reason) => {
                warn!(face, %reason, "Skipping face");
                self.status.replace([
                    header,
                    format!("Warning: skipped face {face} ({reason})"),
                ]);
            }
        }

        self.summary.record(evaluation.decision);
        FaceReport {
            face,
            position,
            total,
            evaluation,
            new_face,
        }
    }
}

impl<T: TargetSurface + ?Sized> Iterator for Triangulator<'_, T> {
    type Item = FaceReport;

    fn next(&mut self) -> Option<FaceReport> {
        let face = *self.queue.get(self.cursor)?;
        self.cursor += 1;
        Some(self.process(face))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T: TargetSurface + ?Sized> ExactSizeIterator for Triangulator<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Face, Primitive, Vertex};
    use crate::target::SurfaceHit;
    use nalgebra::{Point3, Vector3};

    /// Upward-facing horizontal plane at height `z`
    struct Floor {
        z: f64,
    }

    impl TargetSurface for Floor {
        fn nearest_point(&self, point: &Point3<f64>) -> Option<SurfaceHit> {
            Some(SurfaceHit {
                point: Point3::new(point.x, point.y, self.z),
                normal: Vector3::z(),
                distance: (point.z - self.z).abs(),
            })
        }

        fn ray_cast(
            &self,
            _: &Point3<f64>,
            _: &Vector3<f64>,
            _: Option<f64>,
        ) -> Option<SurfaceHit> {
            None
        }
    }

    static FLOOR: Floor = Floor { z: -0.2 };

    /// Single quad lifted at either the odd or the even corners
    fn warped_quad(lift_odd: bool) -> SceneObject {
        let lift = |corner: usize| if (corner % 2 == 1) == lift_odd { 0.05 } else { 0.0 };
        let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let mut mesh = Mesh::new();
        for (i, (x, y)) in corners.into_iter().enumerate() {
            mesh.add_vertex(Vertex::at(Point3::new(x, y, lift(i))));
        }
        mesh.add_face(Face::new(vec![0, 1, 2, 3]));
        SceneObject::new("warped", mesh)
    }

    /// Grid whose interior vertices are pushed up so every cell is non-planar
    fn bumpy_grid(cells: usize) -> SceneObject {
        let mut mesh = Primitive::grid(2.0, 2.0, cells, cells).to_mesh();
        for (i, vertex) in mesh.vertices.iter_mut().enumerate() {
            if i % 2 == 1 {
                vertex.position.z = 0.05;
            }
        }
        SceneObject::new("grid", mesh)
    }

    #[test]
    fn test_cuts_toward_target() {
        let mut object = warped_quad(true);
        let mut run = Triangulator::new(&mut object, Some(&FLOOR), TriangulateConfig::default())
            .unwrap();

        let report = run.next().unwrap();
        assert_eq!(report.decision(), Decision::Cut(Diagonal::A));
        assert_eq!((report.position, report.total), (1, 1));
        assert_eq!(report.new_face, Some(1));
        assert_eq!(run.status().len(), 4);
        assert!(run.status().to_string().contains("Selected: 0-2"));
        assert!(run.next().is_none());

        let summary = run.finish();
        assert_eq!(summary.cut_a, 1);
        assert!(summary.is_complete());
        assert_eq!(object.mesh.faces[0].indices, vec![0, 1, 2]);
        assert_eq!(object.mesh.faces[1].indices, vec![0, 2, 3]);
    }

    #[test]
    fn test_opposite_warp_cuts_other_diagonal() {
        let mut object = warped_quad(false);
        let run = Triangulator::new(&mut object, Some(&FLOOR), TriangulateConfig::default())
            .unwrap();
        let reports: Vec<_> = run.collect();
        assert_eq!(reports[0].decision(), Decision::Cut(Diagonal::B));
        assert_eq!(object.mesh.faces[0].indices, vec![1, 2, 3]);
        assert_eq!(object.mesh.faces[1].indices, vec![1, 3, 0]);
    }

    #[test]
    fn test_planar_faces_are_kept() {
        let mut object = SceneObject::new("grid", Primitive::grid(2.0, 2.0, 3, 3).to_mesh());
        let before = object.mesh.faces.clone();

        let mut run = Triangulator::new(&mut object, Some(&FLOOR), TriangulateConfig::default())
            .unwrap();
        assert_eq!(run.len(), 9);
        run.by_ref().for_each(drop);
        let summary = run.finish();

        assert_eq!(summary.kept, 9);
        assert_eq!(object.mesh.faces, before);
    }

    #[test]
    fn test_cancellation_keeps_committed_cuts() {
        let mut object = bumpy_grid(2);
        let mut run = Triangulator::new(&mut object, Some(&FLOOR), TriangulateConfig::default())
            .unwrap();

        let done: Vec<_> = run.by_ref().take(2).collect();
        assert_eq!(done.len(), 2);
        assert_eq!(run.remaining(), 2);
        let summary = run.finish();

        assert_eq!(summary.processed(), 2);
        assert_eq!(summary.remaining(), 2);
        assert!(!summary.is_complete());
        assert_eq!(object.mesh.face_count(), 4 + summary.cut_a + summary.cut_b);
        assert_eq!(object.mesh.quad_faces(false).len(), 4 - summary.cut_a - summary.cut_b);
    }

    #[test]
    fn test_zero_length_edge_is_skipped() {
        let mut object = warped_quad(true);
        object.mesh.vertices[2].position = object.mesh.vertices[1].position;
        let before = object.mesh.faces.clone();

        let mut run = Triangulator::new(&mut object, Some(&FLOOR), TriangulateConfig::default())
            .unwrap();
        let report = run.next().unwrap();
        assert_eq!(
            report.decision(),
            Decision::AbortDegenerate(GuardFailure::ZeroLengthEdge)
        );
        assert!(run
            .status()
            .lines()
            .any(|line| line.starts_with("Warning: skipped face 0")));
        assert_eq!(run.finish().skipped, 1);
        assert_eq!(object.mesh.faces, before);
    }

    #[test]
    fn test_selected_only_scope() {
        let mut object = bumpy_grid(2);
        object.mesh.select_faces(&[3]);
        let config = TriangulateConfig {
            selected_only: true,
            ..Default::default()
        };

        let run = Triangulator::new(&mut object, Some(&FLOOR), config).unwrap();
        let faces: Vec<_> = run.map(|report| report.face).collect();
        assert_eq!(faces, vec![3]);
    }

    #[test]
    fn test_setup_errors() {
        let config = TriangulateConfig::default();

        let mut empty = SceneObject::new("empty", Mesh::new());
        assert!(matches!(
            Triangulator::new(&mut empty, Some(&FLOOR), config.clone()),
            Err(TriangulateError::NoActiveMesh)
        ));

        let mut object = warped_quad(true);
        assert!(matches!(
            Triangulator::<Floor>::new(&mut object, None, config.clone()),
            Err(TriangulateError::NoTarget)
        ));

        let mut unselected = warped_quad(true);
        let scoped = TriangulateConfig {
            selected_only: true,
            ..Default::default()
        };
        assert!(matches!(
            Triangulator::new(&mut unselected, Some(&FLOOR), scoped),
            Err(TriangulateError::NoQuadFaces { selected_only: true })
        ));

        let mut triangles = warped_quad(true);
        triangles.mesh.split_quad(0, Diagonal::A);
        assert!(matches!(
            Triangulator::new(&mut triangles, Some(&FLOOR), config),
            Err(TriangulateError::NoQuadFaces { selected_only: false })
        ));

        let bad = TriangulateConfig {
            planarity_threshold: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Triangulator::new(&mut object, Some(&FLOOR), bad),
            Err(TriangulateError::InvalidParameter { .. })
        ));
    }
}
