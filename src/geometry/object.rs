// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh placed in the world with a local-to-world transform

use super::Mesh;
use nalgebra::{Matrix4, Vector3};

/// A named mesh together with its local-to-world matrix
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub mesh: Mesh,
    pub matrix_world: Matrix4<f64>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            matrix_world: Matrix4::identity(),
        }
    }

    pub fn with_matrix(mut self, matrix_world: Matrix4<f64>) -> Self {
        self.matrix_world = matrix_world;
        self
    }

}

/// Map a direction through the linear part of `matrix_world` and re-normalize.
///
/// `None` when the mapped direction vanishes.
pub fn world_direction(
    matrix_world: &Matrix4<f64>,
    local: &Vector3<f64>,
) -> Option<Vector3<f64>> {
    (matrix_world.fixed_view::<3, 3>(0, 0) * local).try_normalize(0.0)
}

/// Build a translate-then-uniform-scale matrix, the common placement in CLI flags
pub fn placement(translation: Vector3<f64>, scale: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&translation) * Matrix4::new_scaling(scale)
}
