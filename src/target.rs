// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Target surface queries
//!
//! A target surface answers two questions in world space: where is the
//! closest point to `p`, and where does a ray from `p` first hit. The mesh
//! implementation keeps the triangles in object-local space inside a parry3d
//! BVH and maps query inputs and results through the object's matrix.

use crate::error::{TriangulateError, TriangulateResult};
use crate::geometry::SceneObject;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use parry3d::math::{Point as ParryPoint, Real, Vector as ParryVector};
use parry3d::query::{PointQueryWithLocation, Ray, RayCast};
use parry3d::shape::{FeatureId, TriMesh};

/// A point found on the target surface, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub point: Point3<f64>,
    /// Unit surface normal at `point`
    pub normal: Vector3<f64>,
    /// Distance from the query origin to `point`
    pub distance: f64,
}

/// Query contract for the surface that diagonals are measured against
pub trait TargetSurface {
    /// Closest point on the surface to a world-space point
    fn nearest_point(&self, point: &Point3<f64>) -> Option<SurfaceHit>;

    /// First hit of a world-space ray within `max_distance`, if any.
    /// `None` for the radius searches without limit.
    fn ray_cast(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        max_distance: Option<f64>,
    ) -> Option<SurfaceHit>;
}

/// Triangle mesh target backed by a parry3d BVH
pub struct MeshTarget {
    name: String,
    trimesh: TriMesh,
    matrix_world: Matrix4<f64>,
    world_to_local: Matrix4<f64>,
    /// Inverse-transpose of the linear part, for normals
    normal_matrix: Matrix3<f64>,
}

impl MeshTarget {
    /// Build the BVH from an object's faces (fan-triangulated) and capture its matrix
    pub fn from_object(object: &SceneObject) -> TriangulateResult<Self> {
        let triangles = object.mesh.triangles();
        if triangles.is_empty() {
            return Err(TriangulateError::EmptyTarget(object.name.clone()));
        }

        let world_to_local = object
            .matrix_world
            .try_inverse()
            .ok_or_else(|| TriangulateError::SingularTransform(object.name.clone()))?;

        let vertices: Vec<ParryPoint<Real>> = object
            .mesh
            .vertices
            .iter()
            .map(|v| to_parry_point(&v.position))
            .collect();
        let indices: Vec<[u32; 3]> = triangles
            .iter()
            .map(|t| [t[0] as u32, t[1] as u32, t[2] as u32])
            .collect();

        tracing::debug!(
            target_name = %object.name,
            triangles = indices.len(),
            "Built target BVH"
        );

        Ok(Self {
            name: object.name.clone(),
            trimesh: TriMesh::new(vertices, indices),
            matrix_world: object.matrix_world,
            world_to_local,
            normal_matrix: world_to_local.fixed_view::<3, 3>(0, 0).transpose(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn triangle_count(&self) -> usize {
        self.trimesh.indices().len()
    }

    /// World-space unit normal of a target triangle, `None` for slivers
    fn triangle_normal(&self, triangle_id: u32) -> Option<Vector3<f64>> {
        let local = self.trimesh.triangle(triangle_id).normal()?;
        let local = Vector3::new(local.x as f64, local.y as f64, local.z as f64);
        (self.normal_matrix * local).try_normalize(f64::EPSILON)
    }

    /// Map a local-space point on triangle `triangle_id` to a world-space hit
    fn hit_at(
        &self,
        origin: &Point3<f64>,
        local: &ParryPoint<Real>,
        triangle_id: u32,
    ) -> Option<SurfaceHit> {
        let normal = self.triangle_normal(triangle_id)?;
        let point = self.matrix_world.transform_point(&from_parry_point(local));
        Some(SurfaceHit {
            point,
            normal,
            distance: (point - origin).norm(),
        })
    }
}

impl TargetSurface for MeshTarget {
    fn nearest_point(&self, point: &Point3<f64>) -> Option<SurfaceHit> {
        let local = to_parry_point(&self.world_to_local.transform_point(point));
        let (projection, (triangle_id, _)) =
            self.trimesh.project_local_point_and_get_location(&local, false);
        self.hit_at(point, &projection.point, triangle_id)
    }

    fn ray_cast(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        max_distance: Option<f64>,
    ) -> Option<SurfaceHit> {
        let local_origin = to_parry_point(&self.world_to_local.transform_point(origin));
        let local_direction = self.world_to_local.transform_vector(direction);
        if local_direction.norm() == 0.0 {
            return None;
        }
        let ray = Ray::new(
            local_origin,
            ParryVector::new(
                local_direction.x as Real,
                local_direction.y as Real,
                local_direction.z as Real,
            ),
        );
        let hit = self
            .trimesh
            .cast_local_ray_and_get_normal(&ray, Real::MAX, false)?;
        // Back-face hits are reported past the last triangle index
        let triangle_id = match hit.feature {
            FeatureId::Face(id) => id % self.triangle_count() as u32,
            _ => return None,
        };
        let found = self.hit_at(origin, &ray.point_at(hit.time_of_impact), triangle_id)?;
        match max_distance {
            Some(limit) if found.distance > limit => None,
            _ => Some(found),
        }
    }
}

fn to_parry_point(p: &Point3<f64>) -> ParryPoint<Real> {
    ParryPoint::new(p.x as Real, p.y as Real, p.z as Real)
}

fn from_parry_point(p: &ParryPoint<Real>) -> Point3<f64> {
    Point3::new(p.x as f64, p.y as f64, p.z as f64)
}
