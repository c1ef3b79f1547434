// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives generator
//!
//! All primitives are built from quads where possible, wound counter-clockwise
//! when viewed from outside.

use super::{Face, Mesh, Vertex};
use nalgebra::Point3;
use std::f64::consts::PI;

/// Geometric primitives
pub enum Primitive {
    /// Flat quad grid in the XY plane, centered on the origin, facing +Z
    Grid {
        width: f64,
        depth: f64,
        x_segments: usize,
        y_segments: usize,
    },
    /// Cube made of six quads sharing eight corners
    Cube { size: f64, center: bool },
    /// UV sphere; quads everywhere except the triangle fans at the poles
    Sphere { r: f64, segments: usize },
}

impl Primitive {
    pub fn grid(width: f64, depth: f64, x_segments: usize, y_segments: usize) -> Self {
        Self::Grid {
            width,
            depth,
            x_segments: x_segments.max(1),
            y_segments: y_segments.max(1),
        }
    }

    /// Single quad plane of the given edge length
    pub fn plane(size: f64) -> Self {
        Self::grid(size, size, 1, 1)
    }

    pub fn cube(size: f64, center: bool) -> Self {
        Self::Cube { size, center }
    }

    pub fn sphere(r: f64, segments: usize) -> Self {
        let segments = if segments >= 3 { segments } else { 32 };
        Self::Sphere { r, segments }
    }

    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = match self {
            Self::Grid {
                width,
                depth,
                x_segments,
                y_segments,
            } => generate_grid_mesh(*width, *depth, *x_segments, *y_segments),
            Self::Cube { size, center } => generate_cube_mesh(*size, *center),
            Self::Sphere { r, segments } => generate_sphere_mesh(*r, *segments),
        };
        mesh.recompute_normals();
        mesh
    }
}

fn generate_grid_mesh(width: f64, depth: f64, nx: usize, ny: usize) -> Mesh {
    let mut mesh = Mesh::with_capacity((nx + 1) * (ny + 1), nx * ny);

    for j in 0..=ny {
        let y = -depth / 2.0 + depth * j as f64 / ny as f64;
        for i in 0..=nx {
            let x = -width / 2.0 + width * i as f64 / nx as f64;
            mesh.add_vertex(Vertex::at(Point3::new(x, y, 0.0)));
        }
    }

    let row = nx + 1;
    for j in 0..ny {
        for i in 0..nx {
            let v = j * row + i;
            mesh.add_face(Face::new(vec![v, v + 1, v + 1 + row, v + row]));
        }
    }

    mesh
}

fn generate_cube_mesh(size: f64, center: bool) -> Mesh {
    let mut mesh = Mesh::with_capacity(8, 6);

    let (min, max) = if center {
        (-size / 2.0, size / 2.0)
    } else {
        (0.0, size)
    };

    // 8 vertices of the cube
    let positions = [
        Point3::new(min, min, min),
        Point3::new(max, min, min),
        Point3::new(max, max, min),
        Point3::new(min, max, min),
        Point3::new(min, min, max),
        Point3::new(max, min, max),
        Point3::new(max, max, max),
        Point3::new(min, max, max),
    ];
    for position in positions {
        mesh.add_vertex(Vertex::at(position));
    }

    let faces = [
        [4, 5, 6, 7], // Front (z+)
        [1, 0, 3, 2], // Back (z-)
        [5, 1, 2, 6], // Right (x+)
        [0, 4, 7, 3], // Left (x-)
        [7, 6, 2, 3], // Top (y+)
        [0, 1, 5, 4], // Bottom (y-)
    ];
    for indices in faces {
        mesh.add_face(Face::new(indices.to_vec()));
    }

    mesh
}

fn generate_sphere_mesh(radius: f64, segments: usize) -> Mesh {
    let stacks = segments;
    let slices = segments;
    let mut mesh = Mesh::with_capacity((stacks + 1) * (slices + 1), stacks * slices);

    for i in 0..=stacks {
        let phi = PI * i as f64 / stacks as f64;
        let y = radius * phi.cos();
        let r = radius * phi.sin();

        for j in 0..=slices {
            let theta = 2.0 * PI * j as f64 / slices as f64;
            mesh.add_vertex(Vertex::at(Point3::new(r * theta.cos(), y, r * theta.sin())));
        }
    }

    for i in 0..stacks {
        for j in 0..slices {
            let first = i * (slices + 1) + j;
            let second = first + slices + 1;

            let indices = if i == 0 {
                vec![first, second + 1, second]
            } else if i == stacks - 1 {
                vec![first, first + 1, second]
            } else {
                vec![first, first + 1, second + 1, second]
            };
            mesh.add_face(Face::new(indices));
        }
    }

    mesh
}
