// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL import/export via `stl_io`

use crate::geometry::{Face, Mesh, Vertex};
use anyhow::{Context, Result};
use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use stl_io::{Normal, Triangle};

/// Load an STL file (ASCII or binary) as a triangle mesh with shared vertices
pub fn load_stl(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open STL file: {:?}", path))?;
    let stl = stl_io::read_stl(&mut BufReader::new(file))
        .with_context(|| format!("Failed to read STL file: {:?}", path))?;

    let mut mesh = Mesh::with_capacity(stl.vertices.len(), stl.faces.len());
    for v in &stl.vertices {
        mesh.add_vertex(Vertex::at(Point3::new(v[0] as f64, v[1] as f64, v[2] as f64)));
    }
    for face in &stl.faces {
        mesh.add_face(Face::new(face.vertices.to_vec()));
    }

    mesh.recompute_normals();
    Ok(mesh)
}

/// Save as binary STL; polygons are fan-triangulated
pub fn save_stl(mesh: &Mesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let corner = |index: usize| {
        let p = mesh.vertices[index].position;
        stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32])
    };

    let triangles: Vec<Triangle> = mesh
        .triangles()
        .into_iter()
        .map(|[a, b, c]| {
            let pa = mesh.vertices[a].position;
            let n = (mesh.vertices[b].position - pa)
                .cross(&(mesh.vertices[c].position - pa))
                .try_normalize(0.0)
                .unwrap_or_else(Vector3::zeros);
            Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [corner(a), corner(b), corner(c)],
            }
        })
        .collect();

    let file =
        File::create(path).with_context(|| format!("Failed to create STL file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    stl_io::write_stl(&mut writer, triangles.iter())
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write STL file: {:?}", path))
}
