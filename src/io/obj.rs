// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wavefront OBJ reader and writer (ASCII, polygons preserved)
//!
//! Reads `v` and `f` statements. Face corners may be written as `v`, `v/vt`,
//! `v//vn` or `v/vt/vn`; only the position index is used. Negative indices
//! count back from the most recent vertex. Normals are recomputed after
//! loading, everything else is ignored.

use crate::geometry::{Face, Mesh, Vertex};
use anyhow::{anyhow, bail, Context, Result};
use nalgebra::Point3;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Load an OBJ file
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open OBJ file: {:?}", path))?;
    read_obj(BufReader::new(file)).with_context(|| format!("Failed to parse OBJ file: {:?}", path))
}

/// Parse OBJ text from any buffered reader
pub fn read_obj<R: BufRead>(reader: R) -> Result<Mesh> {
    let mut mesh = Mesh::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = number + 1;
        let line = line.split('#').next().unwrap_or_default().trim();
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let coords = tokens
                    .take(3)
                    .map(str::parse::<f64>)
                    .collect::<Result<Vec<_>, _>>()
                    .with_context(|| format!("line {line_no}: invalid vertex coordinate"))?;
                if coords.len() != 3 {
                    bail!("line {line_no}: vertex needs three coordinates");
                }
                mesh.add_vertex(Vertex::at(Point3::new(coords[0], coords[1], coords[2])));
            }
            Some("f") => {
                let vertex_count = mesh.vertex_count();
                let indices = tokens
                    .map(|corner| resolve_index(corner, vertex_count))
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("line {line_no}: invalid face"))?;
                if indices.len() < 3 {
                    bail!("line {line_no}: face needs at least three corners");
                }
                mesh.add_face(Face::new(indices));
            }
            _ => {}
        }
    }

    mesh.recompute_normals();
    Ok(mesh)
}

/// Turn a face corner token into a zero-based vertex index
fn resolve_index(corner: &str, vertex_count: usize) -> Result<usize> {
    let position = corner.split('/').next().unwrap_or_default();
    let index: i64 = position
        .parse()
        .with_context(|| format!("bad vertex reference {corner:?}"))?;

    let resolved = match index {
        0 => None,
        i if i > 0 => Some(i as usize - 1),
        i => vertex_count.checked_sub(i.unsigned_abs() as usize),
    };

    resolved
        .filter(|&i| i < vertex_count)
        .ok_or_else(|| anyhow!("vertex reference {index} out of range ({vertex_count} vertices)"))
}

/// Save a mesh as OBJ, one `vn` per vertex
pub fn save_obj(mesh: &Mesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file =
        File::create(path).with_context(|| format!("Failed to create OBJ file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write OBJ file: {:?}", path))
}

pub fn write_obj<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
    writeln!(
        writer,
        "# tritarget {}: {} vertices, {} faces",
        env!("CARGO_PKG_VERSION"),
        mesh.vertex_count(),
        mesh.face_count()
    )?;

    for vertex in &mesh.vertices {
        let p = vertex.position;
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for vertex in &mesh.vertices {
        let n = vertex.normal;
        writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for face in &mesh.faces {
        write!(writer, "f")?;
        for &index in &face.indices {
            write!(writer, " {0}//{0}", index + 1)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use approx::assert_relative_eq;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_index_forms() {
        let source = "\
# mixed corner syntax
o sample
v 0 0 0
v 1 0 0
v 1 1 0.5
v 0 1 0
vt 0 0
vn 0 0 1
f 1 2/1 3/1/1 4//1
f -4 -3 -2
";
        let mesh = read_obj(Cursor::new(source)).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces[0].indices, vec![0, 1, 2, 3]);
        assert_eq!(mesh.faces[1].indices, vec![0, 1, 2]);
        assert_relative_eq!(mesh.vertices[2].position.z, 0.5);
        assert!(mesh.faces[0].is_quad());
    }

    #[test]
    fn test_rejects_bad_references() {
        assert!(read_obj(Cursor::new("v 0 0 0\nf 1 2 3\n")).is_err());
        assert!(read_obj(Cursor::new("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n")).is_err());
        assert!(read_obj(Cursor::new("v 0 0 0\nv 1 0 0\nf 1 2\n")).is_err());
        assert!(read_obj(Cursor::new("v 0 zero 0\n")).is_err());
        assert!(read_obj(Cursor::new("v 0 0\n")).is_err());
    }

    #[test]
    fn test_polygons_survive_save_and_load() -> Result<()> {
        let mut mesh = Primitive::grid(2.0, 1.0, 2, 1).to_mesh();
        mesh.split_quad(1, crate::geometry::Diagonal::B);

        let file = NamedTempFile::new()?;
        save_obj(&mesh, file.path())?;
        let loaded = load_obj(file.path())?;

        assert_eq!(loaded.vertex_count(), mesh.vertex_count());
        let arities: Vec<_> = loaded.faces.iter().map(|f| f.arity()).collect();
        assert_eq!(arities, vec![4, 3, 3]);
        for (a, b) in loaded.faces.iter().zip(&mesh.faces) {
            assert_eq!(a.indices, b.indices);
        }
        Ok(())
    }
}
