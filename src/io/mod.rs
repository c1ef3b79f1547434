// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - loading and saving polygon meshes

mod obj;
mod stl;

pub use obj::{load_obj, read_obj, save_obj, write_obj};
pub use stl::{load_stl, save_stl};

use crate::geometry::Mesh;
use anyhow::{anyhow, Result};
use std::path::Path;

/// Supported mesh file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    /// Wavefront OBJ, keeps polygons as authored
    Obj,
    /// STL, triangles only
    Stl,
}

impl MeshFormat {
    /// Detect format from the file extension
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "obj" => Some(Self::Obj),
            "stl" => Some(Self::Stl),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Obj => "obj",
            Self::Stl => "stl",
        }
    }
}

fn detect(path: &Path) -> Result<MeshFormat> {
    MeshFormat::from_path(path).ok_or_else(|| {
        anyhow!(
            "Unsupported mesh format: {:?} (expected .obj or .stl)",
            path.extension().unwrap_or_default()
        )
    })
}

/// Load a mesh, picking the reader from the file extension
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    match detect(path)? {
        MeshFormat::Obj => load_obj(path),
        MeshFormat::Stl => load_stl(path),
    }
}

/// Save a mesh, picking the writer from the file extension
pub fn save_mesh(mesh: &Mesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        MeshFormat::Obj => save_obj(mesh, path),
        MeshFormat::Stl => save_stl(mesh, path),
    }
}
