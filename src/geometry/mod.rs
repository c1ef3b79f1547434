// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and operations

mod bbox;
mod mesh;
mod object;
mod primitives;
mod quad;

pub use bbox::BoundingBox;
pub use mesh::{Face, Mesh, Vertex};
pub use object::{placement, world_direction, SceneObject};
pub use primitives::Primitive;
pub use quad::{Diagonal, QuadFace, QUAD_EDGES};
