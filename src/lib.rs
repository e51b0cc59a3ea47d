// glyph-cdt: constrained Delaunay tessellation of glyph contours
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod bucketalloc;
pub mod contour;
pub mod error;
pub mod geom;
pub mod mesh;
pub mod subdivision;
pub mod tess;

#[cfg(test)]
mod testlog;

pub use contour::{Contour, ContourGenerator};
pub use error::{Result, TessError};
pub use geom::{IndexTriangle, Point2, Segment};
pub use subdivision::Subdivision;
pub use tess::{
    ContourTessellator, Facing, GlyphMesh, MeshGroup, NormalOrientation, Tessellation,
    TessellatorProperties, Triangulation,
};
