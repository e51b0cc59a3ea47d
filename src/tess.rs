// Copyright 2025 Lars Brubaker
// License: MIT
//
// Public entry point: closed glyph contours in, front/back triangle meshes out.
//
// Every contour edge is pushed through a fresh constrained subdivision, the
// interior faces are picked out by winding number, and the mesh builder in
// `output` turns the resulting index triangles into one mesh per requested
// facing.

mod output;


use tracing::{debug, trace, warn};

use crate::contour::Contour;
use crate::error::{Result, TessError};
use crate::geom::{IndexTriangle, Point2, Segment};
use crate::subdivision::Subdivision;

pub use output::build_mesh_group;

// ─────────────────────────────── Public types ──────────────────────────────────

/// Which side(s) of the glyph get a mesh.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Facing {
    /// Outward face only.
    #[default]
    Front,
    /// Mirrored face only.
    Back,
    /// Both, front mesh first.
    Both,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum NormalOrientation {
    #[default]
    Normal,
    Inverse,
}

/// Mesh-building options for one facing request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TessellatorProperties {
    /// Extrusion depth; vertices are placed at z = -depth.
    pub depth: f32,
    /// Emit constant face normals. When false every normal is zero.
    pub generate_normals: bool,
    pub normal_orientation: NormalOrientation,
    /// Emit front faces clockwise instead of counterclockwise.
    pub clockwise_winding: bool,
    pub facing: Facing,
}

impl Default for TessellatorProperties {
    fn default() -> Self {
        TessellatorProperties {
            depth: 0.0,
            generate_normals: true,
            normal_orientation: NormalOrientation::Normal,
            clockwise_winding: false,
            facing: Facing::Front,
        }
    }
}

/// A renderable triangle mesh. `positions` and `normals` have equal length
/// and every face index is below it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
}

impl GlyphMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// One mesh per facing produced for a request: one for `Front` or `Back`,
/// two (front then back) for `Both`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshGroup {
    pub meshes: Vec<GlyphMesh>,
}

/// Planar result of tessellation: compacted points and interior triangles
/// indexing them, counterclockwise.
#[derive(Clone, Debug, Default)]
pub struct Triangulation {
    pub points: Vec<Point2>,
    pub triangles: Vec<IndexTriangle>,
}

/// Meshes for the front and back requests passed to `tessellate`.
#[derive(Clone, Debug, Default)]
pub struct Tessellation {
    pub front: Option<MeshGroup>,
    pub back: Option<MeshGroup>,
}

// ─────────────────────────── Tessellator ──────────────────────────────────────

pub struct ContourTessellator {
    domain_min: Point2,
    domain_max: Point2,
}

impl ContourTessellator {
    /// Tessellator accepting any point strictly inside the single-precision
    /// range.
    pub fn new() -> Self {
        let m = f32::MAX as f64;
        ContourTessellator {
            domain_min: Point2::new(-m, -m),
            domain_max: Point2::new(m, m),
        }
    }

    /// Tessellator restricted to the open rectangle (min, max).
    pub fn with_domain(min: [f64; 2], max: [f64; 2]) -> Result<Self> {
        if !(min[0] < max[0] && min[1] < max[1]) {
            return Err(TessError::InvalidArgument("domain rectangle is empty"));
        }
        Ok(ContourTessellator {
            domain_min: min.into(),
            domain_max: max.into(),
        })
    }

    pub fn domain(&self) -> (Point2, Point2) {
        (self.domain_min, self.domain_max)
    }

    /// Constrained triangulation of `contours`, keeping faces with non-zero
    /// integer winding. Zero-length segments are ignored. Fails with
    /// `Aborted` when nothing is left to output.
    pub fn triangulate(&self, contours: &[Contour]) -> Result<Triangulation> {
        let mut edge_set: Vec<Segment> = Vec::new();
        edge_set.try_reserve(contours.iter().map(Contour::segment_count).sum())?;
        edge_set.extend(
            contours
                .iter()
                .flat_map(|c| c.segments())
                .filter(|s| !s.is_degenerate()),
        );
        debug!(contours = contours.len(), edges = edge_set.len(), "tessellating contours");

        if edge_set.is_empty() {
            warn!("no usable contour edges");
            return Err(TessError::Aborted("no usable contour edges"));
        }

        let mut sub = Subdivision::new();
        sub.initialize(self.domain_min, self.domain_max)?;
        for (i, s) in edge_set.iter().enumerate() {
            trace!(i, ax = s.a.x, ay = s.a.y, bx = s.b.x, by = s.b.y, "inserting contour edge");
            sub.intersect_insert_edge(&s.a, &s.b)?;
        }
        sub.generate_triangle_list(&edge_set)?;

        let (points, triangles) = sub.into_output();
        if points.is_empty() || triangles.is_empty() {
            warn!("contours enclose no area");
            return Err(TessError::Aborted("contours enclose no area"));
        }
        debug!(points = points.len(), triangles = triangles.len(), "tessellation done");
        Ok(Triangulation { points, triangles })
    }

    /// Tessellate `contours` and build a mesh group for each request given.
    /// At least one of `front` and `back` must be present.
    pub fn tessellate(
        &self,
        contours: &[Contour],
        front: Option<&TessellatorProperties>,
        back: Option<&TessellatorProperties>,
    ) -> Result<Tessellation> {
        if front.is_none() && back.is_none() {
            return Err(TessError::InvalidArgument("no mesh requested"));
        }
        let tri = self.triangulate(contours)?;
        Ok(Tessellation {
            front: front.map(|p| build_mesh_group(&tri, p)).transpose()?,
            back: back.map(|p| build_mesh_group(&tri, p)).transpose()?,
        })
    }

    /// Single-contour entry point without the front/back split. Not
    /// supported; use `tessellate`.
    pub fn tessellate_contour(&self, _contour: &Contour, _props: &TessellatorProperties) -> Result<MeshGroup> {
        Err(TessError::Unsupported)
    }

    /// Single-glyph entry point without the front/back split. Not
    /// supported; use `tessellate`.
    pub fn tessellate_glyph(&self, _glyph: &[Contour], _props: &TessellatorProperties) -> Result<MeshGroup> {
        Err(TessError::Unsupported)
    }
}

impl Default for ContourTessellator {
    fn default() -> Self {
        Self::new()
    }
}
