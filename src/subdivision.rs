// Copyright 2025 Lars Brubaker
// License: MIT
//
// Incremental Delaunay subdivision on top of the quad-edge mesh.
//
// Follows the Guibas/Stolfi incremental algorithm (point location by walking,
// site insertion followed by Lawson flips), extended with constrained edges
// that are exempt from flipping. Constraint insertion lives in `constrain`,
// triangle extraction and interior classification in `output`.
//
// Every walk over the structure is bounded by the current edge count. Running
// past that bound means the topology is corrupt or the input is pathological,
// and is reported as `TessError::Aborted` instead of looping forever.

mod constrain;
mod output;

pub use output::{winding_number, WINDING_TOLERANCE};


use tracing::warn;

use crate::error::{try_push, Result, TessError};
use crate::geom::{between, in_circle, right_of, IndexTriangle, Point2, Segment};
use crate::mesh::{quad, sym, EdgeRef, PointIdx, QuadEdgeMesh, INVALID};

/// Number of synthetic corner points created by `initialize`. They occupy the
/// first slots of the point list and never reach the output.
pub const BOUNDING_POINTS: usize = 4;

/// Step counter for the bounded walks.
pub(crate) struct WalkGuard {
    steps: usize,
    limit: usize,
    what: &'static str,
}

impl WalkGuard {
    pub(crate) fn new(limit: usize, what: &'static str) -> Self {
        WalkGuard { steps: 0, limit, what }
    }

    #[inline]
    pub(crate) fn step(&mut self) -> Result<()> {
        self.steps += 1;
        if self.steps > self.limit {
            warn!(walk = self.what, limit = self.limit, "iteration bound exceeded");
            return Err(TessError::Aborted(self.what));
        }
        Ok(())
    }
}

pub struct Subdivision {
    pub(crate) mesh: QuadEdgeMesh,
    /// Every vertex ever created, bounding corners first.
    pub(crate) points: Vec<Point2>,
    /// Number of permanent (indexed) vertices.
    pub(crate) n_points: u32,
    pub(crate) starting_edge: EdgeRef,
    domain_min: Point2,
    domain_max: Point2,
    initialized: bool,

    // Output of `generate_triangle_list`.
    pub(crate) triangles: Vec<IndexTriangle>,
    pub(crate) point_array: Vec<Point2>,
}

impl Subdivision {
    pub fn new() -> Self {
        Subdivision {
            mesh: QuadEdgeMesh::new(),
            points: Vec::new(),
            n_points: 0,
            starting_edge: INVALID,
            domain_min: Point2::default(),
            domain_max: Point2::default(),
            initialized: false,
            triangles: Vec::new(),
            point_array: Vec::new(),
        }
    }

    // ─────── Accessors ────────────────────────────────────────────────────────

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Live undirected edges.
    pub fn edge_count(&self) -> usize {
        self.mesh.edge_count()
    }

    /// Permanent vertices inserted so far (bounding corners excluded).
    pub fn point_count(&self) -> usize {
        self.n_points as usize
    }

    /// Compacted output points, valid after `generate_triangle_list`.
    pub fn points(&self) -> &[Point2] {
        &self.point_array
    }

    /// Interior triangles, valid after `generate_triangle_list`.
    pub fn triangles(&self) -> &[IndexTriangle] {
        &self.triangles
    }

    pub fn mesh(&self) -> &QuadEdgeMesh {
        &self.mesh
    }

    /// Primal rotation of every live edge.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        self.mesh.primal_edges()
    }

    #[inline]
    pub fn org(&self, e: EdgeRef) -> &Point2 {
        &self.points[self.mesh.org(e) as usize]
    }

    #[inline]
    pub fn dest(&self, e: EdgeRef) -> &Point2 {
        &self.points[self.mesh.dest(e) as usize]
    }

    #[inline]
    pub fn segment(&self, e: EdgeRef) -> Segment {
        Segment::new(*self.org(e), *self.dest(e))
    }

    #[inline]
    pub fn is_fixed(&self, e: EdgeRef) -> bool {
        self.mesh.is_fixed(e)
    }

    /// True iff the origin of `e` is one of the synthetic bounding corners.
    pub fn is_bounding_point(&self, e: EdgeRef) -> bool {
        (self.mesh.org(e) as usize) < BOUNDING_POINTS
    }

    /// Verify the quad-edge identities over the whole structure.
    pub fn check_topology(&self) -> Result<()> {
        self.mesh.check_identities().map_err(|what| {
            warn!(what, "topology check failed");
            TessError::Aborted(what)
        })
    }

    fn add_point(&mut self, p: Point2) -> Result<PointIdx> {
        let idx = self.points.len() as PointIdx;
        try_push(&mut self.points, p)?;
        Ok(idx)
    }

    // ─────── Setup ────────────────────────────────────────────────────────────

    /// Seed the subdivision with the rectangle [min, max] split by one
    /// diagonal. Points are later accepted strictly inside the rectangle.
    pub fn initialize(&mut self, min: Point2, max: Point2) -> Result<()> {
        if self.initialized {
            return Err(TessError::AlreadyInitialized);
        }
        if !(min.x < max.x && min.y < max.y) {
            return Err(TessError::InvalidArgument("domain rectangle is empty"));
        }

        let da = self.add_point(Point2::new(min.x, min.y))?;
        let db = self.add_point(Point2::new(max.x, min.y))?;
        let dc = self.add_point(Point2::new(max.x, max.y))?;
        let dd = self.add_point(Point2::new(min.x, max.y))?;

        let ea = self.mesh.make_edge()?;
        self.mesh.set_end_points(ea, da, db);

        let eb = self.mesh.make_edge()?;
        self.mesh.splice(sym(ea), eb);
        self.mesh.set_end_points(eb, db, dc);

        let ec = self.mesh.make_edge()?;
        self.mesh.splice(sym(eb), ec);
        self.mesh.set_end_points(ec, dc, dd);

        let ed = self.mesh.make_edge()?;
        self.mesh.splice(sym(ec), ed);
        self.mesh.set_end_points(ed, dd, da);
        self.mesh.splice(sym(ed), ea);

        let ee = self.mesh.make_edge()?;
        self.mesh.splice(ee, ea);
        self.mesh.splice(sym(ee), ec);
        self.mesh.set_end_points(ee, da, dc);

        self.starting_edge = ea;

        let (pb, pd) = (self.points[db as usize], self.points[dd as usize]);
        if in_circle(self.org(ee), &pb, self.dest(ee), &pd) {
            self.swap(ee);
        }

        self.domain_min = min;
        self.domain_max = max;
        self.n_points = 0;
        self.initialized = true;
        Ok(())
    }

    // ─────── Edge primitives ──────────────────────────────────────────────────

    /// New edge from dest(a) to org(b) such that a, the new edge and b share
    /// a left face.
    pub fn connect(&mut self, a: EdgeRef, b: EdgeRef) -> Result<EdgeRef> {
        let e = self.mesh.make_edge()?;
        let a_lnext = self.mesh.lnext(a);
        self.mesh.splice(e, a_lnext);
        self.mesh.splice(sym(e), b);
        let (org, dest) = (self.mesh.dest(a), self.mesh.org(b));
        self.mesh.set_end_points(e, org, dest);
        Ok(e)
    }

    /// Detach `e` from both endpoint rings and free it.
    pub fn delete_edge(&mut self, e: EdgeRef) -> Result<()> {
        if !self.mesh.contains(e) {
            return Err(TessError::InvalidArgument("edge is not live"));
        }
        if quad(self.starting_edge) == quad(e) {
            self.starting_edge = self.mesh.oprev(e);
        }

        let e_oprev = self.mesh.oprev(e);
        self.mesh.splice(e, e_oprev);
        let s = sym(e);
        let s_oprev = self.mesh.oprev(s);
        self.mesh.splice(s, s_oprev);

        if !self.mesh.remove(e) {
            warn!(edge = e, "edge missing from edge list");
            return Err(TessError::Aborted("edge missing from edge list"));
        }
        Ok(())
    }

    /// Flip `e` inside the quadrilateral formed by its two faces.
    pub fn swap(&mut self, e: EdgeRef) {
        let a = self.mesh.oprev(e);
        let b = self.mesh.oprev(sym(e));
        self.mesh.splice(e, a);
        self.mesh.splice(sym(e), b);
        let a_lnext = self.mesh.lnext(a);
        self.mesh.splice(e, a_lnext);
        let b_lnext = self.mesh.lnext(b);
        self.mesh.splice(sym(e), b_lnext);
        let (org, dest) = (self.mesh.dest(a), self.mesh.dest(b));
        self.mesh.set_end_points(e, org, dest);
    }

    // ─────── Point location and insertion ─────────────────────────────────────

    /// Find an edge `e` such that `x` is org(e), lies on e, or lies in the
    /// left face of e. Walks from the starting edge toward `x`.
    pub fn locate(&self, x: &Point2) -> Result<EdgeRef> {
        if !self.initialized {
            return Err(TessError::NotInitialized);
        }
        let (min, max) = (&self.domain_min, &self.domain_max);
        if !x.x.is_finite()
            || !x.y.is_finite()
            || x.x >= max.x
            || x.x <= min.x
            || x.y >= max.y
            || x.y <= min.y
        {
            warn!(x = x.x, y = x.y, "point outside the subdivision domain");
            return Err(TessError::InvalidRange { x: x.x, y: x.y });
        }

        let mut e = self.starting_edge;
        let mut guard = WalkGuard::new(self.mesh.edge_count(), "point location");
        loop {
            if *x == *self.org(e) {
                return Ok(e);
            } else if *x == *self.dest(e) {
                return Ok(sym(e));
            } else if right_of(x, &self.segment(e)) {
                e = sym(e);
            } else if !right_of(x, &self.segment(self.mesh.onext(e))) {
                e = self.mesh.onext(e);
            } else if !right_of(x, &self.segment(self.mesh.dprev(e))) {
                e = self.mesh.dprev(e);
            } else {
                return Ok(e);
            }
            guard.step()?;
        }
    }

    /// Insert `x` and restore the Delaunay property around it. Returns an edge
    /// whose origin is `x`. Inserting an existing site is a no-op returning
    /// that site's edge.
    ///
    /// A site landing on an existing edge splits it; when that edge was fixed
    /// both halves stay fixed. Fixed edges are never flipped.
    pub fn insert_site(&mut self, x: &Point2) -> Result<EdgeRef> {
        let mut e = self.locate(x)?;
        if *x == *self.org(e) {
            return Ok(e);
        } else if *x == *self.dest(e) {
            return Ok(sym(e));
        }

        let mut split_dest: Option<PointIdx> = None;
        if between(x, &self.segment(e)) {
            e = self.mesh.oprev(e);
            let victim = self.mesh.onext(e);
            if self.mesh.is_fixed(victim) {
                split_dest = Some(self.mesh.dest(victim));
            }
            self.delete_edge(victim)?;
        }

        // Connect the new site to every corner of the enclosing triangle, or
        // quadrilateral when an edge was split.
        let mut site = Point2::new(x.x, x.y);
        site.index = self.n_points as i32;
        let site_idx = self.add_point(site)?;
        self.n_points += 1;

        let mut base = self.mesh.make_edge()?;
        let e_org = self.mesh.org(e);
        self.mesh.set_end_points(base, e_org, site_idx);
        if split_dest.is_some() {
            self.mesh.set_fixed(base, true);
        }
        self.mesh.splice(base, e);
        self.starting_edge = base;

        let mut guard = WalkGuard::new(self.mesh.edge_count(), "site connection");
        loop {
            base = self.connect(e, sym(base))?;
            if split_dest == Some(self.mesh.org(base)) {
                self.mesh.set_fixed(base, true);
            }
            e = self.mesh.oprev(base);
            if self.mesh.lnext(e) == self.starting_edge {
                break;
            }
            guard.step()?;
        }

        // Examine suspect edges and flip until every one is locally Delaunay.
        let mut guard = WalkGuard::new(self.mesh.edge_count(), "delaunay flips");
        loop {
            let t = self.mesh.oprev(e);
            if !self.mesh.is_fixed(e)
                && right_of(self.dest(t), &self.segment(e))
                && in_circle(self.org(e), self.dest(t), self.dest(e), x)
            {
                self.swap(e);
                e = self.mesh.oprev(e);
            } else if self.mesh.onext(e) == self.starting_edge {
                break;
            } else {
                e = self.mesh.lprev(self.mesh.onext(e));
            }
            guard.step()?;
        }

        Ok(sym(base))
    }
}

impl Default for Subdivision {
    fn default() -> Self {
        Self::new()
    }
}
