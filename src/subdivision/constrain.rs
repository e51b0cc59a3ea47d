// Copyright 2025 Lars Brubaker
// License: MIT
//
// Constrained edges. A constraint from a to b is forced into the subdivision by
// deleting every edge it crosses and re-triangulating the two pseudo-polygons
// on either side of it. Constraints that cross earlier constraints are split
// at a Steiner point first, so fixed edges never cross.

use tracing::{debug, trace, warn};

use super::{Subdivision, WalkGuard};
use crate::error::{try_push, Result, TessError};
use crate::geom::{between, in_circle, intersect, intersect_prop, left_of, solve_intersection, Point2, Segment};
use crate::mesh::{sym, EdgeRef};

impl Subdivision {
    /// True iff `e` has neither `a` nor `b` as an endpoint.
    fn avoids(&self, e: EdgeRef, a: &Point2, b: &Point2) -> bool {
        let (o, d) = (self.org(e), self.dest(e));
        o != a && o != b && d != a && d != b
    }

    /// Visit the origin ring of `start` until `pred` accepts an edge.
    fn find_in_ring<F>(&self, start: EdgeRef, mut pred: F) -> Result<Option<EdgeRef>>
    where
        F: FnMut(&Self, EdgeRef) -> bool,
    {
        let mut e = start;
        let mut guard = WalkGuard::new(self.mesh.edge_count(), "origin ring scan");
        loop {
            if pred(self, e) {
                return Ok(Some(e));
            }
            e = self.mesh.onext(e);
            if e == start {
                return Ok(None);
            }
            guard.step()?;
        }
    }

    /// First edge of the triangle fan around org(`ea`) that the probe crosses,
    /// oriented so the probe origin lies on its right.
    fn first_cut(&self, ea: EdgeRef, probe: &Segment) -> Result<Option<EdgeRef>> {
        let (a, b) = (&probe.a, &probe.b);
        let found = self.find_in_ring(ea, |s, e| {
            let l = s.mesh.lnext(e);
            s.avoids(l, a, b) && intersect(&s.segment(l), probe)
        })?;
        Ok(found.map(|e| {
            let l = self.mesh.lnext(e);
            if left_of(a, &self.segment(l)) {
                sym(l)
            } else {
                l
            }
        }))
    }

    /// Walk from `cut` along the edges crossed by the probe, calling `visit`
    /// on each crossed edge. Stops when the walk reaches the probe's far end
    /// or `visit` returns false.
    fn walk_cuts<F>(&self, cut: EdgeRef, probe: &Segment, mut visit: F) -> Result<()>
    where
        F: FnMut(EdgeRef) -> Result<bool>,
    {
        let (a, b) = (&probe.a, &probe.b);
        let mut left = cut;
        let mut guard = WalkGuard::new(self.mesh.edge_count(), "constraint crossing walk");
        loop {
            if self.dest(left) == b {
                return Ok(());
            }
            if self.avoids(left, a, b) && intersect(&self.segment(left), probe) {
                if !visit(left)? {
                    return Ok(());
                }
                left = self.mesh.onext(left);
            } else {
                left = self.mesh.rprev(left);
            }
            guard.step()?;
        }
    }

    /// Insert the constraint a-b, splitting it wherever it crosses or runs
    /// along an existing fixed edge. Both endpoints are inserted as sites.
    pub fn intersect_insert_edge(&mut self, a: &Point2, b: &Point2) -> Result<()> {
        let mut stack: Vec<Segment> = Vec::new();
        try_push(&mut stack, Segment::new(*a, *b))?;

        let mut popped = 0usize;
        while let Some(seg) = stack.pop() {
            popped += 1;
            if popped > self.mesh.edge_count() {
                warn!(popped, edges = self.mesh.edge_count(), "constraint splitting did not converge");
                return Err(TessError::Aborted("constraint splitting did not converge"));
            }
            let (a, b) = (seg.a, seg.b);

            self.insert_site(&b)?;
            if a == b {
                continue;
            }
            let ea = self.insert_site(&a)?;

            // Already present: just pin it.
            if let Some(e) = self.find_in_ring(ea, |s, e| s.dest(e) == &b)? {
                self.mesh.set_fixed(e, true);
                continue;
            }

            // An existing edge runs part of the way along the constraint.
            if let Some(e) = self.find_in_ring(ea, |s, e| between(s.dest(e), &seg))? {
                self.mesh.set_fixed(e, true);
                let d = *self.dest(e);
                try_push(&mut stack, Segment::new(d, b))?;
                continue;
            }

            let cut = match self.first_cut(ea, &seg)? {
                Some(cut) => cut,
                None => {
                    warn!(ax = a.x, ay = a.y, bx = b.x, by = b.y, "constraint leaves its origin fan");
                    return Err(TessError::Aborted("constraint leaves its origin fan"));
                }
            };

            let mut blocker = None;
            if self.mesh.is_fixed(cut) {
                blocker = Some(cut);
            } else {
                let mesh = &self.mesh;
                self.walk_cuts(cut, &seg, |e| {
                    if mesh.is_fixed(e) {
                        blocker = Some(e);
                        Ok(false)
                    } else {
                        Ok(true)
                    }
                })?;
            }

            let f = match blocker {
                Some(f) => f,
                None => {
                    self.insert_edge(&a, &b)?;
                    continue;
                }
            };

            let fixed = self.segment(f);
            if intersect_prop(&seg, &fixed) {
                let x = solve_intersection(&seg, &fixed)?;
                debug!(x = x.x, y = x.y, "constraints cross, splitting at steiner point");
                self.mesh.set_fixed(f, false);
                self.insert_edge(&fixed.a, &x)?;
                self.insert_edge(&fixed.b, &x)?;
                try_push(&mut stack, Segment::new(a, x))?;
                try_push(&mut stack, Segment::new(x, b))?;
            } else {
                // Overlap: stop at the fixed endpoint lying on the constraint,
                // nearest to a.
                let on_a = between(&fixed.a, &seg);
                let on_b = between(&fixed.b, &seg);
                let x = match (on_a, on_b) {
                    (true, true) => {
                        let da = (fixed.a.x - a.x).powi(2) + (fixed.a.y - a.y).powi(2);
                        let db = (fixed.b.x - a.x).powi(2) + (fixed.b.y - a.y).powi(2);
                        if da <= db {
                            fixed.a
                        } else {
                            fixed.b
                        }
                    }
                    (true, false) => fixed.a,
                    (false, true) => fixed.b,
                    (false, false) => {
                        warn!(
                            ax = a.x,
                            ay = a.y,
                            bx = b.x,
                            by = b.y,
                            fixed_ax = fixed.a.x,
                            fixed_ay = fixed.a.y,
                            fixed_bx = fixed.b.x,
                            fixed_by = fixed.b.y,
                            "fixed edge touches constraint off its span"
                        );
                        return Err(TessError::Aborted("fixed edge touches constraint off its span"));
                    }
                };
                trace!(x = x.x, y = x.y, "constraint overlaps fixed edge");
                self.insert_edge(&a, &x)?;
                try_push(&mut stack, Segment::new(x, b))?;
            }
        }
        Ok(())
    }

    /// Force the fixed edge a-b into the subdivision. Every edge crossing
    /// a-b is removed and the two resulting cavities are re-triangulated.
    /// The caller guarantees a-b crosses no other fixed edge.
    pub fn insert_edge(&mut self, a: &Point2, b: &Point2) -> Result<()> {
        self.insert_site(a)?;
        if a == b {
            return Ok(());
        }
        let eb = self.insert_site(b)?;

        if let Some(e) = self.find_in_ring(eb, |s, e| s.dest(e) == a)? {
            self.mesh.set_fixed(e, true);
            return Ok(());
        }

        // Inserting b may have flipped the edge we held for a.
        let ea = self.locate(a)?;
        if self.org(ea) != a {
            warn!(x = a.x, y = a.y, "constraint origin vanished");
            return Err(TessError::Aborted("constraint origin vanished"));
        }

        let probe = Segment::new(*a, *b);
        let first = match self.first_cut(ea, &probe)? {
            Some(cut) => cut,
            None => {
                trace!("constraint has nothing to cut");
                return Ok(());
            }
        };

        let mut cuts: Vec<EdgeRef> = Vec::new();
        self.walk_cuts(first, &probe, |e| {
            try_push(&mut cuts, e)?;
            Ok(true)
        })?;
        if cuts.is_empty() {
            warn!(ax = a.x, ay = a.y, bx = b.x, by = b.y, "constraint crosses no edge");
            return Err(TessError::Aborted("constraint crosses no edge"));
        }
        trace!(cuts = cuts.len(), "removing crossed edges");

        for &e in &cuts[1..] {
            self.delete_edge(e)?;
        }
        let start = self.mesh.lnext(cuts[0]);
        self.delete_edge(cuts[0])?;

        // Locate the cavity corners at a and b.
        let mut guard = WalkGuard::new(self.mesh.edge_count(), "cavity boundary walk");
        let mut ea = self.mesh.lnext(start);
        while self.dest(ea) != a {
            if ea == start {
                warn!(x = a.x, y = a.y, edge = start, "cavity does not reach constraint origin");
                return Err(TessError::Aborted("cavity does not reach constraint origin"));
            }
            ea = self.mesh.lnext(ea);
            guard.step()?;
        }
        let mut guard = WalkGuard::new(self.mesh.edge_count(), "cavity boundary walk");
        let mut eb = self.mesh.lnext(start);
        while self.org(eb) != b {
            if eb == start {
                warn!(x = b.x, y = b.y, edge = start, "cavity does not reach constraint end");
                return Err(TessError::Aborted("cavity does not reach constraint end"));
            }
            eb = self.mesh.lnext(eb);
            guard.step()?;
        }

        let spine = self.connect(ea, eb)?;
        self.mesh.set_fixed(spine, true);
        self.triangulate_pseudopolygon(spine)?;
        self.triangulate_pseudopolygon(sym(spine))?;
        Ok(())
    }

    /// Triangulate the face left of `edge` so that every new triangle built on
    /// a base edge is Delaunay with respect to the face's other vertices.
    pub fn triangulate_pseudopolygon(&mut self, edge: EdgeRef) -> Result<()> {
        let mut stack: Vec<EdgeRef> = Vec::new();
        try_push(&mut stack, edge)?;

        while let Some(spine) = stack.pop() {
            let first = self.mesh.lnext(self.mesh.lnext(spine));
            let mut c = first;
            let mut v = self.mesh.lnext(c);
            if v == spine || c == spine {
                continue;
            }

            let mut guard = WalkGuard::new(self.mesh.edge_count(), "pseudo-polygon scan");
            while v != spine {
                if in_circle(self.org(spine), self.dest(spine), self.org(c), self.org(v)) {
                    c = v;
                }
                v = self.mesh.lnext(v);
                guard.step()?;
            }

            if c != first {
                self.connect(spine, c)?;
                let e = sym(self.mesh.lnext(spine));
                try_push(&mut stack, e)?;
            }
            let lprev = self.mesh.lprev(spine);
            if c != lprev {
                self.connect(lprev, c)?;
                let e = sym(self.mesh.lprev(spine));
                try_push(&mut stack, e)?;
            }
        }
        Ok(())
    }
}
