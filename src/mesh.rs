// Copyright 2025 Lars Brubaker
// License: MIT
//
// Quad-edge data structure (Guibas/Stolfi 1985).
//
// Design:
//   - One `QuadEdge` record per undirected edge, stored in a slot arena.
//   - A directed edge is an `EdgeRef`: (slot << 2) | r, where r in 0..4 is the
//     rotation. r = 0 is the primal edge, r = 2 its reverse, r = 1 and r = 3
//     the two dual edges.
//   - `next[r]` is the Onext pointer of rotation r. `data[r]` is the origin
//     point of rotation r (only meaningful for the primal rotations 0 and 2).
//   - rot/sym/inv_rot are pure bit arithmetic; every other navigation operator
//     is a composition of them with Onext and never allocates.

use crate::bucketalloc::BucketAlloc;
use crate::error::{Result, TessError};

/// Directed edge handle.
pub type EdgeRef = u32;
/// Index into the owning subdivision's point list.
pub type PointIdx = u32;

pub const INVALID: u32 = u32::MAX;

const MAX_QUADS: u32 = 1 << 30;

#[inline(always)]
pub fn rot(e: EdgeRef) -> EdgeRef {
    (e & !3) | (e.wrapping_add(1) & 3)
}

#[inline(always)]
pub fn inv_rot(e: EdgeRef) -> EdgeRef {
    (e & !3) | (e.wrapping_add(3) & 3)
}

#[inline(always)]
pub fn sym(e: EdgeRef) -> EdgeRef {
    e ^ 2
}

/// Arena slot of the quad-edge that owns `e`.
#[inline(always)]
pub fn quad(e: EdgeRef) -> u32 {
    e >> 2
}

/// Rotation of `e` within its quad-edge.
#[inline(always)]
pub fn num(e: EdgeRef) -> usize {
    (e & 3) as usize
}

#[derive(Clone, Debug)]
pub struct QuadEdge {
    pub next: [EdgeRef; 4],
    pub data: [PointIdx; 4],
    /// Constrained edge; never flipped.
    pub fixed: bool,
    /// Face-visited markers used by triangle extraction.
    pub eflag: [bool; 4],
}

impl QuadEdge {
    /// A freshly made edge: primal rings are singletons, the dual rings are
    /// each other's Onext.
    fn isolated(slot: u32) -> Self {
        let base = slot << 2;
        QuadEdge {
            next: [base, base + 3, base + 2, base + 1],
            data: [INVALID; 4],
            fixed: false,
            eflag: [false; 4],
        }
    }
}

pub struct QuadEdgeMesh {
    quads: BucketAlloc<QuadEdge>,
}

impl QuadEdgeMesh {
    pub fn new() -> Self {
        QuadEdgeMesh {
            quads: BucketAlloc::new(),
        }
    }

    /// Number of live undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.quads.len()
    }

    #[inline]
    pub fn contains(&self, e: EdgeRef) -> bool {
        e != INVALID && self.quads.get(quad(e)).is_some()
    }

    /// The primal edge (rotation 0) of every live quad-edge, in slot order.
    pub fn primal_edges(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        self.quads.slots().map(|q| q << 2)
    }

    #[inline]
    pub fn record(&self, e: EdgeRef) -> &QuadEdge {
        &self.quads[quad(e)]
    }

    #[inline]
    pub fn record_mut(&mut self, e: EdgeRef) -> &mut QuadEdge {
        &mut self.quads[quad(e)]
    }

    // ──────────────── Navigation ────────────────

    #[inline]
    pub fn onext(&self, e: EdgeRef) -> EdgeRef {
        self.quads[quad(e)].next[num(e)]
    }

    #[inline]
    pub fn oprev(&self, e: EdgeRef) -> EdgeRef {
        rot(self.onext(rot(e)))
    }

    #[inline]
    pub fn dnext(&self, e: EdgeRef) -> EdgeRef {
        sym(self.onext(sym(e)))
    }

    #[inline]
    pub fn dprev(&self, e: EdgeRef) -> EdgeRef {
        inv_rot(self.onext(inv_rot(e)))
    }

    #[inline]
    pub fn lnext(&self, e: EdgeRef) -> EdgeRef {
        rot(self.onext(inv_rot(e)))
    }

    #[inline]
    pub fn lprev(&self, e: EdgeRef) -> EdgeRef {
        sym(self.onext(e))
    }

    #[inline]
    pub fn rnext(&self, e: EdgeRef) -> EdgeRef {
        inv_rot(self.onext(rot(e)))
    }

    #[inline]
    pub fn rprev(&self, e: EdgeRef) -> EdgeRef {
        self.onext(sym(e))
    }

    #[inline]
    pub fn org(&self, e: EdgeRef) -> PointIdx {
        self.quads[quad(e)].data[num(e)]
    }

    #[inline]
    pub fn dest(&self, e: EdgeRef) -> PointIdx {
        self.org(sym(e))
    }

    pub fn set_end_points(&mut self, e: EdgeRef, org: PointIdx, dest: PointIdx) {
        let q = &mut self.quads[quad(e)];
        q.data[num(e)] = org;
        q.data[num(sym(e))] = dest;
    }

    #[inline]
    pub fn is_fixed(&self, e: EdgeRef) -> bool {
        self.quads[quad(e)].fixed
    }

    #[inline]
    pub fn set_fixed(&mut self, e: EdgeRef, fixed: bool) {
        self.quads[quad(e)].fixed = fixed;
    }

    // ──────────────── Topology ────────────────

    /// Allocate an isolated edge and return its primal rotation. Endpoints
    /// are left unset.
    pub fn make_edge(&mut self) -> Result<EdgeRef> {
        let slot = self.quads.alloc(QuadEdge::isolated(0))?;
        if slot >= MAX_QUADS {
            self.quads.free(slot);
            return Err(TessError::OutOfMemory);
        }
        self.quads[slot] = QuadEdge::isolated(slot);
        Ok(slot << 2)
    }

    /// Guibas/Stolfi splice. Exchanges the origin rings of `a` and `b` and,
    /// independently, the rings of their left faces: distinct rings merge,
    /// a shared ring splits in two.
    pub fn splice(&mut self, a: EdgeRef, b: EdgeRef) {
        let alpha = rot(self.onext(a));
        let beta = rot(self.onext(b));

        let t1 = self.onext(b);
        let t2 = self.onext(a);
        let t3 = self.onext(beta);
        let t4 = self.onext(alpha);

        self.quads[quad(a)].next[num(a)] = t1;
        self.quads[quad(b)].next[num(b)] = t2;
        self.quads[quad(alpha)].next[num(alpha)] = t3;
        self.quads[quad(beta)].next[num(beta)] = t4;
    }

    /// Release the record of `e`. The caller must have spliced it out of
    /// both rings first. Returns false when the slot was not live.
    pub fn remove(&mut self, e: EdgeRef) -> bool {
        self.quads.free(quad(e)).is_some()
    }

    /// Clear every face-visited marker.
    pub fn clear_flags(&mut self) {
        for (_, q) in self.quads.iter_mut() {
            q.eflag = [false; 4];
        }
    }

    /// Verify the quad-edge identities for every directed edge:
    /// Rot^4 = id, Sym^2 = id, Rot^2 = Sym, Onext(Oprev(e)) = e and a closed
    /// Onext ring. Returns a description of the first violation.
    pub fn check_identities(&self) -> std::result::Result<(), &'static str> {
        let limit = 4 * self.edge_count() + 4;
        for q in self.quads.slots() {
            for r in 0..4u32 {
                let e = (q << 2) | r;
                if rot(rot(rot(rot(e)))) != e {
                    return Err("Rot^4 is not the identity");
                }
                if sym(sym(e)) != e || rot(rot(e)) != sym(e) {
                    return Err("Sym is inconsistent with Rot");
                }
                if !self.contains(self.onext(e)) {
                    return Err("Onext points at a freed edge");
                }
                if self.onext(self.oprev(e)) != e {
                    return Err("Onext and Oprev are not inverse");
                }
                let mut f = self.onext(e);
                let mut steps = 0usize;
                while f != e {
                    f = self.onext(f);
                    steps += 1;
                    if steps > limit {
                        return Err("Onext ring does not close");
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for QuadEdgeMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_algebra() {
        for e in 0u32..32 {
            assert_eq!(rot(rot(rot(rot(e)))), e);
            assert_eq!(rot(rot(e)), sym(e));
            assert_eq!(inv_rot(rot(e)), e);
            assert_eq!(quad(rot(e)), quad(e));
        }
    }

    #[test]
    fn make_edge_is_isolated() {
        let mut mesh = QuadEdgeMesh::new();
        let e = mesh.make_edge().unwrap();
        assert_eq!(mesh.edge_count(), 1);
        assert_eq!(mesh.onext(e), e);
        assert_eq!(mesh.onext(sym(e)), sym(e));
        assert_eq!(mesh.onext(rot(e)), inv_rot(e));
        assert_eq!(mesh.oprev(e), e);
        // Both faces of an isolated edge are the same face.
        assert_eq!(mesh.lnext(e), sym(e));
        assert!(mesh.check_identities().is_ok());
    }

    #[test]
    fn splice_joins_and_splits_rings() {
        let mut mesh = QuadEdgeMesh::new();
        let a = mesh.make_edge().unwrap();
        let b = mesh.make_edge().unwrap();
        mesh.set_end_points(a, 0, 1);
        mesh.set_end_points(b, 0, 2);

        mesh.splice(a, b);
        assert_eq!(mesh.onext(a), b);
        assert_eq!(mesh.onext(b), a);
        assert!(mesh.check_identities().is_ok());

        mesh.splice(a, b);
        assert_eq!(mesh.onext(a), a);
        assert_eq!(mesh.onext(b), b);
        assert!(mesh.check_identities().is_ok());
    }

    #[test]
    fn triangle_face_ring() {
        let mut mesh = QuadEdgeMesh::new();
        let a = mesh.make_edge().unwrap();
        let b = mesh.make_edge().unwrap();
        let c = mesh.make_edge().unwrap();
        mesh.set_end_points(a, 0, 1);
        mesh.set_end_points(b, 1, 2);
        mesh.set_end_points(c, 2, 0);
        mesh.splice(sym(a), b);
        mesh.splice(sym(b), c);
        mesh.splice(sym(c), a);

        assert_eq!(mesh.lnext(a), b);
        assert_eq!(mesh.lnext(b), c);
        assert_eq!(mesh.lnext(c), a);
        assert_eq!(mesh.lprev(a), c);
        assert_eq!(mesh.dest(a), mesh.org(b));
        assert!(mesh.check_identities().is_ok());
    }

    #[test]
    fn removed_slot_is_reused() {
        let mut mesh = QuadEdgeMesh::new();
        let a = mesh.make_edge().unwrap();
        let _b = mesh.make_edge().unwrap();
        assert!(mesh.remove(a));
        assert!(!mesh.remove(a));
        assert!(!mesh.contains(a));
        let c = mesh.make_edge().unwrap();
        assert_eq!(quad(c), quad(a));
        assert_eq!(mesh.edge_count(), 2);
        assert_eq!(mesh.primal_edges().count(), 2);
    }

    #[test]
    fn clear_flags_resets_every_live_record() {
        let mut mesh = QuadEdgeMesh::new();
        let a = mesh.make_edge().unwrap();
        let b = mesh.make_edge().unwrap();
        let gone = mesh.make_edge().unwrap();
        mesh.record_mut(a).eflag = [true; 4];
        mesh.record_mut(sym(b)).eflag[num(sym(b))] = true;
        assert!(mesh.remove(gone));

        mesh.clear_flags();
        assert!(mesh.primal_edges().all(|e| mesh.record(e).eflag == [false; 4]));
    }
}
