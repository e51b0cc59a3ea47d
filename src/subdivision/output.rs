// Copyright 2025 Lars Brubaker
// License: MIT
//
// Triangle extraction. Every face of the subdivision is traced once; a face is
// kept when the winding number of the constraint set about its centroid is a
// non-zero integer. Faces touching the bounding corners are skipped outright.

use std::f64::consts::PI;

use tracing::{debug, warn};

use super::{Subdivision, BOUNDING_POINTS};
use crate::error::{try_push, Result, TessError};
use crate::geom::{winding_contribution, IndexTriangle, Point2, Real, Segment, Triangle};
use crate::mesh::{num, sym, EdgeRef};

/// Below this a winding number counts as zero; within this of an integer it
/// counts as that integer.
pub const WINDING_TOLERANCE: Real = 1e-4;

/// How a face's winding number classifies it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FaceClass {
    Exterior,
    Interior,
    Ambiguous,
}

pub(crate) fn classify_winding(w: Real) -> FaceClass {
    if w.abs() <= WINDING_TOLERANCE {
        FaceClass::Exterior
    } else if (w.round() - w).abs() < WINDING_TOLERANCE {
        FaceClass::Interior
    } else {
        FaceClass::Ambiguous
    }
}

/// Winding number of `edges` about `p`.
pub fn winding_number(edges: &[Segment], p: &Point2) -> Real {
    let theta: Real = edges.iter().map(|e| winding_contribution(e, p)).sum();
    theta / (2.0 * PI)
}

impl Subdivision {
    /// Trace the left face of `start`, marking its three directed edges.
    /// Faces with a bounding corner are marked but not returned.
    fn trace_face(&mut self, start: EdgeRef) -> Option<Triangle> {
        let mut e = start;
        let mut corners = [Point2::default(); 3];
        let mut bounded = false;
        for corner in corners.iter_mut() {
            self.mesh.record_mut(e).eflag[num(e)] = true;
            bounded |= self.is_bounding_point(e);
            *corner = *self.org(e);
            e = self.mesh.lnext(e);
        }
        if bounded {
            return None;
        }
        Some(Triangle {
            a: corners[0],
            b: corners[1],
            c: corners[2],
        })
    }

    /// Rebuild `points()` and `triangles()` from the current subdivision.
    /// `edge_set` is the full constraint set used for the winding test.
    pub fn generate_triangle_list(&mut self, edge_set: &[Segment]) -> Result<()> {
        if !self.is_initialized() {
            return Err(TessError::NotInitialized);
        }
        self.triangles.clear();
        self.point_array.clear();
        self.mesh.clear_flags();

        let mut faces: Vec<Triangle> = Vec::new();
        let mut primal: Vec<EdgeRef> = Vec::new();
        primal.try_reserve(self.mesh.edge_count())?;
        primal.extend(self.mesh.primal_edges());
        for q in primal {
            for e in [q, sym(q)] {
                if self.mesh.record(e).eflag[num(e)] {
                    continue;
                }
                if let Some(face) = self.trace_face(e) {
                    try_push(&mut faces, face)?;
                }
            }
        }

        let n = self.n_points as usize;
        self.point_array.try_reserve(n)?;
        self.point_array.resize(n, Point2::default());
        for p in &self.points[BOUNDING_POINTS..] {
            if p.index >= 0 && (p.index as usize) < n {
                self.point_array[p.index as usize] = *p;
            }
        }

        let mut ambiguous = 0usize;
        for face in &faces {
            let w = winding_number(edge_set, &face.centroid());
            match classify_winding(w) {
                FaceClass::Exterior => {}
                FaceClass::Interior => try_push(
                    &mut self.triangles,
                    IndexTriangle {
                        ia: face.a.index as u32,
                        ib: face.b.index as u32,
                        ic: face.c.index as u32,
                    },
                )?,
                FaceClass::Ambiguous => {
                    ambiguous += 1;
                    warn!(winding = w, "dropping face with non-integer winding number");
                }
            }
        }

        debug!(
            faces = faces.len(),
            triangles = self.triangles.len(),
            points = n,
            ambiguous,
            "triangle list generated"
        );
        Ok(())
    }

    /// Consume the subdivision, keeping only the generated point array and
    /// triangle list.
    pub fn into_output(self) -> (Vec<Point2>, Vec<IndexTriangle>) {
        (self.point_array, self.triangles)
    }
}
