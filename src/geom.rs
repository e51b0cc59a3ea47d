// Copyright 2025 Lars Brubaker
// License: MIT
//
// Plane geometry for the subdivision: value types and the orientation /
// in-circle predicates. Orientation and in-circle go through Shewchuk's
// adaptive-precision routines (the `robust` crate) so that sign decisions stay
// exact for nearly collinear and nearly cocircular inputs. Everything derived
// from them (collinear, between, proper intersection) inherits that exactness.

use tracing::warn;

use crate::error::{Result, TessError};

pub type Real = f64;

/// A site in the plane.
///
/// `index` is -1 until the point becomes a permanent triangulation vertex.
/// Equality compares coordinates only, exactly, with no tolerance.
#[derive(Clone, Copy, Debug)]
pub struct Point2 {
    pub x: Real,
    pub y: Real,
    pub index: i32,
}

impl Point2 {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Self { x, y, index: -1 }
    }
}

impl Default for Point2 {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl PartialEq for Point2 {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl From<[Real; 2]> for Point2 {
    fn from(p: [Real; 2]) -> Self {
        Point2::new(p[0], p[1])
    }
}

/// A directed segment `a -> b`. Used both for raw contour edges and as the
/// probe segment while inserting constraints.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Segment {
    pub a: Point2,
    pub b: Point2,
}

impl Segment {
    #[inline]
    pub const fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.a == self.b
    }
}

/// A face of the subdivision captured by value during extraction.
#[derive(Clone, Copy, Debug, Default)]
pub struct Triangle {
    pub a: Point2,
    pub b: Point2,
    pub c: Point2,
}

impl Triangle {
    pub fn centroid(&self) -> Point2 {
        Point2::new(
            (self.a.x + self.b.x + self.c.x) / 3.0,
            (self.a.y + self.b.y + self.c.y) / 3.0,
        )
    }
}

/// Output triangle: indices into the compacted point array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IndexTriangle {
    pub ia: u32,
    pub ib: u32,
    pub ic: u32,
}

#[inline]
fn coord(p: &Point2) -> robust::Coord<Real> {
    robust::Coord { x: p.x, y: p.y }
}

/// Twice the signed area of (a, b, c); positive iff counterclockwise.
#[inline]
pub fn tri_area(a: &Point2, b: &Point2, c: &Point2) -> Real {
    robust::orient2d(coord(a), coord(b), coord(c))
}

/// True iff `d` lies strictly inside the circle through the counterclockwise
/// triangle (a, b, c).
#[inline]
pub fn in_circle(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
    robust::incircle(coord(a), coord(b), coord(c), coord(d)) > 0.0
}

#[inline]
pub fn ccw(a: &Point2, b: &Point2, c: &Point2) -> bool {
    tri_area(a, b, c) > 0.0
}

#[inline]
pub fn right_of(x: &Point2, s: &Segment) -> bool {
    ccw(x, &s.b, &s.a)
}

#[inline]
pub fn left_of(x: &Point2, s: &Segment) -> bool {
    ccw(x, &s.a, &s.b)
}

#[inline]
pub fn collinear(x: &Point2, s: &Segment) -> bool {
    tri_area(x, &s.a, &s.b) == 0.0
}

/// True iff `c` is collinear with `s` and inside its closed extent.
pub fn between(c: &Point2, s: &Segment) -> bool {
    if !collinear(c, s) {
        return false;
    }
    let (a, b) = (&s.a, &s.b);
    if b.x != a.x {
        (a.x <= c.x && c.x <= b.x) || (a.x >= c.x && c.x >= b.x)
    } else {
        (a.y <= c.y && c.y <= b.y) || (a.y >= c.y && c.y >= b.y)
    }
}

/// Proper crossing: each segment strictly separates the endpoints of the
/// other. Any collinear endpoint disqualifies.
pub fn intersect_prop(a: &Segment, b: &Segment) -> bool {
    if collinear(&b.b, a) || collinear(&b.a, a) || collinear(&a.a, b) || collinear(&a.b, b) {
        return false;
    }
    (left_of(&b.a, a) ^ left_of(&b.b, a)) && (left_of(&a.a, b) ^ left_of(&a.b, b))
}

/// Proper crossing, or one segment touching the other at an endpoint.
pub fn intersect(a: &Segment, b: &Segment) -> bool {
    intersect_prop(a, b)
        || between(&b.a, a)
        || between(&b.b, a)
        || between(&a.a, b)
        || between(&a.b, b)
}

/// Intersection point of the supporting lines of two segments.
///
/// Fails with `Aborted` when an endpoint of `a` is collinear with `b`
/// (overlap or touching) or when the lines are parallel.
pub fn solve_intersection(a: &Segment, b: &Segment) -> Result<Point2> {
    if collinear(&a.a, b) || collinear(&a.b, b) {
        warn!(ax = a.a.x, ay = a.a.y, bx = b.a.x, by = b.a.y, "segments meet along a line");
        return Err(TessError::Aborted("segments meet along a line"));
    }

    let dx = a.b.x - a.a.x;
    let dy = a.b.y - a.a.y;
    let (a1, b1) = (-dy, dx);
    let c1 = a.a.y * dx - a.a.x * dy;

    let dx = b.b.x - b.a.x;
    let dy = b.b.y - b.a.y;
    let (a2, b2) = (-dy, dx);
    let c2 = b.a.y * dx - b.a.x * dy;

    let det = b1 * a2 - b2 * a1;
    if det == 0.0 {
        warn!(ax = a.a.x, ay = a.a.y, bx = b.a.x, by = b.a.y, "segments are parallel");
        return Err(TessError::Aborted("segments are parallel"));
    }
    Ok(Point2::new((b1 * c2 - b2 * c1) / det, (a2 * c1 - a1 * c2) / det))
}

/// Signed angle subtended by `edge` as seen from `p`, in radians.
/// Zero when `p` coincides with an endpoint.
pub fn winding_contribution(edge: &Segment, p: &Point2) -> Real {
    let (vax, vay) = (edge.a.x - p.x, edge.a.y - p.y);
    let (vbx, vby) = (edge.b.x - p.x, edge.b.y - p.y);
    let norm = (vax * vax + vay * vay).sqrt() * (vbx * vbx + vby * vby).sqrt();
    if norm == 0.0 {
        return 0.0;
    }
    let sin = (tri_area(p, &edge.a, &edge.b) / norm).clamp(-1.0, 1.0);
    let cos = ((vax * vbx + vay * vby) / norm).clamp(-1.0, 1.0);
    sin.atan2(cos)
}
