// Copyright 2025 Lars Brubaker
// License: MIT
//
// Glyph contours and the path builder that produces them.
//
// A `Contour` is a flat list of points read in pairs: segment i runs from
// point 2i to point 2i+1. Segments need not share endpoints in order, so a
// contour can carry any set of edges as long as together they close up.

use crate::error::{try_push, Result, TessError};
use crate::geom::{Point2, Real, Segment};

/// Pen movements shorter than this on both axes are ignored.
pub const PEN_EPSILON: Real = 1e-4;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contour {
    points: Vec<Point2>,
}

impl Contour {
    pub fn new() -> Self {
        Contour { points: Vec::new() }
    }

    /// Build from a flat `[x0, y0, x1, y1, ...]` list read as segment pairs.
    /// A trailing unpaired point is ignored.
    pub fn from_flat(coords: &[Real]) -> Result<Self> {
        let mut c = Contour::new();
        for seg in coords.chunks_exact(4) {
            c.push_segment(Point2::new(seg[0], seg[1]), Point2::new(seg[2], seg[3]))?;
        }
        Ok(c)
    }

    /// Closed polygon through `vertices`, one segment per polygon side.
    pub fn from_polygon<P: Into<Point2> + Copy>(vertices: &[P]) -> Result<Self> {
        let mut c = Contour::new();
        let n = vertices.len();
        for i in 0..n {
            c.push_segment(vertices[i].into(), vertices[(i + 1) % n].into())?;
        }
        Ok(c)
    }

    pub fn from_segments(segments: &[Segment]) -> Result<Self> {
        let mut c = Contour::new();
        for s in segments {
            c.push_segment(s.a, s.b)?;
        }
        Ok(c)
    }

    pub fn push_segment(&mut self, a: Point2, b: Point2) -> Result<()> {
        self.points.try_reserve(2)?;
        self.points.push(a);
        self.points.push(b);
        Ok(())
    }

    #[inline]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.chunks_exact(2).map(|p| Segment::new(p[0], p[1]))
    }
}

// ─────── Path builder ─────────────────────────────────────────────────────────

/// Turns pen commands (move, line, cubic curve) into closed `Contour`s.
///
/// ```
/// use glyph_cdt::ContourGenerator;
///
/// let mut g = ContourGenerator::new();
/// g.start_path().unwrap();
/// g.move_to(0.0, 0.0).unwrap();
/// g.line_to(1.0, 0.0).unwrap();
/// g.line_to(0.0, 1.0).unwrap();
/// g.end_path().unwrap();
/// assert_eq!(g.contours()[0].segment_count(), 3);
/// ```
#[derive(Debug, Default)]
pub struct ContourGenerator {
    contours: Vec<Contour>,
    current: Option<Contour>,
    pen: Point2,
    bbox: Option<(Point2, Point2)>,
}

fn near(a: &Point2, b: &Point2) -> bool {
    (a.x - b.x).abs() < PEN_EPSILON && (a.y - b.y).abs() < PEN_EPSILON
}

impl ContourGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new path, committing any path still open.
    pub fn start_path(&mut self) -> Result<()> {
        if self.current.is_some() {
            self.end_path()?;
        }
        self.current = Some(Contour::new());
        Ok(())
    }

    pub fn move_to(&mut self, x: Real, y: Real) -> Result<()> {
        if self.current.is_none() {
            return Err(TessError::NoOpenPath);
        }
        self.pen = Point2::new(x, y);
        Ok(())
    }

    pub fn line_to(&mut self, x: Real, y: Real) -> Result<()> {
        if self.current.is_none() {
            return Err(TessError::NoOpenPath);
        }
        let p = Point2::new(x, y);
        if near(&p, &self.pen) {
            return Ok(());
        }
        let pen = self.pen;
        self.emit(pen, p)?;
        self.pen = p;
        Ok(())
    }

    /// Cubic Bézier from the pen through control points `c1`, `c2` to `end`,
    /// flattened into `steps` straight segments.
    pub fn curve_to(&mut self, c1: [Real; 2], c2: [Real; 2], end: [Real; 2], steps: u32) -> Result<()> {
        if self.current.is_none() {
            return Err(TessError::NoOpenPath);
        }
        if steps == 0 {
            return Err(TessError::InvalidRange { x: 0.0, y: 0.0 });
        }
        let start = self.pen;
        let (c1, c2, end) = (Point2::from(c1), Point2::from(c2), Point2::from(end));

        if !(near(&start, &end) && near(&c1, &c2)) {
            let mut prev = start;
            for i in 1..=steps {
                let u = i as Real / steps as Real;
                let next = if i == steps { end } else { cubic(&start, &c1, &c2, &end, u) };
                self.emit(prev, next)?;
                prev = next;
            }
        }
        self.pen = end;
        Ok(())
    }

    /// Close the open path back to its first point and commit it. Paths with
    /// no segments are discarded.
    pub fn end_path(&mut self) -> Result<()> {
        let Some(mut path) = self.current.take() else {
            return Ok(());
        };
        if path.is_empty() {
            return Ok(());
        }
        let first = path.points()[0];
        let pen = self.pen;
        if (pen.x - first.x).abs() > PEN_EPSILON || (pen.y - first.y).abs() > PEN_EPSILON {
            path.push_segment(pen, first)?;
            self.grow_bbox(pen);
            self.grow_bbox(first);
        }
        self.pen = first;
        try_push(&mut self.contours, path)

    }

    /// Min and max corner of every point emitted so far.
    pub fn bounding_box(&self) -> Option<(Point2, Point2)> {
        self.bbox
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Commit any open path and hand over the finished contours.
    pub fn into_contours(mut self) -> Result<Vec<Contour>> {
        self.end_path()?;
        Ok(self.contours)
    }

    fn emit(&mut self, a: Point2, b: Point2) -> Result<()> {
        let path = self.current.as_mut().ok_or(TessError::NoOpenPath)?;
        path.push_segment(a, b)?;
        self.grow_bbox(a);
        self.grow_bbox(b);
        Ok(())
    }

    fn grow_bbox(&mut self, p: Point2) {
        self.bbox = Some(match self.bbox {
            None => (p, p),
            Some((lo, hi)) => (
                Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
            ),
        });
    }
}

fn cubic(p0: &Point2, p1: &Point2, p2: &Point2, p3: &Point2, u: Real) -> Point2 {
    let v = 1.0 - u;
    let (b0, b1, b2, b3) = (v * v * v, 3.0 * u * v * v, 3.0 * u * u * v, u * u * u);
    Point2::new(
        b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
        b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
    )
}
