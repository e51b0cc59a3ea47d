// Copyright 2025 Lars Brubaker
// Shared test utilities for glyph-cdt tests.

#![allow(dead_code)]

use glyph_cdt::geom::in_circle;
use glyph_cdt::mesh::sym;
use glyph_cdt::{Contour, ContourTessellator, GlyphMesh, Point2, Subdivision, Triangulation};

/// Parse a simple text format: one vertex per line as `x y` or `x, y`.
/// Blank lines separate contours. Each contour is returned as a closed polygon.
pub fn parse_contours(data: &str) -> Vec<Contour> {
    let mut contours = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();

    let mut flush = |current: &mut Vec<[f64; 2]>| {
        if !current.is_empty() {
            contours.push(Contour::from_polygon(&current[..]).unwrap());
            current.clear();
        }
    };
    for line in data.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush(&mut current);
            continue;
        }
        let coords: Vec<f64> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<f64>().ok())
            .collect();
        if coords.len() >= 2 {
            current.push([coords[0], coords[1]]);
        }
    }
    flush(&mut current);
    contours
}

pub fn polygon(vertices: &[[f64; 2]]) -> Contour {
    Contour::from_polygon(vertices).unwrap()
}

/// Regular n-gon around `center`, counterclockwise unless `cw`.
pub fn regular_polygon(n: usize, center: [f64; 2], radius: f64, cw: bool) -> Vec<[f64; 2]> {
    let mut v: Vec<[f64; 2]> = (0..n)
        .map(|i| {
            let t = i as f64 * std::f64::consts::TAU / n as f64;
            [center[0] + radius * t.cos(), center[1] + radius * t.sin()]
        })
        .collect();
    if cw {
        v.reverse();
    }
    v
}

/// Signed area of a triangle given 3 vertices (2D).
pub fn triangle_area(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
}

/// Total signed area of all output triangles.
pub fn total_signed_area(tri: &Triangulation) -> f64 {
    tri.triangles
        .iter()
        .map(|t| {
            triangle_area(
                &tri.points[t.ia as usize],
                &tri.points[t.ib as usize],
                &tri.points[t.ic as usize],
            )
        })
        .sum()
}

/// Signed area enclosed by a contour, summed over its segments.
pub fn contour_signed_area(c: &Contour) -> f64 {
    c.segments().map(|s| 0.5 * (s.a.x * s.b.y - s.b.x * s.a.y)).sum()
}

/// Signed area of a simple polygon given as a vertex list.
pub fn polygon_signed_area(verts: &[[f64; 2]]) -> f64 {
    let n = verts.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += verts[i][0] * verts[j][1];
        area -= verts[j][0] * verts[i][1];
    }
    area * 0.5
}

pub fn triangulate(contours: &[Contour]) -> Triangulation {
    match ContourTessellator::new().triangulate(contours) {
        Ok(t) => t,
        Err(e) => panic!("tessellation failed: {}", e),
    }
}

/// Indices in range, coordinates finite, every triangle counterclockwise and
/// non-degenerate, every point indexed by its slot.
pub fn verify_valid_output(tri: &Triangulation) {
    let n = tri.points.len();
    for (i, p) in tri.points.iter().enumerate() {
        assert!(p.x.is_finite() && p.y.is_finite(), "point {} = {:?} is not finite", i, p);
        assert_eq!(p.index, i as i32, "point {} carries index {}", i, p.index);
    }
    for (i, t) in tri.triangles.iter().enumerate() {
        for idx in [t.ia, t.ib, t.ic] {
            assert!((idx as usize) < n, "triangle {} index {} out of range ({} points)", i, idx, n);
        }
        let area = triangle_area(
            &tri.points[t.ia as usize],
            &tri.points[t.ib as usize],
            &tri.points[t.ic as usize],
        );
        assert!(area > 0.0, "triangle {} is not counterclockwise (area={})", i, area);
    }
}

pub fn verify_valid_mesh(mesh: &GlyphMesh) {
    assert_eq!(mesh.positions.len(), mesh.normals.len());
    for (i, f) in mesh.faces.iter().enumerate() {
        for &idx in f {
            assert!(
                (idx as usize) < mesh.positions.len(),
                "face {} index {} out of range ({} positions)",
                i,
                idx,
                mesh.positions.len()
            );
        }
    }
}

pub fn contains_point(tri: &Triangulation, x: f64, y: f64) -> bool {
    tri.points.iter().any(|p| *p == Point2::new(x, y))
}

/// Subdivision seeded with the square (-half, half)².
pub fn seeded_subdivision(half: f64) -> Subdivision {
    let mut sub = Subdivision::new();
    sub.initialize(Point2::new(-half, -half), Point2::new(half, half)).unwrap();
    sub
}

/// Every unconstrained edge between two triangles passes the empty-circle
/// test against the opposite apex.
pub fn assert_locally_delaunay(sub: &Subdivision) {
    let m = sub.mesh();
    let is_tri = |e| m.lnext(m.lnext(m.lnext(e))) == e;
    for e in sub.edges() {
        if sub.is_fixed(e) || !is_tri(e) || !is_tri(sym(e)) {
            continue;
        }
        let left = sub.dest(m.lnext(e));
        let right = sub.dest(m.lnext(sym(e)));
        assert!(
            !in_circle(sub.org(e), sub.dest(e), left, right),
            "edge {:?} -> {:?} fails the empty-circle test",
            sub.org(e),
            sub.dest(e)
        );
    }
}

/// True iff the subdivision has a fixed edge joining `a` and `b`.
pub fn has_fixed_edge(sub: &Subdivision, a: Point2, b: Point2) -> bool {
    sub.edges().any(|e| {
        let (o, d) = (*sub.org(e), *sub.dest(e));
        sub.is_fixed(e) && ((o == a && d == b) || (o == b && d == a))
    })
}
