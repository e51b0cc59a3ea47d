// Copyright 2025 Lars Brubaker
// Glyph outlines built with the contour generator, then tessellated.

mod helpers;

use approx::assert_relative_eq;
use glyph_cdt::{ContourGenerator, ContourTessellator, Facing, TessellatorProperties};

const KAPPA: f64 = 0.552_284_749_8;

/// Circle of radius `r` from four cubic quarter arcs, counterclockwise unless `cw`.
fn circle(g: &mut ContourGenerator, r: f64, cw: bool, steps: u32) {
    let k = KAPPA * r;
    let s = if cw { -1.0 } else { 1.0 };
    g.start_path().unwrap();
    g.move_to(r, 0.0).unwrap();
    g.curve_to([r, s * k], [k, s * r], [0.0, s * r], steps).unwrap();
    g.curve_to([-k, s * r], [-r, s * k], [-r, 0.0], steps).unwrap();
    g.curve_to([-r, -s * k], [-k, -s * r], [0.0, -s * r], steps).unwrap();
    g.curve_to([k, -s * r], [r, -s * k], [r, 0.0], steps).unwrap();
    g.end_path().unwrap();
}

#[test]
fn letter_o_has_a_counter() {
    let mut g = ContourGenerator::new();
    circle(&mut g, 10.0, false, 8);
    circle(&mut g, 6.0, true, 8);

    let (lo, hi) = g.bounding_box().unwrap();
    assert_eq!((lo.x, hi.x), (-10.0, 10.0));

    let contours = g.into_contours().unwrap();
    assert_eq!(contours.len(), 2);
    // Closed by the last curve: no extra closing segment.
    assert_eq!(contours[0].segment_count(), 32);

    let expected: f64 = contours.iter().map(helpers::contour_signed_area).sum();
    assert!(expected > 0.0);

    let tri = helpers::triangulate(&contours);
    helpers::verify_valid_output(&tri);
    assert_eq!(tri.points.len(), 64);
    // An annulus with no interior points: one triangle per boundary vertex.
    assert_eq!(tri.triangles.len(), 64);
    assert_relative_eq!(helpers::total_signed_area(&tri), expected, max_relative = 1e-9);
}

#[test]
fn letter_with_straight_and_curved_sides() {
    // A "D": vertical stem plus a bowl.
    let mut g = ContourGenerator::new();
    g.start_path().unwrap();
    g.move_to(0.0, 0.0).unwrap();
    g.line_to(4.0, 0.0).unwrap();
    g.curve_to([10.0, 0.0], [10.0, 12.0], [4.0, 12.0], 12).unwrap();
    g.line_to(0.0, 12.0).unwrap();
    g.end_path().unwrap();

    g.start_path().unwrap();
    g.move_to(2.0, 2.0).unwrap();
    g.line_to(2.0, 10.0).unwrap();
    g.line_to(4.0, 10.0).unwrap();
    g.curve_to([7.0, 10.0], [7.0, 2.0], [4.0, 2.0], 12).unwrap();
    g.end_path().unwrap();

    let contours = g.into_contours().unwrap();
    let expected: f64 = contours.iter().map(helpers::contour_signed_area).sum();

    let props = TessellatorProperties { facing: Facing::Both, depth: 1.0, ..Default::default() };
    let out = ContourTessellator::new()
        .tessellate(&contours, Some(&props), None)
        .unwrap();
    let group = out.front.unwrap();
    assert_eq!(group.meshes.len(), 2);
    for m in &group.meshes {
        helpers::verify_valid_mesh(m);
    }

    let tri = helpers::triangulate(&contours);
    helpers::verify_valid_output(&tri);
    assert_relative_eq!(helpers::total_signed_area(&tri), expected, max_relative = 1e-9);
}

#[test]
fn overlapping_glyph_strokes_union() {
    // Two strokes of an "X" drawn as separate overlapping bars.
    let mut g = ContourGenerator::new();
    for bar in [
        [[0.0, 1.0], [1.0, 0.0], [10.0, 9.0], [9.0, 10.0]],
        [[9.0, 0.0], [10.0, 1.0], [1.0, 10.0], [0.0, 9.0]],
    ] {
        g.start_path().unwrap();
        g.move_to(bar[0][0], bar[0][1]).unwrap();
        for p in &bar[1..] {
            g.line_to(p[0], p[1]).unwrap();
        }
        g.end_path().unwrap();
    }
    let contours = g.into_contours().unwrap();
    let tri = helpers::triangulate(&contours);
    helpers::verify_valid_output(&tri);

    // Every bar crossing adds a Steiner point: four around the central diamond.
    assert_eq!(tri.points.len(), 12);
    let bars: f64 = contours.iter().map(helpers::contour_signed_area).sum();
    let area = helpers::total_signed_area(&tri);
    assert!(area > 0.0 && area <= bars + 1e-9, "area {} vs bars {}", area, bars);
}
