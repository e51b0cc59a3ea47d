// Copyright 2025 Lars Brubaker
// Mesh building from a planar triangulation.

use tracing::warn;

use super::{Facing, GlyphMesh, MeshGroup, NormalOrientation, TessellatorProperties, Triangulation};
use crate::error::{Result, TessError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    Front,
    Back,
}

/// Build the meshes `props.facing` asks for: front only, back only, or
/// front followed by back.
pub fn build_mesh_group(tri: &Triangulation, props: &TessellatorProperties) -> Result<MeshGroup> {
    let sides: &[Side] = match props.facing {
        Facing::Front => &[Side::Front],
        Facing::Back => &[Side::Back],
        Facing::Both => &[Side::Front, Side::Back],
    };
    let mut meshes = Vec::new();
    meshes.try_reserve(sides.len())?;
    for &side in sides {
        meshes.push(build_mesh(tri, props, side)?);
    }
    Ok(MeshGroup { meshes })
}

fn build_mesh(tri: &Triangulation, props: &TessellatorProperties, side: Side) -> Result<GlyphMesh> {
    let n = tri.points.len();
    let mut mesh = GlyphMesh::default();
    mesh.positions.try_reserve(n)?;
    mesh.normals.try_reserve(n)?;
    mesh.faces.try_reserve(tri.triangles.len())?;

    // Back faces point the other way in both normal and winding.
    let toward_viewer = (side == Side::Front) == (props.normal_orientation == NormalOrientation::Normal);
    let normal = if !props.generate_normals {
        [0.0, 0.0, 0.0]
    } else if toward_viewer {
        [0.0, 0.0, 1.0]
    } else {
        [0.0, 0.0, -1.0]
    };

    let z = -props.depth;
    for p in &tri.points {
        mesh.positions.push([p.x as f32, p.y as f32, z]);
        mesh.normals.push(normal);
    }

    let reverse = (side == Side::Front) == props.clockwise_winding;
    for t in &tri.triangles {
        if t.ia as usize >= n || t.ib as usize >= n || t.ic as usize >= n {
            warn!(ia = t.ia, ib = t.ib, ic = t.ic, points = n, "triangle index past point array");
            return Err(TessError::Aborted("triangle index past point array"));
        }
        mesh.faces.push(if reverse {
            [t.ic, t.ib, t.ia]
        } else {
            [t.ia, t.ib, t.ic]
        });
    }
    Ok(mesh)
}
