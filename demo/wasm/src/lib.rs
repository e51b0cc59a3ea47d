// Copyright 2025 Lars Brubaker
// WASM bindings for glyph-cdt

use glyph_cdt::{Contour, ContourTessellator, Facing, TessellatorProperties};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

/// Accumulates glyph contours, then tessellates them into a front mesh.
#[wasm_bindgen]
pub struct GlyphTessellatorJs {
    contours: Vec<Contour>,
    positions: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
    error: Option<String>,
}

#[wasm_bindgen]
impl GlyphTessellatorJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> GlyphTessellatorJs {
        GlyphTessellatorJs {
            contours: Vec::new(),
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            error: None,
        }
    }

    /// Add a closed polygon from a flat [x0,y0, x1,y1, ...] Float64Array.
    pub fn add_polygon(&mut self, vertices: &[f64]) -> bool {
        let pts: Vec<[f64; 2]> = vertices.chunks_exact(2).map(|p| [p[0], p[1]]).collect();
        self.push(Contour::from_polygon(&pts))
    }

    /// Add raw segments from a flat [ax,ay, bx,by, ...] Float64Array.
    pub fn add_segments(&mut self, coords: &[f64]) -> bool {
        self.push(Contour::from_flat(coords))
    }

    pub fn clear(&mut self) {
        self.contours.clear();
        self.positions.clear();
        self.normals.clear();
        self.indices.clear();
        self.error = None;
    }

    /// Tessellate the accumulated contours. Returns true on success; on
    /// failure `error()` describes what went wrong.
    pub fn tessellate(&mut self, depth: f32, clockwise: bool) -> bool {
        let props = TessellatorProperties {
            depth,
            clockwise_winding: clockwise,
            facing: Facing::Front,
            ..Default::default()
        };
        let result = ContourTessellator::new().tessellate(&self.contours, Some(&props), None);
        self.positions.clear();
        self.normals.clear();
        self.indices.clear();
        let mesh = match result {
            Ok(out) => out.front.and_then(|g| g.meshes.into_iter().next()),
            Err(e) => {
                self.error = Some(e.to_string());
                return false;
            }
        };
        let Some(mesh) = mesh else {
            self.error = Some("no front mesh produced".to_string());
            return false;
        };
        self.positions = mesh.positions.iter().flatten().copied().collect();
        self.normals = mesh.normals.iter().flatten().copied().collect();
        self.indices = mesh.faces.iter().flatten().copied().collect();
        self.error = None;
        true
    }

    pub fn vertex_count(&self) -> u32 {
        (self.positions.len() / 3) as u32
    }

    pub fn triangle_count(&self) -> u32 {
        (self.indices.len() / 3) as u32
    }

    /// Flat vertex positions [x0,y0,z0, x1,y1,z1, ...].
    pub fn get_positions(&self) -> Vec<f32> {
        self.positions.clone()
    }

    /// Flat vertex normals, parallel to the positions.
    pub fn get_normals(&self) -> Vec<f32> {
        self.normals.clone()
    }

    /// Flat triangle vertex-index triples [i0,i1,i2, ...].
    pub fn get_indices(&self) -> Vec<u32> {
        self.indices.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }
}

impl GlyphTessellatorJs {
    fn push(&mut self, contour: glyph_cdt::Result<Contour>) -> bool {
        match contour {
            Ok(c) => {
                self.contours.push(c);
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }
}

impl Default for GlyphTessellatorJs {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience: tessellate a single closed polygon and return the triangle
/// index array (empty on failure).
#[wasm_bindgen]
pub fn tessellate_polygon_indices(vertices: &[f64]) -> Vec<u32> {
    let mut t = GlyphTessellatorJs::new();
    if !t.add_polygon(vertices) || !t.tessellate(0.0, false) {
        return Vec::new();
    }
    t.get_indices()
}
