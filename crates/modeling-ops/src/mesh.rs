use serde::{Deserialize, Serialize};

use crate::axis_box::AxisBox;

/// Flat triangle buffers consumed by the viewport.
///
/// `positions` holds xyz triples, `indices` holds vertex index triples.
/// Vertices are never welded, so every box contributes its own eight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<f32>,
    pub indices: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<f32>>,
}

impl MeshData {
    /// Number of vertices (position triples).
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

const VERTS_PER_BOX: u32 = 8;

/// Two triangles per face indexing the cube corners below. Every face is
/// wound clockwise seen from outside the box.
const BOX_TRIANGLES: [[u32; 3]; 12] = [
    // bottom
    [0, 1, 2],
    [0, 2, 3],
    // top
    [4, 6, 5],
    [4, 7, 6],
    // front
    [0, 5, 1],
    [0, 4, 5],
    // back
    [3, 2, 6],
    [3, 6, 7],
    // left
    [0, 3, 7],
    [0, 7, 4],
    // right
    [1, 6, 2],
    [1, 5, 6],
];

/// Corners 0-3 ring the min-Z face counter-clockwise from min XY; 4-7 repeat
/// the ring on the max-Z face.
fn corners(b: &AxisBox) -> [[f64; 3]; 8] {
    let ([x0, y0, z0], [x1, y1, z1]) = (b.min, b.max);
    [
        [x0, y0, z0],
        [x1, y0, z0],
        [x1, y1, z0],
        [x0, y1, z0],
        [x0, y0, z1],
        [x1, y0, z1],
        [x1, y1, z1],
        [x0, y1, z1],
    ]
}

/// Concatenate every box into one mesh, offsetting indices by a running
/// base vertex.
pub fn build_box_mesh(boxes: &[AxisBox]) -> MeshData {
    let mut positions = Vec::with_capacity(boxes.len() * 8 * 3);
    let mut indices = Vec::with_capacity(boxes.len() * 12 * 3);

    let mut base = 0u32;
    for b in boxes {
        for corner in corners(b) {
            positions.extend(corner.iter().map(|&c| c as f32));
        }
        for tri in BOX_TRIANGLES {
            indices.extend(tri.iter().map(|&i| base + i));
        }
        base += VERTS_PER_BOX;
    }

    MeshData {
        positions,
        indices,
        normals: None,
    }
}
