//! Helper functions: error type and mesh math.

use modeling_ops::MeshData;
use sketch_service::ServiceError;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("unknown name: {name}")]
    UnknownName { name: String },

    #[error("duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("dispatch error: {message}")]
    DispatchError { message: String },

    #[error("unexpected response to {request}: {response}")]
    UnexpectedResponse { request: String, response: String },

    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    #[error("no mesh for body: {name}")]
    NoMesh { name: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },
}

// ── Mesh Math Utilities ─────────────────────────────────────────────────────

fn vertex(mesh: &MeshData, index: u32) -> Option<[f64; 3]> {
    let i = index as usize * 3;
    let v = mesh.positions.get(i..i + 3)?;
    Some([v[0] as f64, v[1] as f64, v[2] as f64])
}

fn triangles(mesh: &MeshData) -> impl Iterator<Item = [[f64; 3]; 3]> + '_ {
    mesh.indices.chunks_exact(3).filter_map(|tri| {
        Some([vertex(mesh, tri[0])?, vertex(mesh, tri[1])?, vertex(mesh, tri[2])?])
    })
}

/// Axis-aligned bounding box of the mesh positions, `None` for an empty mesh.
pub fn mesh_bounding_box(mesh: &MeshData) -> Option<([f32; 3], [f32; 3])> {
    if mesh.positions.len() < 3 {
        return None;
    }
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for chunk in mesh.positions.chunks_exact(3) {
        for i in 0..3 {
            min[i] = min[i].min(chunk[i]);
            max[i] = max[i].max(chunk[i]);
        }
    }
    Some((min, max))
}

/// Enclosed volume by the divergence theorem.
///
/// Every box is closed, so overlapping boxes count twice.
pub fn mesh_volume(mesh: &MeshData) -> f64 {
    let volume: f64 = triangles(mesh)
        .map(|[p0, p1, p2]| {
            p0[0] * (p1[1] * p2[2] - p2[1] * p1[2])
                + p1[0] * (p2[1] * p0[2] - p0[1] * p2[2])
                + p2[0] * (p0[1] * p1[2] - p1[1] * p0[2])
        })
        .sum();
    (volume / 6.0).abs()
}

/// Total surface area of all triangles.
pub fn mesh_surface_area(mesh: &MeshData) -> f64 {
    triangles(mesh)
        .map(|[p0, p1, p2]| {
            let a = [p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]];
            let b = [p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]];
            let c = [
                a[1] * b[2] - a[2] * b[1],
                a[2] * b[0] - a[0] * b[2],
                a[0] * b[1] - a[1] * b[0],
            ];
            (c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt() / 2.0
        })
        .sum()
}

/// Number of boxes in an unwelded box mesh.
pub fn box_count(mesh: &MeshData) -> usize {
    mesh.vertex_count() / 8
}
