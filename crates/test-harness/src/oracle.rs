//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics.
//! This lets a scenario collect all failures in one pass.

use modeling_ops::MeshData;

use crate::helpers::{box_count, mesh_bounding_box, mesh_volume};

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::pass(name, detail)
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::fail(name, detail)
        }
    }
}

// ── Structure Oracles ───────────────────────────────────────────────────────

/// Check that all index values are within bounds.
pub fn check_valid_indices(mesh: &MeshData) -> OracleVerdict {
    let vertex_count = mesh.vertex_count();
    let bad: Vec<(usize, u32)> = mesh
        .indices
        .iter()
        .enumerate()
        .filter(|(_, &idx)| idx as usize >= vertex_count)
        .map(|(i, &idx)| (i, idx))
        .collect();

    if bad.is_empty() {
        OracleVerdict::pass("valid_indices", format!("all indices < {}", vertex_count))
    } else {
        OracleVerdict::fail(
            "valid_indices",
            format!(
                "{} out-of-bounds indices (vertex_count={}): {:?}",
                bad.len(),
                vertex_count,
                &bad[..bad.len().min(5)]
            ),
        )
    }
}

/// Check the unwelded box layout: 8 vertices and 12 triangles per box.
pub fn check_box_layout(mesh: &MeshData) -> OracleVerdict {
    let boxes = box_count(mesh);
    let ok = mesh.positions.len() % 24 == 0
        && mesh.indices.len() % 3 == 0
        && mesh.triangle_count() == boxes * 12;
    let detail = format!(
        "{} vertices, {} triangles, {} boxes",
        mesh.vertex_count(),
        mesh.triangle_count(),
        boxes
    );
    if ok {
        OracleVerdict::pass_val("box_layout", detail, boxes as f64)
    } else {
        OracleVerdict::fail_val("box_layout", detail, boxes as f64)
    }
}

/// Check that no triangle repeats a vertex index.
pub fn check_no_degenerate_triangles(mesh: &MeshData) -> OracleVerdict {
    let degenerate = mesh
        .indices
        .chunks_exact(3)
        .filter(|t| t[0] == t[1] || t[1] == t[2] || t[0] == t[2])
        .count();
    if degenerate == 0 {
        OracleVerdict::pass("no_degenerate_triangles", "no repeated indices".to_string())
    } else {
        OracleVerdict::fail(
            "no_degenerate_triangles",
            format!("{} triangles repeat an index", degenerate),
        )
    }
}

// ── Geometry Oracles ────────────────────────────────────────────────────────

/// Check that the mesh bounding box matches the expected bounds.
pub fn check_bounding_box(
    mesh: &MeshData,
    expected_min: [f32; 3],
    expected_max: [f32; 3],
    tol: f32,
) -> OracleVerdict {
    let Some((min, max)) = mesh_bounding_box(mesh) else {
        return OracleVerdict::fail("bounding_box", "empty mesh".to_string());
    };
    let off = (0..3).any(|i| {
        (min[i] - expected_min[i]).abs() > tol || (max[i] - expected_max[i]).abs() > tol
    });
    let detail = format!(
        "expected {:?}..{:?}, got {:?}..{:?} (tol={})",
        expected_min, expected_max, min, max, tol
    );
    if off {
        OracleVerdict::fail("bounding_box", detail)
    } else {
        OracleVerdict::pass("bounding_box", detail)
    }
}

/// Check the enclosed volume within a relative tolerance.
pub fn check_volume(mesh: &MeshData, expected: f64, rel_tol: f64) -> OracleVerdict {
    let volume = mesh_volume(mesh);
    let error = if expected.abs() > f64::EPSILON {
        (volume - expected).abs() / expected.abs()
    } else {
        volume.abs()
    };
    let detail = format!("expected {:.3}, got {:.3}", expected, volume);
    if error <= rel_tol {
        OracleVerdict::pass_val("volume", detail, volume)
    } else {
        OracleVerdict::fail_val("volume", detail, volume)
    }
}

// ── Batch Runners ───────────────────────────────────────────────────────────

/// Run every check that needs no expected values.
pub fn run_all_mesh_checks(mesh: &MeshData) -> Vec<OracleVerdict> {
    vec![
        check_valid_indices(mesh),
        check_box_layout(mesh),
        check_no_degenerate_triangles(mesh),
    ]
}
