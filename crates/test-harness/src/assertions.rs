//! Assertion helpers with diagnostic output.
//!
//! Every failure names its context and shows expected vs actual.

use modeling_ops::MeshData;

use crate::helpers::{box_count, HarnessError};
use crate::oracle::{check_bounding_box, check_volume, run_all_mesh_checks, OracleVerdict};

fn verdict(v: OracleVerdict, ctx: &str) -> Result<(), HarnessError> {
    if v.passed {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("[{}] {}: {}", ctx, v.oracle_name, v.detail),
        })
    }
}

/// Assert the mesh bounding box matches expected values within tolerance.
pub fn assert_bounding_box(
    mesh: &MeshData,
    expected_min: [f32; 3],
    expected_max: [f32; 3],
    tol: f32,
    ctx: &str,
) -> Result<(), HarnessError> {
    verdict(check_bounding_box(mesh, expected_min, expected_max, tol), ctx)
}

/// Assert the enclosed volume within a relative tolerance.
pub fn assert_volume(mesh: &MeshData, expected: f64, rel_tol: f64, ctx: &str) -> Result<(), HarnessError> {
    verdict(check_volume(mesh, expected, rel_tol), ctx)
}

/// Assert the mesh holds exactly `expected` boxes.
pub fn assert_box_count(mesh: &MeshData, expected: usize, ctx: &str) -> Result<(), HarnessError> {
    let actual = box_count(mesh);
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("[{}] expected {} boxes, got {}", ctx, expected, actual),
        })
    }
}

/// Assert every structural mesh check passes, reporting all failures.
pub fn assert_mesh_valid(mesh: &MeshData, ctx: &str) -> Result<(), HarnessError> {
    let failures: Vec<String> = run_all_mesh_checks(mesh)
        .into_iter()
        .filter(|v| !v.passed)
        .map(|v| format!("{}: {}", v.oracle_name, v.detail))
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("[{}] {}", ctx, failures.join("; ")),
        })
    }
}
