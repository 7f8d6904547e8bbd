/// Default tolerance for degenerate sizes, slab thickness and profile checks.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Errors from modeling operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OpError {
    #[error("extrude height {height} is below tolerance")]
    HeightTooSmall { height: f64 },

    #[error("tool box is degenerate")]
    DegenerateTool,
}
