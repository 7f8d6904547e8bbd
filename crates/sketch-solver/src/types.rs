use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serde helper for an error value that may be infinite.
/// JSON has no infinity, so non-finite values are written as `null`
/// and read back as `f64::INFINITY`.
mod finite_or_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let finite = value.is_finite().then_some(*value);
        finite.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// Machine-readable solver failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SolverErrorCode {
    /// A constraint references an entity that is not in the model, or one of
    /// the wrong kind. The solve is aborted before any point moves.
    MissingEntity,
    /// The iteration budget ran out before the error dropped below epsilon.
    NoConverge,
}

/// A single diagnostic attached to a solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{code:?}: {message}")]
pub struct SolverError {
    pub code: SolverErrorCode,
    pub message: String,
    /// The offending constraint, when the error belongs to one.
    pub constraint_id: Option<Uuid>,
}

impl SolverError {
    /// A reference to a missing or wrong-kind entity.
    pub fn missing_entity(constraint_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            code: SolverErrorCode::MissingEntity,
            message: message.into(),
            constraint_id: Some(constraint_id),
        }
    }

    /// The iteration cap was reached.
    pub fn no_converge(max_iterations: usize) -> Self {
        Self {
            code: SolverErrorCode::NoConverge,
            message: format!("did not converge within {max_iterations} iterations"),
            constraint_id: None,
        }
    }
}

/// Outcome of a solve. Failures are values, never panics or `Err`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    pub success: bool,
    pub iterations: usize,
    #[serde(with = "finite_or_null")]
    pub final_error: f64,
    pub errors: Vec<SolverError>,
}

impl SolveResult {
    /// Whether any error carries `code`.
    pub fn has_error(&self, code: SolverErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_error_survives_json() {
        let result = SolveResult {
            success: false,
            iterations: 0,
            final_error: f64::INFINITY,
            errors: vec![SolverError::missing_entity(Uuid::nil(), "gone")],
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"final_error\":null"));

        let back: SolveResult = serde_json::from_str(&json).unwrap();
        assert!(back.final_error.is_infinite());
        assert!(back.has_error(SolverErrorCode::MissingEntity));
    }
}
