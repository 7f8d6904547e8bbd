//! Error types for sync operations.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// The transport could not reach the hub.
    #[error("transport unavailable: {message}")]
    TransportUnavailable { message: String },

    /// An operation that needs a live connection was called without one.
    #[error("not connected to hub")]
    NotConnected,

    /// A connect or publish did not finish within its timeout.
    #[error("{operation} cancelled")]
    Cancelled { operation: &'static str },

    /// Malformed message.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("document not found: {document_id}")]
    NotFound { document_id: String },
}

impl SyncError {
    /// Shorthand for [`SyncError::TransportUnavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::TransportUnavailable {
            message: message.into(),
        }
    }

    /// True when the hub could not be reached. Local editing is unaffected.
    pub fn is_transport_unavailable(&self) -> bool {
        matches!(
            self,
            SyncError::TransportUnavailable { .. } | SyncError::NotConnected
        )
    }

    /// Returns true if the same call may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SyncError::TransportUnavailable { .. } | SyncError::Cancelled { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(SyncError::unavailable("down").is_transport_unavailable());
        assert!(SyncError::NotConnected.is_transport_unavailable());
        assert!(!SyncError::Protocol("x".into()).is_transport_unavailable());
        assert!(SyncError::Cancelled { operation: "publish" }.is_retryable());
        assert!(!SyncError::NotConnected.is_retryable());
    }

    #[test]
    fn error_display() {
        assert_eq!(SyncError::NotConnected.to_string(), "not connected to hub");
        assert_eq!(
            SyncError::Cancelled { operation: "connect" }.to_string(),
            "connect cancelled"
        );
    }
}
