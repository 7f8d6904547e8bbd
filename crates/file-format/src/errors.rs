/// Errors while reading a document file.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse file: {0}")]
    ParseError(String),

    #[error("unknown file format: {0}")]
    UnknownFormat(String),

    #[error("file version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("migration failed from version {from} to {to}: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },
}

/// Errors while writing a document file.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SaveError {
    #[error("failed to serialize document: {0}")]
    Serialize(String),
}

/// Errors from a [`DocumentRepository`](crate::DocumentRepository).
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    #[error("storage error for '{key}': {message}")]
    Io { key: String, message: String },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Save(#[from] SaveError),
}
