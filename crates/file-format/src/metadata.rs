use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata stored alongside the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl DocumentMetadata {
    /// Metadata with the given name, created and modified now.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created: now,
            modified: now,
        }
    }

    /// Same creation time, renamed, modified now.
    pub fn touched(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created: self.created,
            modified: Utc::now().max(self.created),
        }
    }
}
