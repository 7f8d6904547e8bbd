use chrono::{DateTime, Utc};
use feature_engine::types::CadDocument;
use serde::{Deserialize, Serialize};

/// The wire message: a full document snapshot tagged with its revision and
/// the client that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchUpdate {
    pub document_id: String,
    pub revision: u64,
    pub source_client_id: String,
    pub timestamp_utc: DateTime<Utc>,
    pub document: CadDocument,
}

impl SketchUpdate {
    /// An update stamped with the current time.
    pub fn new(
        document_id: impl Into<String>,
        revision: u64,
        source_client_id: impl Into<String>,
        document: CadDocument,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            revision,
            source_client_id: source_client_id.into(),
            timestamp_utc: Utc::now(),
            document,
        }
    }

    /// Encode as camelCase JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode from camelCase JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case() {
        let update = SketchUpdate::new("doc", 3, "abc", CadDocument::create_default());
        let value: serde_json::Value = serde_json::from_str(&update.to_json().unwrap()).unwrap();
        assert_eq!(value["documentId"], "doc");
        assert_eq!(value["revision"], 3);
        assert_eq!(value["sourceClientId"], "abc");
        assert!(value["timestampUtc"].is_string());
        assert!(value["document"]["root_component_id"].is_string());
    }

    #[test]
    fn json_round_trip() {
        let update = SketchUpdate::new("doc", 1, "abc", CadDocument::create_default());
        let back = SketchUpdate::from_json(&update.to_json().unwrap()).unwrap();
        assert_eq!(back, update);
    }
}
