use feature_engine::types::CadDocument;
use serde::Serialize;

use crate::errors::SaveError;
use crate::metadata::DocumentMetadata;

/// Format identifier written into every file.
pub const FORMAT_ID: &str = "sketcher";

/// Current file format version.
pub const FORMAT_VERSION: u32 = 1;

/// The top-level file structure.
#[derive(Debug, Serialize)]
pub struct SketcherFile<'a> {
    pub format: &'static str,
    pub version: u32,
    pub metadata: &'a DocumentMetadata,
    pub document: &'a CadDocument,
}

/// Serialize a document to pretty-printed JSON inside the versioned envelope.
pub fn save_document(document: &CadDocument, metadata: &DocumentMetadata) -> Result<String, SaveError> {
    let file = SketcherFile {
        format: FORMAT_ID,
        version: FORMAT_VERSION,
        metadata,
        document,
    };
    serde_json::to_string_pretty(&file).map_err(|e| SaveError::Serialize(e.to_string()))
}
