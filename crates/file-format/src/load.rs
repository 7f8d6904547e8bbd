use feature_engine::types::CadDocument;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::LoadError;
use crate::metadata::DocumentMetadata;
use crate::migrate::{self, LEGACY_VERSION};
use crate::save::{FORMAT_ID, FORMAT_VERSION};

/// The top-level file structure for deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct SketcherFileRaw {
    pub format: String,
    pub version: u32,
    pub metadata: DocumentMetadata,
    pub document: CadDocument,
}

/// Deserialize a document from JSON.
///
/// Accepts the versioned envelope, or a bare document object as written
/// before the envelope existed. The format tag and version are checked,
/// older files are migrated, and the document's invariants are repaired.
pub fn load_document(json: &str) -> Result<(CadDocument, DocumentMetadata), LoadError> {
    let value: Value = serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    let format = value
        .get("format")
        .map(|f| f.as_str().unwrap_or_default().to_string());
    let version = match format {
        Some(format) if format != FORMAT_ID => return Err(LoadError::UnknownFormat(format)),
        Some(_) => value
            .get("version")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| LoadError::ParseError("missing or invalid version".to_string()))?,
        None => LEGACY_VERSION,
    };

    if version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: version,
            supported_version: FORMAT_VERSION,
        });
    }

    let value = if version < FORMAT_VERSION {
        debug!(from = version, to = FORMAT_VERSION, "migrating document file");
        migrate::migrate(value, version, FORMAT_VERSION)?
    } else {
        value
    };

    let raw: SketcherFileRaw =
        serde_json::from_value(value).map_err(|e| LoadError::ParseError(e.to_string()))?;

    let mut document = raw.document;
    if document.validate_and_repair() {
        warn!(document = %document.id, "loaded document was repaired");
    }
    Ok((document, raw.metadata))
}
