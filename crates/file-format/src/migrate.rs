use chrono::Utc;
use serde_json::{json, Value};

use crate::errors::LoadError;
use crate::save::FORMAT_ID;

/// Version assigned to bare documents that predate the envelope.
pub const LEGACY_VERSION: u32 = 0;

/// Apply format migrations from `from_version` to `to_version`.
///
/// Migrations run sequentially on the raw JSON: v0 to v1, then onward.
pub fn migrate(mut value: Value, from_version: u32, to_version: u32) -> Result<Value, LoadError> {
    for version in from_version..to_version {
        value = match version {
            0 => wrap_legacy_document(value),
            _ => {
                return Err(LoadError::MigrationFailed {
                    from: from_version,
                    to: to_version,
                    reason: format!("no migration path from v{version}"),
                })
            }
        };
    }
    Ok(value)
}

/// v0 files are the bare document object.
fn wrap_legacy_document(document: Value) -> Value {
    let name = document
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Untitled")
        .to_string();
    let now = Utc::now();
    json!({
        "format": FORMAT_ID,
        "version": 1,
        "metadata": { "name": name, "created": now, "modified": now },
        "document": document,
    })
}
