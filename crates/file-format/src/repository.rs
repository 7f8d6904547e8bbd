use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use feature_engine::types::CadDocument;
use parking_lot::RwLock;
use tracing::debug;

use crate::errors::RepositoryError;
use crate::load::load_document;
use crate::metadata::DocumentMetadata;
use crate::save::save_document;

/// Persistence port. `load` of a key that was never saved, or whose stored
/// text is blank, yields [`CadDocument::create_default`].
pub trait DocumentRepository: Send + Sync {
    fn save(&self, key: &str, document: &CadDocument) -> Result<(), RepositoryError>;
    fn load(&self, key: &str) -> Result<CadDocument, RepositoryError>;
}

/// Wrap `document` for storage, keeping the creation time of `previous`
/// when it still parses.
fn encode(previous: Option<&str>, document: &CadDocument) -> Result<String, RepositoryError> {
    let metadata = previous
        .and_then(|text| load_document(text).ok())
        .map(|(_, meta)| meta.touched(document.name.clone()))
        .unwrap_or_else(|| DocumentMetadata::new(document.name.clone()));
    Ok(save_document(document, &metadata)?)
}

fn decode(text: Option<&str>) -> Result<CadDocument, RepositoryError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(load_document(text)?.0),
        _ => Ok(CadDocument::create_default()),
    }
}

/// Stores each document as a pretty JSON file; the key is the file path.
#[derive(Debug, Clone, Default)]
pub struct FileRepository {
    base_dir: Option<PathBuf>,
}

impl FileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative keys against `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.join(key),
            None => PathBuf::from(key),
        }
    }

    fn read(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        match fs::read_to_string(self.path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepositoryError::Io {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

impl DocumentRepository for FileRepository {
    fn save(&self, key: &str, document: &CadDocument) -> Result<(), RepositoryError> {
        let previous = self.read(key).ok().flatten();
        let text = encode(previous.as_deref(), document)?;
        fs::write(self.path(key), text).map_err(|e| RepositoryError::Io {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        debug!(key, "document saved");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<CadDocument, RepositoryError> {
        let text = self.read(key)?;
        decode(text.as_deref())
    }
}

/// Key/value store held in memory, shaped like browser local storage.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under `key`, bypassing serialization.
    pub fn put_raw(&self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.write().insert(key.into(), text.into());
    }

    /// The stored text for `key`, as last saved.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl DocumentRepository for MemoryRepository {
    fn save(&self, key: &str, document: &CadDocument) -> Result<(), RepositoryError> {
        let mut entries = self.entries.write();
        let text = encode(entries.get(key).map(String::as_str), document)?;
        entries.insert(key.to_string(), text);
        debug!(key, "document stored");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<CadDocument, RepositoryError> {
        let text = self.get_raw(key);
        decode(text.as_deref())
    }
}
