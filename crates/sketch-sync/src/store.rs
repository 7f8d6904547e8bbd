use std::collections::HashMap;

use parking_lot::RwLock;

use crate::update::SketchUpdate;

/// Latest update per document id.
///
/// Writes replace the whole entry under the lock, so readers see either
/// the old snapshot or the new one, never a mix.
#[derive(Debug, Default)]
pub struct SketchStore {
    docs: RwLock<HashMap<String, SketchUpdate>>,
}

impl SketchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest update for `document_id`, if any.
    pub fn get(&self, document_id: &str) -> Option<SketchUpdate> {
        self.docs.read().get(document_id).cloned()
    }

    /// Overwrite the entry for `update.document_id` unconditionally. An
    /// older revision replaces a newer one if it arrives later.
    pub fn put(&self, update: SketchUpdate) -> SketchUpdate {
        self.docs
            .write()
            .insert(update.document_id.clone(), update.clone());
        update
    }

    /// Stored document ids, sorted.
    pub fn document_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.docs.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::types::CadDocument;

    #[test]
    fn put_overwrites_regardless_of_revision() {
        let store = SketchStore::new();
        store.put(SketchUpdate::new("d", 6, "a", CadDocument::create_default()));
        store.put(SketchUpdate::new("d", 5, "b", CadDocument::create_default()));
        let current = store.get("d").unwrap();
        assert_eq!(current.revision, 5);
        assert_eq!(current.source_client_id, "b");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_document_is_none() {
        assert!(SketchStore::new().get("nope").is_none());
    }
}
