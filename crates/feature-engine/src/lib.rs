pub mod rebuild;
pub mod sketch_edit;
pub mod tree;
pub mod types;
pub mod undo;

use tracing::{debug, info};

use crate::rebuild::RebuildState;
use crate::undo::UndoStack;

pub use rebuild::{rebuild, rebuild_document, SkipReason};
pub use types::*;

/// The document engine.
///
/// Owns the live document and its undo history. Every edit runs against a
/// draft copy that replaces the live document only when the edit succeeds,
/// so a failed edit never leaves a partial change behind.
#[derive(Debug, Clone)]
pub struct Engine {
    document: CadDocument,
    history: UndoStack<CadDocument>,
    pub config: RebuildConfig,
}

impl Engine {
    /// Create a new engine with the default document.
    pub fn new() -> Self {
        Self::with_document(CadDocument::create_default())
    }

    /// Start from an existing document, repairing broken invariants.
    pub fn with_document(mut document: CadDocument) -> Self {
        document.validate_and_repair();
        Self {
            document,
            history: UndoStack::default(),
            config: RebuildConfig::default(),
        }
    }

    /// Replace the rebuild tolerances.
    pub fn with_config(mut self, config: RebuildConfig) -> Self {
        self.config = config;
        self
    }

    /// The live document.
    pub fn document(&self) -> &CadDocument {
        &self.document
    }

    /// Apply `edit` to a draft of the document. On success the draft
    /// becomes the live document and the previous one is pushed to history.
    pub fn edit<T>(
        &mut self,
        edit: impl FnOnce(&mut CadDocument) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut draft = self.document.clone();
        let out = edit(&mut draft)?;
        let previous = std::mem::replace(&mut self.document, draft);
        self.history.push(previous);
        Ok(out)
    }

    /// Replace the live document wholesale (load, remote update). The
    /// replacement is repaired if needed and history is cleared.
    pub fn replace_document(&mut self, mut document: CadDocument) -> bool {
        let repaired = document.validate_and_repair();
        info!(document = %document.id, repaired, "document replaced");
        self.document = document;
        self.history.clear();
        repaired
    }

    /// Regenerate all body meshes. Not recorded in history: meshes are a
    /// pure function of the rest of the document.
    pub fn rebuild(&mut self) -> RebuildState {
        let state = rebuild::rebuild(&self.document, &self.config);
        debug!(skipped = state.skipped.len(), "rebuild finished");
        state.clone().apply_to(&mut self.document);
        state
    }

    /// Step back one edit. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.document)
    }

    /// Reapply the last undone edit. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.document)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
