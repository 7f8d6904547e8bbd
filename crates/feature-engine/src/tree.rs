use tracing::warn;
use uuid::Uuid;

use crate::types::{Body, CadDocument, Component, EngineError, ExtrudeFeature, Feature, FeatureKind, Sketch};

impl CadDocument {
    /// A fresh document: root component "Root" holding one empty, active
    /// sketch "Sketch 1".
    pub fn create_default() -> Self {
        let root_id = Uuid::new_v4();
        let sketch_id = Uuid::new_v4();

        let mut root = Component {
            id: root_id,
            parent_id: None,
            name: "Root".to_string(),
            child_component_ids: Vec::new(),
            sketch_ids: Vec::new(),
            body_ids: Vec::new(),
        };
        root.sketch_ids.push(sketch_id);

        let sketch = Sketch {
            id: sketch_id,
            component_id: root_id,
            name: "Sketch 1".to_string(),
            model: Default::default(),
        };

        Self {
            id: Uuid::new_v4(),
            name: "Untitled".to_string(),
            root_component_id: root_id,
            active_sketch_id: sketch_id,
            components: [(root_id, root)].into(),
            sketches: [(sketch_id, sketch)].into(),
            bodies: Default::default(),
        }
    }

    // ── Lookups ──────────────────────────────────────────────────────────

    /// Look up a component.
    pub fn component(&self, id: Uuid) -> Result<&Component, EngineError> {
        self.components
            .get(&id)
            .ok_or(EngineError::ComponentNotFound { id })
    }

    /// Look up a sketch.
    pub fn sketch(&self, id: Uuid) -> Result<&Sketch, EngineError> {
        self.sketches.get(&id).ok_or(EngineError::SketchNotFound { id })
    }

    /// Look up a sketch for editing.
    pub fn sketch_mut(&mut self, id: Uuid) -> Result<&mut Sketch, EngineError> {
        self.sketches
            .get_mut(&id)
            .ok_or(EngineError::SketchNotFound { id })
    }

    /// The sketch that receives sketch edits.
    pub fn active_sketch(&self) -> Result<&Sketch, EngineError> {
        self.sketch(self.active_sketch_id)
    }

    /// Mutable access to the active sketch.
    pub fn active_sketch_mut(&mut self) -> Result<&mut Sketch, EngineError> {
        self.sketch_mut(self.active_sketch_id)
    }

    /// Look up a body.
    pub fn body(&self, id: Uuid) -> Result<&Body, EngineError> {
        self.bodies.get(&id).ok_or(EngineError::BodyNotFound { id })
    }

    // ── Structural edits ─────────────────────────────────────────────────

    /// Add a child component under `parent_id`.
    pub fn create_component(&mut self, parent_id: Uuid, name: impl Into<String>) -> Result<Uuid, EngineError> {
        self.component(parent_id)?;
        let id = Uuid::new_v4();
        self.components.insert(
            id,
            Component {
                id,
                parent_id: Some(parent_id),
                name: name.into(),
                child_component_ids: Vec::new(),
                sketch_ids: Vec::new(),
                body_ids: Vec::new(),
            },
        );
        if let Some(parent) = self.components.get_mut(&parent_id) {
            parent.child_component_ids.push(id);
        }
        Ok(id)
    }

    /// Add an empty sketch to `component_id`. The active sketch is unchanged.
    pub fn create_sketch(&mut self, component_id: Uuid, name: impl Into<String>) -> Result<Uuid, EngineError> {
        self.component(component_id)?;
        let id = Uuid::new_v4();
        self.sketches.insert(
            id,
            Sketch {
                id,
                component_id,
                name: name.into(),
                model: Default::default(),
            },
        );
        if let Some(component) = self.components.get_mut(&component_id) {
            component.sketch_ids.push(id);
        }
        Ok(id)
    }

    /// Make `sketch_id` the target of sketch edits.
    pub fn set_active_sketch(&mut self, sketch_id: Uuid) -> Result<(), EngineError> {
        self.sketch(sketch_id)?;
        self.active_sketch_id = sketch_id;
        Ok(())
    }

    /// Remove a sketch from the document and its component. Features that
    /// reference it stay in place and are skipped on rebuild. Deleting the
    /// active sketch activates the first remaining one.
    pub fn delete_sketch(&mut self, sketch_id: Uuid) -> Result<Sketch, EngineError> {
        let component_id = self.sketch(sketch_id)?.component_id;
        let replacement = self.sketches.keys().copied().find(|&id| id != sketch_id);
        if sketch_id == self.active_sketch_id && replacement.is_none() {
            return Err(EngineError::LastSketch { id: sketch_id });
        }

        let sketch = self
            .sketches
            .remove(&sketch_id)
            .ok_or(EngineError::SketchNotFound { id: sketch_id })?;
        if let Some(component) = self.components.get_mut(&component_id) {
            component.sketch_ids.retain(|&id| id != sketch_id);
        }
        if sketch_id == self.active_sketch_id {
            if let Some(next) = replacement {
                self.active_sketch_id = next;
            }
        }
        Ok(sketch)
    }

    /// Add an empty body to `component_id`.
    pub fn create_body(&mut self, component_id: Uuid, name: impl Into<String>) -> Result<Uuid, EngineError> {
        self.component(component_id)?;
        let id = Uuid::new_v4();
        self.bodies.insert(
            id,
            Body {
                id,
                component_id,
                name: name.into(),
                features: Vec::new(),
                mesh: None,
            },
        );
        if let Some(component) = self.components.get_mut(&component_id) {
            component.body_ids.push(id);
        }
        Ok(id)
    }

    /// Append an extrude to the end of `body_id`'s feature list.
    ///
    /// The referenced sketch must exist now; it may be deleted later.
    pub fn add_extrude(
        &mut self,
        body_id: Uuid,
        name: impl Into<String>,
        extrude: ExtrudeFeature,
    ) -> Result<Uuid, EngineError> {
        self.sketch(extrude.sketch_id)?;
        let body = self
            .bodies
            .get_mut(&body_id)
            .ok_or(EngineError::BodyNotFound { id: body_id })?;
        let id = Uuid::new_v4();
        body.features.push(Feature {
            id,
            name: name.into(),
            kind: FeatureKind::Extrude(extrude),
        });
        Ok(id)
    }

    /// Remove a feature from a body and return it.
    pub fn remove_feature(&mut self, body_id: Uuid, feature_id: Uuid) -> Result<Feature, EngineError> {
        let body = self
            .bodies
            .get_mut(&body_id)
            .ok_or(EngineError::BodyNotFound { id: body_id })?;
        let pos = body
            .features
            .iter()
            .position(|f| f.id == feature_id)
            .ok_or(EngineError::FeatureNotFound { id: feature_id })?;
        Ok(body.features.remove(pos))
    }

    /// Move a feature within its body's replay order. `new_pos` is clamped.
    pub fn reorder_feature(&mut self, body_id: Uuid, feature_id: Uuid, new_pos: usize) -> Result<(), EngineError> {
        let feature = self.remove_feature(body_id, feature_id)?;
        if let Some(body) = self.bodies.get_mut(&body_id) {
            let pos = new_pos.min(body.features.len());
            body.features.insert(pos, feature);
        }
        Ok(())
    }

    // ── Integrity ────────────────────────────────────────────────────────

    /// Check the root-component and active-sketch invariants. When either
    /// reference dangles, the document is reset to the default shape (keeping
    /// its id and name) and `true` is returned.
    pub fn validate_and_repair(&mut self) -> bool {
        let root_ok = self.components.contains_key(&self.root_component_id);
        let active_ok = self.sketches.contains_key(&self.active_sketch_id);
        if root_ok && active_ok {
            return false;
        }

        warn!(
            document = %self.id,
            root_ok,
            active_ok,
            "document invariants broken, resetting to default"
        );
        let fresh = CadDocument {
            id: self.id,
            name: std::mem::take(&mut self.name),
            ..CadDocument::create_default()
        };
        *self = fresh;
        true
    }
}
