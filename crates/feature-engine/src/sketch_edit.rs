//! Entity and constraint edits on one sketch of a document.
//!
//! References are checked before anything is inserted; an edit that fails
//! leaves the sketch exactly as it was.

use sketcher_types::{Constraint, SketchEntity, SketchModel};
use uuid::Uuid;

use crate::types::{CadDocument, EngineError};

fn require_point(model: &SketchModel, id: Uuid) -> Result<(), EngineError> {
    match model.entity(id) {
        None => Err(EngineError::EntityNotFound { id }),
        Some(e) if e.is_point() => Ok(()),
        Some(_) => Err(EngineError::NotAPoint { id }),
    }
}

fn require_line(model: &SketchModel, id: Uuid) -> Result<(), EngineError> {
    match model.entity(id) {
        None => Err(EngineError::EntityNotFound { id }),
        Some(e) if e.endpoints().is_some() => Ok(()),
        Some(_) => Err(EngineError::NotALine { id }),
    }
}

fn check_entity(model: &SketchModel, entity: &SketchEntity) -> Result<(), EngineError> {
    entity
        .referenced_ids()
        .into_iter()
        .try_for_each(|id| require_point(model, id))
}

fn check_constraint(model: &SketchModel, constraint: &Constraint) -> Result<(), EngineError> {
    match constraint {
        Constraint::Horizontal { line, .. } | Constraint::Vertical { line, .. } => {
            require_line(model, *line)
        }
        Constraint::Coincident { .. } | Constraint::Distance { .. } => constraint
            .entity_ids()
            .into_iter()
            .try_for_each(|id| require_point(model, id)),
    }
}

impl CadDocument {
    /// Add an entity to a sketch after checking its references.
    pub fn add_entity(&mut self, sketch_id: Uuid, entity: SketchEntity) -> Result<Uuid, EngineError> {
        let model = &mut self.sketch_mut(sketch_id)?.model;
        check_entity(model, &entity)?;
        Ok(model.add_entity(entity)?)
    }

    /// Add a constraint to a sketch after checking its references.
    pub fn add_constraint(&mut self, sketch_id: Uuid, constraint: Constraint) -> Result<Uuid, EngineError> {
        let model = &mut self.sketch_mut(sketch_id)?.model;
        check_constraint(model, &constraint)?;
        Ok(model.add_constraint(constraint)?)
    }

    /// Remove an entity and cascade to every constraint that references it.
    /// Entities that referenced it (a line through a deleted point) are kept.
    pub fn remove_entity(
        &mut self,
        sketch_id: Uuid,
        entity_id: Uuid,
    ) -> Result<(SketchEntity, Vec<Constraint>), EngineError> {
        self.sketch_mut(sketch_id)?
            .model
            .remove_entity(entity_id)
            .ok_or(EngineError::EntityNotFound { id: entity_id })
    }

    /// Remove a single constraint.
    pub fn remove_constraint(&mut self, sketch_id: Uuid, constraint_id: Uuid) -> Result<Constraint, EngineError> {
        self.sketch_mut(sketch_id)?
            .model
            .remove_constraint(constraint_id)
            .ok_or(EngineError::ConstraintNotFound { id: constraint_id })
    }

    /// Replace the point with a new value at `(x, y)`.
    pub fn move_point(&mut self, sketch_id: Uuid, point_id: Uuid, x: f64, y: f64) -> Result<(), EngineError> {
        let model = &mut self.sketch_mut(sketch_id)?.model;
        require_point(model, point_id)?;
        model.set_point(point_id, x, y);
        Ok(())
    }
}
