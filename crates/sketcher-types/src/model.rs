use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constraint::Constraint;
use crate::entity::SketchEntity;

/// Errors from direct sketch model edits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("entity already exists: {id}")]
    DuplicateEntity { id: Uuid },

    #[error("constraint already exists: {id}")]
    DuplicateConstraint { id: Uuid },
}

/// Entities and constraints of one sketch, keyed by id.
///
/// Ordered maps keep iteration (and therefore solving) deterministic
/// across processes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SketchModel {
    #[serde(default)]
    pub entities: BTreeMap<Uuid, SketchEntity>,
    #[serde(default)]
    pub constraints: BTreeMap<Uuid, Constraint>,
}

impl SketchModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity. Fails if its id is already taken.
    pub fn add_entity(&mut self, entity: SketchEntity) -> Result<Uuid, ModelError> {
        let id = entity.id();
        if self.entities.contains_key(&id) {
            return Err(ModelError::DuplicateEntity { id });
        }
        self.entities.insert(id, entity);
        Ok(id)
    }

    /// Insert or replace an entity value under its id.
    pub fn upsert_entity(&mut self, entity: SketchEntity) {
        self.entities.insert(entity.id(), entity);
    }

    /// Remove an entity and every constraint that references it.
    ///
    /// Returns the removed entity together with the cascaded constraints.
    pub fn remove_entity(&mut self, id: Uuid) -> Option<(SketchEntity, Vec<Constraint>)> {
        let entity = self.entities.remove(&id)?;

        let doomed: Vec<Uuid> = self
            .constraints
            .values()
            .filter(|c| c.references(id))
            .map(Constraint::id)
            .collect();

        let cascaded = doomed
            .into_iter()
            .filter_map(|cid| self.constraints.remove(&cid))
            .collect();

        Some((entity, cascaded))
    }

    /// Insert a constraint. Fails if its id is already taken.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<Uuid, ModelError> {
        let id = constraint.id();
        if self.constraints.contains_key(&id) {
            return Err(ModelError::DuplicateConstraint { id });
        }
        self.constraints.insert(id, constraint);
        Ok(id)
    }

    /// Remove a constraint, returning it if present.
    pub fn remove_constraint(&mut self, id: Uuid) -> Option<Constraint> {
        self.constraints.remove(&id)
    }

    /// Look up an entity.
    pub fn entity(&self, id: Uuid) -> Option<&SketchEntity> {
        self.entities.get(&id)
    }

    /// Look up a constraint.
    pub fn constraint(&self, id: Uuid) -> Option<&Constraint> {
        self.constraints.get(&id)
    }

    pub fn contains_entity(&self, id: Uuid) -> bool {
        self.entities.contains_key(&id)
    }

    /// Position of a point entity, `None` if missing or not a point.
    pub fn point(&self, id: Uuid) -> Option<(f64, f64)> {
        self.entities.get(&id).and_then(SketchEntity::position)
    }

    /// Endpoint ids of a line entity, `None` if missing or not a line.
    pub fn line_endpoints(&self, id: Uuid) -> Option<(Uuid, Uuid)> {
        self.entities.get(&id).and_then(SketchEntity::endpoints)
    }

    /// Replace the point `id` with a new value at `(x, y)`.
    ///
    /// Returns `false` when `id` is not a point in this model.
    pub fn set_point(&mut self, id: Uuid, x: f64, y: f64) -> bool {
        match self.entities.get(&id).and_then(|e| e.moved_to(x, y)) {
            Some(moved) => {
                self.entities.insert(id, moved);
                true
            }
            None => false,
        }
    }

    /// `(constraint_id, entity_id)` pairs for every constraint reference that
    /// does not resolve to an entity.
    pub fn missing_references(&self) -> Vec<(Uuid, Uuid)> {
        self.constraints
            .values()
            .flat_map(|c| {
                c.entity_ids()
                    .into_iter()
                    .filter(|eid| !self.entities.contains_key(eid))
                    .map(move |eid| (c.id(), eid))
            })
            .collect()
    }

    /// Every point as `(id, x, y)`, in id order.
    pub fn points(&self) -> impl Iterator<Item = (Uuid, f64, f64)> + '_ {
        self.entities
            .values()
            .filter_map(|e| e.position().map(|(x, y)| (e.id(), x, y)))
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.constraints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_points_and_line(model: &mut SketchModel) -> (Uuid, Uuid, Uuid) {
        let a = model.add_entity(SketchEntity::point(0.0, 0.0)).unwrap();
        let b = model.add_entity(SketchEntity::point(10.0, 5.0)).unwrap();
        let l = model.add_entity(SketchEntity::line(a, b)).unwrap();
        (a, b, l)
    }

    #[test]
    fn duplicate_entity_rejected() {
        let mut model = SketchModel::new();
        let p = SketchEntity::point(1.0, 1.0);
        model.add_entity(p.clone()).unwrap();
        assert_eq!(
            model.add_entity(p.clone()),
            Err(ModelError::DuplicateEntity { id: p.id() })
        );
    }

    #[test]
    fn remove_entity_cascades_constraints() {
        let mut model = SketchModel::new();
        let (a, b, l) = two_points_and_line(&mut model);
        let d = model.add_constraint(Constraint::distance(a, b, 5.0)).unwrap();
        let h = model.add_constraint(Constraint::horizontal(l)).unwrap();

        let (removed, cascaded) = model.remove_entity(a).unwrap();
        assert_eq!(removed.id(), a);
        assert_eq!(cascaded.len(), 1);
        assert!(!model.constraints.contains_key(&d));
        assert!(model.constraints.contains_key(&h));
    }

    #[test]
    fn remove_missing_entity_is_none() {
        let mut model = SketchModel::new();
        assert!(model.remove_entity(Uuid::new_v4()).is_none());
    }

    #[test]
    fn missing_references_reported_per_constraint() {
        let mut model = SketchModel::new();
        let (a, _b, _l) = two_points_and_line(&mut model);
        let ghost = Uuid::new_v4();
        let c = model.add_constraint(Constraint::coincident(a, ghost)).unwrap();
        assert_eq!(model.missing_references(), vec![(c, ghost)]);
    }

    #[test]
    fn set_point_replaces_value() {
        let mut model = SketchModel::new();
        let (a, _b, l) = two_points_and_line(&mut model);
        assert!(model.set_point(a, 3.0, 4.0));
        assert_eq!(model.point(a), Some((3.0, 4.0)));
        assert!(!model.set_point(l, 1.0, 1.0));
    }
}
