use std::sync::Arc;

use feature_engine::rebuild::RebuildState;
use feature_engine::types::{CadDocument, EngineError, ExtrudeFeature, ExtrudeOperation, RebuildConfig};
use feature_engine::Engine;
use file_format::{DocumentRepository, RepositoryError};
use sketch_solver::{ConstraintSolver, RelaxationSolver, SolveResult, SolverConfig, SolverErrorCode};
use sketch_sync::SketchUpdate;
use sketcher_types::{Constraint, SketchEntity};
use tracing::{debug, info};
use uuid::Uuid;

/// Errors surfaced by [`SketchService`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("nothing to {action}")]
    EmptyHistory { action: &'static str },
}

/// One open document plus everything needed to edit, solve, rebuild,
/// persist and share it.
///
/// Sketch edits target the active sketch. Every successful edit is
/// recorded for undo.
pub struct SketchService {
    engine: Engine,
    solver: RelaxationSolver,
    repository: Arc<dyn DocumentRepository>,
}

impl SketchService {
    /// Create a service on a fresh default document.
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self {
            engine: Engine::new(),
            solver: RelaxationSolver::default(),
            repository,
        }
    }

    /// Replace the solver settings.
    pub fn with_solver_config(mut self, config: SolverConfig) -> Self {
        self.solver = RelaxationSolver::new(config);
        self
    }

    /// Replace the rebuild tolerances.
    pub fn with_rebuild_config(mut self, config: RebuildConfig) -> Self {
        self.engine.config = config;
        self
    }

    /// The live document.
    pub fn document(&self) -> &CadDocument {
        self.engine.document()
    }

    /// Sketch that receives sketch edits.
    pub fn active_sketch_id(&self) -> Uuid {
        self.engine.document().active_sketch_id
    }

    pub fn solver_config(&self) -> &SolverConfig {
        &self.solver.config
    }

    // -- Sketch entities --

    /// Add a point to the active sketch.
    pub fn add_point(&mut self, x: f64, y: f64) -> Result<Uuid, ServiceError> {
        self.add_entity(SketchEntity::point(x, y))
    }

    /// Add a line between two points of the active sketch.
    pub fn add_line(&mut self, start_id: Uuid, end_id: Uuid) -> Result<Uuid, ServiceError> {
        self.add_entity(SketchEntity::line(start_id, end_id))
    }

    /// Add a circle to the active sketch.
    pub fn add_circle(&mut self, center_id: Uuid, radius: f64) -> Result<Uuid, ServiceError> {
        self.add_entity(SketchEntity::circle(center_id, radius))
    }

    /// Add a rectangle to the active sketch.
    pub fn add_rectangle(&mut self, origin_id: Uuid, width: f64, height: f64) -> Result<Uuid, ServiceError> {
        self.add_entity(SketchEntity::rectangle(origin_id, width, height))
    }

    fn add_entity(&mut self, entity: SketchEntity) -> Result<Uuid, ServiceError> {
        Ok(self.engine.edit(|doc| doc.add_entity(doc.active_sketch_id, entity))?)
    }

    // -- Constraints --

    /// Make two points coincide.
    pub fn add_coincident(&mut self, point_a: Uuid, point_b: Uuid) -> Result<Uuid, ServiceError> {
        self.add_constraint(Constraint::coincident(point_a, point_b))
    }

    /// Fix the distance between two points.
    pub fn add_distance(&mut self, point_a: Uuid, point_b: Uuid, value: f64) -> Result<Uuid, ServiceError> {
        self.add_constraint(Constraint::distance(point_a, point_b, value))
    }

    /// Make a line horizontal.
    pub fn add_horizontal(&mut self, line_id: Uuid) -> Result<Uuid, ServiceError> {
        self.add_constraint(Constraint::horizontal(line_id))
    }

    /// Make a line vertical.
    pub fn add_vertical(&mut self, line_id: Uuid) -> Result<Uuid, ServiceError> {
        self.add_constraint(Constraint::vertical(line_id))
    }

    fn add_constraint(&mut self, constraint: Constraint) -> Result<Uuid, ServiceError> {
        Ok(self
            .engine
            .edit(|doc| doc.add_constraint(doc.active_sketch_id, constraint))?)
    }

    // -- Sketch edits --

    /// Remove an entity and every constraint that references it.
    pub fn remove_entity(&mut self, id: Uuid) -> Result<(), ServiceError> {
        self.engine
            .edit(|doc| doc.remove_entity(doc.active_sketch_id, id))?;
        Ok(())
    }

    /// Remove a constraint from the active sketch.
    pub fn remove_constraint(&mut self, id: Uuid) -> Result<(), ServiceError> {
        self.engine
            .edit(|doc| doc.remove_constraint(doc.active_sketch_id, id))?;
        Ok(())
    }

    /// Move a point of the active sketch.
    pub fn move_point(&mut self, id: Uuid, x: f64, y: f64) -> Result<(), ServiceError> {
        Ok(self
            .engine
            .edit(|doc| doc.move_point(doc.active_sketch_id, id, x, y))?)
    }

    /// Relax the active sketch.
    ///
    /// The solver works on a copy of the sketch model. The copy replaces the
    /// live model afterwards unless references were broken, in which case
    /// the document is left as it was.
    pub fn solve(&mut self) -> Result<SolveResult, ServiceError> {
        let mut model = self.engine.document().active_sketch()?.model.clone();
        let result = self.solver.solve(&mut model);

        if result.has_error(SolverErrorCode::MissingEntity) {
            debug!("solve aborted, document unchanged");
            return Ok(result);
        }

        self.engine.edit(|doc| {
            doc.active_sketch_mut()?.model = model;
            Ok(())
        })?;
        Ok(result)
    }

    // -- Document structure --

    /// Add a child component under `parent_id`.
    pub fn create_component(&mut self, parent_id: Uuid, name: &str) -> Result<Uuid, ServiceError> {
        Ok(self.engine.edit(|doc| doc.create_component(parent_id, name))?)
    }

    /// Add an empty sketch to a component.
    pub fn create_sketch(&mut self, component_id: Uuid, name: &str) -> Result<Uuid, ServiceError> {
        Ok(self.engine.edit(|doc| doc.create_sketch(component_id, name))?)
    }

    /// Direct sketch edits to `sketch_id`.
    pub fn set_active_sketch(&mut self, sketch_id: Uuid) -> Result<(), ServiceError> {
        Ok(self.engine.edit(|doc| doc.set_active_sketch(sketch_id))?)
    }

    /// Delete a sketch. The last remaining sketch cannot be deleted.
    pub fn delete_sketch(&mut self, sketch_id: Uuid) -> Result<(), ServiceError> {
        self.engine.edit(|doc| doc.delete_sketch(sketch_id))?;
        Ok(())
    }

    /// Add an empty body to a component.
    pub fn create_body(&mut self, component_id: Uuid, name: &str) -> Result<Uuid, ServiceError> {
        Ok(self.engine.edit(|doc| doc.create_body(component_id, name))?)
    }

    /// Append an extrude of `edge_ids` in `sketch_id` to `body_id`. The mesh
    /// is not rebuilt until [`rebuild`](Self::rebuild).
    pub fn add_extrude(
        &mut self,
        body_id: Uuid,
        sketch_id: Uuid,
        edge_ids: Vec<Uuid>,
        height: f64,
        operation: ExtrudeOperation,
    ) -> Result<Uuid, ServiceError> {
        let name = match operation {
            ExtrudeOperation::Join => "Extrude",
            ExtrudeOperation::Cut => "Cut",
        };
        let extrude = ExtrudeFeature {
            sketch_id,
            selected_edge_ids: edge_ids,
            height,
            operation,
        };
        Ok(self.engine.edit(|doc| doc.add_extrude(body_id, name, extrude))?)
    }

    /// Rebuild every body mesh. Not recorded in history.
    pub fn rebuild(&mut self) -> RebuildState {
        self.engine.rebuild()
    }

    // -- History --

    /// Step back one edit.
    pub fn undo(&mut self) -> bool {
        self.engine.undo()
    }

    /// Reapply the last undone edit.
    pub fn redo(&mut self) -> bool {
        self.engine.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.engine.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.engine.can_redo()
    }

    // -- Persistence --

    /// Save the document under `key`.
    pub fn save(&self, key: &str) -> Result<(), ServiceError> {
        self.repository.save(key, self.engine.document())?;
        info!(key, "document saved");
        Ok(())
    }

    /// Replace the document with the one stored under `key`. Returns whether
    /// the loaded document needed repair. History is cleared.
    pub fn load(&mut self, key: &str) -> Result<bool, ServiceError> {
        let document = self.repository.load(key)?;
        let repaired = self.engine.replace_document(document);
        info!(key, repaired, "document loaded");
        Ok(repaired)
    }

    // -- Sync --

    /// Wrap the current document for publishing.
    pub fn make_update(&self, document_id: &str, client_id: &str, revision: u64) -> SketchUpdate {
        SketchUpdate::new(document_id, revision, client_id, self.engine.document().clone())
    }

    /// Replace the document with a received update unless it is this
    /// client's own echo. Returns whether the document was replaced.
    pub fn apply_remote(&mut self, update: &SketchUpdate, own_client_id: &str) -> bool {
        if update.source_client_id == own_client_id {
            return false;
        }
        self.engine.replace_document(update.document.clone());
        debug!(revision = update.revision, source = %update.source_client_id, "remote update applied");
        true
    }
}

impl std::fmt::Debug for SketchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SketchService")
            .field("engine", &self.engine)
            .field("solver", &self.solver)
            .finish_non_exhaustive()
    }
}
