//! ModelBuilder: fluent API for scripting sketch-to-solid workflows in tests.
//!
//! Sketch edits go through `sketch_service::dispatch()` so tests exercise
//! the real message path. Entities and bodies are addressed by name.

use std::collections::HashMap;
use std::sync::Arc;

use feature_engine::rebuild::RebuildState;
use feature_engine::types::{CadDocument, ExtrudeOperation};
use file_format::{DocumentRepository, MemoryRepository};
use modeling_ops::MeshData;
use sketch_service::{dispatch, Request, Response, SketchService, SketchView};
use sketch_solver::{SolveResult, SolverConfig};
use uuid::Uuid;

use crate::helpers::HarnessError;

/// Builds a model step by step on top of a [`SketchService`].
pub struct ModelBuilder {
    pub service: SketchService,
    names: HashMap<String, Uuid>,
    history: Vec<(String, String)>,
}

impl ModelBuilder {
    /// A builder backed by an in-memory repository.
    pub fn new() -> Self {
        Self::with_repository(Arc::new(MemoryRepository::new()))
    }

    /// A builder backed by `repository`, used by save and load.
    pub fn with_repository(repository: Arc<dyn DocumentRepository>) -> Self {
        Self {
            service: SketchService::new(repository),
            names: HashMap::new(),
            history: Vec::new(),
        }
    }

    pub fn with_solver_config(mut self, config: SolverConfig) -> Self {
        self.service = self.service.with_solver_config(config);
        self
    }

    // ── Names ───────────────────────────────────────────────────────────────

    /// Id registered under `name`.
    pub fn id(&self, name: &str) -> Result<Uuid, HarnessError> {
        self.names.get(name).copied().ok_or_else(|| HarnessError::UnknownName {
            name: name.to_string(),
        })
    }

    fn ids(&self, names: &[&str]) -> Result<Vec<Uuid>, HarnessError> {
        names.iter().map(|n| self.id(n)).collect()
    }

    fn check_free(&self, name: &str) -> Result<(), HarnessError> {
        if self.names.contains_key(name) {
            return Err(HarnessError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Every request sent so far with a short description of its response.
    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }

    // ── Dispatch ────────────────────────────────────────────────────────────

    fn send(&mut self, request: Request) -> Result<Response, HarnessError> {
        let label = format!("{request:?}");
        let response = dispatch(&mut self.service, request);
        self.history.push((label, format!("{response:?}")));
        match response {
            Response::Error { message } => Err(HarnessError::DispatchError { message }),
            other => Ok(other),
        }
    }

    fn create(&mut self, name: &str, request: Request) -> Result<Uuid, HarnessError> {
        self.check_free(name)?;
        let label = format!("{request:?}");
        match self.send(request)? {
            Response::Created { id } => {
                self.names.insert(name.to_string(), id);
                Ok(id)
            }
            other => Err(HarnessError::UnexpectedResponse {
                request: label,
                response: format!("{other:?}"),
            }),
        }
    }

    // ── Entities ────────────────────────────────────────────────────────────

    /// Add a point and register it as `name`.
    pub fn point(&mut self, name: &str, x: f64, y: f64) -> Result<Uuid, HarnessError> {
        self.create(name, Request::AddPoint { x, y })
    }

    /// Add a line between two named points.
    pub fn line(&mut self, name: &str, start: &str, end: &str) -> Result<Uuid, HarnessError> {
        let (start_id, end_id) = (self.id(start)?, self.id(end)?);
        self.create(name, Request::AddLine { start_id, end_id })
    }

    /// Add a circle around a named center point.
    pub fn circle(&mut self, name: &str, center: &str, radius: f64) -> Result<Uuid, HarnessError> {
        let center_id = self.id(center)?;
        self.create(name, Request::AddCircle { center_id, radius })
    }

    /// Add a rectangle anchored at a named point.
    pub fn rectangle(&mut self, name: &str, origin: &str, width: f64, height: f64) -> Result<Uuid, HarnessError> {
        let origin_id = self.id(origin)?;
        self.create(
            name,
            Request::AddRectangle {
                origin_id,
                width,
                height,
            },
        )
    }

    /// Four corner points `{prefix}.p0..p3` counter-clockwise from
    /// `(x0, y0)` and the edges `{prefix}.e0..e3` joining them. Returns the
    /// edge names.
    pub fn rect_outline(
        &mut self,
        prefix: &str,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    ) -> Result<Vec<String>, HarnessError> {
        let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
        let points: Vec<String> = (0..4).map(|i| format!("{prefix}.p{i}")).collect();
        for (name, (x, y)) in points.iter().zip(corners) {
            self.point(name, x, y)?;
        }
        let mut edges = Vec::with_capacity(4);
        for i in 0..4 {
            let name = format!("{prefix}.e{i}");
            self.line(&name, &points[i], &points[(i + 1) % 4])?;
            edges.push(name);
        }
        Ok(edges)
    }

    // ── Constraints ─────────────────────────────────────────────────────────

    /// Constrain a named line to be horizontal.
    pub fn horizontal(&mut self, name: &str, line: &str) -> Result<Uuid, HarnessError> {
        let line_id = self.id(line)?;
        self.create(name, Request::AddHorizontal { line_id })
    }

    /// Constrain a named line to be vertical.
    pub fn vertical(&mut self, name: &str, line: &str) -> Result<Uuid, HarnessError> {
        let line_id = self.id(line)?;
        self.create(name, Request::AddVertical { line_id })
    }

    /// Constrain two named points to coincide.
    pub fn coincident(&mut self, name: &str, a: &str, b: &str) -> Result<Uuid, HarnessError> {
        let (point_a, point_b) = (self.id(a)?, self.id(b)?);
        self.create(name, Request::AddCoincident { point_a, point_b })
    }

    /// Constrain the distance between two named points.
    pub fn distance(&mut self, name: &str, a: &str, b: &str, value: f64) -> Result<Uuid, HarnessError> {
        let (point_a, point_b) = (self.id(a)?, self.id(b)?);
        self.create(
            name,
            Request::AddDistance {
                point_a,
                point_b,
                value,
            },
        )
    }

    // ── Edits ───────────────────────────────────────────────────────────────

    /// Move a named point.
    pub fn move_point(&mut self, name: &str, x: f64, y: f64) -> Result<(), HarnessError> {
        let id = self.id(name)?;
        self.send(Request::MovePoint { id, x, y })?;
        Ok(())
    }

    /// Remove a named entity (and its constraints) or a named constraint.
    pub fn remove(&mut self, name: &str) -> Result<(), HarnessError> {
        let id = self.id(name)?;
        let is_entity = self
            .service
            .document()
            .active_sketch()
            .map(|s| s.model.contains_entity(id))
            .unwrap_or(false);
        if is_entity {
            self.send(Request::RemoveEntity { id })?;
        } else {
            self.send(Request::RemoveConstraint { id })?;
        }
        self.names.remove(name);
        Ok(())
    }

    /// Solve the active sketch.
    pub fn solve(&mut self) -> Result<SolveResult, HarnessError> {
        match self.send(Request::Solve)? {
            Response::Solved { result } => Ok(result),
            other => Err(HarnessError::UnexpectedResponse {
                request: "Solve".to_string(),
                response: format!("{other:?}"),
            }),
        }
    }

    /// Point position in the active sketch.
    pub fn position(&self, name: &str) -> Result<(f64, f64), HarnessError> {
        let id = self.id(name)?;
        self.service
            .document()
            .active_sketch()
            .ok()
            .and_then(|s| s.model.point(id))
            .ok_or_else(|| HarnessError::UnknownName {
                name: name.to_string(),
            })
    }

    /// The render view of the active sketch.
    pub fn view(&mut self) -> Result<SketchView, HarnessError> {
        match self.send(Request::List)? {
            Response::Listing(view) => Ok(view),
            other => Err(HarnessError::UnexpectedResponse {
                request: "List".to_string(),
                response: format!("{other:?}"),
            }),
        }
    }

    // ── Bodies and features ─────────────────────────────────────────────────

    /// A new body under the root component.
    pub fn body(&mut self, name: &str) -> Result<Uuid, HarnessError> {
        self.check_free(name)?;
        let root = self.service.document().root_component_id;
        let id = self.service.create_body(root, name)?;
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Join-extrude the named edges of the active sketch into `body`.
    pub fn extrude(&mut self, name: &str, body: &str, edges: &[String], height: f64) -> Result<Uuid, HarnessError> {
        self.feature(name, body, edges, height, ExtrudeOperation::Join)
    }

    /// Cut-extrude the named edges of the active sketch from `body`.
    pub fn cut(&mut self, name: &str, body: &str, edges: &[String], height: f64) -> Result<Uuid, HarnessError> {
        self.feature(name, body, edges, height, ExtrudeOperation::Cut)
    }

    fn feature(
        &mut self,
        name: &str,
        body: &str,
        edges: &[String],
        height: f64,
        operation: ExtrudeOperation,
    ) -> Result<Uuid, HarnessError> {
        self.check_free(name)?;
        let body_id = self.id(body)?;
        let edge_names: Vec<&str> = edges.iter().map(String::as_str).collect();
        let edge_ids = self.ids(&edge_names)?;
        let sketch = self.service.active_sketch_id();
        let id = self
            .service
            .add_extrude(body_id, sketch, edge_ids, height, operation)?;
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Rebuild every body mesh.
    pub fn rebuild(&mut self) -> RebuildState {
        self.service.rebuild()
    }

    /// Mesh of a named body after the last rebuild.
    pub fn mesh(&self, body: &str) -> Result<MeshData, HarnessError> {
        let id = self.id(body)?;
        self.service
            .document()
            .body(id)
            .ok()
            .and_then(|b| b.mesh.clone())
            .ok_or_else(|| HarnessError::NoMesh {
                name: body.to_string(),
            })
    }

    pub fn document(&self) -> &CadDocument {
        self.service.document()
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
