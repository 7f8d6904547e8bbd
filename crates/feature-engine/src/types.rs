use std::collections::BTreeMap;

use modeling_ops::MeshData;
use serde::{Deserialize, Serialize};
use sketcher_types::{ModelError, SketchModel};
use uuid::Uuid;

/// A whole modeling document: the component tree plus every sketch and body
/// it owns, keyed by id.
///
/// `root_component_id` and `active_sketch_id` must always resolve; see
/// [`CadDocument::validate_and_repair`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadDocument {
    pub id: Uuid,
    #[serde(default = "default_document_name")]
    pub name: String,
    pub root_component_id: Uuid,
    pub active_sketch_id: Uuid,
    #[serde(default)]
    pub components: BTreeMap<Uuid, Component>,
    #[serde(default)]
    pub sketches: BTreeMap<Uuid, Sketch>,
    #[serde(default)]
    pub bodies: BTreeMap<Uuid, Body>,
}

fn default_document_name() -> String {
    "Untitled".to_string()
}

impl Default for CadDocument {
    fn default() -> Self {
        Self::create_default()
    }
}

/// A node in the component tree. Owns sketches and bodies by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub child_component_ids: Vec<Uuid>,
    #[serde(default)]
    pub sketch_ids: Vec<Uuid>,
    #[serde(default)]
    pub body_ids: Vec<Uuid>,
}

/// A 2D sketch on the XY plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sketch {
    pub id: Uuid,
    pub component_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub model: SketchModel,
}

/// A solid built by replaying its features in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: Uuid,
    pub component_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Output of the last rebuild. `None` when the body has no solids.
    #[serde(default)]
    pub mesh: Option<MeshData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: Uuid,
    pub name: String,
    pub kind: FeatureKind,
}

/// A parametric operation with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeatureKind {
    Extrude(ExtrudeFeature),
}

/// Extrude a rectangular selection of sketch lines along +Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrudeFeature {
    /// Looked up at rebuild time; a missing sketch skips the feature.
    pub sketch_id: Uuid,
    pub selected_edge_ids: Vec<Uuid>,
    pub height: f64,
    #[serde(default)]
    pub operation: ExtrudeOperation,
}

/// How an extrude combines with the solids already in its body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtrudeOperation {
    #[default]
    Join,
    Cut,
}

impl From<ExtrudeOperation> for modeling_ops::BooleanKind {
    fn from(op: ExtrudeOperation) -> Self {
        match op {
            ExtrudeOperation::Join => modeling_ops::BooleanKind::Union,
            ExtrudeOperation::Cut => modeling_ops::BooleanKind::Subtract,
        }
    }
}

/// Rebuild tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RebuildConfig {
    /// Profile boundary tolerance, minimum extrude height and minimum slab
    /// thickness kept by a cut.
    pub epsilon: f64,
}

impl RebuildConfig {
    /// Set the rebuild tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            epsilon: modeling_ops::DEFAULT_EPSILON,
        }
    }
}

/// Errors from document edits. Every edit validates before mutating, so an
/// `Err` always leaves the document unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("component not found: {id}")]
    ComponentNotFound { id: Uuid },

    #[error("sketch not found: {id}")]
    SketchNotFound { id: Uuid },

    #[error("body not found: {id}")]
    BodyNotFound { id: Uuid },

    #[error("entity not found: {id}")]
    EntityNotFound { id: Uuid },

    #[error("constraint not found: {id}")]
    ConstraintNotFound { id: Uuid },

    #[error("feature not found: {id}")]
    FeatureNotFound { id: Uuid },

    #[error("entity {id} is not a point")]
    NotAPoint { id: Uuid },

    #[error("entity {id} is not a line")]
    NotALine { id: Uuid },

    #[error("duplicate id: {id}")]
    DuplicateId { id: Uuid },

    #[error("cannot delete the only sketch {id}")]
    LastSketch { id: Uuid },
}

impl EngineError {
    /// True for the "referenced something that does not exist" class.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::ComponentNotFound { .. }
                | EngineError::SketchNotFound { .. }
                | EngineError::BodyNotFound { .. }
                | EngineError::EntityNotFound { .. }
                | EngineError::ConstraintNotFound { .. }
                | EngineError::FeatureNotFound { .. }
        )
    }
}

impl From<ModelError> for EngineError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::DuplicateEntity { id } | ModelError::DuplicateConstraint { id } => {
                EngineError::DuplicateId { id }
            }
        }
    }
}
