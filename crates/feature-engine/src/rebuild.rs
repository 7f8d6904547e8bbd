use std::collections::BTreeMap;

use modeling_ops::{apply_boolean, build_box_mesh, extrude_tool, AxisBox, MeshData};
use sketch_solver::rectangle_profile;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::types::{Body, CadDocument, ExtrudeFeature, FeatureKind, RebuildConfig};

/// Why a feature contributed nothing to its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The referenced sketch is not in the document.
    MissingSketch,
    /// The selected edges do not describe an axis-aligned rectangle.
    NotARectangle,
    /// Height below tolerance or a degenerate tool box.
    Degenerate,
}

/// Result of a rebuild pass. Computed from a read-only document and applied
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct RebuildState {
    /// New mesh for every body, `None` when the body has no solids.
    pub meshes: BTreeMap<Uuid, Option<MeshData>>,
    /// `(body_id, feature_id, reason)` for every feature that was skipped.
    pub skipped: Vec<(Uuid, Uuid, SkipReason)>,
}

impl RebuildState {
    /// Store the computed meshes on the document's bodies.
    pub fn apply_to(self, doc: &mut CadDocument) {
        for (body_id, mesh) in self.meshes {
            if let Some(body) = doc.bodies.get_mut(&body_id) {
                body.mesh = mesh;
            }
        }
    }
}

/// Regenerate every body's mesh from its feature list.
///
/// Pure over `doc`: the same document always yields the same meshes.
#[instrument(skip_all, fields(document = %doc.id, bodies = doc.bodies.len()))]
pub fn rebuild(doc: &CadDocument, config: &RebuildConfig) -> RebuildState {
    let mut state = RebuildState::default();
    for body in doc.bodies.values() {
        let solids = body_solids(doc, body, config, &mut state.skipped);
        debug!(body = %body.id, solids = solids.len(), "body rebuilt");
        let mesh = (!solids.is_empty()).then(|| build_box_mesh(&solids));
        state.meshes.insert(body.id, mesh);
    }
    state
}

/// Rebuild a copy of `doc` and return it with fresh meshes.
pub fn rebuild_document(doc: &CadDocument, config: &RebuildConfig) -> CadDocument {
    let mut out = doc.clone();
    rebuild(doc, config).apply_to(&mut out);
    out
}

/// Replay one body's features in order into a list of boxes.
pub fn body_solids(
    doc: &CadDocument,
    body: &Body,
    config: &RebuildConfig,
    skipped: &mut Vec<(Uuid, Uuid, SkipReason)>,
) -> Vec<AxisBox> {
    let mut solids = Vec::new();
    for feature in &body.features {
        match &feature.kind {
            FeatureKind::Extrude(extrude) => match extrude_tool_for(doc, extrude, config) {
                Ok(tool) => {
                    solids = apply_boolean(solids, tool, extrude.operation.into(), config.epsilon);
                }
                Err(reason) => {
                    debug!(feature = %feature.id, ?reason, "feature skipped");
                    skipped.push((body.id, feature.id, reason));
                }
            },
        }
    }
    solids
}

fn extrude_tool_for(
    doc: &CadDocument,
    extrude: &ExtrudeFeature,
    config: &RebuildConfig,
) -> Result<AxisBox, SkipReason> {
    let sketch = doc
        .sketches
        .get(&extrude.sketch_id)
        .ok_or(SkipReason::MissingSketch)?;
    let profile = rectangle_profile(&sketch.model, &extrude.selected_edge_ids, config.epsilon)
        .ok_or(SkipReason::NotARectangle)?;
    extrude_tool(&profile, extrude.height, config.epsilon).map_err(|_| SkipReason::Degenerate)
}
