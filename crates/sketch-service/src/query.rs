//! Flat read-only views of a sketch for the viewport.
//!
//! Model maps are keyed by id, so every list comes out sorted by id.

use serde::{Deserialize, Serialize};
use sketcher_types::{Constraint, SketchEntity, SketchModel};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPoint {
    pub id: Uuid,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderLine {
    pub id: Uuid,
    pub start_point_id: Uuid,
    pub end_point_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderCircle {
    pub id: Uuid,
    pub center_point_id: Uuid,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRectangle {
    pub id: Uuid,
    pub origin_point_id: Uuid,
    pub width: f64,
    pub height: f64,
}

/// A constraint with the short label drawn next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConstraint {
    pub id: Uuid,
    pub kind: String,
    pub entity_ids: Vec<Uuid>,
    pub label: String,
}

impl RenderConstraint {
    fn of(constraint: &Constraint) -> Self {
        Self {
            id: constraint.id(),
            kind: constraint.kind_name().to_string(),
            entity_ids: constraint.entity_ids(),
            label: constraint_label(constraint),
        }
    }
}

/// `H`, `V`, `⨉` or `D=<value>`.
pub fn constraint_label(constraint: &Constraint) -> String {
    match constraint {
        Constraint::Horizontal { .. } => "H".to_string(),
        Constraint::Vertical { .. } => "V".to_string(),
        Constraint::Coincident { .. } => "⨉".to_string(),
        Constraint::Distance { value, .. } => format!("D={value}"),
    }
}

/// Everything the viewport draws for one sketch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SketchView {
    pub points: Vec<RenderPoint>,
    pub lines: Vec<RenderLine>,
    pub circles: Vec<RenderCircle>,
    pub rectangles: Vec<RenderRectangle>,
    pub constraints: Vec<RenderConstraint>,
}

impl SketchView {
    /// Build the view of `model`, sorted by id.
    pub fn of(model: &SketchModel) -> Self {
        let mut view = Self::default();
        for entity in model.entities.values() {
            match *entity {
                SketchEntity::Point { id, x, y } => view.points.push(RenderPoint { id, x, y }),
                SketchEntity::Line { id, start_id, end_id } => view.lines.push(RenderLine {
                    id,
                    start_point_id: start_id,
                    end_point_id: end_id,
                }),
                SketchEntity::Circle { id, center_id, radius } => view.circles.push(RenderCircle {
                    id,
                    center_point_id: center_id,
                    radius,
                }),
                SketchEntity::Rectangle {
                    id,
                    origin_id,
                    width,
                    height,
                } => view.rectangles.push(RenderRectangle {
                    id,
                    origin_point_id: origin_id,
                    width,
                    height,
                }),
            }
        }
        view.constraints = model.constraints.values().map(RenderConstraint::of).collect();
        view
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
            && self.lines.is_empty()
            && self.circles.is_empty()
            && self.rectangles.is_empty()
            && self.constraints.is_empty()
    }
}
