use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A geometric entity in a sketch.
///
/// Entities reference each other by id only. Lines, circles and rectangles
/// point at `Point` entities that live in the same [`SketchModel`](crate::SketchModel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SketchEntity {
    Point {
        id: Uuid,
        x: f64,
        y: f64,
    },
    Line {
        id: Uuid,
        start_id: Uuid,
        end_id: Uuid,
    },
    Circle {
        id: Uuid,
        center_id: Uuid,
        radius: f64,
    },
    Rectangle {
        id: Uuid,
        origin_id: Uuid,
        width: f64,
        height: f64,
    },
}

impl SketchEntity {
    /// A free point with a fresh id.
    pub fn point(x: f64, y: f64) -> Self {
        SketchEntity::Point {
            id: Uuid::new_v4(),
            x,
            y,
        }
    }

    /// A line between two existing points.
    pub fn line(start_id: Uuid, end_id: Uuid) -> Self {
        SketchEntity::Line {
            id: Uuid::new_v4(),
            start_id,
            end_id,
        }
    }

    /// A circle around an existing point.
    pub fn circle(center_id: Uuid, radius: f64) -> Self {
        SketchEntity::Circle {
            id: Uuid::new_v4(),
            center_id,
            radius,
        }
    }

    /// An axis-aligned rectangle anchored at an existing point.
    pub fn rectangle(origin_id: Uuid, width: f64, height: f64) -> Self {
        SketchEntity::Rectangle {
            id: Uuid::new_v4(),
            origin_id,
            width,
            height,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            SketchEntity::Point { id, .. }
            | SketchEntity::Line { id, .. }
            | SketchEntity::Circle { id, .. }
            | SketchEntity::Rectangle { id, .. } => *id,
        }
    }

    /// Short variant name, used for listings and diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SketchEntity::Point { .. } => "Point",
            SketchEntity::Line { .. } => "Line",
            SketchEntity::Circle { .. } => "Circle",
            SketchEntity::Rectangle { .. } => "Rectangle",
        }
    }

    /// Ids of the other entities this entity depends on.
    pub fn referenced_ids(&self) -> Vec<Uuid> {
        match self {
            SketchEntity::Point { .. } => Vec::new(),
            SketchEntity::Line {
                start_id, end_id, ..
            } => vec![*start_id, *end_id],
            SketchEntity::Circle { center_id, .. } => vec![*center_id],
            SketchEntity::Rectangle { origin_id, .. } => vec![*origin_id],
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, SketchEntity::Point { .. })
    }

    /// Coordinates of a point entity.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            SketchEntity::Point { x, y, .. } => Some((*x, *y)),
            _ => None,
        }
    }

    /// Endpoint ids of a line entity.
    pub fn endpoints(&self) -> Option<(Uuid, Uuid)> {
        match self {
            SketchEntity::Line {
                start_id, end_id, ..
            } => Some((*start_id, *end_id)),
            _ => None,
        }
    }

    /// A new point value with the same id at `(x, y)`.
    ///
    /// Returns `None` for non-point entities. The receiver is left untouched.
    pub fn moved_to(&self, x: f64, y: f64) -> Option<SketchEntity> {
        match self {
            SketchEntity::Point { id, .. } => Some(SketchEntity::Point { id: *id, x, y }),
            _ => None,
        }
    }
}
