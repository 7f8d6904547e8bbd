use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A relation between sketch entities that the solver tries to satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Constraint {
    Coincident {
        id: Uuid,
        point_a: Uuid,
        point_b: Uuid,
    },
    Distance {
        id: Uuid,
        point_a: Uuid,
        point_b: Uuid,
        value: f64,
    },
    Horizontal {
        id: Uuid,
        line: Uuid,
    },
    Vertical {
        id: Uuid,
        line: Uuid,
    },
}

impl Constraint {
    /// Two points at the same position.
    pub fn coincident(point_a: Uuid, point_b: Uuid) -> Self {
        Constraint::Coincident {
            id: Uuid::new_v4(),
            point_a,
            point_b,
        }
    }

    /// Two points `value` apart.
    pub fn distance(point_a: Uuid, point_b: Uuid, value: f64) -> Self {
        Constraint::Distance {
            id: Uuid::new_v4(),
            point_a,
            point_b,
            value,
        }
    }

    /// A line with equal endpoint Y.
    pub fn horizontal(line: Uuid) -> Self {
        Constraint::Horizontal {
            id: Uuid::new_v4(),
            line,
        }
    }

    /// A line with equal endpoint X.
    pub fn vertical(line: Uuid) -> Self {
        Constraint::Vertical {
            id: Uuid::new_v4(),
            line,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Constraint::Coincident { id, .. }
            | Constraint::Distance { id, .. }
            | Constraint::Horizontal { id, .. }
            | Constraint::Vertical { id, .. } => *id,
        }
    }

    /// Variant name as serialized in the `type` tag.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Constraint::Coincident { .. } => "Coincident",
            Constraint::Distance { .. } => "Distance",
            Constraint::Horizontal { .. } => "Horizontal",
            Constraint::Vertical { .. } => "Vertical",
        }
    }

    /// Entity ids this constraint depends on, in declaration order.
    pub fn entity_ids(&self) -> Vec<Uuid> {
        match self {
            Constraint::Coincident {
                point_a, point_b, ..
            }
            | Constraint::Distance {
                point_a, point_b, ..
            } => vec![*point_a, *point_b],
            Constraint::Horizontal { line, .. } | Constraint::Vertical { line, .. } => {
                vec![*line]
            }
        }
    }

    /// Whether this constraint depends on `entity_id`.
    pub fn references(&self, entity_id: Uuid) -> bool {
        self.entity_ids().contains(&entity_id)
    }
}
