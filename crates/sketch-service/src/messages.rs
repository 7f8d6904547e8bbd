use serde::{Deserialize, Serialize};
use sketch_solver::SolveResult;
use uuid::Uuid;

use crate::query::SketchView;

/// Commands from a CLI or UI collaborator. Sketch commands act on the
/// active sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    // -- Entities --
    AddPoint {
        x: f64,
        y: f64,
    },
    AddLine {
        start_id: Uuid,
        end_id: Uuid,
    },
    AddCircle {
        center_id: Uuid,
        radius: f64,
    },
    AddRectangle {
        origin_id: Uuid,
        width: f64,
        height: f64,
    },

    // -- Constraints --
    AddCoincident {
        point_a: Uuid,
        point_b: Uuid,
    },
    AddDistance {
        point_a: Uuid,
        point_b: Uuid,
        value: f64,
    },
    AddHorizontal {
        line_id: Uuid,
    },
    AddVertical {
        line_id: Uuid,
    },

    // -- Edits --
    RemoveEntity {
        id: Uuid,
    },
    RemoveConstraint {
        id: Uuid,
    },
    MovePoint {
        id: Uuid,
        x: f64,
        y: f64,
    },

    Solve,
    Rebuild,

    // -- History --
    Undo,
    Redo,

    // -- Files --
    Save {
        key: String,
    },
    Load {
        key: String,
    },

    /// Describe the active sketch.
    List,
}

/// Replies to a [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// An entity or constraint was added.
    Created { id: Uuid },

    Solved { result: SolveResult },

    Listing(SketchView),

    Ok,

    Error { message: String },
}

impl Response {
    /// True for [`Response::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}
