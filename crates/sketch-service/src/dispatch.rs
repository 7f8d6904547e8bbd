use tracing::warn;

use crate::messages::{Request, Response};
use crate::query::SketchView;
use crate::service::{ServiceError, SketchService};

/// Run one request against the service.
///
/// Failures come back as [`Response::Error`]; dispatch never panics.
pub fn dispatch(service: &mut SketchService, request: Request) -> Response {
    match handle_request(service, request) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "request failed");
            Response::Error {
                message: e.to_string(),
            }
        }
    }
}

/// [`dispatch`] over JSON text, for message-passing front ends.
pub fn dispatch_json(service: &mut SketchService, input: &str) -> String {
    let response = match serde_json::from_str::<Request>(input) {
        Ok(request) => dispatch(service, request),
        Err(e) => Response::Error {
            message: format!("failed to parse request: {e}"),
        },
    };
    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(r#"{{"type":"Error","message":"failed to serialize response: {e}"}}"#)
    })
}

fn handle_request(service: &mut SketchService, request: Request) -> Result<Response, ServiceError> {
    match request {
        // -- Entities --
        Request::AddPoint { x, y } => created(service.add_point(x, y)),
        Request::AddLine { start_id, end_id } => created(service.add_line(start_id, end_id)),
        Request::AddCircle { center_id, radius } => created(service.add_circle(center_id, radius)),
        Request::AddRectangle {
            origin_id,
            width,
            height,
        } => created(service.add_rectangle(origin_id, width, height)),

        // -- Constraints --
        Request::AddCoincident { point_a, point_b } => created(service.add_coincident(point_a, point_b)),
        Request::AddDistance {
            point_a,
            point_b,
            value,
        } => created(service.add_distance(point_a, point_b, value)),
        Request::AddHorizontal { line_id } => created(service.add_horizontal(line_id)),
        Request::AddVertical { line_id } => created(service.add_vertical(line_id)),

        // -- Edits --
        Request::RemoveEntity { id } => {
            service.remove_entity(id)?;
            Ok(Response::Ok)
        }
        Request::RemoveConstraint { id } => {
            service.remove_constraint(id)?;
            Ok(Response::Ok)
        }
        Request::MovePoint { id, x, y } => {
            service.move_point(id, x, y)?;
            Ok(Response::Ok)
        }

        Request::Solve => Ok(Response::Solved {
            result: service.solve()?,
        }),
        Request::Rebuild => {
            service.rebuild();
            Ok(Response::Ok)
        }

        // -- History --
        Request::Undo => {
            if !service.undo() {
                return Err(ServiceError::EmptyHistory { action: "undo" });
            }
            Ok(Response::Ok)
        }
        Request::Redo => {
            if !service.redo() {
                return Err(ServiceError::EmptyHistory { action: "redo" });
            }
            Ok(Response::Ok)
        }

        // -- Files --
        Request::Save { key } => {
            service.save(&key)?;
            Ok(Response::Ok)
        }
        Request::Load { key } => {
            service.load(&key)?;
            Ok(Response::Ok)
        }

        Request::List => {
            let sketch = service.document().active_sketch()?;
            Ok(Response::Listing(SketchView::of(&sketch.model)))
        }
    }
}

fn created(id: Result<uuid::Uuid, ServiceError>) -> Result<Response, ServiceError> {
    Ok(Response::Created { id: id? })
}
