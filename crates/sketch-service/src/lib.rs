//! Orchestration over the sketch core.
//!
//! [`SketchService`] owns one document and wires the solver, rebuild,
//! persistence and sync layers together. [`dispatch`] exposes the same
//! operations as tagged [`Request`]/[`Response`] messages for CLI and UI
//! collaborators.

pub mod dispatch;
pub mod messages;
pub mod query;
pub mod service;

pub use dispatch::{dispatch, dispatch_json};
pub use messages::{Request, Response};
pub use query::{RenderCircle, RenderConstraint, RenderLine, RenderPoint, RenderRectangle, SketchView};
pub use service::{ServiceError, SketchService};
