use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::hub::SyncHub;
use crate::update::SketchUpdate;

/// Minimal HTTP-shaped response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestResponse {
    pub status: u16,
    pub body: Option<String>,
}

impl RestResponse {
    pub const OK: u16 = 200;
    pub const BAD_REQUEST: u16 = 400;
    pub const NOT_FOUND: u16 = 404;
    pub const INTERNAL_ERROR: u16 = 500;

    fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status: Self::OK,
                body: Some(body),
            },
            Err(e) => Self::error(Self::INTERNAL_ERROR, e.to_string()),
        }
    }

    fn error(status: u16, message: String) -> Self {
        Self {
            status,
            body: Some(message),
        }
    }

    fn not_found() -> Self {
        Self {
            status: Self::NOT_FOUND,
            body: None,
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// `GET /api/sketch/{id}` and `PUT /api/sketch/{id}` over a hub.
#[derive(Debug, Clone)]
pub struct RestApi {
    hub: Arc<SyncHub>,
}

impl RestApi {
    /// Serve documents from `hub`.
    pub fn new(hub: Arc<SyncHub>) -> Self {
        Self { hub }
    }

    /// 200 with the stored update, or 404 when the id was never published.
    pub fn get(&self, document_id: &str) -> RestResponse {
        match self.hub.get_current(document_id) {
            Some(update) => RestResponse::json(&update),
            None => RestResponse::not_found(),
        }
    }

    /// Store `update` under the path id. The id in the body is overridden,
    /// and the update takes the same rebuild and broadcast path as a hub
    /// publish.
    pub fn put(&self, document_id: &str, mut update: SketchUpdate) -> RestResponse {
        if update.document_id != document_id {
            debug!(path = document_id, body = %update.document_id, "document id overridden by path");
            update.document_id = document_id.to_string();
        }
        let stored = self.hub.publish(update);
        RestResponse::json(&stored)
    }

    /// [`put`](Self::put) from a raw JSON body; malformed bodies are 400.
    pub fn put_json(&self, document_id: &str, body: &str) -> RestResponse {
        match SketchUpdate::from_json(body) {
            Ok(update) => self.put(document_id, update),
            Err(e) => RestResponse::error(RestResponse::BAD_REQUEST, e.to_string()),
        }
    }
}
