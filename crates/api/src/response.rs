//! Shared response body types for API handlers.
//!
//! Mutations answer with small acknowledgement objects rather than the
//! updated row; reads return the rows themselves.

use archive_core::types::DbId;
use serde::Serialize;

/// `{ "message": ... }` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a `201 Created` response: the new row id and a message.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: DbId,
    pub message: String,
}

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}
