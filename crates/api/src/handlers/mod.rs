//! HTTP handlers, grouped by resource.

pub mod generate;
pub mod lists;
pub mod roadmaps;
pub mod user_key;

use serde::Serialize;

/// `{"success": true, "message": ...}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: &'static str,
}

impl ActionResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}
