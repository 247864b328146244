//! Per-user API key override for the generative model.

use serde::Serialize;
use sqlx::FromRow;
use waypoint_core::types::{Timestamp, UserId};

/// A row from the `user_api_keys` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserKey {
    pub user_id: UserId,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserKey {
    /// The key with everything but its last four characters hidden.
    ///
    /// Keys of four characters or fewer are hidden entirely.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        let visible = if chars.len() > 4 { 4 } else { 0 };
        let hidden = chars.len() - visible;
        let tail: String = chars[hidden..].iter().collect();
        format!("{}{}", "*".repeat(hidden), tail)
    }
}
