//! Handlers for the caller's stored generative-model API key.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use waypoint_core::error::CoreError;

use crate::error::{user_store_failed, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatusResponse {
    pub has_key: bool,
    /// Masked key, never the plaintext.
    pub key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetKeyRequest {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct SetKeyResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearKeyResponse {
    pub success: bool,
    pub cleared: bool,
}

/// GET /api/user/key
pub async fn get_key(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<KeyStatusResponse>> {
    let key = state
        .keys
        .get_key(&user.user_id)
        .await
        .inspect_err(user_store_failed("get_key", &user.user_id))?;
    Ok(Json(KeyStatusResponse {
        has_key: key.is_some(),
        key: key.map(|k| k.masked()),
    }))
}

/// POST /api/user/key
///
/// Store or replace the caller's key. Use `DELETE` to remove it.
pub async fn set_key(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SetKeyRequest>,
) -> AppResult<Json<SetKeyResponse>> {
    let key = input.key.trim();
    if key.is_empty() {
        return Err(CoreError::Validation("API key must not be empty".into()).into());
    }

    state
        .keys
        .set_key(&user.user_id, key)
        .await
        .inspect_err(user_store_failed("set_key", &user.user_id))?;
    tracing::info!(user_id = %user.user_id, "User API key stored");

    Ok(Json(SetKeyResponse { success: true }))
}

/// DELETE /api/user/key
pub async fn clear_key(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ClearKeyResponse>> {
    let cleared = state
        .keys
        .clear_key(&user.user_id)
        .await
        .inspect_err(user_store_failed("clear_key", &user.user_id))?;
    tracing::info!(user_id = %user.user_id, cleared, "User API key cleared");

    Ok(Json(ClearKeyResponse {
        success: true,
        cleared,
    }))
}
