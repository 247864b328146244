//! Handlers for a single roadmap: reads and social interactions.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use waypoint_core::error::CoreError;
use waypoint_db::models::roadmap::Roadmap;

use super::ActionResponse;
use crate::error::{roadmap_store_failed, AppResult};
use crate::middleware::auth::AuthUser;
use crate::social::PublishOutcome;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub success: bool,
    pub message: &'static str,
    pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct BookmarkResponse {
    pub success: bool,
    pub message: &'static str,
    pub saved: bool,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub success: bool,
}

/// GET /api/roadmaps/{id}
pub async fn get_roadmap(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Roadmap>> {
    let roadmap = state
        .roadmaps
        .get(&id)
        .await
        .inspect_err(roadmap_store_failed("get", &id))?;
    let roadmap = roadmap.ok_or_else(|| CoreError::roadmap_not_found(id))?;
    Ok(Json(roadmap))
}

/// POST /api/roadmaps/{id}/publish
///
/// Author only. Publishing an already public roadmap succeeds without change.
pub async fn publish(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActionResponse>> {
    let message = match state.social.publish(&id, &user.user_id).await? {
        PublishOutcome::Published => "Roadmap published",
        PublishOutcome::AlreadyPublic => "Roadmap is already public",
    };
    Ok(Json(ActionResponse::ok(message)))
}

/// POST /api/roadmaps/{id}/like
pub async fn like(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LikeResponse>> {
    let liked = state.social.toggle_like(&id, &user.user_id).await?;
    Ok(Json(LikeResponse {
        success: true,
        message: if liked { "Liked" } else { "Unliked" },
        liked,
    }))
}

/// POST /api/roadmaps/{id}/bookmark
pub async fn bookmark(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookmarkResponse>> {
    let saved = state.social.toggle_bookmark(&id, &user.user_id).await?;
    Ok(Json(BookmarkResponse {
        success: true,
        message: if saved {
            "Saved to profile"
        } else {
            "Removed from saved"
        },
        saved,
    }))
}

/// POST /api/roadmaps/{id}/view
///
/// Always succeeds; the count is recorded in the background.
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ViewResponse> {
    state.social.record_view(&id);
    Json(ViewResponse { success: true })
}

/// POST /api/roadmaps/{id}/clone
pub async fn clone_roadmap(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Roadmap>> {
    let roadmap = state.social.clone_roadmap(&id, &user.user_id).await?;
    Ok(Json(roadmap))
}

/// DELETE /api/roadmaps/{id}
///
/// Author only.
pub async fn delete_roadmap(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActionResponse>> {
    state.social.delete(&id, &user.user_id).await?;
    Ok(Json(ActionResponse::ok("Roadmap deleted")))
}
