//! Handlers for roadmap collections.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use waypoint_db::models::roadmap::{Roadmap, RoadmapFilter};

use crate::error::{user_store_failed, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/public
///
/// Served from the feed cache. Never fails: store errors yield `[]`.
pub async fn public_feed(State(state): State<AppState>) -> Response {
    let feed = state.feed.get_public_feed().await;
    Json(&*feed).into_response()
}

/// The caller's collection, newest first, capped at `LIST_LIMIT`.
async fn list(
    state: &AppState,
    user_id: &str,
    filter: RoadmapFilter,
) -> AppResult<Json<Vec<Roadmap>>> {
    let roadmaps = state
        .roadmaps
        .query(&filter, Some(state.config.list_limit))
        .await
        .inspect_err(user_store_failed("query", user_id))?;
    Ok(Json(roadmaps))
}

/// GET /api/mine
pub async fn mine(user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Roadmap>>> {
    list(&state, &user.user_id, RoadmapFilter::AuthorId(user.user_id.clone())).await
}

/// GET /api/liked
pub async fn liked(user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Roadmap>>> {
    list(&state, &user.user_id, RoadmapFilter::LikedBy(user.user_id.clone())).await
}

/// GET /api/saved
pub async fn saved(user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Roadmap>>> {
    list(&state, &user.user_id, RoadmapFilter::SavedBy(user.user_id.clone())).await
}
