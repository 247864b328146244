//! Route definitions for single-roadmap operations.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::roadmaps;
use crate::state::AppState;

/// Roadmap routes mounted at `/roadmaps`.
///
/// ```text
/// GET    /{id}          -> get_roadmap
/// DELETE /{id}          -> delete_roadmap
/// POST   /{id}/publish  -> publish
/// POST   /{id}/like     -> like
/// POST   /{id}/bookmark -> bookmark
/// POST   /{id}/view     -> record_view
/// POST   /{id}/clone    -> clone_roadmap
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(roadmaps::get_roadmap).delete(roadmaps::delete_roadmap),
        )
        .route("/{id}/publish", post(roadmaps::publish))
        .route("/{id}/like", post(roadmaps::like))
        .route("/{id}/bookmark", post(roadmaps::bookmark))
        .route("/{id}/view", post(roadmaps::record_view))
        .route("/{id}/clone", post(roadmaps::clone_roadmap))
}
