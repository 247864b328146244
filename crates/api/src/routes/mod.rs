pub mod health;
pub mod roadmaps;
pub mod user;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{generate, lists};
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate                     generate content (optional auth)
/// /save                         persist content (optional auth)
///
/// /public                       cached public feed
/// /mine                         caller's roadmaps (requires auth)
/// /liked                        roadmaps the caller liked (requires auth)
/// /saved                        roadmaps the caller bookmarked (requires auth)
///
/// /roadmaps/{id}                get, delete
/// /roadmaps/{id}/publish        publish (POST, author only)
/// /roadmaps/{id}/like           toggle like (POST)
/// /roadmaps/{id}/bookmark       toggle bookmark (POST)
/// /roadmaps/{id}/view           count a view (POST, public)
/// /roadmaps/{id}/clone          copy into caller's roadmaps (POST)
///
/// /user/key                     get, set, clear the caller's API key
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate::generate))
        .route("/save", post(generate::save))
        .route("/public", get(lists::public_feed))
        .route("/mine", get(lists::mine))
        .route("/liked", get(lists::liked))
        .route("/saved", get(lists::saved))
        .nest("/roadmaps", roadmaps::router())
        .nest("/user", user::router())
}
