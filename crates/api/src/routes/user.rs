//! Route definitions for per-user settings.

use axum::routing::get;
use axum::Router;

use crate::handlers::user_key;
use crate::state::AppState;

/// User routes mounted at `/user`.
///
/// ```text
/// GET    /key -> get_key
/// POST   /key -> set_key
/// DELETE /key -> clear_key
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/key",
        get(user_key::get_key)
            .post(user_key::set_key)
            .delete(user_key::clear_key),
    )
}
