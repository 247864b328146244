use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use waypoint_core::error::CoreError;
use waypoint_db::StoreError;
use waypoint_llm::GenerateError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, store and generation errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{"error": ..., "code": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `waypoint_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage backend error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A failure while generating roadmap content.
    #[error(transparent)]
    Generation(#[from] GenerateError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The client exceeded the request rate; retry after the given delay.
    #[error("Too many requests")]
    RateLimited { retry_after_secs: u64 },
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Log a failed store call on a roadmap. Use with `inspect_err` before `?`.
pub(crate) fn roadmap_store_failed<'a>(
    operation: &'static str,
    roadmap_id: &'a str,
) -> impl FnOnce(&StoreError) + 'a {
    move |err| tracing::error!(operation, roadmap_id, error = %err, "Store operation failed")
}

/// Log a failed store call made on behalf of a user.
pub(crate) fn user_store_failed<'a>(
    operation: &'static str,
    user_id: &'a str,
) -> impl FnOnce(&StoreError) + 'a {
    move |err| tracing::error!(operation, user_id, error = %err, "Store operation failed")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            },

            // --- Store errors ---
            AppError::Store(err) => {
                // Call sites log the operation and id.
                tracing::debug!(error = %err, "Store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }

            // --- Generation errors ---
            AppError::Generation(err) => match err {
                GenerateError::Parse(parse) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_FAILED",
                    parse.to_string(),
                ),
                GenerateError::ModelUnavailable { .. } | GenerateError::MissingApiKey => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MODEL_UNAVAILABLE",
                    err.to_string(),
                ),
                GenerateError::Request(_)
                | GenerateError::Upstream { .. }
                | GenerateError::EmptyResponse => {
                    tracing::error!(error = %err, "Generation backend error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "GENERATION_FAILED",
                        "Failed to generate roadmap".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Too many requests, please try again later.".to_string(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        let mut response = (status, axum::Json(body)).into_response();
        if let AppError::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}
