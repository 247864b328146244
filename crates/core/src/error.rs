/// Domain failures shared by every crate that touches roadmaps.
///
/// The HTTP layer maps each variant to a status code; the messages here are
/// what clients see for the non-`NotFound` variants.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Input that can never succeed as sent (missing topic, empty steps).
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not the author.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl CoreError {
    pub fn roadmap_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Roadmap",
            id: id.into(),
        }
    }
}
