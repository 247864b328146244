/// Errors surfaced by any [`crate::store`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored document could not be mapped back into the domain model.
    #[error("Corrupt document {id}: {reason}")]
    Corrupt { id: String, reason: String },
}
