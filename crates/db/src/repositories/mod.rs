//! Repository layer.
//!
//! Each repository wraps a `PgPool` and implements one of the
//! [`crate::store`] traits.

pub mod roadmap_repo;
pub mod user_key_repo;

pub use roadmap_repo::RoadmapRepo;
pub use user_key_repo::UserKeyRepo;
