//! Storage seams consumed by the service layer.
//!
//! Membership and counter mutations are first-class atomic primitives:
//! callers never read-modify-write `likes`, `liked_by` or `saved_by`.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::roadmap::{MemberSet, NewRoadmap, Roadmap, RoadmapFilter};
use crate::models::user_key::UserKey;

/// CRUD and query operations over roadmap documents.
#[async_trait]
pub trait RoadmapStore: Send + Sync {
    /// Insert a new document, assigning its id.
    async fn create(&self, new: NewRoadmap) -> Result<Roadmap, StoreError>;

    /// Fetch a document by id.
    async fn get(&self, id: &str) -> Result<Option<Roadmap>, StoreError>;

    /// Set `is_public = true`. Returns `false` if the id does not exist.
    async fn set_public(&self, id: &str) -> Result<bool, StoreError>;

    /// Atomically add `delta` to `views`. Returns `false` if the id does not exist.
    async fn increment_views(&self, id: &str, delta: i64) -> Result<bool, StoreError>;

    /// Atomically add `user_id` to `set` if absent.
    ///
    /// For [`MemberSet::LikedBy`] the `likes` counter is incremented in the
    /// same operation, and only when the user was actually added. Returns
    /// whether the document changed.
    async fn add_member(
        &self,
        id: &str,
        set: MemberSet,
        user_id: &str,
    ) -> Result<bool, StoreError>;

    /// Atomically remove `user_id` from `set` if present, decrementing
    /// `likes` alongside [`MemberSet::LikedBy`]. Returns whether the document
    /// changed.
    async fn remove_member(
        &self,
        id: &str,
        set: MemberSet,
        user_id: &str,
    ) -> Result<bool, StoreError>;

    /// Atomically flip `user_id`'s membership in `set`, adjusting `likes`
    /// alongside [`MemberSet::LikedBy`].
    ///
    /// The direction is decided from the stored state inside the same
    /// operation, so two concurrent toggles by one user always cancel out.
    /// Returns the resulting membership, or `None` if the id does not exist.
    async fn toggle_member(
        &self,
        id: &str,
        set: MemberSet,
        user_id: &str,
    ) -> Result<Option<bool>, StoreError>;

    /// Hard-delete a document. Returns `false` if the id does not exist.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// All documents matching `filter`, newest first, at most `limit`.
    async fn query(
        &self,
        filter: &RoadmapFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Roadmap>, StoreError>;

    /// Confirm the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Per-user generative-model API key overrides.
#[async_trait]
pub trait UserKeyStore: Send + Sync {
    async fn get_key(&self, user_id: &str) -> Result<Option<UserKey>, StoreError>;

    /// Insert or replace the user's key.
    async fn set_key(&self, user_id: &str, api_key: &str) -> Result<UserKey, StoreError>;

    /// Remove the user's key. Returns `false` if none was stored.
    async fn clear_key(&self, user_id: &str) -> Result<bool, StoreError>;
}
