//! Social state machine over stored roadmaps.
//!
//! Membership in `liked_by` / `saved_by` is the source of truth for toggles.
//! A toggle is one store primitive that both decides the direction and
//! applies it, so concurrent toggles by the same user cancel out and `likes`
//! never leaves step with `liked_by`.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use waypoint_core::error::CoreError;
use waypoint_core::roadmap::{validate_for_save, RoadmapContent};
use waypoint_db::models::roadmap::{MemberSet, NewRoadmap, Roadmap};
use waypoint_db::RoadmapStore;

use crate::error::{roadmap_store_failed, user_store_failed, AppResult};
use crate::feed::FeedCache;

/// Result of a publish request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    AlreadyPublic,
}

pub struct SocialService {
    store: Arc<dyn RoadmapStore>,
    feed: Arc<FeedCache>,
}

impl SocialService {
    pub fn new(store: Arc<dyn RoadmapStore>, feed: Arc<FeedCache>) -> Self {
        Self { store, feed }
    }

    async fn require(&self, id: &str) -> AppResult<Roadmap> {
        let roadmap = self
            .store
            .get(id)
            .await
            .inspect_err(roadmap_store_failed("get", id))?;
        Ok(roadmap.ok_or_else(|| CoreError::roadmap_not_found(id))?)
    }

    /// Persist generated content as a new private roadmap owned by `author_id`.
    ///
    /// The author is bookmarked automatically.
    pub async fn save(&self, mut content: RoadmapContent, author_id: &str) -> AppResult<Roadmap> {
        validate_for_save(&content)?;
        content.renumber_steps();

        let roadmap = self
            .store
            .create(NewRoadmap {
                author_id: author_id.to_string(),
                content,
                saved_by: vec![author_id.to_string()],
                created_at: Utc::now(),
                original_id: None,
            })
            .await
            .inspect_err(user_store_failed("create", author_id))?;

        tracing::info!(roadmap_id = %roadmap.id, user_id = %author_id, "Roadmap saved");
        Ok(roadmap)
    }

    /// Copy another roadmap's content into a new private roadmap owned by
    /// `requester`, with fresh social state.
    pub async fn clone_roadmap(&self, id: &str, requester: &str) -> AppResult<Roadmap> {
        let source = self.require(id).await?;

        let roadmap = self
            .store
            .create(NewRoadmap {
                author_id: requester.to_string(),
                content: source.content,
                saved_by: vec![requester.to_string()],
                created_at: Utc::now(),
                original_id: Some(source.id),
            })
            .await
            .inspect_err(roadmap_store_failed("clone", id))?;

        tracing::info!(
            roadmap_id = %roadmap.id,
            original_id = %id,
            user_id = %requester,
            "Roadmap cloned",
        );
        Ok(roadmap)
    }

    /// Flip `user_id`'s like. Returns whether the user now likes the roadmap.
    pub async fn toggle_like(&self, id: &str, user_id: &str) -> AppResult<bool> {
        self.toggle(id, MemberSet::LikedBy, user_id).await
    }

    /// Flip `user_id`'s bookmark. Returns whether the roadmap is now saved.
    pub async fn toggle_bookmark(&self, id: &str, user_id: &str) -> AppResult<bool> {
        self.toggle(id, MemberSet::SavedBy, user_id).await
    }

    async fn toggle(&self, id: &str, set: MemberSet, user_id: &str) -> AppResult<bool> {
        let member = self
            .store
            .toggle_member(id, set, user_id)
            .await
            .inspect_err(roadmap_store_failed("toggle_member", id))?
            .ok_or_else(|| CoreError::roadmap_not_found(id))?;

        tracing::info!(roadmap_id = %id, user_id = %user_id, ?set, member, "Membership toggled");
        Ok(member)
    }

    /// Make a roadmap public. Only its author may do this; re-publishing is
    /// a no-op.
    pub async fn publish(&self, id: &str, requester: &str) -> AppResult<PublishOutcome> {
        let roadmap = self.require(id).await?;
        if !roadmap.is_authored_by(requester) {
            return Err(CoreError::Forbidden("Only the author can publish this roadmap".into()).into());
        }
        if roadmap.is_public {
            return Ok(PublishOutcome::AlreadyPublic);
        }

        let updated = self
            .store
            .set_public(id)
            .await
            .inspect_err(roadmap_store_failed("set_public", id))?;
        if !updated {
            return Err(CoreError::roadmap_not_found(id).into());
        }
        self.feed.invalidate().await;

        tracing::info!(roadmap_id = %id, user_id = %requester, "Roadmap published");
        Ok(PublishOutcome::Published)
    }

    /// Hard-delete a roadmap. Only its author may do this.
    pub async fn delete(&self, id: &str, requester: &str) -> AppResult<()> {
        let roadmap = self.require(id).await?;
        if !roadmap.is_authored_by(requester) {
            return Err(CoreError::Forbidden("Unauthorized to delete this roadmap".into()).into());
        }

        self.store
            .delete(id)
            .await
            .inspect_err(roadmap_store_failed("delete", id))?;
        if roadmap.is_public {
            self.feed.invalidate().await;
        }

        tracing::info!(roadmap_id = %id, user_id = %requester, "Roadmap deleted");
        Ok(())
    }

    /// Count a view in the background. Failures are logged, never surfaced.
    pub fn record_view(&self, id: &str) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let id = id.to_string();
        tokio::spawn(async move {
            match store.increment_views(&id, 1).await {
                Ok(true) => tracing::debug!(roadmap_id = %id, "View recorded"),
                Ok(false) => tracing::warn!(roadmap_id = %id, "View for unknown roadmap ignored"),
                Err(e) => tracing::error!(roadmap_id = %id, error = %e, "Failed to record view"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use waypoint_core::roadmap::{Level, Step, StepType};
    use waypoint_db::models::roadmap::RoadmapFilter;
    use waypoint_db::{MemoryStore, StoreError};

    use super::*;
    use crate::error::AppError;

    fn content() -> RoadmapContent {
        RoadmapContent {
            title: "Rust".into(),
            description: "Learn Rust".into(),
            estimated_total_time: "10 hours".into(),
            level: Level::Beginner,
            steps: vec![Step {
                step_number: 4,
                title: "Ownership".into(),
                step_type: StepType::Concept,
                time_allocation: String::new(),
                description: String::new(),
                detailed_notes: String::new(),
                resources: vec![],
                outcomes: String::new(),
            }],
            topic: None,
            known_skills: None,
            goal: None,
        }
    }

    fn service() -> (Arc<MemoryStore>, Arc<SocialService>) {
        let store = Arc::new(MemoryStore::new());
        let feed = Arc::new(FeedCache::new(store.clone(), Duration::from_secs(300), 100));
        (store.clone(), Arc::new(SocialService::new(store, feed)))
    }

    #[tokio::test]
    async fn save_zeroes_counters_and_bookmarks_author() {
        let (_, social) = service();
        let roadmap = social.save(content(), "u1").await.unwrap();

        assert_eq!(roadmap.author_id, "u1");
        assert_eq!(roadmap.saved_by, vec!["u1".to_string()]);
        assert_eq!(roadmap.likes, 0);
        assert!(!roadmap.is_public);
        assert!(roadmap.created_at.is_some());
        assert_eq!(roadmap.content.steps[0].step_number, 1);
    }

    #[tokio::test]
    async fn save_rejects_empty_steps() {
        let (_, social) = service();
        let mut invalid = content();
        invalid.steps.clear();

        let err = social.save(invalid, "u1").await.unwrap_err();
        assert_matches!(err, AppError::Core(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn like_toggles_and_keeps_count() {
        let (store, social) = service();
        let id = social.save(content(), "u1").await.unwrap().id;

        assert!(social.toggle_like(&id, "u2").await.unwrap());
        assert!(!social.toggle_like(&id, "u2").await.unwrap());
        assert!(social.toggle_like(&id, "u1").await.unwrap());

        let roadmap = store.get(&id).await.unwrap().unwrap();
        assert_eq!(roadmap.likes, 1);
        assert_eq!(roadmap.liked_by, vec!["u1".to_string()]);
    }

    #[tokio::test]
    async fn concurrent_like_storm_keeps_count_in_sync() {
        let (store, social) = service();
        let id = social.save(content(), "u1").await.unwrap().id;

        let tasks = (0..40).map(|i| {
            let social = Arc::clone(&social);
            let id = id.clone();
            tokio::spawn(async move { social.toggle_like(&id, &format!("user-{}", i % 8)).await })
        });
        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }

        let roadmap = store.get(&id).await.unwrap().unwrap();
        assert_eq!(roadmap.likes, roadmap.liked_by.len() as i64);
    }

    /// Yields to the scheduler before every call so concurrent requests
    /// interleave the way they do over a network round-trip.
    struct YieldingStore(MemoryStore);

    #[async_trait]
    impl RoadmapStore for YieldingStore {
        async fn create(&self, new: NewRoadmap) -> Result<Roadmap, StoreError> {
            tokio::task::yield_now().await;
            self.0.create(new).await
        }
        async fn get(&self, id: &str) -> Result<Option<Roadmap>, StoreError> {
            tokio::task::yield_now().await;
            self.0.get(id).await
        }
        async fn set_public(&self, id: &str) -> Result<bool, StoreError> {
            tokio::task::yield_now().await;
            self.0.set_public(id).await
        }
        async fn increment_views(&self, id: &str, delta: i64) -> Result<bool, StoreError> {
            tokio::task::yield_now().await;
            self.0.increment_views(id, delta).await
        }
        async fn add_member(&self, id: &str, set: MemberSet, user: &str) -> Result<bool, StoreError> {
            tokio::task::yield_now().await;
            self.0.add_member(id, set, user).await
        }
        async fn remove_member(
            &self,
            id: &str,
            set: MemberSet,
            user: &str,
        ) -> Result<bool, StoreError> {
            tokio::task::yield_now().await;
            self.0.remove_member(id, set, user).await
        }
        async fn toggle_member(
            &self,
            id: &str,
            set: MemberSet,
            user: &str,
        ) -> Result<Option<bool>, StoreError> {
            tokio::task::yield_now().await;
            self.0.toggle_member(id, set, user).await
        }
        async fn delete(&self, id: &str) -> Result<bool, StoreError> {
            tokio::task::yield_now().await;
            self.0.delete(id).await
        }
        async fn query(
            &self,
            filter: &RoadmapFilter,
            limit: Option<i64>,
        ) -> Result<Vec<Roadmap>, StoreError> {
            tokio::task::yield_now().await;
            self.0.query(filter, limit).await
        }
        async fn health_check(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn simultaneous_double_like_by_one_user_nets_out() {
        let store = Arc::new(YieldingStore(MemoryStore::new()));
        let feed = Arc::new(FeedCache::new(store.clone(), Duration::from_secs(300), 100));
        let social = SocialService::new(store.clone(), feed);
        let id = social.save(content(), "u1").await.unwrap().id;

        let (first, second) = tokio::join!(
            social.toggle_like(&id, "u2"),
            social.toggle_like(&id, "u2"),
        );
        let mut results = [first.unwrap(), second.unwrap()];
        results.sort();

        assert_eq!(results, [false, true]);
        let roadmap = store.get(&id).await.unwrap().unwrap();
        assert!(roadmap.liked_by.is_empty());
        assert_eq!(roadmap.likes, 0);
    }

    #[tokio::test]
    async fn simultaneous_double_bookmark_by_one_user_nets_out() {
        let store = Arc::new(YieldingStore(MemoryStore::new()));
        let feed = Arc::new(FeedCache::new(store.clone(), Duration::from_secs(300), 100));
        let social = SocialService::new(store.clone(), feed);
        let id = social.save(content(), "u1").await.unwrap().id;

        let (first, second) = tokio::join!(
            social.toggle_bookmark(&id, "u2"),
            social.toggle_bookmark(&id, "u2"),
        );
        assert_ne!(first.unwrap(), second.unwrap());
        assert!(!store.get(&id).await.unwrap().unwrap().is_saved_by("u2"));
    }

    #[tokio::test]
    async fn bookmark_and_like_are_independent() {
        let (store, social) = service();
        let id = social.save(content(), "u1").await.unwrap().id;

        assert!(social.toggle_bookmark(&id, "u2").await.unwrap());
        let roadmap = store.get(&id).await.unwrap().unwrap();
        assert_eq!(roadmap.likes, 0);
        assert!(!roadmap.is_liked_by("u2"));

        // The author starts bookmarked, so the first toggle removes it.
        assert!(!social.toggle_bookmark(&id, "u1").await.unwrap());
    }

    #[tokio::test]
    async fn toggle_on_missing_roadmap_is_not_found() {
        let (_, social) = service();
        assert_matches!(
            social.toggle_like("missing", "u1").await,
            Err(AppError::Core(CoreError::NotFound { .. }))
        );
    }

    #[tokio::test]
    async fn publish_is_author_only_and_idempotent() {
        let (store, social) = service();
        let id = social.save(content(), "u1").await.unwrap().id;

        assert_matches!(
            social.publish(&id, "u2").await,
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
        assert!(!store.get(&id).await.unwrap().unwrap().is_public);

        assert_eq!(social.publish(&id, "u1").await.unwrap(), PublishOutcome::Published);
        assert_eq!(social.publish(&id, "u1").await.unwrap(), PublishOutcome::AlreadyPublic);
        assert!(store.get(&id).await.unwrap().unwrap().is_public);
    }

    #[tokio::test]
    async fn delete_is_author_only() {
        let (store, social) = service();
        let id = social.save(content(), "u1").await.unwrap().id;

        assert_matches!(
            social.delete(&id, "u2").await,
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
        assert!(store.get(&id).await.unwrap().is_some());

        social.delete(&id, "u1").await.unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clone_resets_social_state() {
        let (_, social) = service();
        let source = social.save(content(), "u1").await.unwrap();
        social.toggle_like(&source.id, "u3").await.unwrap();
        social.publish(&source.id, "u1").await.unwrap();

        let copy = social.clone_roadmap(&source.id, "u2").await.unwrap();

        assert_ne!(copy.id, source.id);
        assert_eq!(copy.author_id, "u2");
        assert_eq!(copy.original_id.as_deref(), Some(source.id.as_str()));
        assert_eq!(copy.content, source.content);
        assert_eq!(copy.likes, 0);
        assert!(copy.liked_by.is_empty());
        assert_eq!(copy.saved_by, vec!["u2".to_string()]);
        assert!(!copy.is_public);
    }

    #[tokio::test]
    async fn record_view_increments_in_background() {
        let (store, social) = service();
        let id = social.save(content(), "u1").await.unwrap().id;

        social.record_view(&id).await.unwrap();
        social.record_view(&id).await.unwrap();
        social.record_view("missing").await.unwrap();

        assert_eq!(store.get(&id).await.unwrap().unwrap().views, 2);
    }
}
