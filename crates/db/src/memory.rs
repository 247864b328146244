//! In-process implementation of both store traits.
//!
//! Each primitive runs under a single write lock, which gives the same
//! atomicity the PostgreSQL repositories get from single-statement updates.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;
use waypoint_core::types::{DocId, UserId};

use crate::error::StoreError;
use crate::models::roadmap::{sort_newest_first, MemberSet, NewRoadmap, Roadmap, RoadmapFilter};
use crate::models::user_key::UserKey;
use crate::store::{RoadmapStore, UserKeyStore};

/// Roadmaps and user keys held in memory.
#[derive(Default)]
pub struct MemoryStore {
    roadmaps: RwLock<HashMap<DocId, Roadmap>>,
    keys: RwLock<HashMap<UserId, UserKey>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn members_mut(roadmap: &mut Roadmap, set: MemberSet) -> &mut Vec<UserId> {
    match set {
        MemberSet::LikedBy => &mut roadmap.liked_by,
        MemberSet::SavedBy => &mut roadmap.saved_by,
    }
}

#[async_trait]
impl RoadmapStore for MemoryStore {
    async fn create(&self, new: NewRoadmap) -> Result<Roadmap, StoreError> {
        let roadmap = Roadmap {
            id: Uuid::new_v4().to_string(),
            author_id: new.author_id,
            content: new.content,
            is_public: false,
            views: 0,
            likes: 0,
            liked_by: Vec::new(),
            saved_by: new.saved_by,
            created_at: Some(new.created_at),
            original_id: new.original_id,
        };
        self.roadmaps
            .write()
            .await
            .insert(roadmap.id.clone(), roadmap.clone());
        Ok(roadmap)
    }

    async fn get(&self, id: &str) -> Result<Option<Roadmap>, StoreError> {
        Ok(self.roadmaps.read().await.get(id).cloned())
    }

    async fn set_public(&self, id: &str) -> Result<bool, StoreError> {
        let mut roadmaps = self.roadmaps.write().await;
        match roadmaps.get_mut(id) {
            Some(roadmap) => {
                roadmap.is_public = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increment_views(&self, id: &str, delta: i64) -> Result<bool, StoreError> {
        let mut roadmaps = self.roadmaps.write().await;
        match roadmaps.get_mut(id) {
            Some(roadmap) => {
                roadmap.views += delta;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_member(
        &self,
        id: &str,
        set: MemberSet,
        user_id: &str,
    ) -> Result<bool, StoreError> {
        let mut roadmaps = self.roadmaps.write().await;
        let Some(roadmap) = roadmaps.get_mut(id) else {
            return Ok(false);
        };
        if roadmap.is_member(set, user_id) {
            return Ok(false);
        }
        members_mut(roadmap, set).push(user_id.to_string());
        if set == MemberSet::LikedBy {
            roadmap.likes += 1;
        }
        Ok(true)
    }

    async fn remove_member(
        &self,
        id: &str,
        set: MemberSet,
        user_id: &str,
    ) -> Result<bool, StoreError> {
        let mut roadmaps = self.roadmaps.write().await;
        let Some(roadmap) = roadmaps.get_mut(id) else {
            return Ok(false);
        };
        if !roadmap.is_member(set, user_id) {
            return Ok(false);
        }
        members_mut(roadmap, set).retain(|u| u != user_id);
        if set == MemberSet::LikedBy {
            roadmap.likes -= 1;
        }
        Ok(true)
    }

    async fn toggle_member(
        &self,
        id: &str,
        set: MemberSet,
        user_id: &str,
    ) -> Result<Option<bool>, StoreError> {
        let mut roadmaps = self.roadmaps.write().await;
        let Some(roadmap) = roadmaps.get_mut(id) else {
            return Ok(None);
        };
        let member = !roadmap.is_member(set, user_id);
        let members = members_mut(roadmap, set);
        if member {
            members.push(user_id.to_string());
        } else {
            members.retain(|u| u != user_id);
        }
        if set == MemberSet::LikedBy {
            roadmap.likes += if member { 1 } else { -1 };
        }
        Ok(Some(member))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.roadmaps.write().await.remove(id).is_some())
    }

    async fn query(
        &self,
        filter: &RoadmapFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Roadmap>, StoreError> {
        let mut matched: Vec<Roadmap> = self
            .roadmaps
            .read()
            .await
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        sort_newest_first(&mut matched);
        if let Some(limit) = limit {
            matched.truncate(usize::try_from(limit).unwrap_or(0));
        }
        Ok(matched)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl UserKeyStore for MemoryStore {
    async fn get_key(&self, user_id: &str) -> Result<Option<UserKey>, StoreError> {
        Ok(self.keys.read().await.get(user_id).cloned())
    }

    async fn set_key(&self, user_id: &str, api_key: &str) -> Result<UserKey, StoreError> {
        let now = chrono::Utc::now();
        let mut keys = self.keys.write().await;
        let key = keys
            .entry(user_id.to_string())
            .and_modify(|existing| {
                existing.api_key = api_key.to_string();
                existing.updated_at = now;
            })
            .or_insert_with(|| UserKey {
                user_id: user_id.to_string(),
                api_key: api_key.to_string(),
                created_at: now,
                updated_at: now,
            });
        Ok(key.clone())
    }

    async fn clear_key(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.keys.write().await.remove(user_id).is_some())
    }
}
