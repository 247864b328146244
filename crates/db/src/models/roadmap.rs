//! Persisted roadmap documents and the DTOs used to create and query them.

use serde::{Deserialize, Serialize};
use waypoint_core::roadmap::RoadmapContent;
use waypoint_core::types::{DocId, Timestamp, UserId};

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A stored roadmap: generated content plus ownership and social metadata.
///
/// Serialized flat, so clients see `title`, `steps`, `likes`, `likedBy`, ...
/// side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub id: DocId,
    pub author_id: UserId,
    #[serde(flatten)]
    pub content: RoadmapContent,
    pub is_public: bool,
    pub views: i64,
    /// Always equal to `liked_by.len()`.
    pub likes: i64,
    pub liked_by: Vec<UserId>,
    pub saved_by: Vec<UserId>,
    /// `None` only for documents written before timestamps were recorded.
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<DocId>,
}

impl Roadmap {
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.author_id == user_id
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by.iter().any(|u| u == user_id)
    }

    pub fn is_saved_by(&self, user_id: &str) -> bool {
        self.saved_by.iter().any(|u| u == user_id)
    }

    pub fn is_member(&self, set: MemberSet, user_id: &str) -> bool {
        match set {
            MemberSet::LikedBy => self.is_liked_by(user_id),
            MemberSet::SavedBy => self.is_saved_by(user_id),
        }
    }
}

/// Sort newest first by `created_at`; documents without a timestamp go last.
pub fn sort_newest_first(roadmaps: &mut [Roadmap]) {
    // `None < Some(_)`, so a descending sort leaves missing timestamps at the end.
    roadmaps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Everything the store needs to create a roadmap. Counters start at zero,
/// `liked_by` empty and `is_public` false.
#[derive(Debug, Clone)]
pub struct NewRoadmap {
    pub author_id: UserId,
    pub content: RoadmapContent,
    pub saved_by: Vec<UserId>,
    pub created_at: Timestamp,
    pub original_id: Option<DocId>,
}

/// Per-user membership sets on a roadmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberSet {
    /// Users who liked the roadmap. Paired with the `likes` counter.
    LikedBy,
    /// Users who bookmarked the roadmap.
    SavedBy,
}

/// Field filters supported by [`crate::store::RoadmapStore::query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoadmapFilter {
    /// `author_id == value`
    AuthorId(UserId),
    /// `is_public == value`
    IsPublic(bool),
    /// `liked_by` contains value
    LikedBy(UserId),
    /// `saved_by` contains value
    SavedBy(UserId),
}

impl RoadmapFilter {
    pub fn matches(&self, roadmap: &Roadmap) -> bool {
        match self {
            RoadmapFilter::AuthorId(user) => roadmap.author_id == *user,
            RoadmapFilter::IsPublic(flag) => roadmap.is_public == *flag,
            RoadmapFilter::LikedBy(user) => roadmap.is_liked_by(user),
            RoadmapFilter::SavedBy(user) => roadmap.is_saved_by(user),
        }
    }
}
