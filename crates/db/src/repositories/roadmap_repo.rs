//! PostgreSQL implementation of [`RoadmapStore`] over the `roadmaps` table.
//!
//! Every social mutation is a single guarded `UPDATE`, so concurrent
//! toggles serialize on the row lock and `likes` can never drift from
//! `cardinality(liked_by)`.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use waypoint_core::roadmap::{Level, RoadmapContent, Step};
use waypoint_core::types::Timestamp;

use crate::error::StoreError;
use crate::models::roadmap::{MemberSet, NewRoadmap, Roadmap, RoadmapFilter};
use crate::store::RoadmapStore;

/// Column list for `roadmaps` queries.
const COLUMNS: &str = "\
    id, author_id, title, description, estimated_total_time, level, steps, \
    topic, known_skills, goal, is_public, views, likes, liked_by, saved_by, \
    created_at, original_id";

/// A raw row from the `roadmaps` table.
#[derive(Debug, FromRow)]
struct RoadmapRow {
    id: String,
    author_id: String,
    title: String,
    description: String,
    estimated_total_time: String,
    level: String,
    steps: Json<Vec<Step>>,
    topic: Option<String>,
    known_skills: Option<String>,
    goal: Option<String>,
    is_public: bool,
    views: i64,
    likes: i64,
    liked_by: Vec<String>,
    saved_by: Vec<String>,
    created_at: Option<Timestamp>,
    original_id: Option<String>,
}

impl TryFrom<RoadmapRow> for Roadmap {
    type Error = StoreError;

    fn try_from(row: RoadmapRow) -> Result<Self, Self::Error> {
        let level: Level = row.level.parse().map_err(|_| StoreError::Corrupt {
            id: row.id.clone(),
            reason: format!("unknown level '{}'", row.level),
        })?;

        Ok(Roadmap {
            id: row.id,
            author_id: row.author_id,
            content: RoadmapContent {
                title: row.title,
                description: row.description,
                estimated_total_time: row.estimated_total_time,
                level,
                steps: row.steps.0,
                topic: row.topic,
                known_skills: row.known_skills,
                goal: row.goal,
            },
            is_public: row.is_public,
            views: row.views,
            likes: row.likes,
            liked_by: row.liked_by,
            saved_by: row.saved_by,
            created_at: row.created_at,
            original_id: row.original_id,
        })
    }
}

fn add_member_sql(set: MemberSet) -> &'static str {
    match set {
        MemberSet::LikedBy => {
            "UPDATE roadmaps SET liked_by = array_append(liked_by, $2), likes = likes + 1 \
             WHERE id = $1 AND NOT ($2 = ANY(liked_by))"
        }
        MemberSet::SavedBy => {
            "UPDATE roadmaps SET saved_by = array_append(saved_by, $2) \
             WHERE id = $1 AND NOT ($2 = ANY(saved_by))"
        }
    }
}

fn remove_member_sql(set: MemberSet) -> &'static str {
    match set {
        MemberSet::LikedBy => {
            "UPDATE roadmaps SET liked_by = array_remove(liked_by, $2), likes = likes - 1 \
             WHERE id = $1 AND $2 = ANY(liked_by)"
        }
        MemberSet::SavedBy => {
            "UPDATE roadmaps SET saved_by = array_remove(saved_by, $2) \
             WHERE id = $1 AND $2 = ANY(saved_by)"
        }
    }
}

/// Flip membership in one statement. Every `SET` expression reads the row
/// as it was before the update, and a concurrent toggle re-evaluates against
/// the row this one committed.
fn toggle_member_sql(set: MemberSet) -> &'static str {
    match set {
        MemberSet::LikedBy => {
            "UPDATE roadmaps SET \
                 liked_by = CASE WHEN $2 = ANY(liked_by) \
                     THEN array_remove(liked_by, $2) ELSE array_append(liked_by, $2) END, \
                 likes = likes + CASE WHEN $2 = ANY(liked_by) THEN -1 ELSE 1 END \
             WHERE id = $1 \
             RETURNING $2 = ANY(liked_by)"
        }
        MemberSet::SavedBy => {
            "UPDATE roadmaps SET \
                 saved_by = CASE WHEN $2 = ANY(saved_by) \
                     THEN array_remove(saved_by, $2) ELSE array_append(saved_by, $2) END \
             WHERE id = $1 \
             RETURNING $2 = ANY(saved_by)"
        }
    }
}

fn filter_clause(filter: &RoadmapFilter) -> &'static str {
    match filter {
        RoadmapFilter::AuthorId(_) => "author_id = $1",
        RoadmapFilter::IsPublic(_) => "is_public = $1",
        RoadmapFilter::LikedBy(_) => "$1 = ANY(liked_by)",
        RoadmapFilter::SavedBy(_) => "$1 = ANY(saved_by)",
    }
}

/// Provides data access for roadmaps.
#[derive(Clone)]
pub struct RoadmapRepo {
    pool: PgPool,
}

impl RoadmapRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoadmapStore for RoadmapRepo {
    async fn create(&self, new: NewRoadmap) -> Result<Roadmap, StoreError> {
        let query = format!(
            "INSERT INTO roadmaps \
                 (id, author_id, title, description, estimated_total_time, level, steps, \
                  topic, known_skills, goal, saved_by, created_at, original_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        );
        let content = &new.content;
        let row = sqlx::query_as::<_, RoadmapRow>(&query)
            .bind(Uuid::new_v4().to_string())
            .bind(&new.author_id)
            .bind(&content.title)
            .bind(&content.description)
            .bind(&content.estimated_total_time)
            .bind(content.level.as_str())
            .bind(Json(&content.steps))
            .bind(&content.topic)
            .bind(&content.known_skills)
            .bind(&content.goal)
            .bind(&new.saved_by)
            .bind(new.created_at)
            .bind(&new.original_id)
            .fetch_one(&self.pool)
            .await?;
        row.try_into()
    }

    async fn get(&self, id: &str) -> Result<Option<Roadmap>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM roadmaps WHERE id = $1");
        let row = sqlx::query_as::<_, RoadmapRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Roadmap::try_from).transpose()
    }

    async fn set_public(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE roadmaps SET is_public = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_views(&self, id: &str, delta: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE roadmaps SET views = views + $2 WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_member(
        &self,
        id: &str,
        set: MemberSet,
        user_id: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(add_member_sql(set))
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_member(
        &self,
        id: &str,
        set: MemberSet,
        user_id: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(remove_member_sql(set))
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn toggle_member(
        &self,
        id: &str,
        set: MemberSet,
        user_id: &str,
    ) -> Result<Option<bool>, StoreError> {
        let member = sqlx::query_scalar::<_, bool>(toggle_member_sql(set))
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(member)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM roadmaps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn query(
        &self,
        filter: &RoadmapFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Roadmap>, StoreError> {
        // `LIMIT NULL` means no limit in PostgreSQL.
        let query = format!(
            "SELECT {COLUMNS} FROM roadmaps WHERE {} \
             ORDER BY created_at DESC NULLS LAST LIMIT $2",
            filter_clause(filter)
        );
        let q = sqlx::query_as::<_, RoadmapRow>(&query);
        let q = match filter {
            RoadmapFilter::AuthorId(user)
            | RoadmapFilter::LikedBy(user)
            | RoadmapFilter::SavedBy(user) => q.bind(user.as_str()),
            RoadmapFilter::IsPublic(flag) => q.bind(*flag),
        };
        let rows = q.bind(limit).fetch_all(&self.pool).await?;
        rows.into_iter().map(Roadmap::try_from).collect()
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
