//! Handlers for roadmap generation and saving.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use waypoint_core::error::CoreError;
use waypoint_core::generation::GenerationParams;
use waypoint_core::roadmap::{Level, RoadmapContent};
use waypoint_db::models::roadmap::Roadmap;

use crate::error::{user_store_failed, AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::state::AppState;

/// Daily commitment as sent by clients: either `2` or `"2"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HoursPerDay {
    Number(serde_json::Number),
    Text(String),
}

impl HoursPerDay {
    fn into_text(self) -> String {
        match self {
            HoursPerDay::Number(n) => n.to_string(),
            HoursPerDay::Text(s) => s,
        }
    }
}

/// Body of `POST /api/generate`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub hours_per_day: Option<HoursPerDay>,
    /// Overrides every other key source for this call.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl GenerateRequest {
    fn params(&mut self) -> AppResult<GenerationParams> {
        let level = match self.level.as_deref().map(str::trim) {
            Some(level) if !level.is_empty() => level.parse::<Level>()?,
            _ => Level::default(),
        };
        let params = GenerationParams {
            topic: self.topic.take().unwrap_or_default(),
            level,
            skills: self.skills.take(),
            goal: self.goal.take(),
            duration: self.duration.take(),
            pace: self.hours_per_day.take().map(HoursPerDay::into_text),
        };
        params.validate()?;
        Ok(params)
    }
}

/// POST /api/generate
///
/// Generate roadmap content without persisting it. The API key is taken
/// from the body, then from the caller's stored key, then from the server
/// default.
pub async fn generate(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(mut input): Json<GenerateRequest>,
) -> AppResult<Json<RoadmapContent>> {
    let params = input.params()?;

    let mut api_key = input.api_key.take().filter(|k| !k.trim().is_empty());
    if api_key.is_none() {
        if let Some(user) = &user {
            api_key = state
                .keys
                .get_key(&user.user_id)
                .await
                .inspect_err(user_store_failed("get_key", &user.user_id))?
                .map(|stored| stored.api_key);
        }
    }

    let mut content = state
        .generator
        .generate(&params, api_key.as_deref())
        .await?;

    content.topic = Some(params.topic.trim().to_string());
    content.known_skills = params.skills;
    content.goal = params.goal;

    Ok(Json(content))
}

/// Body of `POST /api/save`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    #[serde(default)]
    pub roadmap: Option<serde_json::Value>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// POST /api/save
///
/// Persist generated content as a new private roadmap owned by `userId`.
/// When a bearer token is presented its subject must match `userId`.
pub async fn save(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(input): Json<SaveRequest>,
) -> AppResult<Json<Roadmap>> {
    let (Some(roadmap), Some(user_id)) = (input.roadmap, input.user_id.filter(|u| !u.is_empty()))
    else {
        return Err(AppError::BadRequest(
            "Missing roadmap data or user ID".into(),
        ));
    };

    if let Some(user) = user {
        if user.user_id != user_id {
            return Err(CoreError::Forbidden(
                "userId does not match the authenticated user".into(),
            )
            .into());
        }
    }

    let content: RoadmapContent = serde_json::from_value(roadmap)
        .map_err(|e| CoreError::Validation(format!("Invalid roadmap: {e}")))?;

    let roadmap = state.social.save(content, &user_id).await?;
    Ok(Json(roadmap))
}
