use std::sync::Arc;

use waypoint_core::generation::{build_prompt, parse_roadmap, GenerationParams};
use waypoint_core::roadmap::RoadmapContent;

use crate::error::GenerateError;
use crate::model::TextModel;

/// Produces validated roadmap content from generation parameters.
///
/// Has no persistence side effects and never retries: a bad model answer is
/// reported to the caller as [`GenerateError::Parse`].
pub struct RoadmapGenerator {
    model: Arc<dyn TextModel>,
    default_key: Option<String>,
}

impl RoadmapGenerator {
    /// `default_key` is used whenever a call does not supply its own key.
    pub fn new(model: Arc<dyn TextModel>, default_key: Option<String>) -> Self {
        Self {
            model,
            default_key: default_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Generate a roadmap. `api_key` replaces the default key for this call only.
    pub async fn generate(
        &self,
        params: &GenerationParams,
        api_key: Option<&str>,
    ) -> Result<RoadmapContent, GenerateError> {
        let key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or(self.default_key.as_deref())
            .ok_or(GenerateError::MissingApiKey)?;

        let prompt = build_prompt(params);
        let raw = self.model.complete(&prompt, key).await?;
        tracing::debug!(model = self.model_name(), raw = %raw, "Model raw response");

        let content = parse_roadmap(&raw, params.level).inspect_err(|e| {
            tracing::warn!(model = self.model_name(), error = %e, "Discarding model output");
        })?;

        tracing::info!(
            topic = %params.topic,
            level = %params.level,
            steps = content.steps.len(),
            "Roadmap generated",
        );
        Ok(content)
    }
}
