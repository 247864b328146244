//! Prompt construction and parsing of generative-model output.
//!
//! The model is an untrusted source: its text is stripped of code fences,
//! parsed as JSON, deserialized into [`RoadmapContent`] (which rejects
//! unknown step types and a missing title or step list) and finally run
//! through [`validate_generated`].

use crate::error::CoreError;
use crate::roadmap::{validate_generated, Level, RoadmapContent};

/// Number of characters of unparseable model output kept for diagnosis.
pub const PREVIEW_CHARS: usize = 100;

/// Inputs describing the roadmap the user wants.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    pub topic: String,
    pub level: Level,
    pub skills: Option<String>,
    pub goal: Option<String>,
    pub duration: Option<String>,
    /// Daily time commitment, e.g. `"2"` (hours per day).
    pub pace: Option<String>,
}

impl GenerationParams {
    /// Reject requests without a usable topic.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.topic.trim().is_empty() {
            return Err(CoreError::Validation("Topic is required".into()));
        }
        Ok(())
    }
}

/// Errors raised while turning model text into roadmap content.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The cleaned text was not valid JSON.
    #[error("AI returned invalid JSON: {preview}")]
    InvalidJson { preview: String },

    /// The JSON did not describe a usable roadmap.
    #[error("AI returned an unusable roadmap: {0}")]
    InvalidShape(String),
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

/// Build the instruction sent to the model.
pub fn build_prompt(params: &GenerationParams) -> String {
    format!(
        r#"Create a highly detailed, industry-ready learning roadmap for: "{topic}".
Level: {level}
Current Skills: {skills}
Goal: {goal}
Target Duration: {duration}
Daily Commitment: {pace} hours/day

Task: Provide a structured, day-wise or week-wise plan that fits the duration.
For each step provide extremely specific resources and a "deep dive" explanation.

Return STRICTLY valid JSON: a single object, no markdown formatting, no commentary.
Structure:
{{
    "title": "Professional Roadmap Title",
    "description": "Comprehensive overview",
    "estimated_total_time": "e.g. 40 hours",
    "steps": [
        {{
            "step_number": 1,
            "title": "Step Title",
            "type": "Concept" | "Project" | "Milestone",
            "time_allocation": "e.g. Day 1-2 (4 hours)",
            "description": "High-level summary",
            "detailedNotes": "In-depth explanation of the concept, why it matters, and key terms.",
            "resources": [
                {{"label": "Official Docs / Tutorial", "url": "https://..."}}
            ],
            "outcomes": "Specific skill acquisition"
        }}
    ]
}}
The "type" field must be exactly one of "Concept", "Project" or "Milestone"."#,
        topic = params.topic.trim(),
        level = params.level,
        skills = or_default(&params.skills, "None"),
        goal = or_default(&params.goal, "Mastery"),
        duration = or_default(&params.duration, "Flexible"),
        pace = or_default(&params.pace, "Flexible"),
    )
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` marker and a trailing
/// ```` ``` ```` marker, plus surrounding whitespace.
///
/// Text without fences is returned trimmed and otherwise untouched, so the
/// function is idempotent.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        // Language tag such as `json`, if any.
        s = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// First [`PREVIEW_CHARS`] characters of `text`.
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// Parse raw model output into validated roadmap content.
///
/// The requested `level` is stamped onto the result and step numbers are
/// rewritten to match their position.
pub fn parse_roadmap(raw: &str, level: Level) -> Result<RoadmapContent, ParseError> {
    let cleaned = strip_code_fences(raw);

    let value: serde_json::Value =
        serde_json::from_str(cleaned).map_err(|_| ParseError::InvalidJson {
            preview: preview(cleaned),
        })?;

    if !value.is_object() {
        return Err(ParseError::InvalidShape(
            "expected a single JSON object".into(),
        ));
    }

    let mut content: RoadmapContent =
        serde_json::from_value(value).map_err(|e| ParseError::InvalidShape(e.to_string()))?;

    content.level = level;
    content.renumber_steps();

    validate_generated(&content).map_err(|e| match e {
        CoreError::Validation(msg) => ParseError::InvalidShape(msg),
        other => ParseError::InvalidShape(other.to_string()),
    })?;

    Ok(content)
}
