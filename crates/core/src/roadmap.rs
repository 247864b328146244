//! Roadmap content types: the part of a roadmap produced by generation.
//!
//! Social metadata (likes, views, ownership) lives on the persisted
//! document in `waypoint_db::models::roadmap`; this module only covers the
//! learning plan itself and the validation gates applied before it may be
//! stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Target proficiency of a roadmap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[default]
    #[serde(alias = "beginner")]
    Beginner,
    #[serde(alias = "intermediate")]
    Intermediate,
    #[serde(alias = "advanced")]
    Advanced,
}

/// All levels, in ascending order.
pub const LEVELS: &[Level] = &[Level::Beginner, Level::Intermediate, Level::Advanced];

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = CoreError;

    /// Case-insensitive parse. Used when reading the `level` column back
    /// from the database.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LEVELS
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid level '{s}'. Must be one of: Beginner, Intermediate, Advanced"
                ))
            })
    }
}

/// Kind of a single roadmap step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepType {
    #[serde(alias = "concept")]
    Concept,
    #[serde(alias = "project")]
    Project,
    #[serde(alias = "milestone")]
    Milestone,
}

// ---------------------------------------------------------------------------
// Content structs
// ---------------------------------------------------------------------------

/// A labelled link attached to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub label: String,
    pub url: String,
}

/// One unit of a roadmap. Not independently addressable.
///
/// The snake_case aliases match the field names the generation prompt asks
/// the model to emit; the canonical wire form is camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default, alias = "step_number")]
    pub step_number: u32,
    pub title: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    #[serde(default, alias = "time_allocation")]
    pub time_allocation: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "detailed_notes")]
    pub detailed_notes: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub outcomes: String,
}

/// The learning plan: everything a roadmap has apart from ownership and
/// social metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapContent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "estimated_total_time")]
    pub estimated_total_time: String,
    #[serde(default)]
    pub level: Level,
    pub steps: Vec<Step>,
    /// Topic the roadmap was generated for, echoed back by the client on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, alias = "known_skills", skip_serializing_if = "Option::is_none")]
    pub known_skills: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

impl RoadmapContent {
    /// Rewrite every `step_number` so it equals the step's 1-based index.
    pub fn renumber_steps(&mut self) {
        for (index, step) in self.steps.iter_mut().enumerate() {
            step.step_number = index as u32 + 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Validation gates
// ---------------------------------------------------------------------------

/// Minimum requirements for a roadmap to be persisted.
///
/// Rejects an empty title, an empty step list, and steps without a title.
pub fn validate_for_save(content: &RoadmapContent) -> Result<(), CoreError> {
    if content.title.trim().is_empty() {
        return Err(CoreError::Validation("Roadmap title is required".into()));
    }
    if content.steps.is_empty() {
        return Err(CoreError::Validation(
            "Roadmap must contain at least one step".into(),
        ));
    }
    if let Some(index) = content.steps.iter().position(|s| s.title.trim().is_empty()) {
        return Err(CoreError::Validation(format!(
            "Step {} is missing a title",
            index + 1
        )));
    }
    Ok(())
}

/// Requirements for freshly generated content.
///
/// Everything [`validate_for_save`] checks, plus a non-empty description and
/// total time estimate.
pub fn validate_generated(content: &RoadmapContent) -> Result<(), CoreError> {
    validate_for_save(content)?;
    if content.description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Roadmap description is required".into(),
        ));
    }
    if content.estimated_total_time.trim().is_empty() {
        return Err(CoreError::Validation(
            "Roadmap estimated total time is required".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn sample_step(title: &str) -> Step {
        Step {
            step_number: 1,
            title: title.to_string(),
            step_type: StepType::Concept,
            time_allocation: "Day 1".to_string(),
            description: "Intro".to_string(),
            detailed_notes: "Notes".to_string(),
            resources: vec![],
            outcomes: "Understands basics".to_string(),
        }
    }

    fn sample_content() -> RoadmapContent {
        RoadmapContent {
            title: "Learn Rust".to_string(),
            description: "From zero to ownership".to_string(),
            estimated_total_time: "40 hours".to_string(),
            level: Level::Beginner,
            steps: vec![sample_step("Install toolchain"), sample_step("Ownership")],
            topic: None,
            known_skills: None,
            goal: None,
        }
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("advanced".parse::<Level>().unwrap(), Level::Advanced);
        assert_eq!(" Intermediate ".parse::<Level>().unwrap(), Level::Intermediate);
        assert_matches!("expert".parse::<Level>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn level_defaults_to_beginner() {
        assert_eq!(Level::default(), Level::Beginner);
    }

    #[test]
    fn step_accepts_snake_case_aliases() {
        let json = serde_json::json!({
            "step_number": 3,
            "title": "Traits",
            "type": "Project",
            "time_allocation": "Week 2",
            "detailed_notes": "Generics and trait objects",
        });
        let step: Step = serde_json::from_value(json).unwrap();
        assert_eq!(step.step_number, 3);
        assert_eq!(step.step_type, StepType::Project);
        assert_eq!(step.time_allocation, "Week 2");
        assert_eq!(step.detailed_notes, "Generics and trait objects");
        assert!(step.resources.is_empty());
    }

    #[test]
    fn step_rejects_unknown_type() {
        let json = serde_json::json!({ "title": "Traits", "type": "Benefit" });
        assert!(serde_json::from_value::<Step>(json).is_err());
    }

    #[test]
    fn content_serializes_camel_case_and_omits_absent_echoes() {
        let value = serde_json::to_value(sample_content()).unwrap();
        assert_eq!(value["estimatedTotalTime"], "40 hours");
        assert_eq!(value["steps"][0]["detailedNotes"], "Notes");
        assert_eq!(value["steps"][0]["type"], "Concept");
        assert!(value.get("topic").is_none());
        assert!(value.get("knownSkills").is_none());
    }

    #[test]
    fn renumber_matches_index() {
        let mut content = sample_content();
        content.steps[0].step_number = 7;
        content.steps[1].step_number = 7;
        content.renumber_steps();
        assert_eq!(content.steps[0].step_number, 1);
        assert_eq!(content.steps[1].step_number, 2);
    }

    #[test]
    fn save_gate_rejects_blank_title() {
        let mut content = sample_content();
        content.title = "   ".into();
        assert_matches!(validate_for_save(&content), Err(CoreError::Validation(_)));
    }

    #[test]
    fn save_gate_rejects_empty_steps() {
        let mut content = sample_content();
        content.steps.clear();
        assert_matches!(validate_for_save(&content), Err(CoreError::Validation(_)));
    }

    #[test]
    fn save_gate_allows_blank_description() {
        let mut content = sample_content();
        content.description.clear();
        assert!(validate_for_save(&content).is_ok());
        assert_matches!(validate_generated(&content), Err(CoreError::Validation(_)));
    }
}
