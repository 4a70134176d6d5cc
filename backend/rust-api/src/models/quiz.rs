use serde::{Deserialize, Serialize};
use validator::Validate;

use super::question::Question;

pub const DEFAULT_LANGUAGE: &str = "english";
pub const DEFAULT_DIFFICULTY: [&str; 3] = ["beginner", "intermediate", "advanced"];
pub const MAX_QUESTION_COUNT: u32 = 100;

/// Provenance tag: which of the three sources produced a quiz batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    Generated,
    Stored,
    Fallback,
}

impl QuestionSource {
    pub const ALL: [QuestionSource; 3] = [
        QuestionSource::Generated,
        QuestionSource::Stored,
        QuestionSource::Fallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionSource::Generated => "generated",
            QuestionSource::Stored => "stored",
            QuestionSource::Fallback => "fallback",
        }
    }
}

/// Response envelope of the generation endpoint. Callers must read `source`
/// rather than the HTTP status to detect degraded answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizEnvelope {
    pub quiz: Vec<Question>,
    pub source: QuestionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateQuizRequest {
    #[validate(length(max = 50, message = "At most 50 topics per request"))]
    pub topics: Option<Vec<String>>,

    #[validate(length(max = 5, message = "At most 5 difficulty labels"))]
    pub difficulty: Option<Vec<String>>,

    /// Blank values resolve to the default language.
    #[validate(length(max = 32, message = "Language must be at most 32 characters"))]
    pub language: Option<String>,

    pub count: Option<u32>,

    /// Scopes the default topic list to a unit when `topics` is absent.
    pub unit_id: Option<String>,
}

/// Fully resolved generation parameters handed to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizParams {
    pub topics: Vec<String>,
    pub difficulty: Vec<String>,
    pub language: String,
    pub count: u32,
}

impl QuizParams {
    pub fn clamp_count(count: Option<u32>, default_count: u32) -> u32 {
        match count {
            Some(0) | None => default_count,
            Some(value) => value,
        }
        .clamp(1, MAX_QUESTION_COUNT)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStatus {
    pub status: &'static str,
    pub message: &'static str,
    pub available_sources: Vec<&'static str>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct GetQuestionsQuery {
    #[validate(range(min = 1, max = 200, message = "count must be between 1 and 200"))]
    pub count: Option<u32>,
    #[validate(length(max = 32))]
    pub language: Option<String>,
    #[validate(length(max = 32))]
    pub source: Option<String>,
    #[validate(length(max = 64))]
    pub category: Option<String>,
    #[validate(length(max = 32))]
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub data: Vec<Question>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordUsageRequest {
    #[validate(length(min = 1, max = 200, message = "Provide 1-200 question ids"))]
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordUsageResponse {
    pub updated: u64,
}
