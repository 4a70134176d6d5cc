use chrono::Utc;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Option labels every question must carry, in display order.
pub const OPTION_IDS: [&str; 4] = ["a", "b", "c", "d"];

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_EXPLANATION: &str = "No explanation provided";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub category: String,
    pub question: String,
    pub options: Vec<QuestionOption>,
    pub correct_answer: String,
    pub explanation: String,
}

pub fn is_option_id(value: &str) -> bool {
    OPTION_IDS.contains(&value)
}

impl Question {
    /// Shape check shared by the store adapter (write time) and route handlers (read time).
    pub fn is_valid(&self) -> bool {
        !self.question.trim().is_empty()
            && self.options.len() == OPTION_IDS.len()
            && self
                .options
                .iter()
                .all(|option| is_option_id(&option.id) && !option.text.trim().is_empty())
            && is_option_id(self.correct_answer.trim())
    }
}

/// Lenient shape used for model output and legacy records where any field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawQuestion {
    pub id: Option<String>,
    pub category: Option<String>,
    pub question: Option<String>,
    pub options: Option<Vec<RawOption>>,
    #[serde(alias = "correct_answer")]
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOption {
    pub id: Option<String>,
    pub text: Option<String>,
}

impl RawQuestion {
    /// Normalizes the item and fills display defaults. Returns `None` when the
    /// result would not pass [`Question::is_valid`].
    pub fn into_question(self, index: usize) -> Option<Question> {
        let options = self
            .options?
            .into_iter()
            .map(|option| QuestionOption {
                id: option.id.unwrap_or_default().trim().to_ascii_lowercase(),
                text: option.text.unwrap_or_default().trim().to_string(),
            })
            .collect();

        let question = Question {
            id: non_empty(self.id).unwrap_or_else(|| fallback_id(index)),
            category: non_empty(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            question: self.question.unwrap_or_default().trim().to_string(),
            options,
            correct_answer: self
                .correct_answer
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase(),
            explanation: non_empty(self.explanation)
                .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string()),
        };

        question.is_valid().then_some(question)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn fallback_id(index: usize) -> String {
    format!("q_{}_{}", Utc::now().timestamp_millis(), index)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionMetadata {
    pub source: Option<String>,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub difficulty: Vec<String>,
    pub batch_id: Option<String>,
    pub created_at: Option<BsonDateTime>,
}

/// Document shape of the `quiz_questions` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQuestion {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub record_id: Option<ObjectId>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    /// Options missing a field decode as blanks and fail read-time validation.
    #[serde(default, deserialize_with = "lenient_options")]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub metadata: QuestionMetadata,
    #[serde(default)]
    pub usage_count: i64,
    #[serde(default)]
    pub last_used: Option<BsonDateTime>,
}

fn lenient_options<'de, D>(deserializer: D) -> Result<Vec<QuestionOption>, D::Error>
where
    D: Deserializer<'de>,
{
    let options = Option::<Vec<RawOption>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(options
        .into_iter()
        .map(|option| QuestionOption {
            id: option.id.unwrap_or_default(),
            text: option.text.unwrap_or_default(),
        })
        .collect())
}

impl StoredQuestion {
    pub fn new(question: Question, metadata: QuestionMetadata) -> Self {
        Self {
            record_id: None,
            id: Some(question.id),
            category: Some(question.category),
            question: Some(question.question),
            options: question.options,
            correct_answer: Some(question.correct_answer),
            explanation: Some(question.explanation),
            metadata,
            usage_count: 0,
            last_used: None,
        }
    }

    pub fn record_id_hex(&self) -> Option<String> {
        self.record_id.map(|id| id.to_hex())
    }

    /// Client-facing view with display defaults applied.
    pub fn to_question(&self, index: usize) -> Question {
        Question {
            id: self
                .id
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback_id(index)),
            category: self
                .category
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            question: self.question.clone().unwrap_or_default(),
            options: self.options.clone(),
            correct_answer: self.correct_answer.clone().unwrap_or_default(),
            explanation: self
                .explanation
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string()),
        }
    }
}

/// In-memory filters applied after a bulk read of the question bank.
///
/// A record is excluded only when it carries a value for the field and that
/// value differs; records without the field always pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionFilters {
    pub language: Option<String>,
    pub source: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

impl QuestionFilters {
    pub fn language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Default::default()
        }
    }

    pub fn matches(&self, record: &StoredQuestion) -> bool {
        if let (Some(wanted), Some(actual)) = (&self.language, &record.metadata.language) {
            if wanted != actual {
                return false;
            }
        }

        if let (Some(wanted), Some(actual)) = (&self.source, &record.metadata.source) {
            if wanted != actual {
                return false;
            }
        }

        if let (Some(wanted), Some(actual)) = (&self.category, &record.category) {
            if !wanted.eq_ignore_ascii_case(actual) {
                return false;
            }
        }

        if let Some(wanted) = &self.difficulty {
            let levels = &record.metadata.difficulty;
            if !levels.is_empty() && !levels.iter().any(|d| d.eq_ignore_ascii_case(wanted)) {
                return false;
            }
        }

        true
    }
}

/// Aggregate counts over the whole question bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBankStats {
    pub total: usize,
    pub by_language: BTreeMap<String, usize>,
    pub by_source: BTreeMap<String, usize>,
    pub by_topic: BTreeMap<String, usize>,
    pub by_difficulty: BTreeMap<String, usize>,
}

impl QuestionBankStats {
    pub fn from_records(records: &[StoredQuestion]) -> Self {
        let mut stats = QuestionBankStats {
            total: records.len(),
            ..Default::default()
        };

        for record in records {
            let metadata = &record.metadata;
            let language = metadata.language.as_deref().unwrap_or("unknown");
            *stats.by_language.entry(language.to_string()).or_default() += 1;

            let source = metadata.source.as_deref().unwrap_or("unknown");
            *stats.by_source.entry(source.to_string()).or_default() += 1;

            for topic in &metadata.topics {
                *stats.by_topic.entry(topic.clone()).or_default() += 1;
            }
            for level in &metadata.difficulty {
                *stats.by_difficulty.entry(level.clone()).or_default() += 1;
            }
        }

        stats
    }
}
