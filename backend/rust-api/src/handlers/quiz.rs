use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::{
    data::units::{all_topics, unit_by_id},
    extractors::AppJson,
    handlers::error::ApiError,
    models::{
        quiz::{
            GenerateQuizRequest, GenerationStatus, QuestionSource, QuizEnvelope, QuizParams,
            DEFAULT_DIFFICULTY, DEFAULT_LANGUAGE,
        },
        session::{grade_submission, GradeQuizRequest, GradedQuiz},
    },
    services::AppState,
};

/// POST /api/v1/quiz/generate
///
/// Always answers 200 once the request validates. Degraded answers are
/// signalled through `source`, `warning` and `error` in the envelope.
pub async fn generate_quiz(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<QuizEnvelope>, ApiError> {
    let request = lenient_generate_request(&body);
    request.validate()?;

    let params = resolve_params(request, state.config.default_question_count);
    tracing::info!(
        "Quiz requested: {} questions, language={}, {} topics",
        params.count,
        params.language,
        params.topics.len()
    );

    Ok(Json(state.orchestrator().generate_quiz(&params).await))
}

/// GET /api/v1/quiz/generate
pub async fn generation_status() -> Json<GenerationStatus> {
    Json(GenerationStatus {
        status: "ok",
        message: "Quiz generation endpoint is ready",
        available_sources: QuestionSource::ALL.iter().map(QuestionSource::as_str).collect(),
    })
}

/// POST /api/v1/quiz/grade
///
/// Unknown question ids and option ids outside a-d are rejected with 400.
pub async fn grade_quiz(
    AppJson(request): AppJson<GradeQuizRequest>,
) -> Result<Json<GradedQuiz>, ApiError> {
    let graded = grade_submission(request)?;
    tracing::debug!(
        "Graded quiz: {}/{} ({}%), timed_out={}",
        graded.result.score,
        graded.result.total,
        graded.result.percentage,
        graded.timed_out
    );
    Ok(Json(graded))
}

/// Empty or unparseable bodies fall back to an all-defaults request. Inside a
/// JSON object each field is read on its own, so a field of the wrong type
/// only resets that field.
pub(crate) fn lenient_generate_request(body: &[u8]) -> GenerateQuizRequest {
    if body.iter().all(u8::is_ascii_whitespace) {
        return GenerateQuizRequest::default();
    }
    let fields = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => {
            tracing::warn!("Quiz request body is not a JSON object, using defaults");
            return GenerateQuizRequest::default();
        }
        Err(e) => {
            tracing::warn!("Unparseable quiz request body, using defaults: {}", e);
            return GenerateQuizRequest::default();
        }
    };

    GenerateQuizRequest {
        topics: lenient_field(&fields, "topics"),
        difficulty: lenient_field(&fields, "difficulty"),
        language: lenient_field(&fields, "language"),
        count: lenient_field(&fields, "count"),
        unit_id: lenient_field(&fields, "unitId"),
    }
}

fn lenient_field<T: DeserializeOwned>(fields: &Map<String, Value>, name: &str) -> Option<T> {
    let value = fields.get(name).filter(|value| !value.is_null())?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!("Ignoring invalid `{}` in quiz request: {}", name, e);
            None
        }
    }
}

pub(crate) fn resolve_params(request: GenerateQuizRequest, default_count: u32) -> QuizParams {
    let topics = non_blank(request.topics).unwrap_or_else(|| {
        match request.unit_id.as_deref().and_then(unit_by_id) {
            Some(unit) => unit.topics.iter().map(|t| t.to_string()).collect(),
            None => {
                if let Some(unit_id) = &request.unit_id {
                    tracing::warn!("Unknown unit {}, using all topics", unit_id);
                }
                all_topics()
            }
        }
    });

    let difficulty = non_blank(request.difficulty)
        .unwrap_or_else(|| DEFAULT_DIFFICULTY.iter().map(|d| d.to_string()).collect());

    let language = request
        .language
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    QuizParams {
        topics,
        difficulty,
        language,
        count: QuizParams::clamp_count(request.count, default_count),
    }
}

/// Trims every entry and drops blanks; `None` when nothing is left.
pub(crate) fn non_blank(values: Option<Vec<String>>) -> Option<Vec<String>> {
    let values: Vec<String> = values?
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    (!values.is_empty()).then_some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_body_resolves_to_defaults() {
        let request = lenient_generate_request(b"{not json");
        let params = resolve_params(request, 40);
        assert_eq!(params.count, 40);
        assert_eq!(params.language, "english");
        assert_eq!(params.difficulty, vec!["beginner", "intermediate", "advanced"]);
        assert_eq!(params.topics, all_topics());
    }

    #[test]
    fn wrongly_typed_field_only_resets_itself() {
        let request =
            lenient_generate_request(br#"{"language":"sinhala","topics":["Joins"],"count":"10"}"#);
        assert_eq!(request.count, None);

        let params = resolve_params(request, 40);
        assert_eq!(params.language, "sinhala");
        assert_eq!(params.topics, vec!["Joins"]);
        assert_eq!(params.count, 40);

        let request = lenient_generate_request(br#"{"topics":"SQL","count":-3,"language":null}"#);
        let params = resolve_params(request, 40);
        assert_eq!(params.topics, all_topics());
        assert_eq!(params.count, 40);
        assert_eq!(params.language, "english");
    }

    #[test]
    fn non_object_body_resolves_to_defaults() {
        let request = lenient_generate_request(br#"["SQL"]"#);
        assert!(request.topics.is_none());
        assert!(request.count.is_none());
    }

    #[test]
    fn unit_id_scopes_topics_when_none_given() {
        let request = lenient_generate_request(br#"{"unitId":"nosql","count":250}"#);
        let params = resolve_params(request, 40);
        let unit = unit_by_id("nosql").unwrap();
        assert_eq!(params.topics.len(), unit.topics.len());
        assert_eq!(params.count, 100);
    }

    #[test]
    fn explicit_topics_win_over_unit() {
        let request = lenient_generate_request(
            br#"{"unitId":"nosql","topics":["  Joins ", ""],"language":" sinhala "}"#,
        );
        let params = resolve_params(request, 40);
        assert_eq!(params.topics, vec!["Joins"]);
        assert_eq!(params.language, "sinhala");
    }
}
