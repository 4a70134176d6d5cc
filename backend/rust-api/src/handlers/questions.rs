use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::{
    extractors::ValidatedJson,
    handlers::error::ApiError,
    metrics::track_bank_operation,
    models::{
        question::{Question, QuestionBankStats, QuestionFilters},
        quiz::{GetQuestionsQuery, QuestionsResponse, RecordUsageRequest, RecordUsageResponse},
    },
    services::AppState,
};

/// GET /api/v1/questions
pub async fn get_questions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetQuestionsQuery>,
) -> Result<Response, ApiError> {
    query.validate()?;
    Ok(fetch_stored_questions(&state, query).await)
}

/// POST /api/v1/questions. Same parameters as the query string, in a JSON body.
pub async fn post_questions(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let query: GetQuestionsQuery = if body.iter().all(u8::is_ascii_whitespace) {
        GetQuestionsQuery::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::bad_request(format!("Failed to parse JSON request body: {}", e))
        })?
    };
    query.validate()?;
    Ok(fetch_stored_questions(&state, query).await)
}

async fn fetch_stored_questions(state: &AppState, query: GetQuestionsQuery) -> Response {
    let count = query
        .count
        .unwrap_or(state.config.default_question_count) as usize;
    let filters = QuestionFilters {
        language: query.language,
        source: query.source,
        category: query.category,
        difficulty: query.difficulty,
    };

    match state.bank.fetch_questions(count, &filters).await {
        Ok(records) => {
            let data: Vec<Question> = records
                .iter()
                .enumerate()
                .map(|(index, record)| record.to_question(index))
                .filter(Question::is_valid)
                .collect();

            if data.is_empty() {
                return (
                    StatusCode::NOT_FOUND,
                    Json(QuestionsResponse {
                        success: false,
                        count: None,
                        message: Some("No questions found in database".to_string()),
                        error: None,
                        data,
                    }),
                )
                    .into_response();
            }

            Json(QuestionsResponse {
                success: true,
                count: Some(data.len()),
                message: None,
                error: None,
                data,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch stored questions: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(QuestionsResponse {
                    success: false,
                    count: None,
                    message: Some("Failed to fetch questions from database".to_string()),
                    error: Some(format!("{:#}", e)),
                    data: Vec::new(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/v1/questions/stats
pub async fn question_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<QuestionBankStats>, ApiError> {
    state
        .bank
        .statistics()
        .await
        .map(Json)
        .map_err(|e| ApiError::internal(format!("Failed to compute question statistics: {:#}", e)))
}

/// POST /api/v1/questions/usage
pub async fn record_usage(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RecordUsageRequest>,
) -> Result<Json<RecordUsageResponse>, ApiError> {
    let updated = track_bank_operation("record_usage", state.bank.record_usage(&request.ids))
        .await
        .map_err(|e| ApiError::internal(format!("Failed to record question usage: {:#}", e)))?;

    Ok(Json(RecordUsageResponse { updated }))
}
