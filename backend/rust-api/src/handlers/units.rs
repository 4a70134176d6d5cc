use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::{
    data::units::{unit_by_id, units_by_difficulty, UNITS},
    handlers::{
        error::ApiError,
        quiz::{lenient_generate_request, resolve_params},
    },
    models::{
        catalog::{Unit, UnitListQuery, UnitQuizResponse},
        quiz::{GenerateQuizRequest, QuizParams},
        session::{UNIT_QUIZ_DURATION_SECONDS, UNIT_QUIZ_QUESTION_COUNT},
    },
    services::AppState,
};

/// GET /api/v1/units
pub async fn list_units(Query(query): Query<UnitListQuery>) -> Json<Vec<&'static Unit>> {
    let units = match query.difficulty.as_deref().map(str::trim) {
        Some(difficulty) if !difficulty.is_empty() => units_by_difficulty(difficulty),
        _ => UNITS.iter().collect(),
    };
    Json(units)
}

/// GET /api/v1/units/{id}
pub async fn get_unit(Path(id): Path<String>) -> Result<Json<&'static Unit>, ApiError> {
    unit_by_id(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Unit {} not found", id)))
}

/// POST /api/v1/units/{id}/quiz
///
/// Questions are scoped to the unit's topics with a fixed count and time limit.
/// The optional body may still set `language` and `difficulty`.
pub async fn unit_quiz(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<UnitQuizResponse>, ApiError> {
    let unit =
        unit_by_id(&id).ok_or_else(|| ApiError::not_found(format!("Unit {} not found", id)))?;

    let request = lenient_generate_request(&body);
    request.validate()?;

    let params = unit_quiz_params(unit, request);
    tracing::info!("Unit quiz requested for {}", unit.id);
    let envelope = state.orchestrator().generate_quiz(&params).await;

    Ok(Json(UnitQuizResponse {
        unit_id: unit.id,
        unit_title: unit.title,
        time_limit_seconds: UNIT_QUIZ_DURATION_SECONDS,
        envelope,
    }))
}

/// Same normalisation as the generation endpoint, with topics and count
/// pinned to the unit.
fn unit_quiz_params(unit: &Unit, request: GenerateQuizRequest) -> QuizParams {
    let request = GenerateQuizRequest {
        topics: Some(unit.topics.iter().map(|t| t.to_string()).collect()),
        count: Some(UNIT_QUIZ_QUESTION_COUNT),
        unit_id: Some(unit.id.to_string()),
        ..request
    };
    resolve_params(request, UNIT_QUIZ_QUESTION_COUNT)
}
