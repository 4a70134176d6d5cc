use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Map, Value};
use std::{sync::Arc, time::Duration};

use crate::metrics;
use crate::services::AppState;

const STORE_PING_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = check_question_bank(&state).await;
    let generation = check_generation_service(&state).await;

    let all_healthy = [&store, &generation]
        .iter()
        .all(|dependency| dependency.get("status").and_then(Value::as_str) == Some("healthy"));

    let (status_code, status) = if all_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "service": "dbquiz-api",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": {
                "question_bank": store,
                "generation": generation,
            }
        })),
    )
}

async fn check_question_bank(state: &AppState) -> Map<String, Value> {
    let mut result = Map::new();
    result.insert("backend".to_string(), json!(state.bank.backend_name()));

    match tokio::time::timeout(STORE_PING_TIMEOUT, state.bank.ping()).await {
        Ok(Ok(())) => {
            result.insert("status".to_string(), json!("healthy"));
        }
        Ok(Err(e)) => {
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert("error".to_string(), json!(format!("{:#}", e)));
        }
        Err(_) => {
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert(
                "error".to_string(),
                json!(format!(
                    "Question bank timeout after {}s",
                    STORE_PING_TIMEOUT.as_secs()
                )),
            );
        }
    }

    result
}

async fn check_generation_service(state: &AppState) -> Map<String, Value> {
    let mut result = Map::new();
    result.insert("model".to_string(), json!(state.generator.model_name()));

    // The adapter applies its own health-check timeout; this one bounds stub or misbehaving clients.
    let limit = state.config.generation.health_check_timeout() + Duration::from_secs(1);
    match tokio::time::timeout(limit, state.generator.health_check()).await {
        Ok(Ok(())) => {
            result.insert("status".to_string(), json!("healthy"));
        }
        Ok(Err(e)) => {
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert("error".to_string(), json!(e.to_string()));
        }
        Err(_) => {
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert("error".to_string(), json!("Generation service health check timed out"));
        }
    }

    result
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

/// HTTP Basic auth for `/metrics`. Expected credentials come from
/// `METRICS_AUTH` as `username:password`.
pub async fn metrics_auth_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let encoded = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let decoded = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let credentials = String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let expected = std::env::var("METRICS_AUTH").unwrap_or_else(|_| "admin:changeme".to_string());
    if credentials != expected {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}

pub mod blog;
pub mod error;
pub mod questions;
pub mod quiz;
pub mod units;
