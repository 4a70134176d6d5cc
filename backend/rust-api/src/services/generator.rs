use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{config::GenerationConfig, models::quiz::QuizParams};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation service not responding: {0}")]
    Unavailable(String),
    #[error("Generation service returned error {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Generation request timed out")]
    Timeout,
    #[error("Generation request failed: {0}")]
    Transport(String),
    #[error("Failed to parse questions from generation response: {0}")]
    Parse(String),
    #[error("Generation response contained no valid questions ({0} rejected)")]
    NoValidQuestions(usize),
}

impl GenerationError {
    /// Stable label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            GenerationError::Unavailable(_) => "unavailable",
            GenerationError::Http { .. } => "http_error",
            GenerationError::Timeout => "timeout",
            GenerationError::Transport(_) => "transport",
            GenerationError::Parse(_) => "parse",
            GenerationError::NoValidQuestions(_) => "no_valid_questions",
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Timeout
        } else {
            GenerationError::Transport(err.to_string())
        }
    }
}

/// Text-completion backend used to author fresh questions.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Cheap liveness check issued before every generation attempt.
    async fn health_check(&self) -> Result<(), GenerationError>;

    /// Returns the raw completion text for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Debug, Serialize)]
struct SamplingOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Client for an Ollama-compatible HTTP API (`/api/tags`, `/api/generate`).
pub struct OllamaGenerator {
    http_client: Client,
    config: GenerationConfig,
}

impl OllamaGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl QuestionGenerator for OllamaGenerator {
    async fn health_check(&self) -> Result<(), GenerationError> {
        let url = format!("{}/api/tags", self.config.base_url);

        let response = self
            .http_client
            .get(&url)
            .timeout(self.config.health_check_timeout())
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GenerationError::Unavailable(format!(
                "health check failed: {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.config.base_url);
        let payload = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: SamplingOptions {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
            },
        };

        let response = self
            .http_client
            .post(&url)
            .json(&payload)
            .timeout(self.config.timeout())
            .send()
            .await
            .map_err(GenerationError::from_reqwest)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::Http { status, body });
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout
            } else {
                GenerationError::Parse(e.to_string())
            }
        })?;

        Ok(body.response)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Instructional prompt asking for `count` four-option MCQs as a bare JSON array.
pub fn quiz_prompt(params: &QuizParams) -> String {
    let difficulty = params.difficulty.join(", ");
    let topics = params.topics.join(", ");

    format!(
        r#"
You are an expert database instructor creating multiple-choice questions (MCQs) for students learning database systems.

Generate {count} high-quality, conceptually correct, and exam-standard MCQs in {language}.
Questions must follow a professional style like university-level or certification-style (e.g., Oracle, DBMS courses).

Each question must:
1. Be relevant to database systems and their practical applications.
2. Have exactly four options labeled "a", "b", "c", "d".
3. Contain exactly one correct answer.
4. Include a short, accurate explanation.
5. Cover different {difficulty}-level concepts.
6. Use clear and precise database terminology.

### Topics to Cover:
{topics}

### Expected JSON Output Format:
[
  {{
    "id": "q1",
    "category": "SQL | Normalization | ER Modeling | etc.",
    "question": "string",
    "options": [
      {{ "id": "a", "text": "string" }},
      {{ "id": "b", "text": "string" }},
      {{ "id": "c", "text": "string" }},
      {{ "id": "d", "text": "string" }}
    ],
    "correctAnswer": "a" | "b" | "c" | "d",
    "explanation": "string"
  }}
]

IMPORTANT: Only return the JSON array. Do not include any markdown formatting, commentary, or explanations outside the JSON.

Example:
[
  {{
    "id": "q_sample_1",
    "category": "SQL",
    "question": "Which SQL keyword is used to remove duplicate rows from the result set?",
    "options": [
      {{ "id": "a", "text": "REMOVE" }},
      {{ "id": "b", "text": "DELETE" }},
      {{ "id": "c", "text": "DISTINCT" }},
      {{ "id": "d", "text": "UNIQUE" }}
    ],
    "correctAnswer": "c",
    "explanation": "DISTINCT eliminates duplicate rows from the query result set."
  }}
]"#,
        count = params.count,
        language = params.language,
        difficulty = difficulty,
        topics = topics,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::time::Duration;

    /// Serves `router` on an ephemeral local port and returns its base URL.
    async fn spawn_service(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn generator_for(base_url: String) -> OllamaGenerator {
        OllamaGenerator::new(GenerationConfig {
            base_url,
            model: "test-model".to_string(),
            timeout_secs: 1,
            health_check_timeout_secs: 1,
            temperature: 0.5,
            top_p: 0.8,
        })
    }

    fn params() -> QuizParams {
        QuizParams {
            topics: vec!["Normal forms".to_string(), "Indexing".to_string()],
            difficulty: vec!["beginner".to_string(), "advanced".to_string()],
            language: "english".to_string(),
            count: 12,
        }
    }

    #[test]
    fn prompt_embeds_parameters() {
        let prompt = quiz_prompt(&params());
        assert!(prompt.contains("Generate 12 high-quality"));
        assert!(prompt.contains("MCQs in english"));
        assert!(prompt.contains("Cover different beginner, advanced-level concepts"));
        assert!(prompt.contains("Normal forms, Indexing"));
        assert!(prompt.contains(r#"{ "id": "a", "text": "REMOVE" }"#));
    }

    #[test]
    fn error_reasons_are_stable() {
        assert_eq!(GenerationError::Timeout.reason(), "timeout");
        assert_eq!(
            GenerationError::Http {
                status: 500,
                body: String::new()
            }
            .reason(),
            "http_error"
        );
        assert_eq!(GenerationError::NoValidQuestions(3).reason(), "no_valid_questions");
    }

    #[tokio::test]
    async fn unreachable_service_fails_health_check() {
        let generator = OllamaGenerator::new(GenerationConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            health_check_timeout_secs: 1,
            ..GenerationConfig::default()
        });
        let result = generator.health_check().await;
        assert!(matches!(result, Err(GenerationError::Unavailable(_))));
    }

    #[tokio::test]
    async fn complete_posts_sampling_options_and_returns_response_field() {
        // Echo the received payload back as the completion text
        let router = Router::new().route(
            "/api/generate",
            post(|Json(payload): Json<Value>| async move {
                Json(json!({ "model": "test-model", "response": payload.to_string(), "done": true }))
            }),
        );
        let generator = generator_for(spawn_service(router).await);

        let text = generator.complete("List three joins").await.unwrap();
        let sent: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(sent["model"], "test-model");
        assert_eq!(sent["prompt"], "List three joins");
        assert_eq!(sent["stream"], false);
        let temperature = sent["options"]["temperature"].as_f64().unwrap();
        let top_p = sent["options"]["top_p"].as_f64().unwrap();
        assert!((temperature - 0.5).abs() < 1e-6);
        assert!((top_p - 0.8).abs() < 1e-6);
    }

    #[tokio::test]
    async fn complete_reports_non_success_status() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
        );
        let generator = generator_for(spawn_service(router).await);

        match generator.complete("prompt").await {
            Err(GenerationError::Http { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "model not loaded");
            }
            other => panic!("expected http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn complete_times_out_on_slow_service() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "response": "[]" }))
            }),
        );
        let generator = generator_for(spawn_service(router).await);

        let result = generator.complete("prompt").await;
        assert!(matches!(result, Err(GenerationError::Timeout)));
    }

    #[tokio::test]
    async fn health_check_hits_tags_endpoint() {
        let router = Router::new().route("/api/tags", get(|| async { Json(json!({ "models": [] })) }));
        let generator = generator_for(spawn_service(router).await);
        assert!(generator.health_check().await.is_ok());

        let router = Router::new().route(
            "/api/tags",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let generator = generator_for(spawn_service(router).await);
        assert!(matches!(
            generator.health_check().await,
            Err(GenerationError::Unavailable(_))
        ));
    }
}
