#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use dbquiz_api::{
    config::{Config, StoreBackend},
    create_router,
    data::fallback_questions::fallback_questions,
    models::{Question, QuestionMetadata},
    services::{
        generator::{GenerationError, QuestionGenerator},
        question_bank::{InMemoryQuestionBank, QuestionBank},
        AppState,
    },
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Generator double with a canned health result and completion.
pub struct StubGenerator {
    healthy: bool,
    completion: String,
}

impl StubGenerator {
    /// Healthy, answers with `count` well-formed questions wrapped in a code fence.
    pub fn answering(count: usize) -> Self {
        let questions: Vec<Question> = fallback_questions()
            .into_iter()
            .take(count)
            .map(|mut question| {
                question.id = format!("gen_{}", question.id);
                question
            })
            .collect();
        Self {
            healthy: true,
            completion: format!(
                "```json\n{}\n```",
                serde_json::to_string(&questions).unwrap()
            ),
        }
    }

    /// Healthy, but the completion holds no question array.
    pub fn garbage() -> Self {
        Self {
            healthy: true,
            completion: "Sorry, I can only talk about the weather.".to_string(),
        }
    }

    pub fn offline() -> Self {
        Self {
            healthy: false,
            completion: String::new(),
        }
    }
}

#[async_trait]
impl QuestionGenerator for StubGenerator {
    async fn health_check(&self) -> Result<(), GenerationError> {
        if self.healthy {
            Ok(())
        } else {
            Err(GenerationError::Unavailable("connection refused".to_string()))
        }
    }

    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.completion.clone())
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

pub struct TestApp {
    pub router: Router,
    pub bank: Arc<InMemoryQuestionBank>,
}

pub fn test_config() -> Config {
    Config {
        store_backend: StoreBackend::Memory,
        ..Config::default()
    }
}

pub fn create_test_app(generator: StubGenerator) -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let bank = Arc::new(InMemoryQuestionBank::new());
    let app_state = Arc::new(AppState::from_parts(
        test_config(),
        bank.clone(),
        Arc::new(generator),
    ));

    TestApp {
        router: create_router(app_state),
        bank,
    }
}

/// Saves the first `count` curated questions under `language`.
pub async fn seed_bank(bank: &InMemoryQuestionBank, count: usize, language: &str, source: &str) {
    bank.save_questions(
        &fallback_questions()[..count],
        QuestionMetadata {
            source: Some(source.to_string()),
            language: Some(language.to_string()),
            topics: vec!["SQL".to_string()],
            difficulty: vec!["beginner".to_string()],
            ..Default::default()
        },
    )
    .await
    .unwrap();
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&body).into_owned())
        })
    };
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}
