mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use base64::{engine::general_purpose, Engine as _};
use common::{create_test_app, get, post_json, send, StubGenerator};
use dbquiz_api::data::fallback_questions::fallback_questions;
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_reports_dependencies() {
    let app = create_test_app(StubGenerator::answering(1));

    let (status, body) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "dbquiz-api");
    assert_eq!(body["dependencies"]["question_bank"]["backend"], "memory");
    assert_eq!(body["dependencies"]["generation"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_degraded_when_generator_offline() {
    let app = create_test_app(StubGenerator::offline());

    let (status, body) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["dependencies"]["question_bank"]["status"], "healthy");
    assert_eq!(body["dependencies"]["generation"]["status"], "unhealthy");
}

#[tokio::test]
#[serial]
async fn test_metrics_requires_basic_auth() {
    std::env::set_var("METRICS_AUTH", "scraper:secret");
    let app = create_test_app(StubGenerator::offline());

    let (status, _) = send(&app.router, get("/metrics")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Generate some traffic so the source counter is populated
    send(&app.router, post_json("/api/v1/quiz/generate", "{}")).await;

    let credentials = general_purpose::STANDARD.encode("scraper:secret");
    let request = Request::builder()
        .uri("/metrics")
        .header("authorization", format!("Basic {}", credentials))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap();
    assert!(text.contains("quiz_responses_total"));
    assert!(text.contains("http_requests_total"));

    std::env::remove_var("METRICS_AUTH");
}

#[tokio::test]
async fn test_grade_quiz() {
    let app = create_test_app(StubGenerator::offline());
    let questions = fallback_questions();
    let questions = &questions[..5];

    // Four correct, one wrong
    let mut answers = serde_json::Map::new();
    for question in &questions[..4] {
        answers.insert(question.id.clone(), json!(question.correct_answer));
    }
    let wrong = if questions[4].correct_answer == "a" { "b" } else { "a" };
    answers.insert(questions[4].id.clone(), json!(wrong));

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/v1/quiz/grade",
            json!({ "questions": questions, "answers": answers }).to_string(),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 4);
    assert_eq!(body["total"], 5);
    assert_eq!(body["percentage"], 80);
    assert_eq!(body["band"], "excellent");
    assert_eq!(body["reviews"][4]["isCorrect"], false);
    assert_eq!(body["answeredPercentage"], 100.0);
    assert_eq!(body["timedOut"], false);
}

#[tokio::test]
async fn test_grade_rejects_invalid_answers() {
    let app = create_test_app(StubGenerator::offline());
    let questions = fallback_questions();
    let questions = &questions[..3];

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/v1/quiz/grade",
            json!({ "questions": questions, "answers": { questions[0].id.clone(): "e" } })
                .to_string(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid option id: e");

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/v1/quiz/grade",
            json!({ "questions": questions, "answers": { "fb_999": "a" } }).to_string(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unknown question: fb_999");
}

#[tokio::test]
async fn test_grade_reports_timeout() {
    let app = create_test_app(StubGenerator::offline());
    let questions = fallback_questions();
    let questions = &questions[..2];

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/v1/quiz/grade",
            json!({
                "questions": questions,
                "answers": { questions[0].id.clone(): questions[0].correct_answer.clone() },
                "timeLimitSeconds": 30,
                "elapsedSeconds": 45
            })
            .to_string(),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timedOut"], true);
    assert_eq!(body["timeTaken"], "00:30");
    assert_eq!(body["score"], 1);
    assert_eq!(body["answeredPercentage"], 50.0);
}

#[tokio::test]
async fn test_grade_rejects_malformed_body() {
    let app = create_test_app(StubGenerator::offline());

    let (status, body) = send(&app.router, post_json("/api/v1/quiz/grade", "[1, 2")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to parse JSON request body"));
}

#[tokio::test]
async fn test_trace_id_is_propagated() {
    let app = create_test_app(StubGenerator::offline());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/units")
                .header("x-trace-id", "trace-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-trace-id"], "trace-123");
    assert!(response
        .headers()
        .contains_key("content-security-policy"));

    let response = app.router.clone().oneshot(get("/health")).await.unwrap();
    assert!(response.headers().contains_key("x-trace-id"));
}
