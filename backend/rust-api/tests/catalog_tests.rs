mod common;

use axum::http::StatusCode;
use common::{create_test_app, get, send, StubGenerator};

#[tokio::test]
async fn test_list_units() {
    let app = create_test_app(StubGenerator::offline());

    let (status, body) = send(&app.router, get("/api/v1/units")).await;

    assert_eq!(status, StatusCode::OK);
    let units = body.as_array().unwrap();
    assert_eq!(units.len(), 13);
    assert_eq!(units[0]["id"], "relational-concepts");
    assert!(units[0]["topics"].as_array().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_list_units_by_difficulty() {
    let app = create_test_app(StubGenerator::offline());

    let (status, body) = send(&app.router, get("/api/v1/units?difficulty=beginner")).await;

    assert_eq!(status, StatusCode::OK);
    let units = body.as_array().unwrap();
    assert_eq!(units.len(), 3);
    assert!(units.iter().all(|u| u["difficulty"] == "Beginner"));
}

#[tokio::test]
async fn test_get_unit() {
    let app = create_test_app(StubGenerator::offline());

    let (status, body) = send(&app.router, get("/api/v1/units/nosql")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "NoSQL Databases");

    let (status, body) = send(&app.router, get("/api/v1/units/unknown-unit")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_blog_listing_and_filters() {
    let app = create_test_app(StubGenerator::offline());

    let (status, body) = send(&app.router, get("/api/v1/blog")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = send(&app.router, get("/api/v1/blog?category=advanced")).await;
    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], "sql-query-optimization");

    let (_, body) = send(&app.router, get("/api/v1/blog/featured")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app.router, get("/api/v1/blog/categories")).await;
    assert_eq!(
        body,
        serde_json::json!(["Fundamentals", "Advanced", "Architecture"])
    );

    let (status, body) = send(&app.router, get("/api/v1/blog/tags")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_blog_post() {
    let app = create_test_app(StubGenerator::offline());

    let (status, body) = send(&app.router, get("/api/v1/blog/nosql-vs-sql")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Architecture");
    assert!(body["publishedAt"].is_string());

    let (status, _) = send(&app.router, get("/api/v1/blog/missing-post")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_related_posts() {
    let app = create_test_app(StubGenerator::offline());

    let (status, body) = send(
        &app.router,
        get("/api/v1/blog/database-fundamentals-beginners/related"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let related = body.as_array().unwrap();
    assert!(related.len() <= 4);
    assert!(related
        .iter()
        .all(|p| p["id"] != "database-fundamentals-beginners"));

    let (status, _) = send(&app.router, get("/api/v1/blog/missing-post/related")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
