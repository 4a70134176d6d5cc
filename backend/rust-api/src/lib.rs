use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod data;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

/// Adds a Content-Security-Policy header to every response.
async fn csp_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    response
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // The quiz frontend is served from another origin
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(middlewares::trace::TRACE_ID_HEADER),
        ])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        .nest("/api/v1/quiz", quiz_routes())
        .nest("/api/v1/questions", question_routes())
        .nest("/api/v1/units", unit_routes())
        .nest("/api/v1/blog", blog_routes())
        .with_state(app_state)
        .layer(cors)
        .layer(middleware::from_fn(csp_middleware))
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

fn quiz_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/generate",
            get(handlers::quiz::generation_status).post(handlers::quiz::generate_quiz),
        )
        .route("/grade", post(handlers::quiz::grade_quiz))
}

fn question_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::questions::get_questions).post(handlers::questions::post_questions),
        )
        .route("/stats", get(handlers::questions::question_stats))
        .route("/usage", post(handlers::questions::record_usage))
}

fn unit_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::units::list_units))
        .route("/{id}", get(handlers::units::get_unit))
        .route("/{id}/quiz", post(handlers::units::unit_quiz))
}

fn blog_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::blog::list_posts))
        .route("/featured", get(handlers::blog::list_featured))
        .route("/categories", get(handlers::blog::list_categories))
        .route("/tags", get(handlers::blog::list_tags))
        .route("/{id}", get(handlers::blog::get_post))
        .route("/{id}/related", get(handlers::blog::list_related))
}
