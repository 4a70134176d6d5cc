use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter_vec, Encoder, Histogram,
    HistogramVec, IntCounterVec, TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Question bank
    pub static ref BANK_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "question_bank_operations_total",
        "Total number of question bank operations",
        &["operation", "status"]
    )
    .unwrap();

    pub static ref BANK_OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "question_bank_operation_duration_seconds",
        "Question bank operation duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .unwrap();

    // Question sourcing
    pub static ref QUIZ_RESPONSES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "quiz_responses_total",
        "Quiz responses by provenance source",
        &["source"]
    )
    .unwrap();

    pub static ref GENERATION_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "question_generation_failures_total",
        "Question generation failures by reason",
        &["reason"]
    )
    .unwrap();

    pub static ref GENERATION_DURATION_SECONDS: Histogram = register_histogram!(
        "question_generation_duration_seconds",
        "Time spent generating questions, including the health check",
        vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track a question bank operation with metrics
pub async fn track_bank_operation<F, T>(operation: &str, future: F) -> Result<T, anyhow::Error>
where
    F: std::future::Future<Output = Result<T, anyhow::Error>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = if result.is_ok() { "success" } else { "error" };

    BANK_OPERATIONS_TOTAL
        .with_label_values(&[operation, status])
        .inc();

    BANK_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration);

    result
}

pub fn record_quiz_source(source: &str) {
    QUIZ_RESPONSES_TOTAL.with_label_values(&[source]).inc();
}

pub fn record_generation_failure(reason: &str) {
    GENERATION_FAILURES_TOTAL.with_label_values(&[reason]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_metrics() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();
        record_quiz_source("fallback");

        let output = render_metrics().expect("metrics should render");
        assert!(output.contains("http_requests_total"));
        assert!(output.contains("quiz_responses_total"));
    }

    #[tokio::test]
    async fn track_bank_operation_counts_errors() {
        let before = BANK_OPERATIONS_TOTAL
            .with_label_values(&["unit_test", "error"])
            .get();
        let result: anyhow::Result<()> =
            track_bank_operation("unit_test", async { Err(anyhow::anyhow!("boom")) }).await;
        assert!(result.is_err());
        let after = BANK_OPERATIONS_TOTAL
            .with_label_values(&["unit_test", "error"])
            .get();
        assert_eq!(after, before + 1);
    }
}
