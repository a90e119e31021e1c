//! Metrics and observability utilities
//!
//! Thin helpers over the `metrics` facade. Nothing is recorded unless the
//! binary installs a recorder.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all BlogForge metrics
pub const METRICS_PREFIX: &str = "blogforge";

/// Buckets for generation latency (LLM calls are slow)
pub const GENERATION_BUCKETS: &[f64] = &[
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
    20.00,  // 20s
    30.00,  // 30s
    60.00,  // 60s
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_articles_created_total", METRICS_PREFIX),
        Unit::Count,
        "Total articles created"
    );

    describe_counter!(
        format!("{}_articles_deleted_total", METRICS_PREFIX),
        Unit::Count,
        "Total articles deleted"
    );

    describe_counter!(
        format!("{}_exports_total", METRICS_PREFIX),
        Unit::Count,
        "Total text exports served"
    );

    describe_counter!(
        format!("{}_generation_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total generation API requests"
    );

    describe_histogram!(
        format!("{}_generation_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Article generation latency in seconds"
    );

    tracing::info!("Metrics registered");
}

/// Record an article creation
pub fn record_article_created() {
    counter!(format!("{}_articles_created_total", METRICS_PREFIX)).increment(1);
}

/// Record an article deletion
pub fn record_article_deleted() {
    counter!(format!("{}_articles_deleted_total", METRICS_PREFIX)).increment(1);
}

/// Record a text export; `kind` is "article" or "adhoc"
pub fn record_export(kind: &str) {
    counter!(
        format!("{}_exports_total", METRICS_PREFIX),
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Helper to time one generation call
pub struct GenerationTimer {
    start: Instant,
    model: String,
}

impl GenerationTimer {
    /// Start timing a call to `model`
    pub fn start(model: &str) -> Self {
        Self {
            start: Instant::now(),
            model: model.to_string(),
        }
    }

    /// Record the outcome and return the elapsed seconds
    pub fn finish(self, success: bool) -> f64 {
        let duration = self.start.elapsed().as_secs_f64();
        let status = if success { "success" } else { "error" };

        counter!(
            format!("{}_generation_requests_total", METRICS_PREFIX),
            "model" => self.model.clone(),
            "status" => status
        )
        .increment(1);

        if success {
            histogram!(
                format!("{}_generation_duration_seconds", METRICS_PREFIX),
                "model" => self.model
            )
            .record(duration);
        }

        duration
    }
}
