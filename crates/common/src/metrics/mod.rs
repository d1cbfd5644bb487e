//! Metrics and observability utilities
//!
//! Prometheus-style metric names under a shared prefix, plus small helpers
//! for recording HTTP requests, store operations, and save outcomes.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all zodiac metrics
pub const METRICS_PREFIX: &str = "zodiac";

/// Histogram buckets for request and query latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
];

/// Result of a save attempt, as counted in metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Duplicate,
    Invalid,
    Failed,
}

impl SaveOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveOutcome::Saved => "saved",
            SaveOutcome::Duplicate => "duplicate",
            SaveOutcome::Invalid => "invalid",
            SaveOutcome::Failed => "failed",
        }
    }
}

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        format!("{}_save_attempts_total", METRICS_PREFIX),
        Unit::Count,
        "Reading save attempts by outcome"
    );

    describe_histogram!(
        format!("{}_store_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Reading store operation latency in seconds"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Times one store operation; records on `finish`
pub struct StoreTimer {
    start: Instant,
    operation: &'static str,
}

impl StoreTimer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    pub fn finish(self) {
        histogram!(
            format!("{}_store_duration_seconds", METRICS_PREFIX),
            "operation" => self.operation
        )
        .record(self.start.elapsed().as_secs_f64());
    }
}

/// Helper to record the outcome of a save attempt
pub fn record_save(outcome: SaveOutcome) {
    counter!(
        format!("{}_save_attempts_total", METRICS_PREFIX),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}
