//! Metrics and observability utilities
//!
//! Prometheus metrics with standardized naming conventions.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};

/// Metrics prefix for all spectra metrics
pub const METRICS_PREFIX: &str = "spectra";

/// Histogram buckets for request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.075, 0.100, 0.150, 0.250, 0.500, 1.000, 2.500, 5.000,
    10.00,
];

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
        format!("{}_search_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of record search queries"
    );

    describe_counter!(
        format!("{}_search_short_circuits_total", METRICS_PREFIX),
        Unit::Count,
        "Search requests resolved to an empty plan without touching storage"
    );

    describe_histogram!(
        format!("{}_search_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Search query latency in seconds"
    );

    describe_gauge!(
        format!("{}_search_results_count", METRICS_PREFIX),
        Unit::Count,
        "Number of results returned from search"
    );

    describe_counter!(
        format!("{}_blob_fetches_total", METRICS_PREFIX),
        Unit::Count,
        "Total single-record binary payload fetches (PDF/image)"
    );
}

/// Record a completed search operation
pub fn record_search(duration_secs: f64, result_count: usize) {
    counter!(format!("{}_search_queries_total", METRICS_PREFIX)).increment(1);
    histogram!(format!("{}_search_duration_seconds", METRICS_PREFIX)).record(duration_secs);
    gauge!(format!("{}_search_results_count", METRICS_PREFIX)).set(result_count as f64);
}

/// Record a search that short-circuited to an empty plan
pub fn record_search_short_circuit() {
    counter!(format!("{}_search_short_circuits_total", METRICS_PREFIX)).increment(1);
}

/// Record a binary payload fetch, labeled by kind ("pdf" or "image")
pub fn record_blob_fetch(kind: &'static str) {
    counter!(format!("{}_blob_fetches_total", METRICS_PREFIX), "kind" => kind).increment(1);
}
