use actix_web::HttpResponse;
use prometheus::{
    register_counter, register_gauge, register_histogram, register_int_counter_vec, Counter, Gauge, Histogram,
    IntCounterVec,
};

// Defines Prometheus metrics for monitoring the typing-test API
lazy_static::lazy_static! {
    // Counter for typing results stored
    pub static ref RESULTS_SUBMITTED: Counter = register_counter!(
        "typvp_results_submitted_total",
        "Total typing results stored"
    ).unwrap();

    // Counter for typing results that failed validation or storage
    pub static ref RESULTS_REJECTED: Counter = register_counter!(
        "typvp_results_rejected_total",
        "Total typing results rejected"
    ).unwrap();

    // Counter for practice word sets handed out
    pub static ref WORD_SETS_ISSUED: Counter = register_counter!(
        "typvp_word_sets_issued_total",
        "Total practice word sets issued"
    ).unwrap();

    // Gauge for the number of word sets held for resumption
    pub static ref CACHED_WORD_SETS: Gauge = register_gauge!(
        "typvp_cached_word_sets",
        "Number of word sets held in the resumption cache"
    ).unwrap();

    // Histogram for GraphQL request execution time in seconds
    pub static ref REQUEST_TIME: Histogram = register_histogram!(
        "typvp_graphql_request_seconds",
        "GraphQL request execution time in seconds"
    ).unwrap();

    // Counter for top-level GraphQL fields, labelled by field name
    pub static ref FIELDS_REQUESTED: IntCounterVec = register_int_counter_vec!(
        "typvp_graphql_fields_requested_total",
        "Total top-level GraphQL fields requested",
        &["field"]
    ).unwrap();
}

// Handles GET /metrics requests to expose Prometheus metrics
pub async fn metrics() -> HttpResponse {
    let encoder = prometheus::TextEncoder::new();
    let metric_families = prometheus::gather();
    let encoded = encoder.encode_to_string(&metric_families).unwrap_or_default();
    HttpResponse::Ok().body(encoded)
}
