//! Prometheus metrics for the Donation Hub.
//!
//! All names follow `hub_<area>_<metric>_<unit>`.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // HTTP
    // =========================================================================

    pub static ref HTTP_REQUESTS: CounterVec = CounterVec::new(
        Opts::new("hub_http_requests_total", "HTTP requests served"),
        &["method", "status"]
    ).expect("metric creation failed");

    pub static ref HTTP_REQUEST_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "hub_http_request_duration_seconds",
            "Time from request received to response produced"
        ).buckets(exponential_buckets(0.0005, 2.0, 14).expect("valid buckets")),
        &["method"]
    ).expect("metric creation failed");

    // =========================================================================
    // DONATIONS
    // =========================================================================

    pub static ref DONATIONS_CREATED: Counter = Counter::new(
        "hub_donations_created_total",
        "Donations listed by donors"
    ).expect("metric creation failed");

    pub static ref DONATION_TRANSITIONS: CounterVec = CounterVec::new(
        Opts::new("hub_donation_transitions_total", "Donation status changes by target status"),
        &["to"]
    ).expect("metric creation failed");

    pub static ref NEARBY_QUERIES: Counter = Counter::new(
        "hub_nearby_queries_total",
        "Radius searches for available donations"
    ).expect("metric creation failed");

    // =========================================================================
    // VOLUNTEER REQUESTS
    // =========================================================================

    /// outcome: created / duplicate / rejected
    pub static ref VOLUNTEER_REQUESTS: CounterVec = CounterVec::new(
        Opts::new("hub_volunteer_requests_total", "Volunteer request creation attempts"),
        &["outcome"]
    ).expect("metric creation failed");

    pub static ref REQUEST_TRANSITIONS: CounterVec = CounterVec::new(
        Opts::new("hub_request_transitions_total", "Volunteer request status changes by target status"),
        &["to"]
    ).expect("metric creation failed");

    // =========================================================================
    // STORAGE
    // =========================================================================

    pub static ref STORE_RETRIES: CounterVec = CounterVec::new(
        Opts::new("hub_store_retries_total", "Storage calls retried after a transient failure"),
        &["operation"]
    ).expect("metric creation failed");
}

/// Register every metric with [`REGISTRY`].
///
/// Safe to call more than once; metrics already present are left alone.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(HTTP_REQUESTS.clone()),
        Box::new(HTTP_REQUEST_DURATION.clone()),
        Box::new(DONATIONS_CREATED.clone()),
        Box::new(DONATION_TRANSITIONS.clone()),
        Box::new(NEARBY_QUERIES.clone()),
        Box::new(VOLUNTEER_REQUESTS.clone()),
        Box::new(REQUEST_TRANSITIONS.clone()),
        Box::new(STORE_RETRIES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Render the registry in the Prometheus text exposition format.
pub fn gather_text() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
