//! Metrics emitted by the client.
//!
//! The library only records through the `metrics` facade; installing an
//! exporter is left to the application.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Register descriptions for every metric the workspace emits.
///
/// Safe to call more than once.
pub fn describe_metrics() {
    describe_counter!(
        "ticketdesk_api_requests_total",
        "Total number of backend API requests by resource and outcome"
    );
    describe_histogram!(
        "ticketdesk_api_request_duration_seconds",
        "Time from dispatch to settled response of backend API requests"
    );
    describe_counter!(
        "ticketdesk_notifications_shown_total",
        "Total number of notifications shown, by kind"
    );
    describe_counter!(
        "ticketdesk_geocoder_requests_total",
        "Total number of geocoder requests, by operation"
    );
}

/// How an API call settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Success envelope
    Success,
    /// Failure envelope or non-2xx response
    Failure,
    /// No response
    Network,
}

impl Outcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Network => "network",
        }
    }
}

/// API request metrics recorder.
pub struct ApiMetrics;

impl ApiMetrics {
    /// Record a settled request.
    pub fn record_request(resource: &str, outcome: Outcome, duration: Duration) {
        counter!(
            "ticketdesk_api_requests_total",
            "resource" => resource.to_string(),
            "outcome" => outcome.as_str()
        )
        .increment(1);
        histogram!("ticketdesk_api_request_duration_seconds", "resource" => resource.to_string())
            .record(duration.as_secs_f64());
    }
}
