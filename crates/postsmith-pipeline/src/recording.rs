// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; without an installed recorder every call is a
//! no-op.

use metrics::{describe_counter, describe_histogram};

/// Register all postsmith metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "postsmith_publish_total",
        "Publish workflow runs by outcome"
    );
    describe_counter!(
        "postsmith_rate_gate_denied_total",
        "Requests denied by the local rate gate"
    );
    describe_counter!(
        "postsmith_upstream_retries_total",
        "Post retries after an upstream 429"
    );
    describe_counter!(
        "postsmith_generation_fallback_total",
        "Text generations replaced by the fallback text"
    );
    describe_histogram!(
        "postsmith_publish_duration_seconds",
        "Publish workflow duration in seconds"
    );
}

/// Record a finished workflow run. `outcome` is `success` or an error kind.
pub fn record_publish(outcome: &str) {
    metrics::counter!("postsmith_publish_total", "outcome" => outcome.to_string()).increment(1);
}

pub fn record_gate_denied() {
    metrics::counter!("postsmith_rate_gate_denied_total").increment(1);
}

pub fn record_retry() {
    metrics::counter!("postsmith_upstream_retries_total").increment(1);
}

pub fn record_fallback() {
    metrics::counter!("postsmith_generation_fallback_total").increment(1);
}

pub fn record_duration(seconds: f64) {
    metrics::histogram!("postsmith_publish_duration_seconds").record(seconds);
}
