//! Metrics collection and exposition.
//!
//! # Metrics
//! - `geo_vault_rpc_requests_total` (counter): RPC calls by method, outcome
//! - `geo_vault_tx_submitted_total` (counter): accepted submissions by action
//! - `geo_vault_tx_submission_failures_total` (counter): rejected submissions by action, reason
//! - `geo_vault_tx_resolved_total` (counter): terminal tracker states by outcome
//! - `geo_vault_confirmation_seconds` (histogram): submit-to-terminal latency
//! - `geo_vault_wallet_connected` (gauge): 1=connected, 0=disconnected

use std::net::SocketAddr;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_rpc_request(method: &'static str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    counter!("geo_vault_rpc_requests_total", "method" => method, "outcome" => outcome).increment(1);
}

pub fn record_submission(action: &'static str) {
    counter!("geo_vault_tx_submitted_total", "action" => action).increment(1);
}

pub fn record_submission_failure(action: &'static str, reason: &'static str) {
    counter!(
        "geo_vault_tx_submission_failures_total",
        "action" => action,
        "reason" => reason
    )
    .increment(1);
}

pub fn record_resolution(outcome: &'static str, elapsed_secs: f64) {
    counter!("geo_vault_tx_resolved_total", "outcome" => outcome).increment(1);
    histogram!("geo_vault_confirmation_seconds", "outcome" => outcome).record(elapsed_secs);
}

pub fn record_wallet_connected(connected: bool) {
    gauge!("geo_vault_wallet_connected").set(if connected { 1.0 } else { 0.0 });
}
