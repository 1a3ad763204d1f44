//! Metrics collection and exposition.
//!
//! # Metrics
//! - `send_eth_transfers_total` (counter): transfer requests by outcome
//! - `send_eth_rpc_duration_seconds` (histogram): node round trip latency by operation
//! - `send_eth_rpc_failures_total` (counter): failed node round trips by operation

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one transfer request.
pub fn record_transfer(outcome: &'static str) {
    metrics::counter!("send_eth_transfers_total", "outcome" => outcome).increment(1);
}

/// Record a node round trip.
pub fn record_rpc(operation: &'static str, started: Instant, success: bool) {
    metrics::histogram!("send_eth_rpc_duration_seconds", "operation" => operation)
        .record(started.elapsed().as_secs_f64());
    if !success {
        metrics::counter!("send_eth_rpc_failures_total", "operation" => operation).increment(1);
    }
}
