//! Metrics collection and exposition.
//!
//! # Metrics
//! - `catalog_admission_total` (counter): admission decisions by `decision`
//! - `catalog_tracked_clients` (gauge): buckets held by the limiter
//! - `catalog_evicted_clients_total` (counter): idle buckets removed
//! - `catalog_validation_failures_total` (counter): rejected list queries by `entity`
//! - `catalog_list_queries_total` (counter): store round trips by `entity`, `outcome`
//! - `catalog_list_query_duration_seconds` (histogram): store latency by `entity`

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_admission(allowed: bool) {
    let decision = if allowed { "allowed" } else { "rejected" };
    counter!("catalog_admission_total", "decision" => decision).increment(1);
}

pub fn record_tracked_clients(count: usize) {
    gauge!("catalog_tracked_clients").set(count as f64);
}

pub fn record_evicted(count: usize) {
    counter!("catalog_evicted_clients_total").increment(count as u64);
}

pub fn record_validation_failure(entity: &'static str) {
    counter!("catalog_validation_failures_total", "entity" => entity).increment(1);
}

pub fn record_list_query(entity: &'static str, ok: bool, start: Instant) {
    let outcome = if ok { "ok" } else { "error" };
    counter!("catalog_list_queries_total", "entity" => entity, "outcome" => outcome).increment(1);
    histogram!("catalog_list_query_duration_seconds", "entity" => entity)
        .record(start.elapsed().as_secs_f64());
}
