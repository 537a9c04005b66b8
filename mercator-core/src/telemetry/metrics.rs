//! Prometheus metrics setup and metric definitions

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sqlx::MySqlPool;
use std::time::Duration;

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle> {
    // Seconds; includes sub-millisecond buckets for fast endpoints
    let buckets = [
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit initial values so HELP/TYPE lines
/// appear from startup, not just after first use.
pub fn describe_metrics() {
    describe_counter!("mercator_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "mercator_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "mercator_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    describe_gauge!(
        "mercator_db_pool_connections_active",
        "Number of active database connections"
    );
    describe_gauge!(
        "mercator_db_pool_connections_idle",
        "Number of idle database connections"
    );

    describe_counter!("mercator_mappings_created_total", "Domain mappings created");
    describe_counter!("mercator_mappings_deleted_total", "Domain mappings deleted");
    describe_counter!(
        "mercator_primary_domain_promotions_total",
        "Mappings promoted to a site's primary domain"
    );

    counter!("mercator_mappings_created_total").absolute(0);
    counter!("mercator_mappings_deleted_total").absolute(0);
    counter!("mercator_primary_domain_promotions_total").absolute(0);
    gauge!("mercator_http_requests_in_flight").set(0.0);
}

/// Periodically publish connection pool gauges.
pub fn spawn_pool_metrics_task(pool: MySqlPool) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(15));
        loop {
            interval.tick().await;
            let size = pool.size() as f64;
            let idle = pool.num_idle() as f64;
            gauge!("mercator_db_pool_connections_active").set(size - idle);
            gauge!("mercator_db_pool_connections_idle").set(idle);
        }
    })
}
