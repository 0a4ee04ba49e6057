use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics exporter
/// Fails if a global recorder is already installed
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "medirank_login_attempts_total",
        "Total number of login attempts"
    );
    describe_counter!(
        "medirank_rankings_total",
        "Total number of ranking requests"
    );
    describe_histogram!(
        "medirank_ranking_duration_seconds",
        "Ranking pipeline duration in seconds"
    );
    describe_gauge!("medirank_info", "Service version information");

    gauge!("medirank_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a login attempt; outcome is "success" or "failure"
pub fn record_login(outcome: &str) {
    counter!("medirank_login_attempts_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a ranking request and its outcome
pub fn record_ranking(service_type: &str, outcome: &str) {
    counter!(
        "medirank_rankings_total",
        "service_type" => service_type.to_string(),
        "outcome" => outcome.to_string(),
    )
    .increment(1);
}

pub fn record_ranking_duration(service_type: &str, duration: Duration) {
    histogram!(
        "medirank_ranking_duration_seconds",
        "service_type" => service_type.to_string(),
    )
    .record(duration.as_secs_f64());
}
