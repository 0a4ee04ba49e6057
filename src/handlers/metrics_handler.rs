use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Prometheus text exposition format
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Handle the Prometheus scrape endpoint
/// Login and ranking counters plus the ranking latency histogram
pub async fn scrape(State(handle): State<Arc<PrometheusHandle>>) -> Response {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        handle.render(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{record_login, record_ranking};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_scrape_exposes_recorded_outcomes() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = Arc::new(recorder.handle());

        ::metrics::with_local_recorder(&recorder, || {
            record_login("success");
            record_login("failure");
            record_login("failure");
            record_ranking("Inpatient", "unknown_label");
        });

        let response = scrape(State(handle)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            EXPOSITION_CONTENT_TYPE
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains(r#"medirank_login_attempts_total{outcome="failure"} 2"#));
        assert!(text.lines().any(|line| line.starts_with("medirank_rankings_total{")
            && line.contains(r#"service_type="Inpatient""#)
            && line.contains(r#"outcome="unknown_label""#)
            && line.ends_with(" 1")));
    }
}
