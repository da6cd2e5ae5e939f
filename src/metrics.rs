use axum::{routing::get, Router};
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and register the pipeline counters at
    /// zero so the series are visible before the first request. Call once at
    /// boot.
    pub fn init() -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");

        describe_counter!(
            "campaign_generate_requests_total",
            "Campaign generation attempts (non-empty topic reached the pipeline)"
        );
        describe_counter!(
            "campaign_generate_failures_total",
            "Campaign generation failures at any pipeline stage"
        );
        counter!("campaign_generate_requests_total").absolute(0);
        counter!("campaign_generate_failures_total").absolute(0);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
