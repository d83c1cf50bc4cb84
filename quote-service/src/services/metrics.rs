//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and provides the /metrics endpoint handler.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder.
///
/// Later calls are no-ops. Metrics recorded before this runs are dropped.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if METRICS_HANDLE.set(handle).is_err() {
                tracing::debug!("Metrics handle already set");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Prometheus recorder");
        }
    }
}

/// Current metrics in Prometheus text format, for the /metrics endpoint.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}
