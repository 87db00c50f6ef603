//! # Metrics Collection
//!
//! Counters for authentication, scope decisions, token issuance and HTTP
//! traffic, recorded through the `metrics` facade. With the `prometheus`
//! feature the exporter is installed on `observability.metrics_port`.

use crate::config::ObservabilityConfig;
use crate::errors::Result;
use tracing::info;
use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Metrics recorder that tracks application metrics
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    /// Create a new metrics recorder instance
    pub fn new() -> Self {
        Self
    }

    /// Record an HTTP request
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration: f64) {
        let labels = [
            ("method", method.to_string()),
            ("path", path.to_string()),
            ("status", status.to_string()),
        ];
        counter!("http_requests_total", &labels).increment(1);

        let duration_labels = [("method", method.to_string()), ("path", path.to_string())];
        histogram!("http_request_duration_seconds", &duration_labels).record(duration);
    }

    /// Record an authentication attempt outcome
    pub fn record_authentication(&self, status: &str) {
        let labels = [("status", status.to_string())];
        counter!("auth_attempts_total", &labels).increment(1);
    }

    /// Record a scope check made for a remote method
    pub fn record_scope_decision(&self, method: &str, allowed: bool) {
        let outcome = if allowed { "allow" } else { "deny" };
        let labels = [("method", method.to_string()), ("outcome", outcome.to_string())];
        counter!("scope_decisions_total", &labels).increment(1);
    }

    /// Record access token creation
    pub fn record_token_created(&self, scope_count: usize) {
        counter!("tokens_created_total").increment(1);
        histogram!("token_scope_count").record(scope_count as f64);
    }

    /// Record access token removal (logout or expiry)
    pub fn record_token_removed(&self, reason: &str, count: u64) {
        let labels = [("reason", reason.to_string())];
        counter!("tokens_removed_total", &labels).increment(count);
    }

    /// Record the number of stored access tokens
    pub fn set_active_tokens(&self, count: usize) {
        gauge!("active_tokens").set(count as f64);
    }

    fn describe(&self) {
        describe_counter!("http_requests_total", Unit::Count, "HTTP requests by route and status");
        describe_histogram!(
            "http_request_duration_seconds",
            Unit::Seconds,
            "HTTP request latency"
        );
        describe_counter!("auth_attempts_total", Unit::Count, "Authentication outcomes");
        describe_counter!(
            "scope_decisions_total",
            Unit::Count,
            "Remote method scope checks by outcome"
        );
        describe_counter!("tokens_created_total", Unit::Count, "Access tokens issued");
        describe_histogram!("token_scope_count", Unit::Count, "Scopes granted per issued token");
        describe_counter!("tokens_removed_total", Unit::Count, "Access tokens removed");
        describe_gauge!("active_tokens", Unit::Count, "Access tokens currently stored");
    }
}

/// Global metrics recorder instance
static METRICS: once_cell::sync::Lazy<Arc<RwLock<Option<MetricsRecorder>>>> =
    once_cell::sync::Lazy::new(|| Arc::new(RwLock::new(None)));

/// Initialize metrics collection and, with the `prometheus` feature, the exporter
pub async fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    if !config.enable_metrics {
        return Ok(());
    }

    #[cfg(feature = "prometheus")]
    install_exporter(config)?;

    let recorder = MetricsRecorder::new();
    recorder.describe();
    {
        let mut metrics = METRICS.write().await;
        *metrics = Some(recorder);
    }

    info!(service_name = %config.service_name, "Metrics collection initialized");
    Ok(())
}

#[cfg(feature = "prometheus")]
fn install_exporter(config: &ObservabilityConfig) -> Result<()> {
    use crate::errors::Error;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let Some(metrics_addr) = config.metrics_bind_address() else {
        tracing::warn!("Metrics exporter disabled: no bind address configured");
        return Ok(());
    };

    let socket_addr: SocketAddr = metrics_addr.parse().map_err(|e| {
        Error::config(format!("Invalid metrics bind address '{}': {}", metrics_addr, e))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .add_global_label("service", &config.service_name)
        .install()
        .map_err(|e| Error::config(format!("Failed to initialize metrics exporter: {}", e)))?;

    info!(metrics_addr = %metrics_addr, "Prometheus exporter listening");
    Ok(())
}

/// Get the global metrics recorder
pub async fn get_metrics() -> Option<MetricsRecorder> {
    METRICS.read().await.clone()
}

/// Record an HTTP request using the global metrics recorder
pub async fn record_http_request(method: &str, path: &str, status: u16, duration: f64) {
    if let Some(metrics) = get_metrics().await {
        metrics.record_http_request(method, path, status, duration);
    }
}

/// Record authentication attempt outcome via the global recorder
pub async fn record_authentication(status: &str) {
    if let Some(metrics) = get_metrics().await {
        metrics.record_authentication(status);
    }
}

/// Record a remote method scope decision via the global recorder
pub async fn record_scope_decision(method: &str, allowed: bool) {
    if let Some(metrics) = get_metrics().await {
        metrics.record_scope_decision(method, allowed);
    }
}

/// Record access token creation via the global recorder
pub async fn record_token_created(scope_count: usize) {
    if let Some(metrics) = get_metrics().await {
        metrics.record_token_created(scope_count);
    }
}

/// Record access token removal via the global recorder
pub async fn record_token_removed(reason: &str, count: u64) {
    if let Some(metrics) = get_metrics().await {
        metrics.record_token_removed(reason, count);
    }
}

/// Update the stored-token gauge via the global recorder
pub async fn set_active_tokens(count: usize) {
    if let Some(metrics) = get_metrics().await {
        metrics.set_active_tokens(count);
    }
}
