//! Metrics sink port.

use thiserror::Error;

use crate::domain::models::EntityKey;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Metrics sink unavailable: {0}")]
    Unavailable(String),
}

/// Receives one labelled increment per accepted report.
///
/// Fire-and-forget: callers log failures and carry on.
pub trait MetricsSink: Send + Sync {
    fn record_report(&self, key: &EntityKey) -> Result<(), MetricsError>;
}

/// Sink that discards every increment.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMetricsSink;

impl MetricsSink for NullMetricsSink {
    fn record_report(&self, _key: &EntityKey) -> Result<(), MetricsError> {
        Ok(())
    }
}
