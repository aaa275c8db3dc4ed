//! Agent report ingestion.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Namespace, NewSample, ReportPayload, Sample};
use crate::domain::ports::{MetricsSink, SampleRepository};

/// Validates agent reports and appends them to the sample store.
///
/// A report either lands as exactly one row or is rejected with a specific reason
/// and nothing is written. The token is checked before anything else, so a bad
/// token is rejected no matter what the rest of the payload looks like.
pub struct IngestionGate<R: SampleRepository> {
    repository: Arc<R>,
    metrics: Arc<dyn MetricsSink>,
    api_token: String,
}

impl<R: SampleRepository> Clone for IngestionGate<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            metrics: Arc::clone(&self.metrics),
            api_token: self.api_token.clone(),
        }
    }
}

impl<R: SampleRepository> IngestionGate<R> {
    pub fn new(repository: Arc<R>, metrics: Arc<dyn MetricsSink>, api_token: impl Into<String>) -> Self {
        Self {
            repository,
            metrics,
            api_token: api_token.into(),
        }
    }

    /// Accept a report, stamping it with the server clock.
    pub async fn ingest(&self, namespace: Namespace, payload: &ReportPayload) -> DomainResult<Sample> {
        self.ingest_at(namespace, payload, Utc::now()).await
    }

    /// Check a presented token against the configured secret.
    ///
    /// Adapters call this before decoding the rest of a request so that a bad
    /// token is reported as such whatever else the request contains.
    pub fn authenticate(&self, presented: Option<&str>) -> DomainResult<()> {
        if tokens_match(presented.unwrap_or_default(), &self.api_token) {
            Ok(())
        } else {
            Err(DomainError::InvalidToken)
        }
    }

    /// As [`Self::ingest`], with an explicit receive time.
    pub async fn ingest_at(
        &self,
        namespace: Namespace,
        payload: &ReportPayload,
        received_at: DateTime<Utc>,
    ) -> DomainResult<Sample> {
        self.authenticate(payload.token.as_deref()).inspect_err(|_| {
            tracing::warn!(%namespace, "rejected report: invalid token");
        })?;

        let report = payload.validate_fields().inspect_err(|e| {
            tracing::warn!(%namespace, reason = %e, "rejected report");
        })?;

        let sample = NewSample {
            key: report.key,
            path: report.path,
            size_mb: report.size_mb,
            recorded_at: received_at,
        };
        let stored = self.repository.insert(namespace, &sample).await?;

        if let Err(e) = self.metrics.record_report(&stored.key) {
            tracing::warn!(key = %stored.key, error = %e, "failed to record report metric");
        }

        tracing::debug!(
            %namespace,
            site = %stored.key.site,
            sub_site = %stored.key.sub_site,
            server_type = %stored.key.server_type,
            size_mb = stored.size_mb,
            id = stored.id,
            "report recorded"
        );
        Ok(stored)
    }
}

/// Compare tokens without short-circuiting on the first differing byte.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let a = presented.as_bytes();
    let b = expected.as_bytes();
    let mut diff = a.len() ^ b.len();
    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= usize::from(x ^ y);
    }
    diff == 0
}
