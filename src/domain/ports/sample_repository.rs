//! Sample store port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EntityKey, Namespace, NewSample, Sample, SamplePoint, SampleRange};

/// Append-only store of disk usage samples, partitioned by namespace.
///
/// Every method takes the namespace explicitly; implementations must never let
/// one namespace observe another's rows.
#[async_trait]
pub trait SampleRepository: Send + Sync {
    /// Append one sample and return it with its store-assigned id.
    async fn insert(&self, namespace: Namespace, sample: &NewSample) -> DomainResult<Sample>;

    /// Samples for `key` matching `range`, ordered by `recorded_at` then id, ascending.
    async fn query_range(
        &self,
        namespace: Namespace,
        key: &EntityKey,
        range: SampleRange,
    ) -> DomainResult<Vec<SamplePoint>>;

    /// Every distinct entity key with at least one sample, in lexical order.
    async fn distinct_entities(&self, namespace: Namespace) -> DomainResult<Vec<EntityKey>>;

    /// The sample with the greatest `recorded_at` (highest id on ties).
    async fn latest(&self, namespace: Namespace, key: &EntityKey) -> DomainResult<Option<SamplePoint>>;

    /// Number of samples stored for `key`.
    async fn count(&self, namespace: Namespace, key: &EntityKey) -> DomainResult<u64>;

    /// Delete every sample in the namespace. Returns the number of rows removed.
    async fn purge(&self, namespace: Namespace) -> DomainResult<u64>;

    /// Atomically replace the namespace's contents with `samples`.
    ///
    /// Either every sample lands and the old rows are gone, or nothing changes.
    /// Returns the number of rows written.
    async fn replace_all(&self, namespace: Namespace, samples: &[NewSample]) -> DomainResult<u64>;
}
