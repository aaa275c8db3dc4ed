//! In-process per-entity report counter.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::models::EntityKey;
use crate::domain::ports::{MetricsError, MetricsSink};

/// Counts accepted reports per entity key for Prometheus exposition.
#[derive(Debug, Default)]
pub struct ReportCounter {
    counts: RwLock<BTreeMap<EntityKey, u64>>,
}

impl ReportCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counts, ordered by entity key.
    pub fn snapshot(&self) -> Vec<(EntityKey, u64)> {
        self.counts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(key, count)| (key.clone(), *count))
            .collect()
    }

    pub fn get(&self, key: &EntityKey) -> u64 {
        self.counts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
            .unwrap_or(0)
    }
}

impl MetricsSink for ReportCounter {
    fn record_report(&self, key: &EntityKey) -> Result<(), MetricsError> {
        let mut counts = self.counts.write().unwrap_or_else(PoisonError::into_inner);
        *counts.entry(key.clone()).or_insert(0) += 1;
        Ok(())
    }
}
