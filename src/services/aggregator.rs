//! Time-bucketing growth aggregation.
//!
//! Reads raw sample ranges from the store and reduces them with
//! [`positive_growth`]. Nothing is cached; every call recomputes from the rows the
//! store returns, so cleanups and late reports are reflected immediately.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    EntityKey, MonthComparison, MonthlyGrowth, Namespace, SamplePoint, SampleRange, YearMonth,
};
use crate::domain::ports::SampleRepository;
use crate::services::growth::positive_growth;

/// Number of most recent months kept by [`GrowthAggregator::monthly_growth`].
pub const MONTHLY_HISTORY_LIMIT: usize = 12;

/// Default look-back for [`GrowthAggregator::history`].
pub const DEFAULT_HISTORY_DAYS: i64 = 30;

pub struct GrowthAggregator<R: SampleRepository> {
    repository: Arc<R>,
}

impl<R: SampleRepository> Clone for GrowthAggregator<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: SampleRepository> GrowthAggregator<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Per-month growth for the most recent twelve months that have samples,
    /// newest first. Months without samples are absent, never zero-filled.
    pub async fn monthly_growth(
        &self,
        key: &EntityKey,
        namespace: Namespace,
    ) -> DomainResult<Vec<MonthlyGrowth>> {
        let points = self
            .repository
            .query_range(namespace, key, SampleRange::all())
            .await?;
        Ok(bucket_by_month(&points))
    }

    /// Growth for the calendar month containing now and the month before it.
    pub async fn current_and_previous_month_growth(
        &self,
        key: &EntityKey,
        namespace: Namespace,
    ) -> DomainResult<MonthComparison> {
        self.current_and_previous_month_growth_at(key, namespace, Utc::now())
            .await
    }

    /// As [`Self::current_and_previous_month_growth`], evaluated at `now`.
    pub async fn current_and_previous_month_growth_at(
        &self,
        key: &EntityKey,
        namespace: Namespace,
        now: DateTime<Utc>,
    ) -> DomainResult<MonthComparison> {
        let current_month = YearMonth::of(now);
        let previous_month = current_month.previous();

        let current_month_growth = self.month_growth(key, namespace, current_month).await?;
        let previous_month_growth = self.month_growth(key, namespace, previous_month).await?;

        Ok(MonthComparison {
            current_month,
            current_month_growth,
            previous_month,
            previous_month_growth,
        })
    }

    /// Current production: growth over the current calendar month.
    ///
    /// Always equal to `current_month_growth` from
    /// [`Self::current_and_previous_month_growth`] at the same instant.
    pub async fn window_growth(&self, key: &EntityKey, namespace: Namespace) -> DomainResult<f64> {
        self.window_growth_at(key, namespace, Utc::now()).await
    }

    /// As [`Self::window_growth`], evaluated at `now`.
    pub async fn window_growth_at(
        &self,
        key: &EntityKey,
        namespace: Namespace,
        now: DateTime<Utc>,
    ) -> DomainResult<f64> {
        self.month_growth(key, namespace, YearMonth::of(now)).await
    }

    /// Growth over one calendar month; `0.0` when the month has no samples.
    pub async fn month_growth(
        &self,
        key: &EntityKey,
        namespace: Namespace,
        month: YearMonth,
    ) -> DomainResult<f64> {
        let points = self
            .repository
            .query_range(namespace, key, SampleRange::month(month))
            .await?;
        Ok(positive_growth(&sizes(&points)))
    }

    /// Growth over the entity's entire recorded history.
    pub async fn range_growth(&self, key: &EntityKey, namespace: Namespace) -> DomainResult<f64> {
        let points = self
            .repository
            .query_range(namespace, key, SampleRange::all())
            .await?;
        Ok(positive_growth(&sizes(&points)))
    }

    /// Raw samples from the last `days` days, oldest first.
    pub async fn history(
        &self,
        key: &EntityKey,
        namespace: Namespace,
        days: i64,
    ) -> DomainResult<Vec<SamplePoint>> {
        self.history_at(key, namespace, days, Utc::now()).await
    }

    /// As [`Self::history`], evaluated at `now`.
    pub async fn history_at(
        &self,
        key: &EntityKey,
        namespace: Namespace,
        days: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<SamplePoint>> {
        if days < 1 {
            return Err(DomainError::InvalidValue {
                field: "days",
                reason: format!("must be at least 1, got {days}"),
            });
        }
        let since = Duration::try_days(days)
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| DomainError::InvalidValue {
                field: "days",
                reason: format!("{days} days is out of range"),
            })?;
        self.repository
            .query_range(namespace, key, SampleRange::since(since))
            .await
    }
}

fn sizes(points: &[SamplePoint]) -> Vec<f64> {
    points.iter().map(|p| p.size_mb).collect()
}

/// Group chronologically ordered points by calendar month and reduce each bucket.
///
/// Output is newest month first, limited to [`MONTHLY_HISTORY_LIMIT`] entries.
pub fn bucket_by_month(points: &[SamplePoint]) -> Vec<MonthlyGrowth> {
    let mut buckets: BTreeMap<YearMonth, Vec<f64>> = BTreeMap::new();
    for point in points {
        buckets
            .entry(YearMonth::of(point.recorded_at))
            .or_default()
            .push(point.size_mb);
    }

    buckets
        .into_iter()
        .rev()
        .take(MONTHLY_HISTORY_LIMIT)
        .map(|(month, values)| MonthlyGrowth {
            month,
            growth_mb: positive_growth(&values),
            max_size_mb: values.iter().copied().fold(f64::MIN, f64::max),
        })
        .collect()
}
