//! Cross-entity summary for the dashboard overview.

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{DashboardRow, Namespace, SummaryRow};
use crate::domain::ports::SampleRepository;
use crate::services::aggregator::GrowthAggregator;
use crate::services::growth::mean_mb;

pub struct SummaryCompiler<R: SampleRepository> {
    repository: Arc<R>,
    aggregator: GrowthAggregator<R>,
}

impl<R: SampleRepository> Clone for SummaryCompiler<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            aggregator: self.aggregator.clone(),
        }
    }
}

impl<R: SampleRepository> SummaryCompiler<R> {
    pub fn new(repository: Arc<R>) -> Self {
        let aggregator = GrowthAggregator::new(Arc::clone(&repository));
        Self { repository, aggregator }
    }

    /// Latest sample of every entity in the namespace, ordered by site, sub-site
    /// and server type.
    pub async fn all_entities_summary(&self, namespace: Namespace) -> DomainResult<Vec<SummaryRow>> {
        let mut keys = self.repository.distinct_entities(namespace).await?;
        keys.sort();

        let mut rows = Vec::with_capacity(keys.len());
        for key in keys {
            // An entity can vanish between the two queries if the namespace is purged.
            if let Some(latest) = self.repository.latest(namespace, &key).await? {
                rows.push(SummaryRow {
                    key,
                    size_mb: latest.size_mb,
                    recorded_at: latest.recorded_at,
                });
            }
        }
        Ok(rows)
    }

    /// Summary rows enriched with current-month production and the average
    /// monthly growth over the last twelve recorded months.
    pub async fn dashboard(&self, namespace: Namespace) -> DomainResult<Vec<DashboardRow>> {
        self.dashboard_at(namespace, Utc::now()).await
    }

    /// As [`Self::dashboard`], evaluated at `now`.
    pub async fn dashboard_at(
        &self,
        namespace: Namespace,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<DashboardRow>> {
        let rows = self.all_entities_summary(namespace).await?;
        tracing::debug!(%namespace, entities = rows.len(), "compiling dashboard summary");

        try_join_all(rows.into_iter().map(|row| self.enrich(row, namespace, now))).await
    }

    async fn enrich(
        &self,
        row: SummaryRow,
        namespace: Namespace,
        now: DateTime<Utc>,
    ) -> DomainResult<DashboardRow> {
        let growth_30d = self.aggregator.window_growth_at(&row.key, namespace, now).await?;
        let monthly = self.aggregator.monthly_growth(&row.key, namespace).await?;
        let monthly_avg_growth = mean_mb(monthly.iter().map(|m| m.growth_mb));

        Ok(DashboardRow {
            row,
            growth_30d,
            monthly_avg_growth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_repository, SqliteSampleRepository};
    use crate::domain::models::{EntityKey, NewSample};
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    async fn setup() -> (Arc<SqliteSampleRepository>, SummaryCompiler<SqliteSampleRepository>) {
        let repo = Arc::new(create_migrated_test_repository().await.unwrap());
        let compiler = SummaryCompiler::new(Arc::clone(&repo));
        (repo, compiler)
    }

    async fn seed(repo: &SqliteSampleRepository, key: &EntityKey, points: &[(f64, DateTime<Utc>)]) {
        for (size, when) in points {
            repo.insert(Namespace::Production, &NewSample::new(key.clone(), "/data", *size).recorded_at(*when))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_summary_empty_namespace() {
        let (_, compiler) = setup().await;
        assert!(compiler.all_entities_summary(Namespace::Production).await.unwrap().is_empty());
        assert!(compiler.dashboard(Namespace::Test).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary_picks_latest_sample_per_entity() {
        let (repo, compiler) = setup().await;
        let log = EntityKey::new("Site_A", "SubSite_1", "log_server");
        let backup = EntityKey::new("Site_A", "SubSite_1", "backup_server");
        seed(&repo, &log, &[(300.0, at(2026, 1, 3, 0)), (100.0, at(2026, 1, 1, 0))]).await;
        seed(&repo, &backup, &[(50.0, at(2026, 1, 2, 0))]).await;

        let rows = compiler.all_entities_summary(Namespace::Production).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, backup);
        assert_eq!(rows[1].key, log);
        assert!((rows[1].size_mb - 300.0).abs() < f64::EPSILON);
        assert_eq!(rows[1].recorded_at, at(2026, 1, 3, 0));
    }

    #[tokio::test]
    async fn test_summary_tie_prefers_last_inserted() {
        let (repo, compiler) = setup().await;
        let key = EntityKey::new("Site_B", "SubSite_5", "log_server");
        seed(&repo, &key, &[(10.0, at(2026, 2, 1, 0)), (20.0, at(2026, 2, 1, 0))]).await;

        let rows = compiler.all_entities_summary(Namespace::Production).await.unwrap();
        assert!((rows[0].size_mb - 20.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_dashboard_enrichment() {
        let (repo, compiler) = setup().await;
        let key = EntityKey::new("Site_A", "SubSite_2", "log_server");
        // September: 10 -> 50 -> 20 -> 60 = 80; October: 100 -> 130 -> 90 -> 110 = 50
        seed(
            &repo,
            &key,
            &[
                (10.0, at(2026, 9, 2, 0)),
                (50.0, at(2026, 9, 10, 0)),
                (20.0, at(2026, 9, 11, 0)),
                (60.0, at(2026, 9, 20, 0)),
                (100.0, at(2026, 10, 1, 0)),
                (130.0, at(2026, 10, 5, 0)),
                (90.0, at(2026, 10, 6, 0)),
                (110.0, at(2026, 10, 7, 0)),
            ],
        )
        .await;

        let rows = compiler.dashboard_at(Namespace::Production, at(2026, 10, 19, 12)).await.unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert!((row.row.size_mb - 110.0).abs() < f64::EPSILON);
        assert!((row.growth_30d - 50.0).abs() < 1e-9);
        assert!((row.monthly_avg_growth - 65.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_dashboard_no_current_month_data() {
        let (repo, compiler) = setup().await;
        let key = EntityKey::new("Site_A", "SubSite_4", "backup_server");
        seed(&repo, &key, &[(10.0, at(2026, 3, 1, 0)), (15.0, at(2026, 3, 2, 0))]).await;

        let rows = compiler.dashboard_at(Namespace::Production, at(2026, 10, 19, 12)).await.unwrap();
        assert!((rows[0].growth_30d).abs() < f64::EPSILON);
        assert!((rows[0].monthly_avg_growth - 5.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_dashboard_serializes_flat() {
        let (repo, compiler) = setup().await;
        let key = EntityKey::new("Site_A", "SubSite_1", "log_server");
        seed(&repo, &key, &[(10.0, at(2026, 10, 1, 0))]).await;

        let rows = compiler.dashboard_at(Namespace::Production, at(2026, 10, 19, 12)).await.unwrap();
        let json = serde_json::to_value(&rows[0]).unwrap();
        for field in ["site", "sub_site", "server_type", "size_mb", "recorded_at", "growth_30d", "monthly_avg_growth"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
    }
}
