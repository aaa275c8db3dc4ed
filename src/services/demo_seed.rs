//! Synthetic history for the test namespace.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{EntityKey, Namespace, NewSample};
use crate::domain::ports::SampleRepository;

/// Days of history written per entity, ending today (61 samples).
pub const DEMO_HISTORY_DAYS: i64 = 60;

const DEMO_PATH: &str = "/data";

/// Fleet used when no sites are configured.
const DEFAULT_FLEET: &[(&str, &str, &str)] = &[
    ("Site_A", "SubSite_1", "log_server"),
    ("Site_A", "SubSite_1", "backup_server"),
    ("Site_A", "SubSite_2", "log_server"),
    ("Site_A", "SubSite_2", "backup_server"),
    ("Site_A", "SubSite_4", "log_server"),
    ("Site_A", "SubSite_4", "backup_server"),
    ("Site_A", "SubSite_6", "log_server"),
    ("Site_A", "SubSite_6", "backup_server"),
    ("Site_B", "SubSite_3", "log_server"),
    ("Site_B", "SubSite_3", "backup_log_server"),
    ("Site_B", "SubSite_5", "log_server"),
    ("Site_B", "SubSite_5", "backup_log_server"),
    ("Site_B", "SubSite_6", "log_server"),
    ("Site_B", "SubSite_6", "backup_log_server"),
    ("Site_B", "SubSite_Lab", "log_server"),
    ("Site_B", "SubSite_Lab", "backup_log_server"),
    ("Site_B", "SubSite_4", "log_server"),
    ("Site_B", "SubSite_4", "backup_log_server"),
];

pub fn default_fleet() -> Vec<EntityKey> {
    DEFAULT_FLEET
        .iter()
        .map(|(site, sub_site, server_type)| EntityKey::new(*site, *sub_site, *server_type))
        .collect()
}

/// Replaces the contents of the test namespace with plausible daily growth.
pub struct DemoSeeder<R: SampleRepository> {
    repository: Arc<R>,
    entities: Vec<EntityKey>,
}

impl<R: SampleRepository> Clone for DemoSeeder<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            entities: self.entities.clone(),
        }
    }
}

impl<R: SampleRepository> DemoSeeder<R> {
    /// `entities` is usually `Config::configured_entities()`; an empty list falls
    /// back to [`default_fleet`].
    pub fn new(repository: Arc<R>, entities: Vec<EntityKey>) -> Self {
        let entities = if entities.is_empty() { default_fleet() } else { entities };
        Self { repository, entities }
    }

    pub fn entities(&self) -> &[EntityKey] {
        &self.entities
    }

    /// Purge `namespace` and write fresh demo history ending at `now`.
    ///
    /// Only the test namespace may be seeded. Returns the number of rows written.
    pub async fn seed(&self, namespace: Namespace, now: DateTime<Utc>) -> DomainResult<u64> {
        let mut rng = StdRng::from_entropy();
        let samples = self.plan(now, &mut rng);
        self.write(namespace, samples).await
    }

    /// As [`Self::seed`] with a deterministic generator.
    pub async fn seed_with_seed(&self, namespace: Namespace, now: DateTime<Utc>, seed: u64) -> DomainResult<u64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let samples = self.plan(now, &mut rng);
        self.write(namespace, samples).await
    }

    /// Samples for every entity: a random start of 500-2000 MB, then 0-50 MB of
    /// growth per day, oldest first.
    pub fn plan<G: Rng + ?Sized>(&self, now: DateTime<Utc>, rng: &mut G) -> Vec<NewSample> {
        let mut samples = Vec::with_capacity(self.entities.len() * (DEMO_HISTORY_DAYS as usize + 1));
        for key in &self.entities {
            let mut size: u32 = rng.gen_range(500..=2000);
            for days_ago in (0..=DEMO_HISTORY_DAYS).rev() {
                size += rng.gen_range(0..=50);
                samples.push(
                    NewSample::new(key.clone(), DEMO_PATH, f64::from(size))
                        .recorded_at(now - Duration::days(days_ago)),
                );
            }
        }
        samples
    }

    async fn write(&self, namespace: Namespace, samples: Vec<NewSample>) -> DomainResult<u64> {
        if namespace != Namespace::Test {
            tracing::warn!(%namespace, "refused to seed demo data");
            return Err(DomainError::Forbidden(format!(
                "demo data can only be seeded into the test namespace, not {namespace}"
            )));
        }

        let written = self.repository.replace_all(namespace, &samples).await?;
        tracing::info!(%namespace, entities = self.entities.len(), rows = written, "seeded demo data");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_repository, SqliteSampleRepository};
    use crate::domain::models::SampleRange;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
    }

    async fn setup(entities: Vec<EntityKey>) -> (Arc<SqliteSampleRepository>, DemoSeeder<SqliteSampleRepository>) {
        let repo = Arc::new(create_migrated_test_repository().await.unwrap());
        let seeder = DemoSeeder::new(Arc::clone(&repo), entities);
        (repo, seeder)
    }

    #[test]
    fn test_default_fleet() {
        let fleet = default_fleet();
        assert_eq!(fleet.len(), 18);
        assert_eq!(fleet[0], EntityKey::new("Site_A", "SubSite_1", "log_server"));
        assert!(fleet.contains(&EntityKey::new("Site_B", "SubSite_Lab", "backup_log_server")));
    }

    #[test]
    fn test_plan_shape() {
        let key = EntityKey::new("Site_A", "SubSite_1", "log_server");
        let seeder = DemoSeeder {
            repository: Arc::new(NoStore),
            entities: vec![key.clone()],
        };
        let samples = seeder.plan(now(), &mut StdRng::seed_from_u64(7));

        assert_eq!(samples.len(), 61);
        assert_eq!(samples[0].recorded_at, now() - Duration::days(60));
        assert_eq!(samples[60].recorded_at, now());
        assert!(samples[0].size_mb >= 500.0 && samples[0].size_mb <= 2050.0);
        for pair in samples.windows(2) {
            let step = pair[1].size_mb - pair[0].size_mb;
            assert!((0.0..=50.0).contains(&step));
            assert!(pair[0].recorded_at < pair[1].recorded_at);
        }
    }

    #[tokio::test]
    async fn test_seed_refuses_production() {
        let (repo, seeder) = setup(Vec::new()).await;
        let key = EntityKey::new("Site_A", "SubSite_1", "log_server");
        repo.insert(Namespace::Production, &NewSample::new(key.clone(), "/data", 1.0))
            .await
            .unwrap();

        let err = seeder.seed(Namespace::Production, now()).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(repo.count(Namespace::Production, &key).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_seed_replaces_test_namespace() {
        let key = EntityKey::new("Lab", "Bench", "log_server");
        let (repo, seeder) = setup(vec![key.clone()]).await;
        let stale = EntityKey::new("Old", "Gone", "log_server");
        repo.insert(Namespace::Test, &NewSample::new(stale.clone(), "/data", 5.0))
            .await
            .unwrap();

        let written = seeder.seed_with_seed(Namespace::Test, now(), 42).await.unwrap();
        assert_eq!(written, 61);
        assert_eq!(repo.count(Namespace::Test, &stale).await.unwrap(), 0);
        assert_eq!(repo.distinct_entities(Namespace::Test).await.unwrap(), vec![key.clone()]);

        let points = repo.query_range(Namespace::Test, &key, SampleRange::all()).await.unwrap();
        assert_eq!(points.len(), 61);
        assert_eq!(points.last().unwrap().recorded_at, now());
    }

    #[tokio::test]
    async fn test_seed_default_fleet_row_count() {
        let (repo, seeder) = setup(Vec::new()).await;
        let written = seeder.seed(Namespace::Test, now()).await.unwrap();
        assert_eq!(written, 18 * 61);
        assert_eq!(repo.distinct_entities(Namespace::Test).await.unwrap().len(), 18);
    }

    #[tokio::test]
    async fn test_seed_surfaces_store_failure() {
        let seeder = DemoSeeder::new(Arc::new(NoStore), default_fleet());
        let err = seeder.seed_with_seed(Namespace::Test, now(), 1).await.unwrap_err();
        assert!(matches!(err, DomainError::StoreUnavailable(_)));
    }

    struct NoStore;

    #[async_trait::async_trait]
    impl SampleRepository for NoStore {
        async fn insert(&self, _: Namespace, _: &NewSample) -> DomainResult<crate::domain::models::Sample> {
            Err(DomainError::StoreUnavailable("no store".into()))
        }
        async fn query_range(
            &self,
            _: Namespace,
            _: &EntityKey,
            _: SampleRange,
        ) -> DomainResult<Vec<crate::domain::models::SamplePoint>> {
            Ok(Vec::new())
        }
        async fn distinct_entities(&self, _: Namespace) -> DomainResult<Vec<EntityKey>> {
            Ok(Vec::new())
        }
        async fn latest(&self, _: Namespace, _: &EntityKey) -> DomainResult<Option<crate::domain::models::SamplePoint>> {
            Ok(None)
        }
        async fn count(&self, _: Namespace, _: &EntityKey) -> DomainResult<u64> {
            Ok(0)
        }
        async fn purge(&self, _: Namespace) -> DomainResult<u64> {
            Ok(0)
        }
        async fn replace_all(&self, _: Namespace, _: &[NewSample]) -> DomainResult<u64> {
            Err(DomainError::StoreUnavailable("no store".into()))
        }
    }
}
