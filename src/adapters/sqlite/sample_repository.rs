//! SQLite implementation of the SampleRepository.
//!
//! Each namespace is a separate database with an identical `disk_usage` table, so
//! isolation is physical: a query can only ever reach the pool it was routed to.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{format_timestamp, parse_datetime};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{EntityKey, Namespace, NewSample, Sample, SamplePoint, SampleRange};
use crate::domain::ports::SampleRepository;

#[derive(Clone)]
pub struct SqliteSampleRepository {
    production: SqlitePool,
    test: SqlitePool,
}

impl SqliteSampleRepository {
    pub fn new(production: SqlitePool, test: SqlitePool) -> Self {
        Self { production, test }
    }

    pub fn pool(&self, namespace: Namespace) -> &SqlitePool {
        match namespace {
            Namespace::Production => &self.production,
            Namespace::Test => &self.test,
        }
    }
}

#[async_trait]
impl SampleRepository for SqliteSampleRepository {
    async fn insert(&self, namespace: Namespace, sample: &NewSample) -> DomainResult<Sample> {
        check_size(sample)?;

        // Stored timestamps carry microseconds; return exactly what a later read sees.
        let recorded_at = sample.recorded_at.trunc_subsecs(6);
        let result = insert_query(sample, recorded_at)
            .execute(self.pool(namespace))
            .await?;

        Ok(Sample {
            id: result.last_insert_rowid(),
            key: sample.key.clone(),
            path: sample.path.clone(),
            size_mb: sample.size_mb,
            recorded_at,
        })
    }

    async fn query_range(
        &self,
        namespace: Namespace,
        key: &EntityKey,
        range: SampleRange,
    ) -> DomainResult<Vec<SamplePoint>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT size_mb, recorded_at FROM disk_usage WHERE site = ");
        query
            .push_bind(key.site.clone())
            .push(" AND sub_site = ")
            .push_bind(key.sub_site.clone())
            .push(" AND server_type = ")
            .push_bind(key.server_type.clone());

        if let Some(since) = range.since {
            query.push(" AND recorded_at >= ").push_bind(format_timestamp(since));
        }

        if let Some(month) = range.month {
            let (start, end) = month.range();
            query
                .push(" AND recorded_at >= ")
                .push_bind(format_timestamp(start))
                .push(" AND recorded_at < ")
                .push_bind(format_timestamp(end));
        }

        query.push(" ORDER BY recorded_at ASC, id ASC");

        let rows: Vec<PointRow> = query
            .build_query_as::<PointRow>()
            .fetch_all(self.pool(namespace))
            .await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn distinct_entities(&self, namespace: Namespace) -> DomainResult<Vec<EntityKey>> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT DISTINCT site, sub_site, server_type FROM disk_usage ORDER BY site, sub_site, server_type"
        )
        .fetch_all(self.pool(namespace))
        .await?;

        Ok(rows
            .into_iter()
            .map(|(site, sub_site, server_type)| EntityKey { site, sub_site, server_type })
            .collect())
    }

    async fn latest(&self, namespace: Namespace, key: &EntityKey) -> DomainResult<Option<SamplePoint>> {
        let row: Option<PointRow> = sqlx::query_as(
            r#"SELECT size_mb, recorded_at FROM disk_usage
               WHERE site = ? AND sub_site = ? AND server_type = ?
               ORDER BY recorded_at DESC, id DESC
               LIMIT 1"#
        )
        .bind(&key.site)
        .bind(&key.sub_site)
        .bind(&key.server_type)
        .fetch_optional(self.pool(namespace))
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn count(&self, namespace: Namespace, key: &EntityKey) -> DomainResult<u64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM disk_usage WHERE site = ? AND sub_site = ? AND server_type = ?"
        )
        .bind(&key.site)
        .bind(&key.sub_site)
        .bind(&key.server_type)
        .fetch_one(self.pool(namespace))
        .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn purge(&self, namespace: Namespace) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM disk_usage")
            .execute(self.pool(namespace))
            .await?;
        Ok(result.rows_affected())
    }

    async fn replace_all(&self, namespace: Namespace, samples: &[NewSample]) -> DomainResult<u64> {
        let mut tx = self.pool(namespace).begin().await?;
        sqlx::query("DELETE FROM disk_usage").execute(&mut *tx).await?;

        let mut written = 0u64;
        for sample in samples {
            // An early return drops `tx`, which rolls the delete back too.
            check_size(sample)?;
            insert_query(sample, sample.recorded_at.trunc_subsecs(6))
                .execute(&mut *tx)
                .await?;
            written += 1;
        }

        tx.commit().await?;
        Ok(written)
    }
}

fn check_size(sample: &NewSample) -> DomainResult<()> {
    if !sample.size_mb.is_finite() || sample.size_mb < 0.0 {
        return Err(DomainError::DataAnomaly(format!(
            "size_mb must be a non-negative number, got {}",
            sample.size_mb
        )));
    }
    Ok(())
}

fn insert_query(
    sample: &NewSample,
    recorded_at: DateTime<Utc>,
) -> sqlx::query::Query<'_, Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
    sqlx::query(
        r#"INSERT INTO disk_usage (site, sub_site, server_type, path, size_mb, recorded_at)
           VALUES (?, ?, ?, ?, ?, ?)"#
    )
    .bind(&sample.key.site)
    .bind(&sample.key.sub_site)
    .bind(&sample.key.server_type)
    .bind(&sample.path)
    .bind(sample.size_mb)
    .bind(format_timestamp(recorded_at))
}

#[derive(sqlx::FromRow)]
struct PointRow {
    size_mb: f64,
    recorded_at: String,
}

impl TryFrom<PointRow> for SamplePoint {
    type Error = DomainError;

    fn try_from(row: PointRow) -> Result<Self, Self::Error> {
        Ok(SamplePoint {
            size_mb: row.size_mb,
            recorded_at: parse_datetime(&row.recorded_at)?,
        })
    }
}
