//! SQLite database adapters for LogHive.

pub mod connection;
pub mod migrations;
pub mod sample_repository;

pub use connection::{
    create_pool, create_test_pool, database_url, verify_connection, ConnectionError, PoolConfig,
};
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use sample_repository::SqliteSampleRepository;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DatabaseConfig, Namespace};

/// Render a timestamp as fixed-width RFC3339 UTC (`2026-01-15T08:30:00.000000Z`).
///
/// Fixed width keeps lexical order in `SQLite` equal to chronological order.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC3339 datetime string from a SQLite row field.
pub fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| DomainError::SerializationError(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

pub async fn initialize_database(database_url: &str, config: Option<PoolConfig>) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(database_url, config).await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// Open and migrate both namespace databases described by `config`.
pub async fn initialize_repository(config: &DatabaseConfig) -> Result<SqliteSampleRepository, DatabaseError> {
    let pool_config = PoolConfig::with_max_connections(config.max_connections);
    let production = initialize_database(
        &database_url(config.path_for(Namespace::Production)),
        Some(pool_config.clone()),
    )
    .await?;
    let test = initialize_database(&database_url(config.path_for(Namespace::Test)), Some(pool_config)).await?;
    Ok(SqliteSampleRepository::new(production, test))
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// A repository over two isolated, migrated in-memory databases.
pub async fn create_migrated_test_repository() -> Result<SqliteSampleRepository, DatabaseError> {
    let production = create_migrated_test_pool().await?;
    let test = create_migrated_test_pool().await?;
    Ok(SqliteSampleRepository::new(production, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format_is_fixed_width() {
        let a = format_timestamp(Utc.with_ymd_and_hms(2026, 1, 5, 3, 4, 5).unwrap());
        let b = format_timestamp(Utc.with_ymd_and_hms(2026, 11, 25, 13, 14, 15).unwrap());
        assert_eq!(a, "2026-01-05T03:04:05.000000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }

    #[test]
    fn test_timestamp_round_trip() {
        let dt = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(parse_datetime(&format_timestamp(dt)).unwrap(), dt);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_initialize_repository_creates_both_databases() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            production_path: dir.path().join("prod.db").to_string_lossy().into_owned(),
            test_path: dir.path().join("test.db").to_string_lossy().into_owned(),
            max_connections: 2,
        };

        let repo = initialize_repository(&config).await.unwrap();
        verify_connection(repo.pool(Namespace::Production)).await.unwrap();
        verify_connection(repo.pool(Namespace::Test)).await.unwrap();
        assert!(dir.path().join("prod.db").exists());
        assert!(dir.path().join("test.db").exists());
    }
}
