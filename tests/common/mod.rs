//! Common test utilities for integration tests
//!
//! Provides shared fixtures used across multiple integration test files.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use loghive::adapters::sqlite::{create_migrated_test_repository, SqliteSampleRepository};
use loghive::domain::models::{Config, EntityKey, Namespace, NewSample};
use loghive::SampleRepository;

pub const TEST_TOKEN: &str = "integration-token";

/// Repository over two fresh in-memory databases.
pub async fn repository() -> Arc<SqliteSampleRepository> {
    Arc::new(
        create_migrated_test_repository()
            .await
            .expect("Failed to create test repository"),
    )
}

/// Default configuration with a known ingestion token.
pub fn config() -> Config {
    let mut config = Config::default();
    config.ingestion.api_token = TEST_TOKEN.to_string();
    config
}

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

pub fn log_server() -> EntityKey {
    EntityKey::new("Site_A", "SubSite_1", "log_server")
}

/// Insert `(size_mb, recorded_at)` samples for `key`.
pub async fn seed(
    repository: &SqliteSampleRepository,
    namespace: Namespace,
    key: &EntityKey,
    points: &[(f64, DateTime<Utc>)],
) {
    for (size, when) in points {
        repository
            .insert(namespace, &NewSample::new(key.clone(), "/data", *size).recorded_at(*when))
            .await
            .expect("Failed to insert sample");
    }
}

/// Setup test logging
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
