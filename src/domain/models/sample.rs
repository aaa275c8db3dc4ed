//! Disk usage samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::EntityKey;
use super::month::YearMonth;

/// A stored sample. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Store-assigned sequence, used to break `recorded_at` ties.
    pub id: i64,
    #[serde(flatten)]
    pub key: EntityKey,
    /// Informational only; not part of the entity identity.
    pub path: String,
    pub size_mb: f64,
    pub recorded_at: DateTime<Utc>,
}

impl Sample {
    pub fn point(&self) -> SamplePoint {
        SamplePoint {
            size_mb: self.size_mb,
            recorded_at: self.recorded_at,
        }
    }
}

/// A sample about to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSample {
    pub key: EntityKey,
    pub path: String,
    pub size_mb: f64,
    pub recorded_at: DateTime<Utc>,
}

impl NewSample {
    pub fn new(key: EntityKey, path: impl Into<String>, size_mb: f64) -> Self {
        Self {
            key,
            path: path.into(),
            size_mb,
            recorded_at: Utc::now(),
        }
    }

    pub fn recorded_at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = recorded_at;
        self
    }
}

/// The value/time pair returned by range queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub size_mb: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Filter for range queries. Both bounds are optional and combine with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleRange {
    /// Only samples recorded at or after this instant.
    pub since: Option<DateTime<Utc>>,
    /// Only samples recorded within this calendar month.
    pub month: Option<YearMonth>,
}

impl SampleRange {
    pub const fn all() -> Self {
        Self { since: None, month: None }
    }

    pub const fn since(since: DateTime<Utc>) -> Self {
        Self { since: Some(since), month: None }
    }

    pub const fn month(month: YearMonth) -> Self {
        Self { since: None, month: Some(month) }
    }
}
