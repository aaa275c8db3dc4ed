//! Derived growth records. Recomputed from raw samples on every read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::EntityKey;
use super::month::YearMonth;

/// Growth within one calendar-month bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyGrowth {
    pub month: YearMonth,
    pub growth_mb: f64,
    pub max_size_mb: f64,
}

/// Current vs. previous calendar month growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthComparison {
    pub current_month: YearMonth,
    pub current_month_growth: f64,
    pub previous_month: YearMonth,
    pub previous_month_growth: f64,
}

/// Latest sample for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(flatten)]
    pub key: EntityKey,
    pub size_mb: f64,
    pub recorded_at: DateTime<Utc>,
}

/// A summary row enriched with growth metrics for the dashboard overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRow {
    #[serde(flatten)]
    pub row: SummaryRow,
    /// Current calendar month production. Named for the legacy dashboard field.
    pub growth_30d: f64,
    pub monthly_avg_growth: f64,
}
