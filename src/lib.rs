//! LogHive - disk usage collector and growth dashboard backend
//!
//! Agents on remote log and backup servers report the size of a monitored path.
//! LogHive stores every report as an append-only sample and derives growth
//! figures from the raw history on demand: per-month growth, current vs
//! previous month production, and a cross-entity dashboard summary.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the ports the core depends on
//! - **Service Layer** (`services`): growth engine, aggregator, summary compiler, ingestion gate
//! - **Adapters** (`adapters`): `SQLite` store, HTTP surface, Prometheus metrics
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```
//! use loghive::services::growth::positive_growth;
//!
//! assert_eq!(positive_growth(&[100.0, 10.0, 100.0]), 90.0);
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, DashboardRow, EntityKey, MonthComparison, MonthlyGrowth, Namespace, NewSample,
    ReportPayload, Sample, SamplePoint, SampleRange, YearMonth,
};
pub use domain::ports::{MetricsSink, NamespaceResolver, SampleRepository};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{DemoSeeder, GrowthAggregator, IngestionGate, SummaryCompiler};
