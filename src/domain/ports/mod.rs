//! Port trait definitions (Hexagonal Architecture)
//!
//! Interfaces the core depends on and adapters implement:
//! - SampleRepository: append-only sample storage with range queries
//! - MetricsSink: per-report observability counters
//! - NamespaceResolver: per-caller namespace selection

pub mod metrics_sink;
pub mod namespace_resolver;
pub mod sample_repository;

pub use metrics_sink::{MetricsError, MetricsSink, NullMetricsSink};
pub use namespace_resolver::{DefaultNamespaceResolver, FixedNamespaceResolver, NamespaceResolver};
pub use sample_repository::SampleRepository;
