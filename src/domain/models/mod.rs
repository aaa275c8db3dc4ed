//! Domain models for LogHive.

pub mod config;
pub mod entity;
pub mod growth;
pub mod month;
pub mod report;
pub mod sample;

pub use config::{
    Config, DashboardConfig, DatabaseConfig, IngestionConfig, LoggingConfig, ServerConfig,
    ServerDescriptor, SiteConfig, PLACEHOLDER_API_TOKEN,
};
pub use entity::{EntityKey, Namespace};
pub use growth::{DashboardRow, MonthComparison, MonthlyGrowth, SummaryRow};
pub use month::YearMonth;
pub use report::{parse_size_mb, ReportPayload, ValidatedReport};
pub use sample::{NewSample, Sample, SamplePoint, SampleRange};
