pub mod aggregator;
pub mod demo_seed;
pub mod growth;
pub mod ingestion;
pub mod summary;

pub use aggregator::GrowthAggregator;
pub use demo_seed::DemoSeeder;
pub use growth::positive_growth;
pub use ingestion::IngestionGate;
pub use summary::SummaryCompiler;
