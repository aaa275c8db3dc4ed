//! Report metrics collection and exposition.

pub mod prometheus;
pub mod report_counter;

pub use prometheus::render_prometheus;
pub use report_counter::ReportCounter;
