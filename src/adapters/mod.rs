//! Infrastructure adapters for external systems.

pub mod http;
pub mod metrics;
pub mod sqlite;
