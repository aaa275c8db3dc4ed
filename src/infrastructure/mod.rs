//! Infrastructure layer module
//!
//! Process-wide concerns shared by the CLI and the HTTP server:
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod logging;
