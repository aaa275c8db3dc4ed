//! CLI command implementations.

pub mod demo;
pub mod growth;
pub mod init;
pub mod report;
pub mod serve;
pub mod summary;
