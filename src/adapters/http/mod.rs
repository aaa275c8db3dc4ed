//! HTTP adapter for agents and the dashboard.

pub mod server;

pub use server::{
    api_error, build_router, AppState, DashboardHttpServer, ErrorResponse, HttpServerConfig,
    ReportResponse, SeedResponse, NAMESPACE_HEADER,
};
