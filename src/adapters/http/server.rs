//! Dashboard HTTP Server.
//!
//! Exposes agent ingestion, the dashboard read API, demo seeding and
//! Prometheus metrics over axum. Each request resolves its namespace once
//! from the `X-LogHive-Namespace` header and threads it through every call.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapters::metrics::{render_prometheus, ReportCounter};
use crate::domain::errors::DomainError;
use crate::domain::models::{
    Config, DashboardRow, EntityKey, MonthComparison, MonthlyGrowth, Namespace, ReportPayload,
    SamplePoint, ServerConfig, SiteConfig,
};
use crate::domain::ports::{DefaultNamespaceResolver, MetricsSink, NamespaceResolver, SampleRepository};
use crate::services::aggregator::DEFAULT_HISTORY_DAYS;
use crate::services::{DemoSeeder, GrowthAggregator, IngestionGate, SummaryCompiler};

/// Request header naming the namespace a caller operates in.
pub const NAMESPACE_HEADER: &str = "x-loghive-namespace";

/// Configuration for the dashboard HTTP server.
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Whether to enable CORS.
    pub enable_cors: bool,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for HttpServerConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            host: server.host.clone(),
            port: server.port,
            enable_cors: server.enable_cors,
        }
    }
}

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    DEFAULT_HISTORY_DAYS
}

/// Response to an accepted report.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub success: bool,
    pub message: String,
    pub id: i64,
    pub recorded_at: DateTime<Utc>,
}

/// Response to a demo seed.
#[derive(Debug, Serialize, Deserialize)]
pub struct SeedResponse {
    pub success: bool,
    pub namespace: Namespace,
    pub rows: u64,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<T, ApiError>;

/// Map a domain error onto its HTTP status and `{error, code}` body.
pub fn api_error(err: &DomainError) -> ApiError {
    let status = match err {
        DomainError::InvalidToken => StatusCode::UNAUTHORIZED,
        DomainError::MissingField(_) | DomainError::InvalidValue { .. } | DomainError::DataAnomaly(_) => {
            StatusCode::BAD_REQUEST
        }
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::StoreUnavailable(_) | DomainError::SerializationError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: err.code().to_string(),
        }),
    )
}

fn invalid_json(error: String) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error,
            code: "INVALID_JSON".to_string(),
        }),
    )
}

/// Shared state for the dashboard HTTP server.
pub struct AppState<R: SampleRepository> {
    pub aggregator: GrowthAggregator<R>,
    pub compiler: SummaryCompiler<R>,
    pub gate: IngestionGate<R>,
    pub seeder: DemoSeeder<R>,
    pub resolver: Arc<dyn NamespaceResolver>,
    pub counter: Arc<ReportCounter>,
    pub sites: BTreeMap<String, SiteConfig>,
}

impl<R: SampleRepository> AppState<R> {
    /// Wire every service over one repository using `config`.
    pub fn new(repository: Arc<R>, config: &Config) -> Self {
        let counter = Arc::new(ReportCounter::new());
        let sink: Arc<dyn MetricsSink> = counter.clone();
        Self {
            aggregator: GrowthAggregator::new(Arc::clone(&repository)),
            compiler: SummaryCompiler::new(Arc::clone(&repository)),
            gate: IngestionGate::new(Arc::clone(&repository), sink, config.ingestion.api_token.clone()),
            seeder: DemoSeeder::new(repository, config.configured_entities()),
            resolver: Arc::new(DefaultNamespaceResolver::new(config.dashboard.default_namespace)),
            counter,
            sites: config.sites.clone(),
        }
    }

    /// Replace the namespace resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn NamespaceResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    fn namespace(&self, headers: &HeaderMap) -> ApiResult<Namespace> {
        let requested = headers.get(NAMESPACE_HEADER).and_then(|v| v.to_str().ok());
        self.resolver.resolve(requested).map_err(|e| api_error(&e))
    }
}

/// Build the dashboard router over `state`.
pub fn build_router<R: SampleRepository + 'static>(state: Arc<AppState<R>>, enable_cors: bool) -> Router {
    let app = Router::new()
        // Agent ingestion
        .route("/api/report", post(report::<R>))
        // Dashboard reads
        .route("/api/summary", get(summary::<R>))
        .route("/api/sites", get(sites::<R>))
        .route("/api/history/{site}/{sub_site}/{server_type}", get(history::<R>))
        .route("/api/monthly/{site}/{sub_site}/{server_type}", get(monthly::<R>))
        .route(
            "/api/month-production/{site}/{sub_site}/{server_type}",
            get(month_production::<R>),
        )
        // Demo data
        .route("/api/demo/seed", post(demo_seed::<R>))
        // Observability
        .route("/metrics", get(metrics::<R>))
        .route("/health", get(health_check))
        .with_state(state);

    if enable_cors {
        app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(TraceLayer::new_for_http())
    } else {
        app.layer(TraceLayer::new_for_http())
    }
}

/// Dashboard HTTP Server.
pub struct DashboardHttpServer<R: SampleRepository + 'static> {
    config: HttpServerConfig,
    state: Arc<AppState<R>>,
}

impl<R: SampleRepository + 'static> DashboardHttpServer<R> {
    pub fn new(state: AppState<R>, config: HttpServerConfig) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    fn address(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.config.host, self.config.port).parse()
    }

    /// Start the server.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.address()?;
        let router = build_router(self.state, self.config.enable_cors);

        tracing::info!("LogHive dashboard listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.address()?;
        let router = build_router(self.state, self.config.enable_cors);

        tracing::info!("LogHive dashboard listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

// Handler functions

async fn health_check() -> &'static str {
    "OK"
}

async fn report<R: SampleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ReportResponse>)> {
    let Json(body) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "rejected report: malformed body");
        invalid_json(rejection.body_text())
    })?;

    // The token is checked before the namespace or any other field is looked at.
    let token = body.get("token").and_then(serde_json::Value::as_str);
    state.gate.authenticate(token).map_err(|e| {
        tracing::warn!("rejected report: invalid token");
        api_error(&e)
    })?;

    let namespace = state.namespace(&headers)?;
    let payload: ReportPayload = serde_json::from_value(body).map_err(|e| {
        tracing::warn!(%namespace, error = %e, "rejected report: malformed body");
        invalid_json(e.to_string())
    })?;

    let sample = state
        .gate
        .ingest(namespace, &payload)
        .await
        .map_err(|e| api_error(&e))?;

    Ok((
        StatusCode::CREATED,
        Json(ReportResponse {
            success: true,
            message: "Data recorded".to_string(),
            id: sample.id,
            recorded_at: sample.recorded_at,
        }),
    ))
}

async fn summary<R: SampleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<DashboardRow>>> {
    let namespace = state.namespace(&headers)?;
    state
        .compiler
        .dashboard(namespace)
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

async fn sites<R: SampleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Json<BTreeMap<String, SiteConfig>> {
    Json(state.sites.clone())
}

async fn history<R: SampleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
    Path((site, sub_site, server_type)): Path<(String, String, String)>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Json<Vec<SamplePoint>>> {
    let namespace = state.namespace(&headers)?;
    let key = EntityKey::new(site, sub_site, server_type);
    state
        .aggregator
        .history(&key, namespace, params.days)
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

async fn monthly<R: SampleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
    Path((site, sub_site, server_type)): Path<(String, String, String)>,
) -> ApiResult<Json<Vec<MonthlyGrowth>>> {
    let namespace = state.namespace(&headers)?;
    let key = EntityKey::new(site, sub_site, server_type);
    state
        .aggregator
        .monthly_growth(&key, namespace)
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

async fn month_production<R: SampleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
    Path((site, sub_site, server_type)): Path<(String, String, String)>,
) -> ApiResult<Json<MonthComparison>> {
    let namespace = state.namespace(&headers)?;
    let key = EntityKey::new(site, sub_site, server_type);
    state
        .aggregator
        .current_and_previous_month_growth(&key, namespace)
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

async fn demo_seed<R: SampleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
) -> ApiResult<Json<SeedResponse>> {
    let namespace = state.namespace(&headers)?;
    let rows = state
        .seeder
        .seed(namespace, Utc::now())
        .await
        .map_err(|e| api_error(&e))?;

    Ok(Json(SeedResponse {
        success: true,
        namespace,
        rows,
    }))
}

async fn metrics<R: SampleRepository + 'static>(State(state): State<Arc<AppState<R>>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        render_prometheus(&state.counter.snapshot()),
    )
}
