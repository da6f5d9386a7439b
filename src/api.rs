//! REST API for SuiRandom
//!
//! Exposes address processing and dry-run draws over HTTP. On-chain draws
//! need a private key and stay CLI-only.

use axum::{
    extract::{Request, State},
    http::{self, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;
use crate::draw::{DrawOutcome, Drawer};
use crate::error::DrawError;
use crate::processing::{process_addresses, AddressReport};
use crate::resolver::{NameResolver, SuiNsResolver};
use crate::rpc::RpcClient;
use crate::winners::{share_text, share_url};

/// Shared state for all handlers
#[derive(Clone)]
pub struct ApiState {
    resolver: Arc<dyn NameResolver>,
    drawer: Option<Arc<Drawer>>,
    config: Arc<Config>,
    api_stats: Arc<RwLock<ApiStats>>,
}

impl ApiState {
    pub fn new(
        config: Config,
        resolver: Arc<dyn NameResolver>,
        drawer: Option<Arc<Drawer>>,
    ) -> Self {
        ApiState {
            resolver,
            drawer,
            config: Arc::new(config),
            api_stats: Arc::new(RwLock::new(ApiStats::new())),
        }
    }

    /// State wired to the full nodes named in `config`.
    pub fn from_config(config: Config) -> Result<Self, DrawError> {
        let timeout = config.network.request_timeout();
        let node = Arc::new(RpcClient::new(config.network.rpc_url.clone(), timeout)?);
        let names = Arc::new(RpcClient::new(
            config.network.resolver_url.clone(),
            timeout,
        )?);

        let drawer = Arc::new(Drawer::new(node, &config));
        let resolver: Arc<dyn NameResolver> = Arc::new(SuiNsResolver::new(names));
        Ok(ApiState::new(config, resolver, Some(drawer)))
    }

    pub async fn get_stats(&self) -> ApiStatsResponse {
        let stats = self.api_stats.read().await;
        ApiStatsResponse {
            total_requests: stats.total_requests,
            successful_requests: stats.successful_requests,
            failed_requests: stats.failed_requests,
            addresses_processed: stats.addresses_processed,
            dry_runs: stats.dry_runs,
            uptime_seconds: stats
                .start_time
                .map(|t| t.elapsed().as_secs())
                .unwrap_or(0),
        }
    }
}

#[derive(Debug, Default)]
struct ApiStats {
    total_requests: u64,
    successful_requests: u64,
    failed_requests: u64,
    addresses_processed: u64,
    dry_runs: u64,
    start_time: Option<Instant>,
}

impl ApiStats {
    fn new() -> Self {
        ApiStats {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    fn record_request(&mut self, success: bool) {
        self.total_requests += 1;
        if success {
            self.successful_requests += 1;
        } else {
            self.failed_requests += 1;
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    Draw(DrawError),
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Draw(e) => {
                let status = match &e {
                    DrawError::InvalidAddress(_)
                    | DrawError::InvalidName(_)
                    | DrawError::NotEnoughAddresses { .. }
                    | DrawError::InvalidWinnerCount { .. } => StatusCode::BAD_REQUEST,
                    DrawError::ExecutionFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    DrawError::RpcError(_) | DrawError::NoWinnerData => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<DrawError> for ApiError {
    fn from(err: DrawError) -> Self {
        ApiError::Draw(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct ProcessRequest {
    pub input: String,
}

#[derive(Deserialize)]
pub struct DryRunRequest {
    pub input: String,
    #[serde(default = "default_num_winners")]
    pub num_winners: u64,
}

fn default_num_winners() -> u64 {
    1
}

#[derive(Serialize)]
pub struct DryRunResponse {
    #[serde(flatten)]
    pub outcome: DrawOutcome,
    pub share_text: String,
    pub share_url: String,
    pub report: AddressReport,
}

#[derive(Serialize)]
pub struct ApiStatsResponse {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub addresses_processed: u64,
    pub dry_runs: u64,
    pub uptime_seconds: u64,
}

// ============================================================================
// Middleware
// ============================================================================

async fn stats_middleware(State(state): State<ApiState>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let success = response.status().is_success();
    state.api_stats.write().await.record_request(success);

    response
}

async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "api.request"
    );

    response
}

// ============================================================================
// Router
// ============================================================================

pub fn build_api_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers(vec![http::header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(get_api_stats))
        .route("/addresses/process", post(process_input))
        .route("/draw/dry-run", post(dry_run))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            stats_middleware,
        ))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(cors)
}

pub async fn run_api_server(
    state: ApiState,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_api_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "api server listening");
    println!("🚀 API server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check(State(state): State<ApiState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "chain": state.config.network.chain,
        "rpc_url": state.config.network.rpc_url,
        "draws_enabled": state.drawer.is_some(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn get_api_stats(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.get_stats().await)
}

/// Empty input yields an empty report; draws then fail the address minimum.
async fn run_pipeline(state: &ApiState, input: &str) -> AddressReport {
    let report = process_addresses(
        input,
        state.resolver.as_ref(),
        state.config.draw.resolve_concurrency,
    )
    .await;
    state.api_stats.write().await.addresses_processed += report.valid_addresses.len() as u64;
    report
}

async fn process_input(
    State(state): State<ApiState>,
    Json(req): Json<ProcessRequest>,
) -> Json<AddressReport> {
    Json(run_pipeline(&state, &req.input).await)
}

async fn dry_run(
    State(state): State<ApiState>,
    Json(req): Json<DryRunRequest>,
) -> Result<Json<DryRunResponse>, ApiError> {
    let drawer = state
        .drawer
        .clone()
        .ok_or_else(|| ApiError::Unavailable("Draws are not configured".to_string()))?;

    let report = run_pipeline(&state, &req.input).await;
    let outcome = drawer.dry_run(&report, req.num_winners).await?;
    state.api_stats.write().await.dry_runs += 1;

    Ok(Json(DryRunResponse {
        share_text: share_text(&outcome.winners),
        share_url: share_url(&outcome.winners),
        outcome,
        report,
    }))
}
