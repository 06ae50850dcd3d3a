//! HTTP endpoint server using Axum

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::analysis::{AnalysisOutcome, AnalysisRequest, Analyzer, MAX_ORDER, MIN_ORDER};
use crate::auth::{Credentials, SessionStore};
use crate::config::Config;
use crate::models::{Interval, Period};
use crate::render::ChartModel;
use crate::services::{SeriesCache, YahooChartProvider};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub start_time: Arc<Instant>,
    pub credentials: Arc<Credentials>,
    pub sessions: Arc<SessionStore>,
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    /// Wire up the full production stack: Yahoo provider behind the series
    /// cache, environment credentials, fresh session store.
    pub fn from_config(config: &Config) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let provider = YahooChartProvider::new(
            &config.quote_base_url,
            Duration::from_secs(config.fetch_timeout_secs),
        )?;
        let cache = SeriesCache::new(
            Duration::from_secs(config.cache_ttl_secs),
            config.cache_capacity,
        );
        let analyzer = Analyzer::new(Arc::new(provider)).with_cache(Arc::new(cache));

        Ok(Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            start_time: Arc::new(Instant::now()),
            credentials: Arc::new(Credentials::from_env()),
            sessions: Arc::new(SessionStore::new()),
            analyzer: Arc::new(analyzer),
        })
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "wavetrix-analysis-engine"
    })))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware gating the analysis endpoints on a live session.
async fn require_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = bearer_token(request.headers()).ok_or(StatusCode::UNAUTHORIZED)?;
    state
        .sessions
        .validate(token)
        .await
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    user: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    user: String,
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, StatusCode> {
    // Small fixed delay to blunt credential guessing.
    tokio::time::sleep(Duration::from_millis(200)).await;

    if !state.credentials.verify(&request.user, &request.password) {
        info!(user = %request.user, "login rejected");
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = state.sessions.create(&request.user).await;
    info!(user = %request.user, "login accepted");
    Ok(Json(LoginResponse {
        token,
        user: request.user,
    }))
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    let token = bearer_token(&headers).ok_or(StatusCode::UNAUTHORIZED)?;
    let revoked = state.sessions.revoke(token).await;
    Ok(Json(json!({ "revoked": revoked })))
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    symbol: String,
    period: Option<Period>,
    interval: Option<Interval>,
    order: Option<usize>,
}

fn validation_error(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": message })),
    )
}

/// Run one analysis and return its terminal outcome.
///
/// All three outcomes are 200s: "no data" and "insufficient turning points"
/// are expected, operator-correctable results, not server failures. Only
/// provider transport errors map to 502.
async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let symbol = request.symbol.trim().to_string();
    if symbol.is_empty() {
        return Err(validation_error("symbol must not be blank"));
    }

    let order = request.order.unwrap_or(crate::analysis::DEFAULT_ORDER);
    if !(MIN_ORDER..=MAX_ORDER).contains(&order) {
        return Err(validation_error(&format!(
            "order must be between {} and {}",
            MIN_ORDER, MAX_ORDER
        )));
    }

    let analysis_request = AnalysisRequest {
        symbol,
        period: request.period.unwrap_or_default(),
        interval: request.interval.unwrap_or_default(),
        order,
    };

    let outcome = state.analyzer.run(&analysis_request).await.map_err(|e| {
        error!(error = %e, symbol = %analysis_request.symbol, "analysis run failed");
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "market data fetch failed" })),
        )
    })?;

    let body = match outcome {
        AnalysisOutcome::NoData => json!({
            "outcome": "no_data",
            "message": format!("no data returned for {}", analysis_request.symbol),
        }),
        AnalysisOutcome::InsufficientExtrema { highs, lows } => json!({
            "outcome": "insufficient_turning_points",
            "highs": highs,
            "lows": lows,
            "message": "too few turning points found; adjust order",
        }),
        AnalysisOutcome::LevelsReady(report) => {
            let chart = ChartModel::build(&report);
            json!({
                "outcome": "levels_ready",
                "last_high": report.last_high,
                "last_low": report.last_low,
                "levels": report.levels.as_slice(),
                "chart": chart,
            })
        }
    };

    Ok(Json(body))
}

pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/analyze", post(analyze))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    state: AppState,
    port: u16,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
