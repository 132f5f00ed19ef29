use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use kalima_core::{
    Lexicon, LookupConfig, LookupError, LookupOutcome, RootFamily, SearchOutcome, Suggestion,
    WordRepository,
};
use kalima_storage::{Storage, StoreStats};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;
use utoipa::{IntoParams, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

mod api_doc;
pub mod openapi;

pub use api_doc::ApiDoc;

#[derive(Clone)]
struct AppState {
    lexicon: Lexicon,
    stats: Option<StoreStats>,
    metrics: PrometheusHandle,
}

/// HTTP-level settings on top of the engine limits.
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    pub lookup: LookupConfig,
    /// Allowed browser origin; any origin when unset.
    pub cors_origin: Option<HeaderValue>,
}

fn init_metrics_recorder() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => handle,
            Err(err) => {
                // another recorder owns the global slot; keep a detached one
                warn!(error = %err, "metrics recorder already installed");
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Lookup(LookupError::InvalidQuery(_)) | ApiError::BadRequest(_) => {
                "invalid_query"
            }
            ApiError::Lookup(LookupError::Repository(_)) => "store_failure",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Lookup(LookupError::InvalidQuery(_)) | ApiError::BadRequest(_) => {
                debug!(error = %self, "rejected lookup request");
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Lookup(LookupError::Repository(err)) => {
                error!(error = %err, "lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Arabic headword or conjugated form, or a Russian gloss fragment
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RootParams {
    /// Root, headword or conjugated form
    pub root: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AutocompleteParams {
    /// Typed prefix; fewer than two characters yields no suggestions
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    pub suggestions: Vec<Suggestion>,
}

pub fn build_router(storage: Storage) -> Router {
    build_router_with_config(storage, ApiConfig::default())
}

pub fn build_router_with_config(storage: Storage, config: ApiConfig) -> Router {
    let stats = storage.stats();
    router(Arc::new(storage), Some(stats), config)
}

/// Router over an arbitrary repository, e.g. a remote store client.
pub fn build_router_with_repository(repo: Arc<dyn WordRepository>, config: ApiConfig) -> Router {
    router(repo, None, config)
}

fn router(repo: Arc<dyn WordRepository>, stats: Option<StoreStats>, config: ApiConfig) -> Router {
    let state = AppState {
        lexicon: Lexicon::with_config(repo, config.lookup),
        stats,
        metrics: init_metrics_recorder(),
    };

    let cors = match config.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET]),
        None => CorsLayer::permissive(),
    };

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/metrics", get(render_metrics))
        .route("/dictionary/search", get(search_entries))
        .route("/dictionary/by-root", get(entries_by_root))
        .route("/dictionary/autocomplete", get(autocomplete))
        .route("/dictionary/lookup", get(lookup))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(
    listener: TcpListener,
    storage: Storage,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> JoinHandle<Result<(), std::io::Error>> {
    start_server_with_config(listener, storage, ApiConfig::default(), shutdown).await
}

pub async fn start_server_with_config(
    listener: TcpListener,
    storage: Storage,
    config: ApiConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> JoinHandle<Result<(), std::io::Error>> {
    let app = build_router_with_config(storage, config);
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    })
}

fn observe<T>(endpoint: &'static str, started: Instant, result: &Result<T, ApiError>) {
    counter!("lookup_requests_total", "endpoint" => endpoint).increment(1);
    histogram!("lookup_latency_seconds", "endpoint" => endpoint)
        .record(started.elapsed().as_secs_f64());
    if let Err(err) = result {
        counter!("lookup_errors_total", "endpoint" => endpoint, "kind" => err.kind()).increment(1);
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses((status = 200, description = "Service is up"))
)]
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[utoipa::path(
    get,
    path = "/info",
    tag = "service",
    responses((status = 200, description = "Loaded rows and lookup limits"))
)]
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.lexicon.config();
    Json(serde_json::json!({
        "service": "kalima",
        "version": env!("CARGO_PKG_VERSION"),
        "store": state.stats,
        "limits": {
            "search": config.search_limit,
            "suggest": config.suggest_limit,
            "min_suggest_chars": config.min_suggest_chars,
        },
    }))
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    (StatusCode::OK, state.metrics.render()).into_response()
}

#[utoipa::path(
    get,
    path = "/dictionary/search",
    tag = "dictionary",
    params(SearchParams),
    responses(
        (status = 200, description = "Ranked matching entries", body = crate::openapi::SearchOutcome),
        (status = 400, description = "Empty query", body = crate::openapi::ErrorBody),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorBody)
    )
)]
async fn search_entries(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchOutcome>, ApiError> {
    let started = Instant::now();
    let query = params.query.unwrap_or_default();
    let result = state.lexicon.search(&query).map_err(ApiError::from);
    observe("search", started, &result);
    result.map(Json)
}

#[utoipa::path(
    get,
    path = "/dictionary/by-root",
    tag = "dictionary",
    params(RootParams),
    responses(
        (status = 200, description = "Root family grouped by part of speech", body = crate::openapi::RootFamily),
        (status = 400, description = "Empty root", body = crate::openapi::ErrorBody),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorBody)
    )
)]
async fn entries_by_root(
    State(state): State<AppState>,
    Query(params): Query<RootParams>,
) -> Result<Json<RootFamily>, ApiError> {
    let started = Instant::now();
    let root = params.root.unwrap_or_default();
    let result = state.lexicon.by_root(&root).map_err(ApiError::from);
    observe("by_root", started, &result);
    result.map(Json)
}

#[utoipa::path(
    get,
    path = "/dictionary/autocomplete",
    tag = "dictionary",
    params(AutocompleteParams),
    responses(
        (status = 200, description = "Labeled suggestions, empty for short prefixes", body = crate::openapi::AutocompleteResponse),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorBody)
    )
)]
async fn autocomplete(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
    let started = Instant::now();
    let prefix = params.q.unwrap_or_default();
    let result = state
        .lexicon
        .suggest(&prefix)
        .map(|suggestions| AutocompleteResponse { suggestions })
        .map_err(ApiError::from);
    observe("autocomplete", started, &result);
    result.map(Json)
}

#[utoipa::path(
    get,
    path = "/dictionary/lookup",
    tag = "dictionary",
    params(SearchParams),
    responses(
        (status = 200, description = "Search results plus the root family of the best hit", body = crate::openapi::LookupOutcome),
        (status = 400, description = "Empty query", body = crate::openapi::ErrorBody),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorBody)
    )
)]
async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<LookupOutcome>, ApiError> {
    let started = Instant::now();
    let query = params.query.unwrap_or_default();
    let result = state.lexicon.lookup(&query).map_err(ApiError::from);
    observe("lookup", started, &result);
    result.map(Json)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
