//! Zodiac Readings Gateway
//!
//! Long-running HTTP server for saving and inspecting zodiac readings.
//! Handles:
//! - Reading submission, listing, and stats
//! - Health checks against the reading store
//! - Rate limiting, CORS, request ids
//! - Observability (logging, metrics)

mod handlers;
mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use zodiac_common::{
    config::{AppConfig, ObservabilityConfig},
    db,
    metrics::{self, LATENCY_BUCKETS},
    telemetry::{self, LogTarget},
    ReadingService, ReadingStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub readings: ReadingService,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn ReadingStore>) -> Self {
        Self {
            config,
            readings: ReadingService::new(store),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // Initialize tracing
    telemetry::init_tracing(&config.observability, LogTarget::Stdout)?;

    info!("Starting Zodiac Readings gateway v{}", zodiac_common::VERSION);

    // Initialize metrics
    install_metrics_exporter(&config.observability)?;
    metrics::register_metrics();

    // Open the reading store and create the table if needed
    let store = db::open_store(&config.database).await?;
    info!(backend = store.backend_name(), "Reading store ready");

    let state = AppState::new(config.clone(), store.clone());
    let app = create_router(state);

    // Start the server
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain the pool once in-flight requests are done
    match tokio::time::timeout(config.shutdown_timeout(), store.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Failed to close reading store"),
        Err(_) => warn!("Timed out closing reading store"),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Serve Prometheus metrics on their own port; port 0 disables the exporter
fn install_metrics_exporter(config: &ObservabilityConfig) -> anyhow::Result<()> {
    if config.metrics_port == 0 {
        info!("Metrics exporter disabled");
        return Ok(());
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    PrometheusBuilder::new()
        .set_buckets(LATENCY_BUCKETS)?
        .with_http_listener(addr)
        .install()?;

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // API routes
    let mut api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/save-reading", post(handlers::readings::save_reading))
        .route("/readings", get(handlers::readings::list_readings))
        .route("/stats", get(handlers::stats::stats));

    let rate_limit = &state.config.rate_limit;
    if rate_limit.enabled {
        let limiter = middleware::rate_limit::RateLimitState::new(
            rate_limit.requests_per_second,
            rate_limit.burst,
        );
        api_routes = api_routes.layer(axum::middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit::rate_limit_middleware,
        ));
    }

    // Compose the app
    Router::new()
        .route("/", get(handlers::index::index))
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn(middleware::metrics::track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
