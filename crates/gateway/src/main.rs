//! BlogForge API Gateway
//!
//! The single entry point for all requests.
//! Handles:
//! - Session authentication
//! - Article storage, listing, export and deletion
//! - Article drafting through the generative-language client
//! - Observability (logging, metrics, tracing)

mod handlers;

#[cfg(test)]
mod tests;

use axum::{
    extract::FromRef,
    routing::{delete, get, post},
    Router,
};
use blogforge_common::{
    auth::SessionManager,
    config::{AppConfig, ObservabilityConfig},
    db::DbPool,
    generation::{create_generator, Generator},
    metrics::{self, GENERATION_BUCKETS, METRICS_PREFIX},
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub sessions: Arc<SessionManager>,
    pub generator: Arc<dyn Generator>,
    pub metrics: Option<PrometheusHandle>,
}

impl FromRef<AppState> for Arc<SessionManager> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    init_tracing(&config.observability);

    info!("Starting BlogForge API Gateway v{}", blogforge_common::VERSION);

    let config = Arc::new(config);

    // Initialize metrics
    let metrics = if config.observability.metrics_enabled {
        Some(install_metrics()?)
    } else {
        None
    };

    // Initialize database connection
    let db = DbPool::new(&config.database).await?;
    db.ensure_schema().await?;

    // Build the generation client from explicit configuration
    let generator = create_generator(&config.generation).map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize generation client");
        e
    })?;
    info!(model = generator.model_name(), "Generation client ready");

    let sessions = Arc::new(SessionManager::from_config(&config.auth)?);

    // Create app state
    let state = AppState {
        config: config.clone(),
        db,
        sessions,
        generator,
        metrics,
    };

    // Build the router
    let app = create_router(state.clone());

    // Start the server
    let addr = config.bind_address();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Tear down shared clients
    let AppState { db, generator, .. } = state;
    drop(generator);
    db.close().await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Install the global tracing subscriber; `RUST_LOG` overrides the configured level
fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Install the Prometheus recorder
fn install_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_generation_duration_seconds", METRICS_PREFIX)),
            GENERATION_BUCKETS,
        )?
        .install_recorder()?;

    metrics::register_metrics();
    Ok(handle)
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Session-protected article routes
    let api_routes = Router::new()
        .route(
            "/articles",
            post(handlers::articles::create_article).get(handlers::articles::list_articles),
        )
        .route("/articles/{id}", delete(handlers::articles::delete_article))
        .route("/articles/{id}/export", get(handlers::export::export_article))
        .route("/export-text", post(handlers::export::export_text));

    // Session endpoints
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me));

    // Compose the app
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/generate", post(handlers::generate::generate))
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/metrics", get(handlers::health::metrics))
        .nest("/api", api_routes)
        .nest("/auth", auth_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
