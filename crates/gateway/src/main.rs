//! Spectra API Gateway
//!
//! The main entry point for all external API requests.
//! Handles:
//! - Request routing
//! - Search, record, and substance endpoints
//! - Observability (logging, metrics, tracing)

mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use spectra_common::{config::AppConfig, db::DbPool, metrics, Repository};
use std::net::SocketAddr;
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
    pub repo: Repository,
    pub prometheus: PrometheusHandle,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;
    let config = Arc::new(config);

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.observability.log_filter.clone()));
    if config.observability.json_logging {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    info!("Starting Spectra API Gateway v{}", spectra_common::VERSION);

    // Initialize metrics
    let prometheus = PrometheusBuilder::new().install_recorder()?;
    metrics::register_metrics();

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;
    let repo = Repository::new(db);

    // Create app state
    let state = AppState {
        config: config.clone(),
        repo,
        prometheus,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
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

    // API routes
    let api_routes = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        // Search endpoint
        .route("/search", post(handlers::search::search))
        // Record endpoints
        .route("/records/{id}", get(handlers::records::get_record))
        .route("/records/{id}/spectrum", get(handlers::records::get_spectrum))
        .route(
            "/records/{id}/similarity",
            post(handlers::records::spectrum_similarity),
        )
        .route("/records/{id}/pdf", get(handlers::records::get_pdf))
        // Substance endpoints
        .route("/substances/lookup", post(handlers::substances::lookup))
        .route(
            "/substances/formula/{formula}",
            get(handlers::substances::by_formula),
        )
        .route(
            "/substances/inchikey/{inchikey}",
            get(handlers::substances::by_inchikey),
        )
        .route("/substances/{dtxsid}", get(handlers::substances::get_substance))
        .route(
            "/substances/{dtxsid}/classification",
            get(handlers::substances::get_classification),
        )
        .route(
            "/substances/{dtxsid}/synonyms",
            get(handlers::substances::get_synonyms),
        )
        .route(
            "/substances/{dtxsid}/sources",
            get(handlers::substances::get_additional_sources),
        )
        .route(
            "/substances/{dtxsid}/records",
            get(handlers::substances::get_records),
        )
        .route(
            "/substances/{dtxsid}/image",
            get(handlers::substances::get_image),
        )
        // Summary endpoints
        .route("/summary", get(handlers::summary::get_summary))
        .route("/sources", get(handlers::summary::get_sources))
        // Link endpoints
        .route("/links", post(handlers::links::create_link));

    // Compose the app
    Router::new()
        .nest("/v1", api_routes)
        .route("/metrics", get(handlers::health::metrics_export))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
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
