use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{
    artifacts::ArtifactCache,
    auth,
    config::Config,
    credentials::CredentialStore,
    handlers::{self, AppState},
    metrics,
    signals::setup_signal_handlers,
};

/// Prometheus scrape route, mounted only when metrics are enabled
pub struct MetricsRoute {
    pub endpoint: String,
    pub handle: Arc<PrometheusHandle>,
}

/// Start the MediRank server
///
/// This function:
/// 1. Initializes metrics (if enabled)
/// 2. Builds the shared state and warms the artifact cache
/// 3. Sets up signal handlers for graceful shutdown
/// 4. Binds to the configured address and serves requests
pub async fn start_server(config: Config) -> Result<()> {
    let metrics_route = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        Some(MetricsRoute {
            endpoint: config.metrics.endpoint.clone(),
            handle: Arc::new(metrics::init_metrics()?),
        })
    } else {
        None
    };

    let app_state = AppState::new(
        CredentialStore::from_users(&config.users),
        ArtifactCache::new(config.artifacts.dir.clone()),
    );

    // Load artifacts up front so a missing file is reported at startup;
    // the server still starts and the ranking routes report the failure.
    if let Err(e) = app_state.artifacts.artifacts() {
        warn!(error = %e, "Ranking is unavailable until artifacts are fixed and the server restarted");
    }

    let (shutdown_tx, signal_handle) = setup_signal_handlers()
        .map_err(|e| anyhow::anyhow!("Failed to install signal handlers: {}", e))?;
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app = create_router(app_state, metrics_route);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting MediRank on {}", addr);
    info!(
        "Configuration: {} users, artifacts in {}",
        config.users.len(),
        config.artifacts.dir.display()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(app_state: AppState, metrics_route: Option<MetricsRoute>) -> Router {
    // Routes that need a logged-in session
    let auth_routes = Router::new()
        .route("/api/logout", post(handlers::session::logout))
        .route("/api/options", get(handlers::ranking::options))
        .route("/api/rank", post(handlers::ranking::rank))
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::auth_middleware,
        ));

    let mut router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/login", post(handlers::session::login))
        .route("/api/session", get(handlers::session::session_info))
        .merge(auth_routes)
        .with_state(app_state);

    if let Some(MetricsRoute { endpoint, handle }) = metrics_route {
        router = router.route(
            &endpoint,
            get(handlers::metrics_handler::scrape).with_state(handle),
        );
    }

    router
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
