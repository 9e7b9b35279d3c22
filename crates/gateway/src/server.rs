use std::sync::Arc;

use {
    axum::{
        Json,
        Router,
        http::{HeaderValue, Method},
        routing::get,
    },
    tower_http::cors::CorsLayer,
    tracing::{info, warn},
};

use {
    chartrelay_browser::{BrowserHandle, ChartFetcher, ChartSource},
    chartrelay_config::ChartrelayConfig,
};

use crate::chart::{chart_handler, missing_pid_handler};

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ChartSource>,
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_app(state: AppState, allowed_origins: &[String]) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(parse_origins(allowed_origins))
        .allow_methods([Method::GET, Method::POST]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/", get(missing_pid_handler))
        .route("/{pid}", get(chart_handler))
        .layer(cors)
        .with_state(state)
}

/// Parse the configured origin allow-list, dropping entries that are not
/// valid header values.
fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(origin = %o, error = %e, "ignoring invalid CORS origin");
                None
            },
        })
        .collect()
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Start the gateway HTTP server.
///
/// Owns the browser handle for the process lifetime and closes it on
/// graceful shutdown.
pub async fn start_gateway(config: ChartrelayConfig) -> anyhow::Result<()> {
    let handle = Arc::new(BrowserHandle::new((&config.browser).into()));

    // Warm-launch so the first request does not pay the startup cost.
    // Failure is not fatal; the first request retries the launch.
    if let Err(e) = handle.warm_up().await {
        warn!(error = %e, "browser warm-up failed, will retry on first request");
    }

    let source: Arc<dyn ChartSource> = Arc::new(ChartFetcher::new(
        Arc::clone(&handle),
        (&config.upstream).into(),
    ));
    let app = build_app(AppState { source }, &config.cors.allowed_origins);

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr, "chartrelay gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutdown signal received, closing browser");
    handle.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                return std::future::pending::<()>().await;
            },
        };

        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM"),
            _ = tokio::signal::ctrl_c() => info!("received SIGINT"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("received Ctrl+C");
    }
}
