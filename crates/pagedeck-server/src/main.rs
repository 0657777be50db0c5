mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use pagedeck_api::{AppState, AppStateInner};
use pagedeck_db::Database;
use pagedeck_graph::GraphClient;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagedeck=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    if config.access_token.is_empty() {
        eprintln!("FATAL: GRAPH_ACCESS_TOKEN is unset.");
        eprintln!("       Set it to a user access token with page permissions");
        eprintln!("       in your .env file and restart.");
        std::process::exit(1);
    }

    let db = Database::open(&config.db_path)?;
    let graph = GraphClient::new(
        &config.graph_base_url,
        &config.access_token,
        config.graph_timeout,
    )?;
    info!("Graph API base: {}", graph.base_url());

    let state: AppState = Arc::new(AppStateInner::new(db, Arc::new(graph)));

    if config.debug_routes {
        warn!("Debug routes enabled: /debug/* echoes raw API responses");
    }

    let app = pagedeck_api::router(state, config.debug_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.addr().parse()?;
    info!("pagedeck listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    info!("Received Ctrl+C, shutting down...");
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
