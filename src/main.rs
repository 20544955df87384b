//! Movie search API
//!
//! This is the main entry point for the application.

use anyhow::Result;
use movie_search_api::{
    config,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    info!("Starting movie-search-api v{}", movie_search_api::VERSION);

    // Load configuration
    let settings = config::load()?;
    info!(
        "Serving {}.{} via search index {}",
        settings.mongodb.database, settings.mongodb.collection, settings.mongodb.search_index
    );
    match settings.secrets.project_id {
        Some(ref project) => info!("Secrets resolved from project {}", project),
        None => info!("No GOOGLE_CLOUD_PROJECT set"),
    }

    // Create application state
    let state = AppState::new(settings.clone())?;
    info!("Application state initialized");

    #[cfg(unix)]
    spawn_refresh_on_hangup(state.connections.clone());

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Re-resolve the connection string whenever the process receives SIGHUP
#[cfg(unix)]
fn spawn_refresh_on_hangup(
    connections: std::sync::Arc<movie_search_api::store::ConnectionManager>,
) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                error!("Failed to install SIGHUP handler: {}", e);
                return;
            }
        };

        while hangup.recv().await.is_some() {
            info!("SIGHUP received, refreshing MongoDB credentials");
            if let Err(e) = connections.refresh().await {
                error!("Credential refresh failed: {}", e);
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
