//! Serving process bootstrap
//!
//! Order matters: the artifact is checked before anything else is opened, so a
//! missing model stops the process before it touches the database or a socket.

use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tracing::{error, info};

use crate::application::handlers::routes;
use crate::application::services::prediction_service::PredictionService;
use crate::config::ServiceConfig;
use crate::domain::errors::ArtifactError;
use crate::domain::services::artifact::ModelArtifact;
use crate::persistence::repository::PredictionStore;
use crate::persistence::{init_database, DatabaseError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Model artifact unavailable: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Database unavailable: {0}")]
    Database(#[from] DatabaseError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the model, open the database and build the router
pub async fn build_app(config: &ServiceConfig) -> Result<Router, StartupError> {
    let artifact = ModelArtifact::load(&config.model_path).map_err(|e| {
        error!("❌ {}", e);
        e
    })?;

    let pool = init_database(&config.database).await?;
    let store = PredictionStore::new(pool);

    let service = PredictionService::new(Arc::new(artifact), Arc::new(store));
    Ok(routes(service))
}

/// Run until Ctrl+C or SIGTERM
pub async fn serve(config: ServiceConfig) -> Result<(), StartupError> {
    let app = build_app(&config).await?;

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    info!("Server started successfully. Press Ctrl+C to stop.");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal"),
            Err(e) => error!("Failed to install Ctrl+C handler: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received SIGTERM signal");
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Server shutting down gracefully...");
}
