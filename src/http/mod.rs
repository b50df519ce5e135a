//! HTTP server module for the sleep quality service.
//!
//! Exposes the prediction pipeline as a small JSON API:
//!
//! ```text
//! GET  /              welcome message
//! GET  /api/health    liveness
//! GET  /api/ready     readiness (artifacts loaded)
//! POST /api/predict   survey -> prediction
//! ```
//!
//! Prediction failures caused by the artifacts, the scaler or the network are
//! returned as `{"error": "..."}` with status 200. Malformed requests are
//! rejected before they reach the pipeline.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServiceConfig;

/// Load the artifacts, bind the configured address and serve until shutdown
pub async fn serve(config: &ServiceConfig) -> std::io::Result<()> {
    let state = AppState::load(&config.artifacts);
    let app = create_router(state);

    let addr = config
        .bind_addr()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
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

    info!("Shutdown signal received, draining connections");
}
