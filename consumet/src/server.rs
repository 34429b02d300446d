//! HTTP server lifecycle

use anyhow::Context;
use tracing::{error, info};

use consumet_api::{create_router, AppState};
use consumet_core::{bootstrap::Services, Config};

pub struct ConsumetServer {
    config: Config,
    services: Services,
}

impl ConsumetServer {
    pub const fn new(config: Config, services: Services) -> Self {
        Self { config, services }
    }

    /// Bind the HTTP listener and serve until SIGTERM or Ctrl+C
    pub async fn run(self) -> anyhow::Result<()> {
        let http_address = self.config.http_address();
        let state = AppState::from_services(&self.services);
        let router = create_router(state, &self.config.server.cors_origins);

        let listener = tokio::net::TcpListener::bind(&http_address)
            .await
            .with_context(|| format!("Failed to bind HTTP address {http_address}"))?;
        info!("HTTP server listening on {}", http_address);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;

        info!("HTTP server shut down gracefully");
        Ok(())
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT/Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("Received Ctrl+C"); }
        () = terminate => { info!("Received SIGTERM"); }
    }
}
