//! Listener lifecycle for the receiver.
//!
//! `ReceiverServer` owns the bound socket and the router. The socket is
//! released when `serve` returns, whether the shutdown future was an OS
//! signal or something the caller resolved explicitly.

use std::future::Future;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tokio::{net::TcpListener, signal};
use tracing::info;

use crate::web::{is_signature_verification_enabled, router, AppState};
use crate::Config;

/// A bound, not yet serving, webhook receiver.
pub struct ReceiverServer {
    listener: TcpListener,
    app: Router,
    local_addr: SocketAddr,
    verification_enabled: bool,
}

impl ReceiverServer {
    /// Bind the listening socket. Failing to bind is fatal for the process.
    pub async fn bind(config: Config) -> Result<Self> {
        let addr = config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;
        let local_addr = listener
            .local_addr()
            .context("Failed to read bound address")?;

        info!(address = %local_addr, "receiver_listening");

        Ok(Self {
            listener,
            verification_enabled: is_signature_verification_enabled(config.secret()),
            app: router(AppState::new(config)),
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn verification_enabled(&self) -> bool {
        self.verification_enabled
    }

    /// URL a webhook sender should be pointed at.
    pub fn url(&self) -> String {
        let host = if self.local_addr.ip().is_unspecified() {
            "localhost".to_string()
        } else {
            self.local_addr.ip().to_string()
        };
        format!("http://{}:{}", host, self.local_addr.port())
    }

    /// Serve until `shutdown` resolves, then drop the listener.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("Server error")?;

        info!(address = %self.local_addr, "receiver_stopped");
        Ok(())
    }
}

/// Create a future that completes when a shutdown signal is received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl_c_handler_failed");
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
                tracing::error!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("receiver_shutting_down");
}
