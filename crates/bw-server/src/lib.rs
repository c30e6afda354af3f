//! bw-server: the wiki HTTP service.
//!
//! Ties the page store, template renderer and relational store together
//! behind an explicit route table served by axum:
//!
//! - [`pages`] flat-file page storage (`<title>.txt`)
//! - [`templates`] the "view" and "edit" HTML templates
//! - [`dispatch`] ordered route table and the dispatcher that consults it
//! - [`routes`] request handlers
//! - graceful shutdown on SIGINT/SIGTERM

pub mod context;
pub mod dispatch;
pub mod error;
pub mod pages;
pub mod router;
pub mod routes;
pub mod templates;

use std::net::SocketAddr;

use bw_core::config::ServerConfig;
use bw_core::{Error, Result};
use tokio::net::TcpListener;

use crate::context::AppContext;

/// How the listener picks its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listen {
    /// Bind `server.host:server.port`.
    Configured,
    /// Bind an OS-assigned port on loopback and write the resulting address
    /// to `server.port_file`.
    Ephemeral,
}

/// Bind the listening socket according to `listen`.
pub async fn bind(server: &ServerConfig, listen: Listen) -> Result<TcpListener> {
    match listen {
        Listen::Configured => {
            let addr = format!("{}:{}", server.host, server.port);
            TcpListener::bind(&addr)
                .await
                .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))
        }
        Listen::Ephemeral => {
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .map_err(|e| Error::Internal(format!("Failed to bind ephemeral port: {e}")))?;
            let addr: SocketAddr = listener.local_addr()?;
            std::fs::write(&server.port_file, addr.to_string())?;
            tracing::info!(
                "Bound {addr}; address written to {}",
                server.port_file.display()
            );
            Ok(listener)
        }
    }
}

/// Serve HTTP on `listener` until a shutdown signal arrives.
pub async fn serve(ctx: AppContext, listener: TcpListener) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(
        db = %ctx.config.server.db_path.display(),
        pages = %ctx.config.wiki.pages_dir.display(),
        "Starting server on {addr}"
    );

    let app = router::build_router(ctx);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
