//! gv-server: HTTP server for gradeview.
//!
//! Serves the public pages, the login flow, and the role dashboards as
//! server-rendered HTML. Sessions live in the database and are tied to the
//! browser by a cookie; a background task sweeps the expired ones.

pub mod context;
pub mod error;
pub mod flash;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod sweeper;
pub mod templates;

use std::net::SocketAddr;

use gv_core::config::Config;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;

/// Start the gradeview server.
///
/// Opens (and migrates) the database, compiles the templates, spawns the
/// session sweeper and serves HTTP until a shutdown signal arrives.
pub async fn start(config: Config) -> gv_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let db_path = config.server.db_path.clone();
    let existed = db_path.exists();
    let db = gv_db::pool::init_pool(&db_path)?;
    if existed {
        tracing::info!("Database opened (existing) at {}", db_path.display());
    } else {
        tracing::info!("Database created (new) at {}", db_path.display());
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| gv_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let ctx = AppContext::new(config, db)?;
    sweeper::sweep_expired(&ctx)?;

    let cancel = CancellationToken::new();

    let sweeper_ctx = ctx.clone();
    let sweeper_cancel = cancel.clone();
    let sweeper_handle = tokio::spawn(async move {
        sweeper::run_session_sweeper(sweeper_ctx, sweeper_cancel).await;
    });

    let app = router::build_router(ctx);

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| gv_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await;

    // Signal background tasks to stop.
    cancel.cancel();
    let _ = sweeper_handle.await;

    served?;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM) or cancellation.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
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
        _ = cancel.cancelled() => {}
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_signal_honours_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(5), shutdown_signal(cancel))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn start_rejects_bad_address() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.host = "not an address".into();
        config.server.db_path = dir.path().join("gv.db");
        let err = start(config).await.unwrap_err();
        assert!(matches!(err, gv_core::Error::Internal(_)));
    }
}
