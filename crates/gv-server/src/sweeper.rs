//! Background sweep of expired login sessions.
//!
//! Expired rows are already ignored at lookup time; the sweep only keeps the
//! `sessions` table from growing without bound.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::middleware::auth::now_timestamp;

/// Delete every expired session. Returns the number removed.
pub fn sweep_expired(ctx: &AppContext) -> gv_core::Result<usize> {
    let conn = gv_db::pool::get_conn(&ctx.db)?;
    let removed = gv_db::queries::sessions::delete_expired_sessions(&conn, &now_timestamp())?;
    if removed > 0 {
        tracing::info!(removed, "Swept expired sessions");
    }
    Ok(removed)
}

/// Start the session sweeper.
///
/// Runs until the cancellation token is triggered. A zero
/// `auth.sweep_interval_secs` disables sweeping.
pub async fn run_session_sweeper(ctx: AppContext, cancel: CancellationToken) {
    let secs = ctx.config.auth.sweep_interval_secs;
    if secs == 0 {
        tracing::info!("Session sweeper disabled");
        return;
    }
    tracing::info!(interval_secs = secs, "Session sweeper started");

    let mut interval = tokio::time::interval(Duration::from_secs(secs));
    // The first tick completes immediately; startup already swept once.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = sweep_expired(&ctx) {
                    tracing::error!("Session sweep failed: {e}");
                }
            }
            _ = cancel.cancelled() => break,
        }
    }

    tracing::info!("Session sweeper stopped");
}
