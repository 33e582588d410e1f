//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (Ctrl+C)
//! - Close every open reload stream, then trigger shutdown
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Streams are closed before the server stops so browsers see a clean end

use crate::lifecycle::shutdown::Shutdown;
use crate::live_reload::LiveReloadHub;

/// Wait for Ctrl+C, then close reload streams and trigger shutdown.
pub async fn shutdown_on_interrupt(hub: LiveReloadHub, shutdown: Shutdown) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Interrupt received, shutting down");
    close_and_shutdown(&hub, &shutdown).await;
}

/// Close every reload stream, then trigger shutdown.
pub async fn close_and_shutdown(hub: &LiveReloadHub, shutdown: &Shutdown) {
    match hub.shutdown().await {
        Ok(closed) => tracing::info!(closed, "Closed live reload streams"),
        Err(e) => tracing::debug!(error = %e, "Live reload hub already stopped"),
    }
    shutdown.trigger();
}
