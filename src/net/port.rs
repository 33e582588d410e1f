//! Listener binding and free-port discovery.
//!
//! # Responsibilities
//! - Bind the explicitly requested port, failing fast when it is taken
//! - Otherwise try the conventional dev port, then let the OS pick one

use std::io::ErrorKind;

use tokio::net::TcpListener;

use crate::config::ConfigError;

/// Port tried first when none was requested.
pub const PREFERRED_PORT: u16 = 8080;

/// Bind `host` on the requested port, or discover a free one.
pub async fn bind(host: &str, requested: Option<u16>) -> Result<TcpListener, ConfigError> {
    match requested {
        Some(port) => bind_exact(host, port).await,
        None => match bind_exact(host, PREFERRED_PORT).await {
            Ok(listener) => Ok(listener),
            Err(e) => {
                tracing::debug!(port = PREFERRED_PORT, error = %e, "Preferred port unavailable, picking a free one");
                bind_exact(host, 0).await
            }
        },
    }
}

async fn bind_exact(host: &str, port: u16) -> Result<TcpListener, ConfigError> {
    let address = format!("{host}:{port}");
    TcpListener::bind(&address).await.map_err(|source| {
        if source.kind() == ErrorKind::AddrInUse && port != 0 {
            ConfigError::PortInUse(port)
        } else {
            ConfigError::Bind { address, source }
        }
    })
}
