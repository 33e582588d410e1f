//! TLS configuration and certificate loading.

use axum_server::tls_rustls::RustlsConfig;

use crate::config::{ConfigError, TlsConfig};

/// Load TLS configuration from the configured PEM files.
///
/// The resulting config advertises `h2` and `http/1.1` via ALPN.
pub async fn load_tls_config(tls: &TlsConfig) -> Result<RustlsConfig, ConfigError> {
    RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(|e| {
            ConfigError::Tls(format!(
                "failed to load {} / {}: {e}",
                tls.cert_path.display(),
                tls.key_path.display()
            ))
        })
}
