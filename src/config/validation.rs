//! Configuration validation.
//!
//! # Responsibilities
//! - Check that the served root exists and is a directory
//! - Check that TLS material is present on disk before binding
//! - Reject a zero heartbeat interval (pings would never be scheduled)
//!
//! # Design Decisions
//! - Validation runs before any socket is bound
//! - Root is canonicalized so every later join is absolute

use std::path::{Path, PathBuf};

use crate::config::loader::ConfigError;
use crate::config::schema::TlsConfig;

/// Canonicalize the root and ensure it is an existing directory.
pub fn validate_root(root: &Path) -> Result<PathBuf, ConfigError> {
    if !root.exists() {
        return Err(ConfigError::RootMissing(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ConfigError::RootNotDirectory(root.to_path_buf()));
    }
    Ok(root.canonicalize()?)
}

/// Ensure certificate and key files exist.
pub fn validate_credentials(tls: &TlsConfig) -> Result<(), ConfigError> {
    if !tls.cert_path.is_file() {
        return Err(ConfigError::Tls(format!(
            "certificate file not found: {}",
            tls.cert_path.display()
        )));
    }
    if !tls.key_path.is_file() {
        return Err(ConfigError::Tls(format!(
            "private key file not found: {}",
            tls.key_path.display()
        )));
    }
    Ok(())
}

/// The reload heartbeat needs a non-zero period.
pub fn validate_heartbeat(heartbeat_secs: u64) -> Result<(), ConfigError> {
    if heartbeat_secs == 0 {
        return Err(ConfigError::Invalid {
            option: "heartbeat_secs",
            reason: "must be at least 1 second",
        });
    }
    Ok(())
}
