//! Configuration loading and resolution.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{ServeOptions, ServerConfig, DEFAULT_FALLBACK, DEFAULT_MODULE_FALLBACK};
use crate::config::validation::{validate_credentials, validate_heartbeat, validate_root};

/// Environment variable consulted when no port option is given.
pub const PORT_ENV: &str = "PORT";

/// Fatal startup errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("root directory does not exist: {}", .0.display())]
    RootMissing(PathBuf),

    #[error("root is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("port {0} is already in use")]
    PortInUse(u16),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid option `{option}`: {reason}")]
    Invalid {
        option: &'static str,
        reason: &'static str,
    },

    #[error("TLS configuration error: {0}")]
    Tls(String),

    #[error("failed to watch root: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load options from a TOML file.
pub fn load_options(path: &Path) -> Result<ServeOptions, ConfigError> {
    let content = fs::read_to_string(path)?;
    let options: ServeOptions = toml::from_str(&content)?;
    Ok(options)
}

impl ServeOptions {
    /// Validate the options and produce the immutable server configuration.
    ///
    /// Reads `PORT` from the environment when no port option is set.
    pub fn resolve(self) -> Result<ServerConfig, ConfigError> {
        let port_env = std::env::var(PORT_ENV).ok();
        self.resolve_with_port_env(port_env.as_deref())
    }

    pub(crate) fn resolve_with_port_env(
        self,
        port_env: Option<&str>,
    ) -> Result<ServerConfig, ConfigError> {
        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir()?,
        };
        let root = validate_root(&root)?;

        if let Some(tls) = &self.credentials {
            validate_credentials(tls)?;
        }
        validate_heartbeat(self.heartbeat_secs)?;

        let fallback_name = self.fallback.unwrap_or_else(|| {
            if self.module {
                DEFAULT_MODULE_FALLBACK.to_string()
            } else {
                DEFAULT_FALLBACK.to_string()
            }
        });

        let port = self.port.or_else(|| {
            let raw = port_env?;
            match raw.trim().parse::<u16>() {
                Ok(port) => Some(port),
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "Ignoring invalid PORT");
                    None
                }
            }
        });

        Ok(ServerConfig {
            root,
            module_mode: self.module,
            fallback_name,
            reload_enabled: self.reload,
            static_mode: self.static_mode,
            inject_snippet: self.inject,
            credentials: self.credentials,
            port,
            host: self.host,
            debounce_ms: self.debounce_ms,
            heartbeat_secs: self.heartbeat_secs,
            geolocate: self.geolocate,
        })
    }
}
