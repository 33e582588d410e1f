//! Configuration schema definitions.
//!
//! `ServeOptions` is the user-facing option bag (config file + CLI flags).
//! `ServerConfig` is the validated, immutable form the server runs with.

use std::path::PathBuf;

use serde::Deserialize;

/// Fallback document served for route requests by default.
pub const DEFAULT_FALLBACK: &str = "index.html";

/// Fallback document served for route requests in module mode.
pub const DEFAULT_MODULE_FALLBACK: &str = "index.js";

/// Options accepted from a config file or the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServeOptions {
    /// Directory to serve (default: current working directory).
    pub root: Option<PathBuf>,

    /// Wrap the fallback document in a `<script type="module">` tag.
    pub module: bool,

    /// Fallback filename (default depends on `module`).
    pub fallback: Option<String>,

    /// Enable the `/livereload` endpoint and broadcast on file change.
    pub reload: bool,

    /// Per-directory fallback with base href instead of a single SPA fallback.
    #[serde(rename = "static")]
    pub static_mode: bool,

    /// Raw markup appended to every served fallback document.
    pub inject: String,

    /// TLS material; presence selects HTTPS.
    pub credentials: Option<TlsConfig>,

    /// Desired port. Falls back to `PORT`, then automatic discovery.
    pub port: Option<u16>,

    /// Bind address.
    pub host: String,

    /// Quiet period before a burst of file changes becomes one reload.
    pub debounce_ms: u64,

    /// Interval between `ping` events on open reload streams.
    pub heartbeat_secs: u64,

    /// Look up the client location for access logs (best effort).
    pub geolocate: bool,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            root: None,
            module: false,
            fallback: None,
            reload: false,
            static_mode: false,
            inject: String::new(),
            credentials: None,
            port: None,
            host: "0.0.0.0".to_string(),
            debounce_ms: 100,
            heartbeat_secs: 60,
            geolocate: false,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// Validated server configuration. Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Absolute path of an existing directory.
    pub root: PathBuf,
    pub module_mode: bool,
    pub fallback_name: String,
    pub reload_enabled: bool,
    pub static_mode: bool,
    pub inject_snippet: String,
    pub credentials: Option<TlsConfig>,
    /// Explicitly requested port (option or `PORT`), if any.
    pub port: Option<u16>,
    pub host: String,
    pub debounce_ms: u64,
    pub heartbeat_secs: u64,
    pub geolocate: bool,
}

impl ServerConfig {
    /// Scheme the server is reachable on.
    pub fn protocol(&self) -> &'static str {
        if self.credentials.is_some() {
            "https"
        } else {
            "http"
        }
    }
}
