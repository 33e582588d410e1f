//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve and validate configuration
//! - Bind the listener and load TLS material
//! - Start the live-reload hub and, when reload is on, the file watcher
//! - Describe the running server for the presentation layer
//!
//! # Design Decisions
//! - Fail fast: every startup error is a `ConfigError` returned to `main`
//! - Listener binds before the watcher starts (no reload without a server)

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum_server::tls_rustls::RustlsConfig;
use notify::RecommendedWatcher;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{ConfigError, ServeOptions, ServerConfig};
use crate::http::HttpServer;
use crate::live_reload::{FileWatcher, LiveReloadHub};
use crate::net::{addresses::local_addresses, port, tls::load_tls_config};

/// What the outer CLI needs to present a running server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDescriptor {
    pub url: String,
    pub root: PathBuf,
    pub protocol: &'static str,
    pub port: u16,
    pub addresses: Vec<IpAddr>,
}

/// A bound, not yet serving, development server.
pub struct DevServer {
    config: Arc<ServerConfig>,
    listener: TcpListener,
    tls: Option<RustlsConfig>,
    hub: LiveReloadHub,
    descriptor: ServerDescriptor,
    // Dropping the watcher stops it.
    _watcher: Option<RecommendedWatcher>,
}

/// Resolve options and bring up every subsystem short of serving.
pub async fn start(options: ServeOptions) -> Result<DevServer, ConfigError> {
    let config = Arc::new(options.resolve()?);

    tracing::info!(
        root = %config.root.display(),
        fallback = %config.fallback_name,
        reload = config.reload_enabled,
        module = config.module_mode,
        static_mode = config.static_mode,
        "Configuration loaded"
    );

    let listener = port::bind(&config.host, config.port).await?;
    let bound_port = listener.local_addr()?.port();

    let tls = match &config.credentials {
        Some(credentials) => Some(load_tls_config(credentials).await?),
        None => None,
    };

    let hub = LiveReloadHub::spawn(Duration::from_secs(config.heartbeat_secs));

    let watcher = if config.reload_enabled {
        let watcher = FileWatcher::new(&config.root, Duration::from_millis(config.debounce_ms));
        Some(watcher.run(hub.clone())?)
    } else {
        None
    };

    let descriptor = ServerDescriptor {
        url: format!("{}://localhost:{}", config.protocol(), bound_port),
        root: config.root.clone(),
        protocol: config.protocol(),
        port: bound_port,
        addresses: local_addresses(),
    };

    Ok(DevServer {
        config,
        listener,
        tls,
        hub,
        descriptor,
        _watcher: watcher,
    })
}

impl DevServer {
    pub fn descriptor(&self) -> &ServerDescriptor {
        &self.descriptor
    }

    /// Handle to the reload hub (for shutdown wiring).
    pub fn hub(&self) -> LiveReloadHub {
        self.hub.clone()
    }

    /// Serve until `shutdown` fires.
    pub async fn run(self, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let server = HttpServer::new(self.config, self.hub);
        let result = server.run(self.listener, self.tls, shutdown).await;
        drop(self._watcher);
        result
    }
}
