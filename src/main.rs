//! spa-devserver
//!
//! Local development server for single-page applications.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser request
//!     ───────────────▶ net (port, tls) ─▶ http server ─▶ routing
//!                                                          │
//!                           ┌──────────────────────────────┼────────────────┐
//!                           ▼                              ▼                ▼
//!                     static file                 fallback / listing   /livereload
//!                     (gzip, mime)                (inject, bootstrap)  (SSE hub)
//!                                                                          ▲
//!     File change ─▶ live_reload watcher (debounce) ─▶ broadcast reload ───┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use spa_devserver::config::{load_options, ServeOptions, TlsConfig};
use spa_devserver::lifecycle::{self, signals::shutdown_on_interrupt, Shutdown};
use spa_devserver::observability::logging;

#[derive(Parser)]
#[command(name = "spa-devserver")]
#[command(about = "Development server for single-page applications", long_about = None)]
struct Cli {
    /// Directory to serve
    root: Option<PathBuf>,

    /// Fallback document for unknown routes
    fallback: Option<String>,

    /// Port to listen on
    port: Option<u16>,

    /// Reload connected browsers when files change
    #[arg(short, long)]
    reload: bool,

    /// Serve the fallback as an ES module
    #[arg(short, long)]
    module: bool,

    /// Use per-directory fallbacks instead of a single SPA fallback
    #[arg(short = 's', long = "static")]
    static_mode: bool,

    /// Markup appended to every served fallback document
    #[arg(short, long)]
    inject: Option<String>,

    /// TLS certificate (PEM); requires --key
    #[arg(long, requires = "key")]
    cert: Option<PathBuf>,

    /// TLS private key (PEM); requires --cert
    #[arg(long, requires = "cert")]
    key: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// TOML file with serve options; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resolve client locations in access logs
    #[arg(long)]
    geolocate: bool,
}

impl Cli {
    /// Overlay command-line flags on top of file options.
    fn apply(self, mut options: ServeOptions) -> ServeOptions {
        if self.root.is_some() {
            options.root = self.root;
        }
        if self.fallback.is_some() {
            options.fallback = self.fallback;
        }
        if self.port.is_some() {
            options.port = self.port;
        }
        if let Some(inject) = self.inject {
            options.inject = inject;
        }
        if let Some(host) = self.host {
            options.host = host;
        }
        if let (Some(cert_path), Some(key_path)) = (self.cert, self.key) {
            options.credentials = Some(TlsConfig {
                cert_path,
                key_path,
            });
        }
        options.reload |= self.reload;
        options.module |= self.module;
        options.static_mode |= self.static_mode;
        options.geolocate |= self.geolocate;
        options
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let cli = Cli::parse();

    let file_options = match &cli.config {
        Some(path) => match load_options(path) {
            Ok(options) => options,
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "Failed to load config file");
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => ServeOptions::default(),
    };
    let options = cli.apply(file_options);

    tracing::info!("spa-devserver v{} starting", env!("CARGO_PKG_VERSION"));

    let server = match lifecycle::start(options).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let descriptor = server.descriptor();
    tracing::info!(
        url = %descriptor.url,
        root = %descriptor.root.display(),
        "Serving"
    );
    for address in &descriptor.addresses {
        let addr = SocketAddr::new(*address, descriptor.port);
        tracing::info!("Reachable at {}://{}", descriptor.protocol, addr);
    }

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(shutdown_on_interrupt(server.hub(), shutdown));

    if let Err(e) = server.run(receiver).await {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
