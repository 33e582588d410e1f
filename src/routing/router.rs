//! Request classification.
//!
//! Every request resolves to exactly one [`Dispatch`] outcome. Anything whose
//! final path segment contains a dot is a file request and never reaches the
//! fallback logic.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::routing::path::NormalizedPathname;

/// Path of the server-sent events endpoint.
pub const LIVE_RELOAD_PATH: &str = "/livereload";

/// Index document looked up inside route directories.
pub const INDEX_FILE: &str = "index.html";

/// Routing decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Open a live-reload event stream.
    LiveReload,
    /// Serve this exact file.
    StaticFile(PathBuf),
    /// Resolve a fallback document (or directory listing) for this route.
    Route(NormalizedPathname),
}

/// Maps normalized request paths to responders.
#[derive(Debug, Clone)]
pub struct RequestRouter {
    config: Arc<ServerConfig>,
}

impl RequestRouter {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self { config }
    }

    /// Decide how to answer a request for `pathname`.
    ///
    /// The root path always goes to the route responder so the root document
    /// receives injection and the reload bootstrap.
    pub async fn dispatch(&self, pathname: &NormalizedPathname) -> Dispatch {
        if self.config.reload_enabled && pathname.as_str() == LIVE_RELOAD_PATH {
            return Dispatch::LiveReload;
        }

        if pathname.has_extension() {
            return Dispatch::StaticFile(pathname.resolve(&self.config.root));
        }

        if !pathname.is_root() {
            let index = pathname.resolve(&self.config.root).join(INDEX_FILE);
            if is_file(&index).await {
                return Dispatch::StaticFile(index);
            }
        }

        Dispatch::Route(pathname.clone())
    }
}

async fn is_file(path: &std::path::Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
