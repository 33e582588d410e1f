//! Local development HTTP server for single-page applications.
//!
//! Serves a directory as static files, answers unknown routes with a
//! fallback document (SPA mode) or per-directory documents (static mode),
//! renders directory listings, and pushes reload events to browsers over
//! a server-sent event stream when files change.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod routing;

// Live reload
pub mod live_reload;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::{ConfigError, ServeOptions, ServerConfig};
pub use http::HttpServer;
pub use lifecycle::{start, DevServer, ServerDescriptor, Shutdown};
pub use live_reload::LiveReloadHub;
