//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → request.rs (request ID, access log)
//!     → routing::RequestRouter (classify)
//!     → static_file.rs | fallback.rs → listing.rs | live_reload hub
//!     → response.rs (gzip allow-list, error statuses)
//!     → Send to client
//! ```

pub mod document;
pub mod fallback;
pub mod listing;
pub mod request;
pub mod response;
pub mod server;
pub mod static_file;

pub use request::X_REQUEST_ID;
pub use response::ServeError;
pub use server::HttpServer;
