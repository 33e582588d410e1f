//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional) + CLI flags
//!     → loader.rs (parse & deserialize into ServeOptions)
//!     → ServeOptions::resolve (defaults, PORT env)
//!     → validation.rs (root exists, TLS files present)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc to router, responders and lifecycle
//! ```
//!
//! # Design Decisions
//! - Config is immutable once resolved
//! - All options have defaults so an empty file is valid
//! - Validation failures are `ConfigError`s returned to the driver, never process exits

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_options, ConfigError};
pub use schema::{ServeOptions, ServerConfig, TlsConfig};
