//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ServerConfig (host, port, credentials)
//!     → port.rs (bind requested port, or discover a free one)
//!     → tls.rs (optional rustls config, h2 + http/1.1)
//!     → addresses.rs (addresses reported in the ServerDescriptor)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - An explicitly requested port that is taken is fatal
//! - An unspecified port never fails startup on its own
//! - TLS is optional and selected purely by the presence of credentials

pub mod addresses;
pub mod port;
pub mod tls;
