//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events, fmt output)
//!
//! Access log (http::request):
//!     → geo.rs (optional, spawned, timeout-bounded client location)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (path, status, subscriber ids)
//! - Request ID flows through the access log and response headers
//! - Geolocation never delays or alters a response

pub mod geo;
pub mod logging;

pub use geo::GeoLocator;
