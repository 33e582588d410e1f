//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve config → Bind listener → Load TLS → Spawn hub → Start watcher
//!     → ServerDescriptor
//!
//! Shutdown (shutdown.rs):
//!     Trigger → HTTP server stops accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGINT → Close reload streams → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then listener, then background tasks
//! - Library code never exits the process; `main` decides

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start, DevServer, ServerDescriptor};
