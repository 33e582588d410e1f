//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Raw request path (percent-encoded)
//!     → path.rs (decode, collapse . and .., keep trailing /)
//!     → router.rs (classify)
//!     → Dispatch::LiveReload | Dispatch::StaticFile | Dispatch::Route
//! ```
//!
//! # Design Decisions
//! - Extension heuristic: a dot in the last segment means "file", always
//! - Route requests check for a directory `index.html` before falling back
//! - Deterministic for a given filesystem state

pub mod path;
pub mod router;

pub use path::NormalizedPathname;
pub use router::{Dispatch, RequestRouter, LIVE_RELOAD_PATH};
