//! Live-reload subsystem.
//!
//! # Data Flow
//! ```text
//! GET /livereload
//!     → hub.rs (register, emit connected, arm heartbeat)
//!     → event-stream response body (Subscription)
//!
//! File written under root
//!     → watcher.rs (notify, ignore .git/node_modules, debounce)
//!     → hub.rs (send reload to every subscriber, drain registry)
//!     → browsers reload via script.rs bootstrap and resubscribe
//!
//! SIGINT
//!     → hub.rs shutdown (close all streams)
//! ```
//!
//! Subscriber states: Subscribed → Closed (terminal).

pub mod event;
pub mod hub;
pub mod script;
pub mod watcher;

pub use event::ReloadEvent;
pub use hub::{HubError, LiveReloadHub, Subscription, DEFAULT_HEARTBEAT};
pub use watcher::FileWatcher;
