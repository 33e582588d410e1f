//! Reload events and their server-sent event encoding.

use axum::response::sse::Event;

/// Events pushed to reload subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadEvent {
    /// First event on every stream.
    Connected,
    /// Heartbeat.
    Ping,
    /// Files changed; the page should reload.
    Reload,
}

impl ReloadEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ReloadEvent::Connected => "connected",
            ReloadEvent::Ping => "ping",
            ReloadEvent::Reload => "message",
        }
    }

    pub fn data(&self) -> &'static str {
        match self {
            ReloadEvent::Connected => "ready",
            ReloadEvent::Ping => "waiting",
            ReloadEvent::Reload => "reload",
        }
    }

    /// Encode as an SSE event. Every event carries id `0`.
    pub fn to_event(&self) -> Event {
        Event::default().event(self.name()).id("0").data(self.data())
    }
}
