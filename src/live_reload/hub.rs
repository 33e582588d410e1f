//! Live-reload subscriber hub.
//!
//! # Responsibilities
//! - Own the registry of open reload streams
//! - Emit `connected` on subscribe and `ping` heartbeats while open
//! - Broadcast `reload` on file change, then drain the registry
//! - Close every stream on shutdown
//!
//! # Design Decisions
//! - The registry lives inside one task; handles talk to it over a channel,
//!   so every mutation is applied in arrival order without locks
//! - A subscription stream deregisters itself when dropped (client gone)
//! - Dropping a subscriber aborts its heartbeat, which ends the stream

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::response::sse::Event;
use futures_util::Stream;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::live_reload::event::ReloadEvent;

/// Per-stream buffer. Events are tiny and rare; a full buffer means the
/// client stopped reading.
const EVENT_BUFFER: usize = 16;

/// Default interval between heartbeats.
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(60);

/// Shortest heartbeat period; `interval` rejects zero.
pub const MIN_HEARTBEAT: Duration = Duration::from_millis(1);

/// Identifier assigned to each subscriber.
pub type SubscriberId = u64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HubError {
    #[error("live reload hub has shut down")]
    Closed,
}

enum Command {
    Subscribe { reply: oneshot::Sender<Subscription> },
    Unsubscribe { id: SubscriberId },
    Broadcast { reply: oneshot::Sender<usize> },
    Count { reply: oneshot::Sender<usize> },
    Shutdown { reply: oneshot::Sender<usize> },
}

/// One open reload stream: its outbound channel and heartbeat timer.
struct ReloadSubscriber {
    id: SubscriberId,
    events: mpsc::Sender<ReloadEvent>,
    heartbeat: JoinHandle<()>,
}

impl Drop for ReloadSubscriber {
    fn drop(&mut self) {
        self.heartbeat.abort();
    }
}

#[derive(Default)]
struct ReloadRegistry {
    subscribers: Vec<ReloadSubscriber>,
    next_id: SubscriberId,
}

impl ReloadRegistry {
    fn next_id(&mut self) -> SubscriberId {
        self.next_id += 1;
        self.next_id
    }

    fn insert(&mut self, subscriber: ReloadSubscriber) {
        self.subscribers.push(subscriber);
    }

    fn remove(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Send `event` to everyone and empty the registry. Returns deliveries.
    fn drain_with(&mut self, event: ReloadEvent) -> usize {
        let delivered = self
            .subscribers
            .iter()
            .filter(|s| s.events.try_send(event).is_ok())
            .count();
        self.subscribers.clear();
        delivered
    }

    fn len(&self) -> usize {
        self.subscribers.len()
    }
}

/// Cloneable handle to the hub task.
#[derive(Debug, Clone)]
pub struct LiveReloadHub {
    commands: mpsc::UnboundedSender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Command::Subscribe { .. } => "Subscribe",
            Command::Unsubscribe { .. } => "Unsubscribe",
            Command::Broadcast { .. } => "Broadcast",
            Command::Count { .. } => "Count",
            Command::Shutdown { .. } => "Shutdown",
        };
        f.write_str(name)
    }
}

impl LiveReloadHub {
    /// Start the hub task. Must be called inside a Tokio runtime.
    ///
    /// A zero `heartbeat` is raised to [`MIN_HEARTBEAT`].
    pub fn spawn(heartbeat: Duration) -> Self {
        let heartbeat = heartbeat.max(MIN_HEARTBEAT);
        let (commands, rx) = mpsc::unbounded_channel();
        let handle = Self { commands };
        tokio::spawn(run(rx, handle.commands.clone(), heartbeat));
        handle
    }

    /// Register a new subscriber. The returned stream yields `connected` first.
    pub async fn subscribe(&self) -> Result<Subscription, HubError> {
        self.request(|reply| Command::Subscribe { reply }).await
    }

    /// Push `reload` to every subscriber and drain the registry.
    ///
    /// Returns the number of subscribers the event was delivered to.
    pub async fn broadcast_reload(&self) -> Result<usize, HubError> {
        self.request(|reply| Command::Broadcast { reply }).await
    }

    /// Number of currently registered subscribers.
    pub async fn subscriber_count(&self) -> Result<usize, HubError> {
        self.request(|reply| Command::Count { reply }).await
    }

    /// Close every open stream and stop accepting subscriptions.
    ///
    /// Returns how many streams were closed.
    pub async fn shutdown(&self) -> Result<usize, HubError> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, HubError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .map_err(|_| HubError::Closed)?;
        response.await.map_err(|_| HubError::Closed)
    }
}

async fn run(
    mut commands: mpsc::UnboundedReceiver<Command>,
    handle: mpsc::UnboundedSender<Command>,
    heartbeat: Duration,
) {
    let mut registry = ReloadRegistry::default();

    while let Some(command) = commands.recv().await {
        match command {
            Command::Subscribe { reply } => {
                let id = registry.next_id();
                let (tx, rx) = mpsc::channel(EVENT_BUFFER);
                // Fresh channel, cannot be full.
                let _ = tx.try_send(ReloadEvent::Connected);

                registry.insert(ReloadSubscriber {
                    id,
                    heartbeat: arm_heartbeat(tx.clone(), heartbeat),
                    events: tx,
                });
                tracing::debug!(subscriber = id, total = registry.len(), "Reload subscriber connected");

                let subscription = Subscription {
                    id,
                    events: rx,
                    hub: handle.clone(),
                };
                // If the caller went away the subscription drops and deregisters.
                let _ = reply.send(subscription);
            }
            Command::Unsubscribe { id } => {
                if registry.remove(id) {
                    tracing::debug!(subscriber = id, total = registry.len(), "Reload subscriber disconnected");
                }
            }
            Command::Broadcast { reply } => {
                let subscribers = registry.len();
                let delivered = registry.drain_with(ReloadEvent::Reload);
                tracing::info!(subscribers, delivered, "Broadcast reload");
                let _ = reply.send(delivered);
            }
            Command::Count { reply } => {
                let _ = reply.send(registry.len());
            }
            Command::Shutdown { reply } => {
                let closed = registry.len();
                registry.subscribers.clear();
                tracing::info!(closed, "Live reload hub shut down");
                let _ = reply.send(closed);
                break;
            }
        }
    }
}

fn arm_heartbeat(events: mpsc::Sender<ReloadEvent>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            if events.send(ReloadEvent::Ping).await.is_err() {
                break;
            }
        }
    })
}

/// The outbound half of one reload stream.
///
/// Yields SSE events; ends when the hub drops the
/// subscriber. Dropping it deregisters the subscriber.
pub struct Subscription {
    id: SubscriberId,
    events: mpsc::Receiver<ReloadEvent>,
    hub: mpsc::UnboundedSender<Command>,
}

impl Subscription {
    /// Receive the next event, or `None` once the stream is closed.
    pub async fn next_event(&mut self) -> Option<ReloadEvent> {
        self.events.recv().await
    }
}

impl Stream for Subscription {
    type Item = Result<Event, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events
            .poll_recv(cx)
            .map(|event| event.map(|e| Ok(e.to_event())))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self.hub.send(Command::Unsubscribe { id: self.id });
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
