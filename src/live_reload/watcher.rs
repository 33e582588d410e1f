//! Recursive file watcher feeding the reload hub.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::live_reload::hub::LiveReloadHub;

/// Directory names whose contents never trigger a reload.
const IGNORED_DIRS: &[&str] = &[".git", "node_modules"];

/// Watches the served root and broadcasts one reload per burst of changes.
pub struct FileWatcher {
    root: PathBuf,
    debounce: Duration,
}

impl FileWatcher {
    pub fn new(root: &Path, debounce: Duration) -> Self {
        Self {
            root: root.to_path_buf(),
            debounce,
        }
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self, hub: LiveReloadHub) -> Result<RecommendedWatcher, notify::Error> {
        let (tx, rx) = mpsc::unbounded_channel();
        let root = self.root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !(event.kind.is_create() || event.kind.is_modify() || event.kind.is_remove()) {
                    return;
                }
                for path in event.paths {
                    let relative = path.strip_prefix(&root).unwrap_or(&path);
                    if !is_ignored(relative) {
                        let _ = tx.send(path);
                    }
                }
            }
            Err(e) => tracing::error!(error = %e, "Watch error"),
        })?;

        watcher.watch(&self.root, RecursiveMode::Recursive)?;
        tokio::spawn(debounce_changes(rx, self.debounce, hub));

        tracing::info!(root = %self.root.display(), "File watcher started");
        Ok(watcher)
    }
}

fn is_ignored(path: &Path) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|name| IGNORED_DIRS.contains(&name))
    })
}

/// Collapse bursts of change notifications into single broadcasts.
pub(crate) async fn debounce_changes(
    mut changes: mpsc::UnboundedReceiver<PathBuf>,
    quiet: Duration,
    hub: LiveReloadHub,
) {
    while let Some(first) = changes.recv().await {
        let mut count = 1usize;
        let mut source_closed = false;

        loop {
            match timeout(quiet, changes.recv()).await {
                Ok(Some(_)) => count += 1,
                Ok(None) => {
                    source_closed = true;
                    break;
                }
                Err(_) => break,
            }
        }

        tracing::debug!(path = %first.display(), changes = count, "Files changed");
        if hub.broadcast_reload().await.is_err() || source_closed {
            break;
        }
    }
}
