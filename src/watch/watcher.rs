// src/watch/watcher.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{DepwatchError, Result};
use crate::scan::Scanner;
use crate::watch::notifier::{ChangeCallback, ChangeKind, ChangeNotifier, NotifierHandle};

/// Watcher lifecycle. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Ready,
    Watching,
    Closed,
}

/// Events emitted by a [`DependencyWatcher`] on its event channel.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A new watch set was installed (on `watch()` and on every `rescan()`).
    Watch { paths: Vec<PathBuf> },
    /// A native change notification for a watched path; exactly one event
    /// per notification, no coalescing.
    Change { kind: ChangeKind, path: PathBuf },
    /// The watcher was closed. Emitted exactly once.
    Close,
}

/// Owns the currently-watched file set and the active notifier handles.
///
/// Lifecycle operations (`watch`, `rescan`, `close`) take `&mut self`; the
/// owner serializes them. Change notifications arrive asynchronously from
/// the notifier and are forwarded onto the event channel handed out at
/// construction.
pub struct DependencyWatcher {
    scanner: Scanner,
    notifier: Arc<dyn ChangeNotifier>,
    state: WatcherState,
    watched: BTreeSet<PathBuf>,
    handles: Vec<NotifierHandle>,
    events_tx: mpsc::UnboundedSender<WatchEvent>,
}

impl std::fmt::Debug for DependencyWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyWatcher")
            .field("state", &self.state)
            .field("watched", &self.watched.len())
            .finish_non_exhaustive()
    }
}

impl DependencyWatcher {
    /// Create a watcher in the `Ready` state, returning the receiving end of
    /// its event channel.
    pub fn new(
        scanner: Scanner,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> (Self, mpsc::UnboundedReceiver<WatchEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            scanner,
            notifier,
            state: WatcherState::Ready,
            watched: BTreeSet::new(),
            handles: Vec::new(),
            events_tx,
        };
        (watcher, events_rx)
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    /// The currently installed watch set.
    pub fn watched_paths(&self) -> &BTreeSet<PathBuf> {
        &self.watched
    }

    /// Entry paths the underlying scanner starts from.
    pub fn entries(&self) -> &[PathBuf] {
        self.scanner.entries()
    }

    /// Start watching.
    ///
    /// - `Ready`: scan, subscribe one notifier per discovered path,
    ///   transition to `Watching`, emit a `Watch` event.
    /// - `Watching`: no-op; returns the current watch set without side
    ///   effects.
    /// - `Closed`: fails with [`DepwatchError::ClosedWatcher`].
    pub async fn watch(&mut self) -> Result<BTreeSet<PathBuf>> {
        match self.state {
            WatcherState::Closed => Err(DepwatchError::ClosedWatcher),
            WatcherState::Watching => {
                debug!("watch() while already watching; no-op");
                Ok(self.watched.clone())
            }
            WatcherState::Ready => self.install_watch_set().await,
        }
    }

    /// Discard the current watch set and recompute it from scratch.
    ///
    /// Always performs a fresh scan and emits a fresh `Watch` event, even if
    /// the resulting set is unchanged. Fails after `close()`.
    pub async fn rescan(&mut self) -> Result<BTreeSet<PathBuf>> {
        if self.state == WatcherState::Closed {
            return Err(DepwatchError::ClosedWatcher);
        }
        self.install_watch_set().await
    }

    /// Dispose every subscription and transition to `Closed`.
    ///
    /// Idempotent: the second and later calls do nothing, and the `Close`
    /// event is emitted exactly once.
    pub fn close(&mut self) {
        if self.state == WatcherState::Closed {
            debug!("close() on already-closed watcher; no-op");
            return;
        }

        self.dispose_handles();
        self.watched.clear();
        self.state = WatcherState::Closed;
        info!("watcher closed");
        let _ = self.events_tx.send(WatchEvent::Close);
    }

    /// Scan, then replace the watch set and subscriptions.
    ///
    /// The scan runs first: if it fails, the previous watch set and handles
    /// are left fully intact. On success, every old handle is disposed
    /// before the new set is installed.
    async fn install_watch_set(&mut self) -> Result<BTreeSet<PathBuf>> {
        let paths = self.scanner.scan().await?;

        self.dispose_handles();

        let mut handles = Vec::with_capacity(paths.len());
        for path in &paths {
            match self.subscribe(path) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    // Same policy as a file vanishing mid-scan.
                    warn!(path = %path.display(), error = %err, "failed to subscribe; skipping");
                }
            }
        }

        self.handles = handles;
        self.watched = paths.clone();
        self.state = WatcherState::Watching;
        info!(files = self.watched.len(), "watch set installed");

        let _ = self.events_tx.send(WatchEvent::Watch {
            paths: self.watched.iter().cloned().collect(),
        });

        Ok(paths)
    }

    fn subscribe(&self, path: &Path) -> Result<NotifierHandle> {
        let tx = self.events_tx.clone();
        let callback: ChangeCallback = Arc::new(move |kind: ChangeKind, changed: &Path| {
            let _ = tx.send(WatchEvent::Change {
                kind,
                path: changed.to_path_buf(),
            });
        });
        self.notifier.subscribe(path, callback)
    }

    fn dispose_handles(&mut self) {
        let count = self.handles.len();
        for handle in self.handles.drain(..) {
            handle.dispose();
        }
        if count > 0 {
            debug!(count, "disposed notifier handles");
        }
    }
}
