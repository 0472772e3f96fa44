// src/build/watcher.rs

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::build::engine::{BuildEngine, BuildResult};
use crate::errors::Result;
use crate::watch::notifier::ChangeKind;
use crate::watch::watcher::{DependencyWatcher, WatchEvent, WatcherState};

/// Events emitted by a [`BuildWatcher`]: everything the inner watcher
/// emits, plus a `Build` event per engine invocation.
#[derive(Debug, Clone)]
pub enum BuildEvent {
    Watch { paths: Vec<PathBuf> },
    Change { kind: ChangeKind, path: PathBuf },
    Build { result: BuildResult },
    Close,
}

#[derive(Debug, Clone)]
pub struct BuildWatcherOptions {
    /// Rescan the dependency graph after every build, so import edges added
    /// or removed by the change are reflected in the next watch cycle.
    pub rescan_after_build: bool,
}

impl Default for BuildWatcherOptions {
    fn default() -> Self {
        Self {
            rescan_after_build: true,
        }
    }
}

/// Composes a [`DependencyWatcher`] with a [`BuildEngine`].
///
/// The first successful watch triggers one build; every change event
/// triggers another. Builds are neither queued nor deduplicated: rapid
/// changes produce independent build invocations.
///
/// The build watcher is the sole consumer of the inner watcher's event
/// channel and re-emits everything on its own channel.
pub struct BuildWatcher {
    inner: DependencyWatcher,
    watcher_rx: mpsc::UnboundedReceiver<WatchEvent>,
    engine: Arc<dyn BuildEngine>,
    options: BuildWatcherOptions,
    events_tx: mpsc::UnboundedSender<BuildEvent>,
    initial_build_done: bool,
}

impl std::fmt::Debug for BuildWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildWatcher")
            .field("inner", &self.inner)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl BuildWatcher {
    /// Wrap a watcher (and its event receiver) with a build engine,
    /// returning the receiving end of the build event channel.
    pub fn new(
        inner: DependencyWatcher,
        watcher_rx: mpsc::UnboundedReceiver<WatchEvent>,
        engine: Arc<dyn BuildEngine>,
        options: BuildWatcherOptions,
    ) -> (Self, mpsc::UnboundedReceiver<BuildEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            inner,
            watcher_rx,
            engine,
            options,
            events_tx,
            initial_build_done: false,
        };
        (watcher, events_rx)
    }

    pub fn state(&self) -> WatcherState {
        self.inner.state()
    }

    /// Start watching; the first successful watch triggers the initial
    /// build. Same state semantics as [`DependencyWatcher::watch`].
    pub async fn watch(&mut self) -> Result<BTreeSet<PathBuf>> {
        let paths = self.inner.watch().await?;
        self.drain_pending().await?;
        Ok(paths)
    }

    /// Recompute the watch set. Does not itself trigger a build.
    pub async fn rescan(&mut self) -> Result<BTreeSet<PathBuf>> {
        let paths = self.inner.rescan().await?;
        self.drain_pending().await?;
        Ok(paths)
    }

    /// Close the inner watcher and forward its `Close` event. Idempotent.
    pub async fn close(&mut self) -> Result<()> {
        self.inner.close();
        self.drain_pending().await?;
        Ok(())
    }

    /// Event loop for watch mode: consumes watcher events (triggering
    /// builds) until the watcher closes, its channel ends, or a shutdown
    /// signal arrives.
    pub async fn run(&mut self, mut shutdown_rx: mpsc::Receiver<()>) -> Result<()> {
        loop {
            tokio::select! {
                maybe_event = self.watcher_rx.recv() => {
                    match maybe_event {
                        Some(event) => {
                            if !self.handle_event(event).await? {
                                break;
                            }
                        }
                        None => {
                            debug!("watcher event channel closed; stopping");
                            break;
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("shutdown requested; closing watcher");
                    self.inner.close();
                    // Forward the Close (and anything still queued), then
                    // stop.
                    self.drain_pending().await?;
                    break;
                }
            }
        }
        Ok(())
    }

    /// Forward watcher events that were emitted synchronously by a
    /// lifecycle call.
    async fn drain_pending(&mut self) -> Result<()> {
        while let Ok(event) = self.watcher_rx.try_recv() {
            self.handle_event(event).await?;
        }
        Ok(())
    }

    /// Process one inner watcher event. Returns false when the loop should
    /// stop.
    async fn handle_event(&mut self, event: WatchEvent) -> Result<bool> {
        match event {
            WatchEvent::Watch { paths } => {
                let _ = self.events_tx.send(BuildEvent::Watch { paths });
                if !self.initial_build_done {
                    self.initial_build_done = true;
                    self.run_build().await?;
                }
                Ok(true)
            }
            WatchEvent::Change { kind, path } => {
                debug!(?kind, path = %path.display(), "change event; rebuilding");
                let _ = self.events_tx.send(BuildEvent::Change { kind, path });
                self.run_build().await?;
                Ok(true)
            }
            WatchEvent::Close => {
                let _ = self.events_tx.send(BuildEvent::Close);
                Ok(false)
            }
        }
    }

    /// Invoke the engine once, emit the `Build` event, and (optionally)
    /// rescan so the next cycle sees a current watch set.
    async fn run_build(&mut self) -> Result<()> {
        let result = self.engine.build(self.inner.entries()).await?;
        let _ = self.events_tx.send(BuildEvent::Build { result });

        if self.options.rescan_after_build && self.inner.state() == WatcherState::Watching {
            // A failed rescan keeps the previous watch set; watching
            // continues with the stale set rather than tearing down the
            // session.
            if let Err(err) = self.inner.rescan().await {
                warn!(error = %err, "rescan after build failed; keeping previous watch set");
            }
        }
        Ok(())
    }
}
