// src/watch/notifier.rs

use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::warn;

use crate::errors::Result;

/// Kind of filesystem change, collapsed from the platform-specific event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
    Other,
}

impl From<&EventKind> for ChangeKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Modify(_) => ChangeKind::Modified,
            EventKind::Remove(_) => ChangeKind::Removed,
            _ => ChangeKind::Other,
        }
    }
}

/// Callback invoked on every change notification for a subscribed path.
pub type ChangeCallback = Arc<dyn Fn(ChangeKind, &Path) + Send + Sync>;

/// Per-path change subscription source.
///
/// One subscription covers exactly one path; disposing the returned handle
/// stops notifications for that path only.
pub trait ChangeNotifier: Send + Sync {
    fn subscribe(&self, path: &Path, callback: ChangeCallback) -> Result<NotifierHandle>;
}

/// Handle for one active subscription.
///
/// This exists mainly so the underlying watcher is kept alive for as long as
/// needed. Dropping (or [`dispose`](Self::dispose)-ing) the handle stops
/// notifications.
pub struct NotifierHandle {
    _guard: Box<dyn Any + Send>,
}

impl std::fmt::Debug for NotifierHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierHandle").finish()
    }
}

impl NotifierHandle {
    pub fn new(guard: Box<dyn Any + Send>) -> Self {
        Self { _guard: guard }
    }

    /// End the subscription. Equivalent to dropping the handle.
    pub fn dispose(self) {}
}

/// Notifier backed by the cross-platform `notify` watcher, one
/// `RecommendedWatcher` per subscribed path.
#[derive(Debug, Clone, Default)]
pub struct FsNotifier;

impl FsNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl ChangeNotifier for FsNotifier {
    fn subscribe(&self, path: &Path, callback: ChangeCallback) -> Result<NotifierHandle> {
        let subscribed = path.to_path_buf();

        // Closure called synchronously by notify whenever an event arrives.
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let kind = ChangeKind::from(&event.kind);
                    if event.paths.is_empty() {
                        callback(kind, &subscribed);
                    } else {
                        for p in &event.paths {
                            callback(kind, p);
                        }
                    }
                }
                Err(err) => {
                    warn!(error = %err, "file watch error");
                }
            },
            Config::default(),
        )
        .map_err(anyhow::Error::from)?;

        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(anyhow::Error::from)?;

        Ok(NotifierHandle::new(Box::new(watcher)))
    }
}
