// src/watch/mock.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::errors::Result;
use crate::watch::notifier::{ChangeCallback, ChangeKind, ChangeNotifier, NotifierHandle};

type Subscriptions = Arc<Mutex<HashMap<PathBuf, ChangeCallback>>>;

/// In-memory notifier for tests.
///
/// Change events are fired manually with [`fire`](Self::fire); live and
/// disposed subscription counts are tracked so tests can assert handle
/// accounting across rescans and close.
#[derive(Clone, Default)]
pub struct MockNotifier {
    subscriptions: Subscriptions,
    disposed: Arc<Mutex<usize>>,
}

impl std::fmt::Debug for MockNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockNotifier")
            .field("active", &self.active_count())
            .finish()
    }
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently live subscriptions.
    pub fn active_count(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }

    /// Paths with a currently live subscription, sorted.
    pub fn active_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.subscriptions.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Total number of handles disposed so far.
    pub fn disposed_count(&self) -> usize {
        *self.disposed.lock().unwrap()
    }

    /// Simulate a native change notification for `path`.
    ///
    /// Returns false if no live subscription covers the path.
    pub fn fire(&self, path: &Path, kind: ChangeKind) -> bool {
        let callback = {
            let subs = self.subscriptions.lock().unwrap();
            subs.get(path).cloned()
        };
        match callback {
            Some(cb) => {
                cb(kind, path);
                true
            }
            None => false,
        }
    }
}

/// Removes the subscription when the handle is dropped.
struct MockGuard {
    path: PathBuf,
    subscriptions: Subscriptions,
    disposed: Arc<Mutex<usize>>,
}

impl Drop for MockGuard {
    fn drop(&mut self) {
        self.subscriptions.lock().unwrap().remove(&self.path);
        *self.disposed.lock().unwrap() += 1;
    }
}

impl ChangeNotifier for MockNotifier {
    fn subscribe(&self, path: &Path, callback: ChangeCallback) -> Result<NotifierHandle> {
        self.subscriptions
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), callback);

        Ok(NotifierHandle::new(Box::new(MockGuard {
            path: path.to_path_buf(),
            subscriptions: Arc::clone(&self.subscriptions),
            disposed: Arc::clone(&self.disposed),
        })))
    }
}
