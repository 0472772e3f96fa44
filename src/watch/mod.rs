// src/watch/mod.rs

//! File watching and the watch-set lifecycle.
//!
//! This module is responsible for:
//! - The per-path change subscription seam ([`notifier`]), with a `notify`
//!   backed implementation and a manual-fire mock for tests.
//! - The three-state watcher ([`watcher`]) that owns the watch set, keeps
//!   one subscription per discovered file, and emits lifecycle and change
//!   events on a channel.
//!
//! It does **not** know about building; it only turns filesystem changes
//! into events.

pub mod mock;
pub mod notifier;
pub mod watcher;

pub use mock::MockNotifier;
pub use notifier::{ChangeCallback, ChangeKind, ChangeNotifier, FsNotifier, NotifierHandle};
pub use watcher::{DependencyWatcher, WatchEvent, WatcherState};
