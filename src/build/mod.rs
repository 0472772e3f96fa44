// src/build/mod.rs

//! Build orchestration.
//!
//! - [`engine`] is the seam to the actual compiler: a trait plus the
//!   default shell-command implementation.
//! - [`watcher`] composes a dependency watcher with an engine: build on
//!   first watch, rebuild on every change, optionally rescan after each
//!   build.

pub mod engine;
pub mod watcher;

pub use engine::{BuildEngine, BuildResult, CommandBuildEngine};
pub use watcher::{BuildEvent, BuildWatcher, BuildWatcherOptions};
