// src/errors.rs

//! Crate-wide error types and the shared `Result` alias.
//!
//! The fatal taxonomy lives here; per-file skip conditions (extraction and
//! resolution failures) have their own local error types in [`crate::scan`]
//! and never surface through this enum.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepwatchError {
    /// One or more entry paths were missing when a scan started. Fatal to
    /// that `watch()`/`rescan()` call; the watcher keeps its previous state.
    #[error("entry path(s) not found: {}", format_paths(.0))]
    EntryNotFound(Vec<PathBuf>),

    /// A file transitively imports one of its own ancestors. `parent` is the
    /// revisited ancestor, `children` the import edge(s) that closed the
    /// cycle.
    #[error("cyclic dependency: {} re-imported via {}", .parent.display(), format_paths(.children))]
    CyclicDependency {
        parent: PathBuf,
        children: Vec<PathBuf>,
    },

    /// A lifecycle operation was invoked after `close()`.
    #[error("watcher is closed")]
    ClosedWatcher,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DepwatchError>;

fn format_paths(paths: &[PathBuf]) -> String {
    let rendered: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    rendered.join(", ")
}
