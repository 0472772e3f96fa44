// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration file (`Depwatch.toml`).
///
/// ```toml
/// [project]
/// root = "."
/// entries = ["src/index.ts"]
/// exclude = ["**/node_modules/**", "**/*.d.ts"]
///
/// [build]
/// cmd = "npx tsc -p ."
/// rescan_after_build = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub project: ProjectSection,
    #[serde(default)]
    pub build: BuildSection,
}

/// `[project]`: what to scan and what to ignore.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// Directory all relative entries and exclusion patterns are evaluated
    /// against. Relative to the config file's directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Entry files the dependency scan starts from.
    #[serde(default)]
    pub entries: Vec<PathBuf>,

    /// Glob patterns for files that must never enter the watch set.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            entries: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

/// `[build]`: how to rebuild.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Shell command to run for each build.
    #[serde(default)]
    pub cmd: String,

    /// Rescan the dependency graph after every build.
    #[serde(default = "default_true")]
    pub rescan_after_build: bool,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            cmd: String::new(),
            rescan_after_build: true,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}
