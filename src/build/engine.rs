// src/build/engine.rs

//! Pluggable build engine abstraction.
//!
//! The build watcher talks to a [`BuildEngine`] instead of a concrete
//! compiler invocation. This makes it easy to swap in a fake engine in
//! tests while keeping the production implementation here.
//!
//! - [`CommandBuildEngine`] is the default: it runs a configured shell
//!   command and maps the exit status to a [`BuildResult`].
//! - Tests provide their own `BuildEngine` that records invocations and
//!   returns canned results.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::Result;

/// Outcome of one build invocation.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub success: bool,
    pub artifacts: Vec<PathBuf>,
    pub diagnostics: Vec<String>,
}

/// Trait abstracting how a set of entry files is compiled.
///
/// A build is a pure request/response operation with no awareness of
/// watching; the same engine is invoked for the initial build and for every
/// change-triggered rebuild.
pub trait BuildEngine: Send + Sync {
    fn build(
        &self,
        entries: &[PathBuf],
    ) -> Pin<Box<dyn Future<Output = Result<BuildResult>> + Send + '_>>;
}

/// Build engine that runs a shell command.
///
/// The entry paths are exported to the command via the `DEPWATCH_ENTRIES`
/// environment variable (joined with the platform path-list separator).
/// Exit status zero means success; stderr lines are collected as
/// diagnostics. This engine cannot know what artifacts the command
/// produced, so `artifacts` is always empty.
pub struct CommandBuildEngine {
    cmd: String,
}

impl CommandBuildEngine {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }
}

impl BuildEngine for CommandBuildEngine {
    fn build(
        &self,
        entries: &[PathBuf],
    ) -> Pin<Box<dyn Future<Output = Result<BuildResult>> + Send + '_>> {
        // Clone so the future doesn't borrow `self` across `await`.
        let cmd_line = self.cmd.clone();
        let entries = entries.to_vec();

        Box::pin(async move {
            info!(cmd = %cmd_line, "starting build");

            // Build a shell command appropriate for the platform.
            let mut cmd = if cfg!(windows) {
                let mut c = Command::new("cmd");
                c.arg("/C").arg(&cmd_line);
                c
            } else {
                let mut c = Command::new("sh");
                c.arg("-c").arg(&cmd_line);
                c
            };

            let joined = match std::env::join_paths(entries.iter()) {
                Ok(s) => s.to_string_lossy().into_owned(),
                Err(err) => {
                    warn!(error = %err, "could not join entry paths for DEPWATCH_ENTRIES");
                    String::new()
                }
            };

            cmd.env("DEPWATCH_ENTRIES", joined)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());

            let output = cmd
                .output()
                .await
                .with_context(|| format!("spawning build command '{cmd_line}'"))?;

            for line in String::from_utf8_lossy(&output.stdout).lines() {
                debug!("build stdout: {line}");
            }

            let diagnostics: Vec<String> = String::from_utf8_lossy(&output.stderr)
                .lines()
                .map(|l| l.to_string())
                .collect();

            let success = output.status.success();
            if success {
                info!("build succeeded");
            } else {
                warn!(
                    code = output.status.code().unwrap_or(-1),
                    diagnostics = diagnostics.len(),
                    "build failed"
                );
            }

            Ok(BuildResult {
                success,
                artifacts: Vec::new(),
                diagnostics,
            })
        })
    }
}
