// src/scan/exclude.rs

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::path_utils::relative_str;

/// Compiled exclusion glob patterns.
///
/// Patterns are relative to the project root (e.g. `"**/node_modules/**"`).
/// Candidate paths are converted to their root-relative forward-slash form
/// before matching, so patterns behave the same on every platform.
#[derive(Clone, Default)]
pub struct ExcludeSet {
    set: Option<GlobSet>,
}

impl fmt::Debug for ExcludeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcludeSet")
            .field("empty", &self.set.is_none())
            .finish()
    }
}

impl ExcludeSet {
    /// Compile the given glob patterns. An empty list produces a set that
    /// matches nothing.
    pub fn compile(patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self { set: None });
        }
        Ok(Self {
            set: Some(build_globset(patterns)?),
        })
    }

    /// Returns true if the path (relative to `root`) matches any exclusion
    /// pattern. Paths that cannot be relativized against the root never
    /// match.
    pub fn matches(&self, root: &Path, path: &Path) -> bool {
        let Some(set) = &self.set else {
            return false;
        };
        match relative_str(root, path) {
            Some(rel) => set.is_match(rel),
            None => false,
        }
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
