// src/scan/resolve.rs

//! Import specifier resolution.
//!
//! Turns a raw specifier plus the path of the file containing it into an
//! absolute file path. Like extraction, this is a seam: the scanner is
//! oblivious to the resolution strategy.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::fs::FileSystem;
use crate::path_utils::normalize_path;

#[derive(Error, Debug)]
pub enum ResolveError {
    /// The specifier does not resolve to any file on disk. Non-fatal to a
    /// scan: the edge is simply omitted from the graph.
    #[error("cannot resolve '{specifier}' from {}", .importer.display())]
    Unresolved { specifier: String, importer: PathBuf },
}

/// Resolves an import specifier against the file containing it.
pub trait PathResolver: Send + Sync {
    fn resolve(&self, specifier: &str, importer: &Path) -> Result<PathBuf, ResolveError>;
}

/// Extensions probed, in order, when a specifier omits its extension.
const PROBE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Resolver for relative specifiers (`./x`, `../y`).
///
/// Resolution order for `./x` from `/proj/src/a.ts`:
/// 1. `/proj/src/x` verbatim (if it names a file)
/// 2. `/proj/src/x.<ext>` for each probed extension
/// 3. `/proj/src/x/index.<ext>` for each probed extension
///
/// Bare specifiers (package imports) are not resolved here; they fail with
/// [`ResolveError::Unresolved`] and the scanner drops the edge.
pub struct RelativeResolver {
    fs: Arc<dyn FileSystem>,
}

impl RelativeResolver {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn probe(&self, base: &Path) -> Option<PathBuf> {
        if self.fs.is_file(base) {
            return Some(base.to_path_buf());
        }

        for ext in PROBE_EXTENSIONS {
            let candidate = with_appended_extension(base, ext);
            if self.fs.is_file(&candidate) {
                return Some(candidate);
            }
        }

        for ext in PROBE_EXTENSIONS {
            let candidate = base.join(format!("index.{ext}"));
            if self.fs.is_file(&candidate) {
                return Some(candidate);
            }
        }

        None
    }
}

impl PathResolver for RelativeResolver {
    fn resolve(&self, specifier: &str, importer: &Path) -> Result<PathBuf, ResolveError> {
        let unresolved = || ResolveError::Unresolved {
            specifier: specifier.to_string(),
            importer: importer.to_path_buf(),
        };

        if !specifier.starts_with("./") && !specifier.starts_with("../") {
            return Err(unresolved());
        }

        let dir = importer.parent().ok_or_else(unresolved)?;
        let base = normalize_path(&dir.join(specifier));

        self.probe(&base).ok_or_else(unresolved)
    }
}

/// Append an extension rather than replacing one, so `./a.service` probes
/// `a.service.ts`, not `a.ts`.
fn with_appended_extension(base: &Path, ext: &str) -> PathBuf {
    let mut s = base.as_os_str().to_os_string();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}
