// src/scan/scanner.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::{DepwatchError, Result};
use crate::fs::FileSystem;
use crate::scan::exclude::ExcludeSet;
use crate::scan::extract::{FileType, ImportExtractor};
use crate::scan::graph::{DependencyGraph, GraphKey};
use crate::scan::resolve::PathResolver;

/// Breadth-first discovery of every file transitively imported by a set of
/// entry files.
///
/// One `Scanner` is configured once and reused across rescans; all per-scan
/// state (the graph, the frontier) lives inside [`Scanner::scan`].
pub struct Scanner {
    fs: Arc<dyn FileSystem>,
    extractor: Arc<dyn ImportExtractor>,
    resolver: Arc<dyn PathResolver>,
    exclude: ExcludeSet,
    root: PathBuf,
    entries: Vec<PathBuf>,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("root", &self.root)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl Scanner {
    pub fn new(
        root: PathBuf,
        entries: Vec<PathBuf>,
        exclude: ExcludeSet,
        fs: Arc<dyn FileSystem>,
        extractor: Arc<dyn ImportExtractor>,
        resolver: Arc<dyn PathResolver>,
    ) -> Self {
        Self {
            fs,
            extractor,
            resolver,
            exclude,
            root,
            entries,
        }
    }

    /// Entry paths this scanner starts from, as configured.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Run one full scan and return the flattened set of discovered files
    /// (entries included).
    ///
    /// Fails with [`DepwatchError::EntryNotFound`] if any entry is missing,
    /// or [`DepwatchError::CyclicDependency`] if an import cycle is
    /// reachable from an entry. Individual files that vanish or fail to
    /// parse are skipped with a log line, never failing the scan.
    pub async fn scan(&self) -> Result<BTreeSet<PathBuf>> {
        let entry_set = self.canonical_entries()?;
        info!(entries = entry_set.len(), "starting dependency scan");

        let mut discovered = DependencyGraph::new();
        let mut frontier: Vec<(GraphKey, BTreeSet<PathBuf>)> =
            vec![(GraphKey::Root, entry_set)];

        while !frontier.is_empty() {
            // Merge this layer into the graph. The graph rejects an
            // overlapping re-record of any parent.
            for (parent, children) in &frontier {
                discovered.merge(parent.clone(), children.clone())?;
            }

            // Collect the deduplicated set of files to examine next,
            // checking each edge into an already-examined file for a true
            // import cycle.
            let layer = self.next_layer(&discovered, &frontier)?;

            // Expand every file in the layer concurrently; layers themselves
            // are strictly sequential.
            frontier = self.expand_layer(layer).await?;
        }

        let flattened = discovered.flatten();
        info!(files = flattened.len(), "dependency scan complete");
        Ok(flattened)
    }

    /// Canonicalize the configured entries, failing if any are missing.
    fn canonical_entries(&self) -> Result<BTreeSet<PathBuf>> {
        let mut resolved = BTreeSet::new();
        let mut missing = Vec::new();

        for entry in &self.entries {
            let absolute = if entry.is_absolute() {
                entry.clone()
            } else {
                self.root.join(entry)
            };
            match self.fs.canonicalize(&absolute) {
                Ok(canonical) if self.fs.is_file(&canonical) => {
                    resolved.insert(canonical);
                }
                _ => missing.push(absolute),
            }
        }

        if !missing.is_empty() {
            return Err(DepwatchError::EntryNotFound(missing));
        }
        Ok(resolved)
    }

    /// Dedup the frontier's children into the next set of files to examine.
    ///
    /// A child that is already a recorded parent is not re-examined; if the
    /// current file is reachable from it through recorded edges, the edge
    /// closes a cycle and the scan fails naming the revisited ancestor.
    fn next_layer(
        &self,
        discovered: &DependencyGraph,
        frontier: &[(GraphKey, BTreeSet<PathBuf>)],
    ) -> Result<BTreeSet<PathBuf>> {
        let mut layer = BTreeSet::new();

        for (parent, children) in frontier {
            for child in children {
                if !discovered.contains_parent(child) {
                    layer.insert(child.clone());
                    continue;
                }
                if let GraphKey::File(parent_path) = parent {
                    if discovered.is_reachable(child, parent_path) {
                        return Err(DepwatchError::CyclicDependency {
                            parent: child.clone(),
                            children: vec![parent_path.clone()],
                        });
                    }
                }
                debug!(file = %child.display(), "already examined; skipping re-expansion");
            }
        }

        Ok(layer)
    }

    /// Examine each file in the layer for its own imports, in parallel.
    async fn expand_layer(
        &self,
        layer: BTreeSet<PathBuf>,
    ) -> Result<Vec<(GraphKey, BTreeSet<PathBuf>)>> {
        let mut handles = Vec::with_capacity(layer.len());

        for path in layer {
            let fs = Arc::clone(&self.fs);
            let extractor = Arc::clone(&self.extractor);
            let resolver = Arc::clone(&self.resolver);
            let exclude = self.exclude.clone();
            let root = self.root.clone();

            handles.push(tokio::task::spawn_blocking(move || {
                let children = expand_file(&*fs, &*extractor, &*resolver, &exclude, &root, &path);
                (path, children)
            }));
        }

        let mut next = Vec::with_capacity(handles.len());
        for handle in handles {
            let (path, children) = handle.await.map_err(anyhow::Error::from)?;
            next.push((GraphKey::File(path), children));
        }
        Ok(next)
    }
}

/// Compute one file's qualifying children: extract specifiers, resolve each
/// against the file, and drop anything unresolvable, missing, or excluded.
///
/// All failure modes here are per-file skips, logged and swallowed.
fn expand_file(
    fs: &dyn FileSystem,
    extractor: &dyn ImportExtractor,
    resolver: &dyn PathResolver,
    exclude: &ExcludeSet,
    root: &Path,
    path: &Path,
) -> BTreeSet<PathBuf> {
    let mut children = BTreeSet::new();

    let Some(file_type) = FileType::from_path(path) else {
        debug!(file = %path.display(), "unsupported file type; leaf node");
        return children;
    };

    if !fs.is_file(path) {
        warn!(file = %path.display(), "file vanished during scan; skipping");
        return children;
    }

    let source = match fs.read_to_string(path) {
        Ok(s) => s,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "failed to read file; skipping");
            return children;
        }
    };

    let specifiers = match extractor.extract(&source, file_type) {
        Ok(s) => s,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "failed to extract imports; skipping");
            return children;
        }
    };

    for specifier in specifiers {
        let resolved = match resolver.resolve(&specifier, path) {
            Ok(p) => p,
            Err(err) => {
                debug!(file = %path.display(), error = %err, "dropping unresolvable specifier");
                continue;
            }
        };

        let canonical = match fs.canonicalize(&resolved) {
            Ok(p) => p,
            Err(_) => {
                debug!(
                    file = %path.display(),
                    target = %resolved.display(),
                    "resolved target does not exist; dropping"
                );
                continue;
            }
        };

        if exclude.matches(root, &canonical) {
            debug!(target = %canonical.display(), "excluded by pattern");
            continue;
        }

        children.insert(canonical);
    }

    children
}
