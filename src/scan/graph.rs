// src/scan/graph.rs

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use petgraph::algo::has_path_connecting;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{DepwatchError, Result};

/// Key for a parent entry in the dependency graph.
///
/// `Root` is the sentinel for "no parent"; its children are the entry paths
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphKey {
    Root,
    File(PathBuf),
}

/// Mapping from a parent to the set of files it imports, built up over one
/// scan and discarded once flattened.
///
/// The graph is append-only: a parent key, once recorded, may only be
/// re-recorded with a children set disjoint from its existing one (the sets
/// are then unioned). An overlapping re-record is rejected as a cyclic
/// dependency.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: HashMap<GraphKey, BTreeSet<PathBuf>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` has already been recorded as a parent, i.e. the file
    /// has been examined for its own imports this scan.
    pub fn contains_parent(&self, path: &Path) -> bool {
        self.nodes
            .contains_key(&GraphKey::File(path.to_path_buf()))
    }

    /// Merge one `(parent, children)` frontier entry into the graph.
    ///
    /// Rejects an overlapping re-record of an existing parent with
    /// [`DepwatchError::CyclicDependency`] naming the parent and the
    /// overlapping children.
    pub fn merge(&mut self, parent: GraphKey, children: BTreeSet<PathBuf>) -> Result<()> {
        match self.nodes.entry(parent) {
            Entry::Vacant(slot) => {
                slot.insert(children);
                Ok(())
            }
            Entry::Occupied(mut slot) => {
                let overlap: Vec<PathBuf> =
                    slot.get().intersection(&children).cloned().collect();
                if !overlap.is_empty() {
                    let parent_path = match slot.key() {
                        GraphKey::File(p) => p.clone(),
                        GraphKey::Root => PathBuf::new(),
                    };
                    return Err(DepwatchError::CyclicDependency {
                        parent: parent_path,
                        children: overlap,
                    });
                }
                slot.get_mut().extend(children);
                Ok(())
            }
        }
    }

    /// Whether `to` is reachable from `from` by following recorded import
    /// edges. Used to distinguish a true cycle from a diamond re-discovery.
    pub fn is_reachable(&self, from: &Path, to: &Path) -> bool {
        let mut graph: DiGraphMap<&Path, ()> = DiGraphMap::new();
        for (key, children) in &self.nodes {
            let GraphKey::File(parent) = key else {
                continue;
            };
            for child in children {
                graph.add_edge(parent.as_path(), child.as_path(), ());
            }
        }
        if !graph.contains_node(from) || !graph.contains_node(to) {
            return from == to;
        }
        has_path_connecting(&graph, from, to, None)
    }

    /// Flatten the graph into the union of all children sets. The sentinel's
    /// children (the entries) are real files and are included.
    pub fn flatten(&self) -> BTreeSet<PathBuf> {
        let mut all = BTreeSet::new();
        for children in self.nodes.values() {
            all.extend(children.iter().cloned());
        }
        all
    }
}
