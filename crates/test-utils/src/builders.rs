#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use depwatch::fs::mock::MockFileSystem;
use depwatch::fs::FileSystem;
use depwatch::scan::{ExcludeSet, RegexExtractor, RelativeResolver, Scanner};

/// Builder for an in-memory project tree plus the scanner over it.
///
/// ```ignore
/// let project = MockProjectBuilder::new()
///     .file("src/a.ts", r#"import "./b";"#)
///     .file("src/b.ts", "export const b = 1;")
///     .entry("src/a.ts");
/// let scanner = project.build_scanner();
/// ```
pub struct MockProjectBuilder {
    root: PathBuf,
    fs: MockFileSystem,
    entries: Vec<PathBuf>,
    exclude: Vec<String>,
}

impl MockProjectBuilder {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/proj"),
            fs: MockFileSystem::new(),
            entries: Vec::new(),
            exclude: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a root-relative file.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// The shared mock filesystem, for mutating the tree mid-test.
    pub fn fs(&self) -> MockFileSystem {
        self.fs.clone()
    }

    pub fn file(self, rel: &str, content: &str) -> Self {
        self.fs.add_file(self.root.join(rel), content);
        self
    }

    pub fn entry(mut self, rel: &str) -> Self {
        let path = self.root.join(rel);
        self.entries.push(path);
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.exclude.push(pattern.to_string());
        self
    }

    pub fn build_scanner(&self) -> Scanner {
        let fs: Arc<dyn FileSystem> = Arc::new(self.fs.clone());
        let exclude =
            ExcludeSet::compile(&self.exclude).expect("Failed to compile exclude patterns");
        let resolver = Arc::new(RelativeResolver::new(Arc::clone(&fs)));

        Scanner::new(
            self.root.clone(),
            self.entries.clone(),
            exclude,
            fs,
            Arc::new(RegexExtractor::new()),
            resolver,
        )
    }
}

impl Default for MockProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk project fixture backed by a temp directory, for tests that
/// exercise the real filesystem.
pub struct TempProject {
    dir: tempfile::TempDir,
}

impl TempProject {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    pub fn remove(&self, rel: &str) {
        let path = self.dir.path().join(rel);
        std::fs::remove_file(path).expect("Failed to remove fixture file");
    }
}

impl Default for TempProject {
    fn default() -> Self {
        Self::new()
    }
}
