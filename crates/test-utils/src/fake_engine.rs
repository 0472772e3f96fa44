use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use depwatch::build::{BuildEngine, BuildResult};
use depwatch::errors::Result;

/// A fake build engine that:
/// - records the entry list of every invocation
/// - immediately returns a canned success/failure result.
#[derive(Clone)]
pub struct FakeBuildEngine {
    invocations: Arc<Mutex<Vec<Vec<PathBuf>>>>,
    success: bool,
}

impl FakeBuildEngine {
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(Mutex::new(Vec::new())),
            success: true,
        }
    }

    /// An engine whose every build reports failure.
    pub fn failing() -> Self {
        Self {
            success: false,
            ..Self::new()
        }
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }

    pub fn invocations(&self) -> Vec<Vec<PathBuf>> {
        self.invocations.lock().unwrap().clone()
    }
}

impl Default for FakeBuildEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildEngine for FakeBuildEngine {
    fn build(
        &self,
        entries: &[PathBuf],
    ) -> Pin<Box<dyn Future<Output = Result<BuildResult>> + Send + '_>> {
        let invocations = Arc::clone(&self.invocations);
        let entries = entries.to_vec();
        let success = self.success;

        Box::pin(async move {
            invocations.lock().unwrap().push(entries);

            let diagnostics = if success {
                Vec::new()
            } else {
                vec!["fake build failure".to_string()]
            };

            Ok(BuildResult {
                success,
                artifacts: Vec::new(),
                diagnostics,
            })
        })
    }
}
