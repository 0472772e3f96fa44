use std::collections::BTreeSet;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use depwatch::fs::{FileSystem, RealFileSystem};
use depwatch::scan::{ExcludeSet, RegexExtractor, RelativeResolver, Scanner};
use depwatch::watch::{DependencyWatcher, MockNotifier};
use depwatch_test_utils::builders::TempProject;
use depwatch_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn scanner_for(project: &TempProject, entries: &[&str], exclude: &[&str]) -> Scanner {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let exclude: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();

    Scanner::new(
        project.root().to_path_buf(),
        entries.iter().map(PathBuf::from).collect(),
        ExcludeSet::compile(&exclude).expect("Failed to compile exclude patterns"),
        Arc::clone(&fs),
        Arc::new(RegexExtractor::new()),
        Arc::new(RelativeResolver::new(fs)),
    )
}

fn canonical_set(paths: &[PathBuf]) -> BTreeSet<PathBuf> {
    paths
        .iter()
        .map(|p| std::fs::canonicalize(p).expect("Failed to canonicalize expected path"))
        .collect()
}

#[tokio::test]
async fn scan_discovers_imports_on_disk() -> TestResult {
    init_tracing();

    let project = TempProject::new();
    let a = project.write("src/a.ts", r#"import { b } from "./b";"#);
    let b = project.write("src/b.ts", "export const b = 1;");

    let found = scanner_for(&project, &["src/a.ts"], &[]).scan().await?;
    assert_eq!(found, canonical_set(&[a, b]));
    Ok(())
}

#[tokio::test]
async fn directory_imports_resolve_through_index_files() -> TestResult {
    init_tracing();

    let project = TempProject::new();
    let a = project.write("src/a.ts", r#"import { helper } from "./util";"#);
    let index = project.write("src/util/index.ts", r#"export * from "./helper";"#);
    let helper = project.write("src/util/helper.ts", "export const helper = 1;");

    let found = scanner_for(&project, &["src/a.ts"], &[]).scan().await?;
    assert_eq!(found, canonical_set(&[a, index, helper]));
    Ok(())
}

#[tokio::test]
async fn excluded_directories_stay_out_of_the_set_on_disk() -> TestResult {
    init_tracing();

    let project = TempProject::new();
    let a = project.write(
        "src/a.ts",
        "import \"./b\";\nimport \"../node_modules/pkg/index\";",
    );
    let b = project.write("src/b.ts", "export {};");
    project.write("node_modules/pkg/index.ts", "export {};");

    let found = scanner_for(&project, &["src/a.ts"], &["**/node_modules/**"])
        .scan()
        .await?;
    assert_eq!(found, canonical_set(&[a, b]));
    Ok(())
}

#[tokio::test]
async fn editing_an_entry_and_rescanning_shrinks_the_watch_set() -> TestResult {
    init_tracing();

    let project = TempProject::new();
    let a = project.write("src/a.ts", r#"import "./b";"#);
    let b = project.write("src/b.ts", "export {};");

    let notifier = MockNotifier::new();
    let (mut watcher, _events) = DependencyWatcher::new(
        scanner_for(&project, &["src/a.ts"], &[]),
        Arc::new(notifier.clone()),
    );

    let before = watcher.watch().await?;
    assert_eq!(before, canonical_set(&[a.clone(), b.clone()]));
    assert_eq!(notifier.active_count(), 2);

    // Remove the import edge on disk, then rescan.
    project.write("src/a.ts", "export {};");
    let after = watcher.rescan().await?;

    assert_eq!(after, canonical_set(&[a]));
    assert_eq!(notifier.active_count(), 1);
    Ok(())
}

#[tokio::test]
async fn deleting_a_watched_leaf_is_survivable() -> TestResult {
    init_tracing();

    // b imports c; c is deleted; a rescan drops the dangling edge without
    // failing, because only entries are required to exist.
    let project = TempProject::new();
    let a = project.write("src/a.ts", r#"import "./b";"#);
    let b = project.write("src/b.ts", r#"import "./c";"#);
    project.write("src/c.ts", "export {};");

    let notifier = MockNotifier::new();
    let (mut watcher, _events) = DependencyWatcher::new(
        scanner_for(&project, &["src/a.ts"], &[]),
        Arc::new(notifier.clone()),
    );

    assert_eq!(watcher.watch().await?.len(), 3);

    project.remove("src/c.ts");
    let after = watcher.rescan().await?;
    assert_eq!(after, canonical_set(&[a, b]));
    Ok(())
}
