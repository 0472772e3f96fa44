use std::collections::BTreeSet;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use depwatch::fs::FileSystem;
use depwatch::scan::{
    ExcludeSet, ExtractError, FileType, ImportExtractor, RegexExtractor, RelativeResolver, Scanner,
};
use depwatch_test_utils::builders::MockProjectBuilder;
use depwatch_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

/// Fails on sources containing a marker, to exercise the skip-on-parse-error
/// policy.
struct BrittleExtractor;

impl ImportExtractor for BrittleExtractor {
    fn extract(&self, source: &str, file_type: FileType) -> Result<Vec<String>, ExtractError> {
        if source.contains("%%%") {
            return Err(ExtractError::Parse("unexpected token".to_string()));
        }
        RegexExtractor::new().extract(source, file_type)
    }
}

fn as_set(builder: &MockProjectBuilder, rels: &[&str]) -> BTreeSet<PathBuf> {
    rels.iter().map(|r| builder.path(r)).collect()
}

#[tokio::test]
async fn chain_is_discovered_transitively() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new()
        .file("src/a.ts", r#"import { b } from "./b";"#)
        .file("src/b.ts", r#"import { c } from "./c";"#)
        .file("src/c.ts", "export const c = 1;")
        .entry("src/a.ts");

    let found = project.build_scanner().scan().await?;
    assert_eq!(found, as_set(&project, &["src/a.ts", "src/b.ts", "src/c.ts"]));
    Ok(())
}

#[tokio::test]
async fn entry_with_no_imports_is_its_own_watch_set() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new()
        .file("src/a.ts", "export const a = 1;")
        .entry("src/a.ts");

    let found = project.build_scanner().scan().await?;
    assert_eq!(found, as_set(&project, &["src/a.ts"]));
    Ok(())
}

#[tokio::test]
async fn diamond_at_equal_depth_is_not_a_cycle() -> TestResult {
    init_tracing();

    // a -> {b, c}, b -> d, c -> d
    let project = MockProjectBuilder::new()
        .file("src/a.ts", "import \"./b\";\nimport \"./c\";")
        .file("src/b.ts", r#"import "./d";"#)
        .file("src/c.ts", r#"import "./d";"#)
        .file("src/d.ts", "export {};")
        .entry("src/a.ts");

    let found = project.build_scanner().scan().await?;
    assert_eq!(
        found,
        as_set(&project, &["src/a.ts", "src/b.ts", "src/c.ts", "src/d.ts"])
    );
    Ok(())
}

#[tokio::test]
async fn diamond_rediscovered_at_uneven_depth_is_not_a_cycle() -> TestResult {
    init_tracing();

    // a -> {b, c}; b -> d; c -> e; e -> d; d -> f
    // The branches reach d at different BFS depths.
    let project = MockProjectBuilder::new()
        .file("src/a.ts", "import \"./b\";\nimport \"./c\";")
        .file("src/b.ts", r#"import "./d";"#)
        .file("src/c.ts", r#"import "./e";"#)
        .file("src/e.ts", r#"import "./d";"#)
        .file("src/d.ts", r#"import "./f";"#)
        .file("src/f.ts", "export {};")
        .entry("src/a.ts");

    let found = project.build_scanner().scan().await?;
    assert_eq!(
        found,
        as_set(
            &project,
            &[
                "src/a.ts", "src/b.ts", "src/c.ts", "src/d.ts", "src/e.ts", "src/f.ts"
            ]
        )
    );
    Ok(())
}

#[tokio::test]
async fn excluded_files_never_enter_the_set() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new()
        .file("src/a.ts", "import \"./b\";\nimport \"../vendor/lib\";")
        .file("src/b.ts", "export {};")
        .file("vendor/lib.ts", r#"import "./lib_inner";"#)
        .file("vendor/lib_inner.ts", "export {};")
        .entry("src/a.ts")
        .exclude("vendor/**");

    let found = project.build_scanner().scan().await?;
    // The excluded file contributes no edges either: lib_inner stays out.
    assert_eq!(found, as_set(&project, &["src/a.ts", "src/b.ts"]));
    Ok(())
}

#[tokio::test]
async fn bare_specifiers_are_dropped() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new()
        .file(
            "src/a.ts",
            "import fs from \"fs\";\nimport \"./b\";\nimport lodash from \"lodash\";",
        )
        .file("src/b.ts", "export {};")
        .entry("src/a.ts");

    let found = project.build_scanner().scan().await?;
    assert_eq!(found, as_set(&project, &["src/a.ts", "src/b.ts"]));
    Ok(())
}

#[tokio::test]
async fn missing_resolved_target_is_dropped() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new()
        .file("src/a.ts", "import \"./b\";\nimport \"./gone\";")
        .file("src/b.ts", "export {};")
        .entry("src/a.ts");

    let found = project.build_scanner().scan().await?;
    assert_eq!(found, as_set(&project, &["src/a.ts", "src/b.ts"]));
    Ok(())
}

#[tokio::test]
async fn unsupported_file_type_terminates_its_branch() -> TestResult {
    init_tracing();

    // a imports a stylesheet; the stylesheet is watched but never scanned
    // for imports of its own.
    let project = MockProjectBuilder::new()
        .file("src/a.ts", r#"import "./theme.css";"#)
        .file("src/theme.css", "body { color: red }")
        .entry("src/a.ts");

    let found = project.build_scanner().scan().await?;
    assert_eq!(found, as_set(&project, &["src/a.ts", "src/theme.css"]));
    Ok(())
}

#[tokio::test]
async fn multiple_entries_are_all_included() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new()
        .file("src/a.ts", r#"import "./shared";"#)
        .file("src/b.ts", r#"import "./shared";"#)
        .file("src/shared.ts", "export {};")
        .entry("src/a.ts")
        .entry("src/b.ts");

    let found = project.build_scanner().scan().await?;
    assert_eq!(
        found,
        as_set(&project, &["src/a.ts", "src/b.ts", "src/shared.ts"])
    );
    Ok(())
}

#[tokio::test]
async fn unparseable_file_is_watched_but_contributes_no_edges() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new()
        .file("src/a.ts", r#"import "./b";"#)
        .file("src/b.ts", "%%% import \"./c\";")
        .file("src/c.ts", "export {};")
        .entry("src/a.ts");

    let fs: Arc<dyn FileSystem> = Arc::new(project.fs());
    let scanner = Scanner::new(
        project.root().to_path_buf(),
        vec![project.path("src/a.ts")],
        ExcludeSet::compile(&[])?,
        Arc::clone(&fs),
        Arc::new(BrittleExtractor),
        Arc::new(RelativeResolver::new(fs)),
    );

    // b fails to parse: it stays in the set, but c is never discovered and
    // the scan as a whole succeeds.
    let found = scanner.scan().await?;
    assert_eq!(found, as_set(&project, &["src/a.ts", "src/b.ts"]));
    Ok(())
}

#[tokio::test]
async fn scanning_an_unchanged_tree_is_idempotent() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new()
        .file("src/a.ts", r#"import "./b";"#)
        .file("src/b.ts", "export {};")
        .entry("src/a.ts");

    let scanner = project.build_scanner();
    let first = scanner.scan().await?;
    let second = scanner.scan().await?;
    assert_eq!(first, second);
    Ok(())
}
