use std::error::Error;

use depwatch::errors::DepwatchError;
use depwatch_test_utils::builders::MockProjectBuilder;
use depwatch_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn mutual_import_fails_naming_the_revisited_ancestor() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new()
        .file("src/a.ts", r#"import "./b";"#)
        .file("src/b.ts", r#"import "./a";"#)
        .entry("src/a.ts");

    let err = project
        .build_scanner()
        .scan()
        .await
        .expect_err("mutual import must fail");

    match err {
        DepwatchError::CyclicDependency { parent, children } => {
            assert_eq!(parent, project.path("src/a.ts"));
            assert_eq!(children, vec![project.path("src/b.ts")]);
        }
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn self_import_fails() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new()
        .file("src/a.ts", r#"import "./a";"#)
        .entry("src/a.ts");

    let err = project
        .build_scanner()
        .scan()
        .await
        .expect_err("self import must fail");

    assert!(matches!(err, DepwatchError::CyclicDependency { .. }));
    Ok(())
}

#[tokio::test]
async fn three_file_cycle_fails() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new()
        .file("src/a.ts", r#"import "./b";"#)
        .file("src/b.ts", r#"import "./c";"#)
        .file("src/c.ts", r#"import "./a";"#)
        .entry("src/a.ts");

    let err = project
        .build_scanner()
        .scan()
        .await
        .expect_err("cycle must fail");

    assert!(matches!(err, DepwatchError::CyclicDependency { .. }));
    Ok(())
}

#[tokio::test]
async fn cycle_behind_a_clean_prefix_is_still_detected() -> TestResult {
    init_tracing();

    // entry -> a -> b <-> c
    let project = MockProjectBuilder::new()
        .file("src/entry.ts", r#"import "./a";"#)
        .file("src/a.ts", r#"import "./b";"#)
        .file("src/b.ts", r#"import "./c";"#)
        .file("src/c.ts", r#"import "./b";"#)
        .entry("src/entry.ts");

    let err = project
        .build_scanner()
        .scan()
        .await
        .expect_err("nested cycle must fail");

    assert!(matches!(err, DepwatchError::CyclicDependency { .. }));
    Ok(())
}

#[tokio::test]
async fn repeating_a_failing_scan_yields_the_same_error() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new()
        .file("src/a.ts", r#"import "./b";"#)
        .file("src/b.ts", r#"import "./a";"#)
        .entry("src/a.ts");

    let scanner = project.build_scanner();
    for _ in 0..2 {
        let err = scanner.scan().await.expect_err("cycle must fail every time");
        assert!(matches!(err, DepwatchError::CyclicDependency { .. }));
    }
    Ok(())
}

#[tokio::test]
async fn missing_entry_fails_with_entry_not_found() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new()
        .file("src/a.ts", "export {};")
        .entry("src/a.ts")
        .entry("src/nope.ts");

    let err = project
        .build_scanner()
        .scan()
        .await
        .expect_err("missing entry must fail");

    match err {
        DepwatchError::EntryNotFound(missing) => {
            assert_eq!(missing, vec![project.path("src/nope.ts")]);
        }
        other => panic!("expected EntryNotFound, got {other:?}"),
    }
    Ok(())
}
