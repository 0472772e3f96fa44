use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use depwatch::fs::mock::MockFileSystem;
use depwatch::fs::FileSystem;
use depwatch::scan::{PathResolver, RelativeResolver, ResolveError};
use depwatch_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn resolver_with(files: &[&str]) -> RelativeResolver {
    let fs = MockFileSystem::new();
    for file in files {
        fs.add_file(PathBuf::from(file), "export {};");
    }
    let fs: Arc<dyn FileSystem> = Arc::new(fs);
    RelativeResolver::new(fs)
}

#[test]
fn exact_path_wins() -> TestResult {
    init_tracing();

    let resolver = resolver_with(&["/proj/src/b.ts"]);
    let resolved = resolver.resolve("./b.ts", &PathBuf::from("/proj/src/a.ts"))?;
    assert_eq!(resolved, PathBuf::from("/proj/src/b.ts"));
    Ok(())
}

#[test]
fn extension_is_probed_in_order() -> TestResult {
    init_tracing();

    // Both b.ts and b.js exist; .ts is probed first.
    let resolver = resolver_with(&["/proj/src/b.ts", "/proj/src/b.js"]);
    let resolved = resolver.resolve("./b", &PathBuf::from("/proj/src/a.ts"))?;
    assert_eq!(resolved, PathBuf::from("/proj/src/b.ts"));
    Ok(())
}

#[test]
fn extension_is_appended_not_replaced() -> TestResult {
    init_tracing();

    let resolver = resolver_with(&["/proj/src/api.service.ts"]);
    let resolved = resolver.resolve("./api.service", &PathBuf::from("/proj/src/a.ts"))?;
    assert_eq!(resolved, PathBuf::from("/proj/src/api.service.ts"));
    Ok(())
}

#[test]
fn directory_resolves_to_its_index_file() -> TestResult {
    init_tracing();

    let resolver = resolver_with(&["/proj/src/util/index.ts"]);
    let resolved = resolver.resolve("./util", &PathBuf::from("/proj/src/a.ts"))?;
    assert_eq!(resolved, PathBuf::from("/proj/src/util/index.ts"));
    Ok(())
}

#[test]
fn parent_traversal_is_normalized() -> TestResult {
    init_tracing();

    let resolver = resolver_with(&["/proj/shared/env.ts"]);
    let resolved = resolver.resolve("../shared/env", &PathBuf::from("/proj/src/a.ts"))?;
    assert_eq!(resolved, PathBuf::from("/proj/shared/env.ts"));
    Ok(())
}

#[test]
fn bare_specifiers_are_unresolvable() -> TestResult {
    init_tracing();

    let resolver = resolver_with(&["/proj/src/b.ts"]);
    let err = resolver
        .resolve("lodash", &PathBuf::from("/proj/src/a.ts"))
        .expect_err("bare specifier must not resolve");
    assert!(matches!(err, ResolveError::Unresolved { .. }));
    Ok(())
}

#[test]
fn missing_target_is_unresolvable() -> TestResult {
    init_tracing();

    let resolver = resolver_with(&["/proj/src/b.ts"]);
    let err = resolver
        .resolve("./missing", &PathBuf::from("/proj/src/a.ts"))
        .expect_err("missing target must not resolve");
    assert!(matches!(err, ResolveError::Unresolved { .. }));
    Ok(())
}
