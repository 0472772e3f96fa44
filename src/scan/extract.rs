// src/scan/extract.rs

//! Import specifier extraction.
//!
//! The extractor is a seam: the scanner only sees the [`ImportExtractor`]
//! trait, so tests can substitute hand-rolled extractors and a future
//! parser-backed implementation can drop in without touching the traversal.
//! The default [`RegexExtractor`] covers the common TypeScript/JavaScript
//! import forms without a full parse.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// File type, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Ts,
    Tsx,
    Js,
    Jsx,
    Mjs,
    Cjs,
}

impl FileType {
    /// Determine the file type from a path's extension.
    ///
    /// Returns `None` for extensions we do not know how to extract imports
    /// from; such files terminate their branch of the traversal.
    pub fn from_path(path: &Path) -> Option<FileType> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts") => Some(FileType::Ts),
            Some("tsx") => Some(FileType::Tsx),
            Some("js") => Some(FileType::Js),
            Some("jsx") => Some(FileType::Jsx),
            Some("mjs") => Some(FileType::Mjs),
            Some("cjs") => Some(FileType::Cjs),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The source text could not be understood. Non-fatal to a scan: the
    /// file is treated as having no importable children.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Extracts raw import specifiers from source text.
pub trait ImportExtractor: Send + Sync {
    /// Return the raw specifier strings found in `source`, in order of
    /// appearance.
    fn extract(&self, source: &str, file_type: FileType) -> Result<Vec<String>, ExtractError>;
}

// One pattern per import form; the specifier is always capture group 1.
static IMPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s+[^'";]+?\s+from\s+['"]([^'"]+)['"]"#).unwrap()
});
static IMPORT_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*import\s+['"]([^'"]+)['"]"#).unwrap());
static EXPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*export\s+[^'";]+?\s+from\s+['"]([^'"]+)['"]"#).unwrap()
});
static REQUIRE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());
static DYNAMIC_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"import\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

/// Regex-based extractor for TypeScript/JavaScript-style sources.
///
/// Recognised forms:
/// - `import x from "spec"` / `import { a, b } from "spec"` / `import * as m from "spec"`
/// - `import "spec"` (side-effect import)
/// - `export { a } from "spec"` / `export * from "spec"`
/// - `require("spec")`
/// - `import("spec")` (dynamic)
///
/// Extraction must not produce false negatives; a false positive merely adds
/// a watched file.
#[derive(Debug, Clone, Default)]
pub struct RegexExtractor;

impl RegexExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ImportExtractor for RegexExtractor {
    fn extract(&self, source: &str, file_type: FileType) -> Result<Vec<String>, ExtractError> {
        let _ = file_type; // every supported type uses the same import syntax
        let mut specifiers = Vec::new();

        for re in [
            &*IMPORT_FROM,
            &*IMPORT_BARE,
            &*EXPORT_FROM,
            &*REQUIRE_CALL,
            &*DYNAMIC_IMPORT,
        ] {
            for caps in re.captures_iter(source) {
                if let Some(m) = caps.get(1) {
                    let spec = m.as_str().to_string();
                    if !specifiers.contains(&spec) {
                        specifiers.push(spec);
                    }
                }
            }
        }

        Ok(specifiers)
    }
}
