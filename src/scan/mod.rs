// src/scan/mod.rs

//! Dependency graph discovery.
//!
//! This module is responsible for:
//! - Extracting raw import specifiers from source files ([`extract`]).
//! - Resolving specifiers to absolute paths ([`resolve`]).
//! - Filtering discovered files against exclusion globs ([`exclude`]).
//! - The level-synchronous breadth-first traversal that ties these together
//!   and detects import cycles ([`scanner`], [`graph`]).
//!
//! It does **not** know about watching or building; it only turns a set of
//! entry files into the flattened set of files they transitively import.

pub mod exclude;
pub mod extract;
pub mod graph;
pub mod resolve;
pub mod scanner;

pub use exclude::ExcludeSet;
pub use extract::{ExtractError, FileType, ImportExtractor, RegexExtractor};
pub use graph::{DependencyGraph, GraphKey};
pub use resolve::{PathResolver, RelativeResolver, ResolveError};
pub use scanner::Scanner;
