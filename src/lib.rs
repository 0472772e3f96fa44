// src/lib.rs

pub mod build;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod path_utils;
pub mod scan;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::info;

use crate::build::{
    BuildEngine, BuildEvent, BuildResult, BuildWatcher, BuildWatcherOptions, CommandBuildEngine,
};
use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::path_utils::relative_str;
use crate::scan::{ExcludeSet, RegexExtractor, RelativeResolver, Scanner};
use crate::watch::{ChangeKind, DependencyWatcher, FsNotifier};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - scanner / watcher / build watcher
/// - (optional) file watching with Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let root = resolve_root(&config_path, &cfg)?;
    let scanner = build_scanner(&cfg, root.clone())?;

    if args.dry_run {
        print_dry_run(&scanner, &root).await?;
        return Ok(());
    }

    let engine: Arc<dyn BuildEngine> = Arc::new(CommandBuildEngine::new(cfg.build.cmd.clone()));

    if args.once {
        return run_once(&scanner, &*engine).await;
    }

    // Watcher + build watcher.
    let notifier = Arc::new(FsNotifier::new());
    let (watcher, watcher_rx) = DependencyWatcher::new(scanner, notifier);
    let options = BuildWatcherOptions {
        rescan_after_build: cfg.build.rescan_after_build,
    };
    let (mut build_watcher, mut events_rx) = BuildWatcher::new(watcher, watcher_rx, engine, options);

    // Ctrl-C → graceful shutdown.
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = shutdown_tx.send(()).await;
    });

    // Event reporting happens off the main loop; formatting stays out of
    // the core.
    {
        let root = root.clone();
        tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                report_event(&root, &event);
            }
        });
    }

    info!(root = %root.display(), "starting watch session");
    build_watcher.watch().await?;
    build_watcher.run(shutdown_rx).await
}

/// Resolve the project root: `[project].root` is taken relative to the
/// directory containing the config file.
fn resolve_root(config_path: &Path, cfg: &ConfigFile) -> Result<PathBuf> {
    let config_dir = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let root = config_dir.join(&cfg.project.root);
    let root = root
        .canonicalize()
        .with_context(|| format!("canonicalizing project root {:?}", root))?;
    Ok(root)
}

/// Assemble a scanner from config: real filesystem, regex extraction,
/// relative resolution.
fn build_scanner(cfg: &ConfigFile, root: PathBuf) -> Result<Scanner> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let exclude = ExcludeSet::compile(&cfg.project.exclude)?;
    let extractor = Arc::new(RegexExtractor::new());
    let resolver = Arc::new(RelativeResolver::new(Arc::clone(&fs)));

    // Absolute entry paths, so everything downstream (including the build
    // engine) is independent of the process working directory.
    let entries: Vec<PathBuf> = cfg
        .project
        .entries
        .iter()
        .map(|e| if e.is_absolute() { e.clone() } else { root.join(e) })
        .collect();

    Ok(Scanner::new(root, entries, exclude, fs, extractor, resolver))
}

/// Scan and build exactly once; the error return carries build failure.
async fn run_once(scanner: &Scanner, engine: &dyn BuildEngine) -> Result<()> {
    let paths = scanner.scan().await?;
    println!("[depwatch] discovered {} file(s)", paths.len());

    let result = engine.build(scanner.entries()).await?;
    report_build(&result);

    if result.success {
        Ok(())
    } else {
        Err(anyhow::anyhow!("build failed").into())
    }
}

/// Scan and print the discovered watch set, nothing else.
async fn print_dry_run(scanner: &Scanner, root: &Path) -> Result<()> {
    let paths = scanner.scan().await?;

    println!("depwatch dry-run");
    println!("  root: {}", root.display());
    println!("  watch set ({} files):", paths.len());
    for path in &paths {
        println!("    {}", display_path(root, path));
    }
    Ok(())
}

fn report_event(root: &Path, event: &BuildEvent) {
    match event {
        BuildEvent::Watch { paths } => {
            println!("[depwatch] watching {} file(s)", paths.len());
        }
        BuildEvent::Change { kind, path } => {
            println!(
                "[depwatch] change ({}): {}",
                change_kind_str(*kind),
                display_path(root, path)
            );
        }
        BuildEvent::Build { result } => report_build(result),
        BuildEvent::Close => {
            println!("[depwatch] closed");
        }
    }
}

fn report_build(result: &BuildResult) {
    if result.success {
        println!("[depwatch] build succeeded");
    } else {
        println!(
            "[depwatch] build failed ({} diagnostic(s))",
            result.diagnostics.len()
        );
        for diag in &result.diagnostics {
            println!("    {diag}");
        }
    }
}

fn change_kind_str(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Created => "created",
        ChangeKind::Modified => "modified",
        ChangeKind::Removed => "removed",
        ChangeKind::Other => "other",
    }
}

fn display_path(root: &Path, path: &Path) -> String {
    relative_str(root, path).unwrap_or_else(|| path.display().to_string())
}
