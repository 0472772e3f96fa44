// src/config/validate.rs

use crate::config::model::ConfigFile;
use crate::errors::{DepwatchError, Result};
use crate::scan::ExcludeSet;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - there is at least one entry path
/// - all exclusion globs compile
/// - the build command is non-empty
///
/// It does **not** check that entry files exist; that is a scan-time
/// condition (the tree may legitimately change between load and watch).
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_entries(cfg)?;
    validate_exclude_globs(cfg)?;
    validate_build(cfg)?;
    Ok(())
}

fn ensure_has_entries(cfg: &ConfigFile) -> Result<()> {
    if cfg.project.entries.is_empty() {
        return Err(DepwatchError::Config(
            "[project].entries must name at least one entry file".to_string(),
        ));
    }
    Ok(())
}

fn validate_exclude_globs(cfg: &ConfigFile) -> Result<()> {
    ExcludeSet::compile(&cfg.project.exclude)
        .map_err(|err| DepwatchError::Config(format!("invalid [project].exclude: {err:#}")))?;
    Ok(())
}

fn validate_build(cfg: &ConfigFile) -> Result<()> {
    if cfg.build.cmd.trim().is_empty() {
        return Err(DepwatchError::Config(
            "[build].cmd must be a non-empty command".to_string(),
        ));
    }
    Ok(())
}
