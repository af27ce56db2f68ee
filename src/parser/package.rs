//! Package aggregation: scan every eligible file of a directory and merge.

use super::scan;
use crate::model::{Package, SourceUnit};
use anyhow::{bail, Context, Result};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static SOURCE: LazyLock<Pattern> = LazyLock::new(|| Pattern::new("*.go").unwrap());

/// Test files and previously generated interfaces are never fed back in.
static EXCLUDED: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    ["*_test.go", "*.iface.go"]
        .iter()
        .map(|p| Pattern::new(p).unwrap())
        .collect()
});

/// Whether a file name takes part in the scan.
pub fn is_eligible(file_name: &str) -> bool {
    SOURCE.matches(file_name) && !EXCLUDED.iter().any(|p| p.matches(file_name))
}

/// Eligible Go files directly inside `dir` (non-recursive), sorted by name.
pub fn source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read directory: {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if is_eligible(name) {
            files.push(path);
        } else {
            log::debug!("skipping {}", path.display());
        }
    }
    // Sort for deterministic output
    files.sort();
    Ok(files)
}

/// Scan every eligible file in name order; the first failure aborts the whole run.
pub fn scan_dir(dir: &Path, type_name: &str) -> Result<Vec<SourceUnit>> {
    let mut units = Vec::new();
    for path in source_files(dir)? {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let unit = scan::scan(&content, type_name)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        log::debug!(
            "{}: package {}, {} import(s), {} method(s)",
            path.display(),
            unit.package,
            unit.imports.len(),
            unit.methods.len()
        );
        units.push(unit);
    }
    Ok(units)
}

/// Scan `dir` and merge the results into one package model.
pub fn load(dir: &Path, type_name: &str) -> Result<Package> {
    let units = scan_dir(dir, type_name)?;
    if units.is_empty() {
        bail!("no Go source files in {}", dir.display());
    }
    let package = Package::merge(units);
    if package.methods.is_empty() {
        log::warn!("no exported methods found for type {}", type_name);
    }
    Ok(package)
}
