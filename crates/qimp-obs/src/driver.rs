//! Batch reduction over per-run working directories.

use std::path::{Path, PathBuf};

use globset::Glob;
use num_complex::Complex64;
use walkdir::WalkDir;

use qimp_core::{ErrorInfo, QimpError};

use crate::archive::Archive;
use crate::record::ProblemRecord;
use crate::reduce::dynamic_susceptibility;

/// Outcome of reducing one run directory.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The record was augmented with `chi_m`/`chi` and rewritten.
    Reduced(Complex64),
    /// The record carries no two-particle correlators to reduce.
    MissingCorrelators,
}

/// Lists the direct subdirectories of `root` holding exactly one archive
/// file whose name matches `pattern` (a glob, e.g. `*.json`).
///
/// Directories with zero or several matching files are skipped silently;
/// results come back sorted by path.
pub fn enumerate_runs(root: impl AsRef<Path>, pattern: &str) -> Result<Vec<PathBuf>, QimpError> {
    let matcher = Glob::new(pattern)
        .map_err(|err| {
            QimpError::Archive(
                ErrorInfo::new("archive-read", "invalid archive name pattern")
                    .with_context("pattern", pattern.to_string())
                    .with_context("parse", err.to_string()),
            )
        })?
        .compile_matcher();

    let mut runs = Vec::new();
    for entry in WalkDir::new(root.as_ref()).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| {
            QimpError::Archive(
                ErrorInfo::new("archive-read", "failed to scan run directories")
                    .with_context("root", root.as_ref().display().to_string())
                    .with_context("io", err.to_string()),
            )
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if single_archive(entry.path(), &matcher)?.is_some() {
            runs.push(entry.into_path());
        }
    }
    runs.sort();
    Ok(runs)
}

/// Reduces one run directory: loads the record stored under `key` from the
/// directory's single matching archive, computes the susceptibility from
/// its up-up / up-dn correlators, and rewrites the augmented record.
///
/// Returns [`RunOutcome::MissingCorrelators`] (without touching the
/// archive) when either correlator is absent from the record.
pub fn reduce_run(
    dir: impl AsRef<Path>,
    pattern: &str,
    key: &str,
) -> Result<RunOutcome, QimpError> {
    let matcher = Glob::new(pattern)
        .map_err(|err| {
            QimpError::Archive(
                ErrorInfo::new("archive-read", "invalid archive name pattern")
                    .with_context("pattern", pattern.to_string())
                    .with_context("parse", err.to_string()),
            )
        })?
        .compile_matcher();
    let path = single_archive(dir.as_ref(), &matcher)?.ok_or_else(|| {
        QimpError::Archive(
            ErrorInfo::new("archive-read", "run directory has no unique archive")
                .with_context("dir", dir.as_ref().display().to_string())
                .with_context("pattern", pattern.to_string()),
        )
    })?;

    let mut archive = Archive::open(&path)?;
    let mut record: ProblemRecord = archive.read(key)?;
    let (up_up, up_dn) = match (&record.g2_up_up, &record.g2_up_dn) {
        (Some(uu), Some(ud)) => (uu, ud),
        _ => return Ok(RunOutcome::MissingCorrelators),
    };

    let reduced = dynamic_susceptibility(up_up, up_dn, record.beta)?;
    record.chi_m = Some(reduced.chi_m);
    record.chi = Some(reduced.chi);
    archive.write(key, &record)?;
    Ok(RunOutcome::Reduced(reduced.chi))
}

/// Reduces every run under `root`, returning `(directory, outcome)` pairs
/// in sorted directory order.
pub fn reduce_all(
    root: impl AsRef<Path>,
    pattern: &str,
    key: &str,
) -> Result<Vec<(PathBuf, RunOutcome)>, QimpError> {
    let mut results = Vec::new();
    for dir in enumerate_runs(root, pattern)? {
        let outcome = reduce_run(&dir, pattern, key)?;
        results.push((dir, outcome));
    }
    Ok(results)
}

/// The unique archive file in `dir` matching `matcher`, or `None` if there
/// are zero or several candidates.
fn single_archive(
    dir: &Path,
    matcher: &globset::GlobMatcher,
) -> Result<Option<PathBuf>, QimpError> {
    let mut found = None;
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| {
            QimpError::Archive(
                ErrorInfo::new("archive-read", "failed to scan run directory")
                    .with_context("dir", dir.display().to_string())
                    .with_context("io", err.to_string()),
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !matcher.is_match(entry.file_name()) {
            continue;
        }
        if found.is_some() {
            return Ok(None);
        }
        found = Some(entry.into_path());
    }
    Ok(found)
}
