//! Pipeline orchestration: extract, scan, pack, cleanup.
//!
//! Control flow is strictly linear and single-threaded. Each stage runs at
//! most once; the first failure short-circuits straight to cleanup, and
//! cleanup runs unconditionally on every exit path.

use crate::Archiver;
use crate::PipelineConfig;
use crate::PipelineError;
use crate::RunReport;
use crate::Scanner;
use crate::Workspace;
use std::fs;
use std::path::Path;
use std::time::Instant;
use walkdir::WalkDir;

/// A failed pipeline run.
///
/// Carries the originating stage error, plus a cleanup warning when
/// workspace removal also failed afterwards. The stage error stays the run's
/// outcome; the cleanup problem is reported alongside it, never masking it.
#[derive(Debug)]
pub struct RunFailure {
    /// The error that terminated the run.
    pub error: PipelineError,
    /// Set when workspace removal failed after the stage failure.
    pub cleanup_warning: Option<String>,
}

impl From<PipelineError> for RunFailure {
    fn from(error: PipelineError) -> Self {
        Self {
            error,
            cleanup_warning: None,
        }
    }
}

impl std::fmt::Display for RunFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for RunFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Runs one pipeline: acquire workspace, extract, scan, pack, release.
///
/// The run's outcome is the first failure encountered, or success if all
/// three external stages and the cleanup succeeded. A cleanup failure after
/// otherwise successful work is the run's failure; a cleanup failure after an
/// earlier stage failure is surfaced as a warning on [`RunFailure`].
///
/// # Errors
///
/// Returns the originating stage's error wrapped in [`RunFailure`].
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunReport, RunFailure> {
    let started = Instant::now();
    let archiver = Archiver::new(&config.archiver);
    let scanner = Scanner::new(&config.scanner);

    let workspace = if config.force_clean_workspace {
        Workspace::acquire_clean(&config.workspace_dir)?
    } else {
        Workspace::acquire(&config.workspace_dir)?
    };

    let mut report = RunReport::new(&config.source_archive, &config.output_archive);

    match run_stages(config, &archiver, &scanner, workspace.path(), &mut report) {
        Ok(()) => {
            workspace.release()?;
            report.duration = started.elapsed();
            Ok(report)
        }
        Err(error) => {
            let cleanup_warning = workspace.release().err().map(|e| e.to_string());
            Err(RunFailure {
                error,
                cleanup_warning,
            })
        }
    }
}

/// The three gated external stages, in order. Cleanup is owned by the caller.
fn run_stages(
    config: &PipelineConfig,
    archiver: &Archiver,
    scanner: &Scanner,
    workspace: &Path,
    report: &mut RunReport,
) -> Result<(), PipelineError> {
    archiver.extract(&config.source_archive, workspace, config.step_timeout)?;
    report.files_scanned = count_files(workspace);

    scanner.scan(workspace, config.step_timeout)?;

    if let Err(err) = archiver.pack(workspace, &config.output_archive, config.step_timeout) {
        // A truncated output archive must never be left looking complete.
        let _ = fs::remove_file(&config.output_archive);
        return Err(err);
    }

    match fs::metadata(&config.output_archive) {
        Ok(meta) => report.output_bytes = meta.len(),
        Err(e) => report.add_warning(format!(
            "cannot stat output archive {}: {e}",
            config.output_archive.display()
        )),
    }
    Ok(())
}

/// Counts regular files under the workspace, for operator visibility only.
fn count_files(workspace: &Path) -> usize {
    WalkDir::new(workspace)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_count_files_recurses() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("a.txt"), b"a").unwrap();
        fs::write(temp.path().join("sub").join("b.txt"), b"b").unwrap();

        assert_eq!(count_files(temp.path()), 2);
    }

    #[test]
    fn test_count_files_empty() {
        let temp = TempDir::new().expect("failed to create temp dir");
        assert_eq!(count_files(temp.path()), 0);
    }

    #[test]
    fn test_run_failure_from_error() {
        let failure = RunFailure::from(PipelineError::Source("no match".into()));
        assert!(failure.cleanup_warning.is_none());
        assert_eq!(failure.to_string(), "cannot resolve source archive: no match");
    }
}
