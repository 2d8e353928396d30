//! Pipeline configuration and source-archive resolution.

use crate::PipelineError;
use crate::Result;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Default workspace directory, matching the original hardcoded name.
pub const DEFAULT_WORKSPACE_DIR: &str = "my_temp_extract_dir";

/// Default output archive, matching the original hardcoded name.
pub const DEFAULT_OUTPUT_ARCHIVE: &str = "temp_result.7z";

/// Default archiver executable, resolved through `PATH`.
pub const DEFAULT_ARCHIVER: &str = "archive-tool";

/// Default scanner executable, resolved through `PATH`.
pub const DEFAULT_SCANNER: &str = "scanner";

/// Extension used when resolving the source archive from a directory.
const SOURCE_EXTENSION: &str = "7z";

/// Configuration for one pipeline run.
///
/// Every path the original script hardcoded is a parameter here, with a
/// documented default matching the original's literal name.
///
/// # Examples
///
/// ```
/// use scangate_core::PipelineConfig;
/// use std::path::PathBuf;
/// use std::time::Duration;
///
/// let config = PipelineConfig {
///     step_timeout: Some(Duration::from_secs(300)),
///     ..PipelineConfig::new(PathBuf::from("input.7z"))
/// };
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The archive to extract. Read-only input, never mutated.
    pub source_archive: PathBuf,

    /// The temporary directory extracted contents live in during the run.
    pub workspace_dir: PathBuf,

    /// Where the repacked archive is written on success.
    pub output_archive: PathBuf,

    /// The external archiver executable.
    pub archiver: PathBuf,

    /// The external scanner executable.
    pub scanner: PathBuf,

    /// Optional per-stage deadline. A collaborator exceeding it is killed
    /// and the stage fails as if the collaborator had failed.
    pub step_timeout: Option<Duration>,

    /// Remove a pre-existing workspace directory instead of refusing to run.
    pub force_clean_workspace: bool,
}

impl PipelineConfig {
    /// Creates a configuration for the given source archive with all other
    /// settings at their defaults.
    #[must_use]
    pub fn new(source_archive: PathBuf) -> Self {
        Self {
            source_archive,
            workspace_dir: PathBuf::from(DEFAULT_WORKSPACE_DIR),
            output_archive: PathBuf::from(DEFAULT_OUTPUT_ARCHIVE),
            archiver: PathBuf::from(DEFAULT_ARCHIVER),
            scanner: PathBuf::from(DEFAULT_SCANNER),
            step_timeout: None,
            force_clean_workspace: false,
        }
    }
}

/// Resolves the source archive from a directory when none was given.
///
/// The original selected its input with a `*.7z` shell glob and left the
/// zero-match and multiple-match cases undefined. This resolution is
/// deterministic instead: the directory's immediate `.7z` files are listed,
/// and exactly one match is required.
///
/// # Errors
///
/// Returns [`PipelineError::Source`] if the directory cannot be read, no
/// `.7z` file is present, or more than one is.
pub fn resolve_source_archive(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|e| {
        PipelineError::Source(format!("cannot read directory {}: {e}", dir.display()))
    })?;

    let mut matches: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            PipelineError::Source(format!("cannot read directory {}: {e}", dir.display()))
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            matches.push(path);
        }
    }
    matches.sort();

    match matches.len() {
        0 => Err(PipelineError::Source(format!(
            "no .{SOURCE_EXTENSION} archive found in {}",
            dir.display()
        ))),
        1 => Ok(matches.remove(0)),
        n => Err(PipelineError::Source(format!(
            "expected exactly one .{SOURCE_EXTENSION} archive in {}, found {n}",
            dir.display()
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_original_names() {
        let config = PipelineConfig::new(PathBuf::from("input.7z"));
        assert_eq!(config.workspace_dir, PathBuf::from("my_temp_extract_dir"));
        assert_eq!(config.output_archive, PathBuf::from("temp_result.7z"));
        assert_eq!(config.archiver, PathBuf::from("archive-tool"));
        assert_eq!(config.scanner, PathBuf::from("scanner"));
        assert!(config.step_timeout.is_none());
        assert!(!config.force_clean_workspace);
    }

    #[test]
    fn test_resolve_single_match() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::write(temp.path().join("input.7z"), b"archive").unwrap();
        fs::write(temp.path().join("notes.txt"), b"not an archive").unwrap();

        let resolved = resolve_source_archive(temp.path()).expect("should resolve");
        assert_eq!(resolved, temp.path().join("input.7z"));
    }

    #[test]
    fn test_resolve_no_match() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::write(temp.path().join("notes.txt"), b"not an archive").unwrap();

        let err = resolve_source_archive(temp.path()).expect_err("should fail");
        assert!(err.to_string().contains("no .7z archive"));
    }

    #[test]
    fn test_resolve_multiple_matches() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::write(temp.path().join("a.7z"), b"one").unwrap();
        fs::write(temp.path().join("b.7z"), b"two").unwrap();

        let err = resolve_source_archive(temp.path()).expect_err("should fail");
        assert!(err.to_string().contains("exactly one"));
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn test_resolve_ignores_directories() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::create_dir(temp.path().join("dir.7z")).unwrap();
        fs::write(temp.path().join("real.7z"), b"archive").unwrap();

        let resolved = resolve_source_archive(temp.path()).expect("should resolve");
        assert_eq!(resolved, temp.path().join("real.7z"));
    }

    #[test]
    fn test_resolve_unreadable_directory() {
        let err = resolve_source_archive(Path::new("/nonexistent/scangate/dir"))
            .expect_err("should fail");
        assert!(matches!(err, PipelineError::Source(_)));
    }
}
