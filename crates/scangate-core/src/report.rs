//! Run reporting.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Report of one successful pipeline run.
///
/// Contains the resolved paths and basic statistics about the run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// The archive that was extracted.
    pub source_archive: PathBuf,

    /// The repacked archive that was produced.
    pub output_archive: PathBuf,

    /// Size of the output archive in bytes.
    pub output_bytes: u64,

    /// Number of regular files present in the workspace after extraction.
    pub files_scanned: usize,

    /// Duration of the whole run, cleanup included.
    pub duration: Duration,

    /// Warnings generated during the run.
    pub warnings: Vec<String>,
}

impl RunReport {
    /// Creates a report for the given source and output paths.
    #[must_use]
    pub fn new(source_archive: &Path, output_archive: &Path) -> Self {
        Self {
            source_archive: source_archive.to_path_buf(),
            output_archive: output_archive.to_path_buf(),
            ..Self::default()
        }
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
