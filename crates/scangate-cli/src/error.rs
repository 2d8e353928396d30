//! Error conversion utilities for CLI.
//!
//! Converts scangate-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use scangate_core::PipelineError;
use scangate_core::Stage;
use std::path::Path;

/// Converts `PipelineError` to a user-friendly anyhow error with context
pub fn convert_pipeline_error(err: PipelineError, source_archive: &Path) -> anyhow::Error {
    match err {
        PipelineError::Source(reason) => {
            anyhow!(
                "Cannot resolve the source archive: {reason}\n\
                 HINT: Pass the archive path explicitly as the first argument."
            )
        }
        PipelineError::Workspace {
            stage: Stage::Extract,
            path,
            source,
        } => {
            anyhow!(
                "Workspace '{}' could not be used: {source}\n\
                 HINT: A leftover directory from a crashed run is refused. Use --force to clear it.",
                path.display()
            )
        }
        PipelineError::Workspace {
            stage,
            path,
            source,
        } => {
            anyhow!(
                "Workspace '{}' became unusable during the {stage} stage: {source}",
                path.display()
            )
        }
        PipelineError::Launch {
            stage,
            program,
            source,
        } => {
            anyhow!(
                "Cannot run '{}' for the {stage} stage: {source}\n\
                 HINT: Check that the program is installed, or point --archiver/--scanner at it.",
                program.display()
            )
        }
        PipelineError::Extraction { exit } => {
            anyhow!(
                "Extraction of '{}' failed ({exit})\n\
                 HINT: The archive may be corrupted or unreadable.",
                source_archive.display()
            )
        }
        PipelineError::Scan { exit } => {
            anyhow!(
                "Scan rejected the contents of '{}' ({exit})\n\
                 No output archive was produced.",
                source_archive.display()
            )
        }
        PipelineError::Pack { exit } => {
            anyhow!(
                "Repacking failed ({exit})\n\
                 Any partially written output archive has been removed."
            )
        }
        PipelineError::Timeout { stage } => {
            anyhow!(
                "The {stage} stage exceeded the configured deadline and was killed\n\
                 HINT: Raise or drop --timeout if the collaborator legitimately needs longer."
            )
        }
        PipelineError::Cleanup { path, source } => {
            anyhow!(
                "Workspace '{}' could not be removed: {source}\n\
                 The main work completed, but the directory was leaked and needs manual removal.",
                path.display()
            )
        }
    }
}
