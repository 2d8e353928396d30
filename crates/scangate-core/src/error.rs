//! Error types for pipeline runs.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias using `PipelineError`.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// One of the sequenced pipeline stages.
///
/// Carried inside errors and reports so a failure is always attributable to
/// the stage it originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The archiver populating the workspace from the source archive.
    Extract,
    /// The content scanner inspecting the workspace.
    Scan,
    /// The archiver compressing the workspace into the output archive.
    Pack,
    /// Workspace removal after the main work completed.
    Cleanup,
}

impl Stage {
    /// Returns the stage name as used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::Scan => "scan",
            Self::Pack => "pack",
            Self::Cleanup => "cleanup",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a collaborator process terminated, normalized for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollabExit {
    /// The process exited with the given non-zero code.
    Code(i32),
    /// The process was terminated by a signal (no exit code available).
    Signal,
}

impl From<ExitStatus> for CollabExit {
    fn from(status: ExitStatus) -> Self {
        status.code().map_or(Self::Signal, Self::Code)
    }
}

impl std::fmt::Display for CollabExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code(code) => write!(f, "exit code {code}"),
            Self::Signal => f.write_str("terminated by signal"),
        }
    }
}

/// Errors that can occur during a pipeline run.
///
/// Every stage failure is terminal for the run: there is no retry and no
/// local recovery. The orchestrator stops forward progress on the first
/// failure and proceeds to workspace cleanup.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source archive could not be resolved from the working directory.
    #[error("cannot resolve source archive: {0}")]
    Source(String),

    /// The workspace directory could not be created or accessed.
    #[error("workspace failure at {path}: {source}")]
    Workspace {
        /// The stage the workspace was serving when it failed. Acquisition
        /// failures belong to the extract stage; a workspace that becomes
        /// unreadable later belongs to the stage that touched it.
        stage: Stage,
        /// The workspace path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A collaborator program could not be run at all.
    #[error("cannot run {program} for {stage} stage: {source}")]
    Launch {
        /// The stage the collaborator was serving.
        stage: Stage,
        /// The collaborator executable.
        program: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The archiver failed while extracting the source archive.
    #[error("extraction failed ({exit})")]
    Extraction {
        /// How the archiver terminated.
        exit: CollabExit,
    },

    /// The scanner reported failure for the extracted contents.
    #[error("scan failed ({exit})")]
    Scan {
        /// How the scanner terminated.
        exit: CollabExit,
    },

    /// The archiver failed while compressing the workspace.
    #[error("pack failed ({exit})")]
    Pack {
        /// How the archiver terminated.
        exit: CollabExit,
    },

    /// A collaborator exceeded the configured per-stage deadline.
    #[error("{stage} stage timed out")]
    Timeout {
        /// The stage that was killed.
        stage: Stage,
    },

    /// Workspace removal failed after the main work completed.
    #[error("workspace cleanup failed for {path}: {source}")]
    Cleanup {
        /// The workspace path that could not be removed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    /// Returns the stage this error is attributed to.
    ///
    /// Source resolution aborts the run before any collaborator is invoked;
    /// it folds into the extract stage, which is the first thing the run
    /// would have done with the workspace. Workspace errors carry the stage
    /// they occurred at.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Source(_) | Self::Extraction { .. } => Stage::Extract,
            Self::Scan { .. } => Stage::Scan,
            Self::Pack { .. } => Stage::Pack,
            Self::Cleanup { .. } => Stage::Cleanup,
            Self::Workspace { stage, .. } | Self::Launch { stage, .. } | Self::Timeout { stage } => {
                *stage
            }
        }
    }

    /// Returns the process exit code for this failure.
    ///
    /// The contract is: `0` means the whole run succeeded, `1` extraction
    /// (including setup) failed, `2` the scan failed, `3` packing failed,
    /// `4` cleanup failed after otherwise successful work.
    #[must_use]
    pub const fn process_exit_code(&self) -> u8 {
        match self.stage() {
            Stage::Extract => 1,
            Stage::Scan => 2,
            Stage::Pack => 3,
            Stage::Cleanup => 4,
        }
    }
}
