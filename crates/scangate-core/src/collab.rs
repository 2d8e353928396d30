//! Typed wrappers over the external archiver and scanner processes.
//!
//! Each collaborator is an opaque program invoked once per run and gated
//! purely on its exit status. The wrappers own the command-line contract;
//! they do not attempt to detect partial success or roll anything back, so
//! whatever atomicity the collaborator provides is inherited as-is.

use crate::CollabExit;
use crate::PipelineError;
use crate::Result;
use crate::Stage;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Child;
use std::process::Command;
use std::process::ExitStatus;
use std::thread;
use std::time::Duration;
use std::time::Instant;

/// Poll interval while waiting on a collaborator with a deadline.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Wrapper for the external archiver, used for both extraction and packing.
#[derive(Debug, Clone)]
pub struct Archiver {
    program: PathBuf,
}

impl Archiver {
    /// Creates an archiver wrapper around the given executable.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Extracts all entries of `archive` into `workspace`, overwriting on
    /// conflict.
    ///
    /// Contract: `archive-tool extract <archive> --output-dir <dir>
    /// --overwrite`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Extraction`] on non-zero archiver exit,
    /// [`PipelineError::Launch`] if the archiver cannot be run, or
    /// [`PipelineError::Timeout`] if the deadline elapsed.
    pub fn extract(
        &self,
        archive: &Path,
        workspace: &Path,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("extract")
            .arg(archive)
            .arg("--output-dir")
            .arg(workspace)
            .arg("--overwrite");

        let status = run_collaborator(cmd, Stage::Extract, &self.program, timeout)?;
        if status.success() {
            Ok(())
        } else {
            Err(PipelineError::Extraction {
                exit: CollabExit::from(status),
            })
        }
    }

    /// Compresses the immediate children of `workspace` into `output` at
    /// maximum compression.
    ///
    /// Contract: `archive-tool compress <dir>/* --output <archive>
    /// --compression-level max`. The original's `<dir>/*` shell glob is
    /// realized here by listing the workspace's immediate children and
    /// passing them as explicit arguments; no shell is involved.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Pack`] on non-zero archiver exit,
    /// [`PipelineError::Workspace`] attributed to the pack stage if the
    /// workspace cannot be listed, [`PipelineError::Launch`] if the archiver
    /// cannot be run, or [`PipelineError::Timeout`] if the deadline elapsed.
    pub fn pack(&self, workspace: &Path, output: &Path, timeout: Option<Duration>) -> Result<()> {
        let entries = list_children(workspace)?;

        let mut cmd = Command::new(&self.program);
        cmd.arg("compress")
            .args(&entries)
            .arg("--output")
            .arg(output)
            .arg("--compression-level")
            .arg("max");

        let status = run_collaborator(cmd, Stage::Pack, &self.program, timeout)?;
        if status.success() {
            Ok(())
        } else {
            Err(PipelineError::Pack {
                exit: CollabExit::from(status),
            })
        }
    }
}

/// Wrapper for the external content scanner.
#[derive(Debug, Clone)]
pub struct Scanner {
    program: PathBuf,
}

impl Scanner {
    /// Creates a scanner wrapper around the given executable.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs the scanner over `workspace`.
    ///
    /// Contract: `scanner <dir>`, success = exit status 0. The scanner is
    /// trusted to inspect (and possibly repair in place) the files under the
    /// workspace; this wrapper treats it as a black box.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Scan`] on non-zero scanner exit,
    /// [`PipelineError::Launch`] if the scanner cannot be run, or
    /// [`PipelineError::Timeout`] if the deadline elapsed.
    pub fn scan(&self, workspace: &Path, timeout: Option<Duration>) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(workspace);

        let status = run_collaborator(cmd, Stage::Scan, &self.program, timeout)?;
        if status.success() {
            Ok(())
        } else {
            Err(PipelineError::Scan {
                exit: CollabExit::from(status),
            })
        }
    }
}

/// Lists the immediate children of `workspace`, sorted for a deterministic
/// packer command line.
///
/// This only ever runs for the packer, after extract and scan have both
/// succeeded, so a listing failure belongs to the pack stage.
fn list_children(workspace: &Path) -> Result<Vec<PathBuf>> {
    let workspace_err = |source: std::io::Error| PipelineError::Workspace {
        stage: Stage::Pack,
        path: workspace.to_path_buf(),
        source,
    };

    let read = fs::read_dir(workspace).map_err(workspace_err)?;

    let mut entries = Vec::new();
    for entry in read {
        entries.push(entry.map_err(workspace_err)?.path());
    }
    entries.sort();
    Ok(entries)
}

/// Spawns a collaborator and blocks until it exits or the deadline elapses.
///
/// Stdio is inherited so collaborator output flows through to the operator.
/// On deadline the child is killed and reaped, and the stage fails with
/// [`PipelineError::Timeout`].
fn run_collaborator(
    mut cmd: Command,
    stage: Stage,
    program: &Path,
    timeout: Option<Duration>,
) -> Result<ExitStatus> {
    let launch_err = |source: std::io::Error| PipelineError::Launch {
        stage,
        program: program.to_path_buf(),
        source,
    };

    let mut child = cmd.spawn().map_err(launch_err)?;

    let Some(limit) = timeout else {
        return child.wait().map_err(launch_err);
    };

    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait().map_err(launch_err)? {
            return Ok(status);
        }
        if started.elapsed() > limit {
            kill_and_reap(&mut child);
            return Err(PipelineError::Timeout { stage });
        }
        thread::sleep(WAIT_POLL_INTERVAL);
    }
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
