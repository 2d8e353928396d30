//! Workspace lifecycle: one temporary extraction directory per run.

use crate::PipelineError;
use crate::Result;
use crate::Stage;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

/// An exclusively owned temporary extraction directory.
///
/// A `Workspace` is created at run start, populated by the archiver, read by
/// the scanner and the packer, and removed at run end. Removal is guaranteed
/// on every exit path: the success path calls [`Workspace::release`]
/// explicitly so a removal failure can be reported, and `Drop` performs
/// best-effort removal for panics and early error returns.
///
/// # Examples
///
/// ```no_run
/// use scangate_core::Workspace;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let workspace = Workspace::acquire(Path::new("my_temp_extract_dir"))?;
/// // ... populate and inspect ...
/// workspace.release()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    released: bool,
}

impl Workspace {
    /// Creates the workspace directory at `path`.
    ///
    /// If the path already exists, typically stale state left by a prior
    /// crashed run, acquisition fails rather than silently reusing its
    /// contents. Use [`Workspace::acquire_clean`] to clear stale state
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Workspace`] if the directory already exists
    /// or cannot be created.
    pub fn acquire(path: &Path) -> Result<Self> {
        fs::create_dir(path).map_err(|source| PipelineError::Workspace {
            stage: Stage::Extract,
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            released: false,
        })
    }

    /// Creates the workspace directory at `path`, removing any pre-existing
    /// directory or file at that path first.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Workspace`] if the stale entry cannot be
    /// removed or the directory cannot be created.
    pub fn acquire_clean(path: &Path) -> Result<Self> {
        let stale = match fs::symlink_metadata(path) {
            Ok(meta) => Some(meta),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(source) => {
                return Err(PipelineError::Workspace {
                    stage: Stage::Extract,
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if let Some(meta) = stale {
            let removal = if meta.is_dir() {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path)
            };
            removal.map_err(|source| PipelineError::Workspace {
                stage: Stage::Extract,
                path: path.to_path_buf(),
                source,
            })?;
        }

        Self::acquire(path)
    }

    /// Returns the workspace directory path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recursively removes the workspace directory.
    ///
    /// Consumes the workspace; removal happens exactly once per acquired
    /// workspace. A directory that is already gone counts as removed: the
    /// invariant is that it must not exist after the run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Cleanup`] if removal fails. The directory may
    /// still exist in that case and the failure must be surfaced to the
    /// caller as a non-zero process result.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        match fs::remove_dir_all(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PipelineError::Cleanup {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.released {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}
