//! Extract-scan-repack pipeline orchestration.
//!
//! `scangate-core` sequences three external collaborators over a temporary
//! workspace directory: an archiver extracts the source archive into the
//! workspace, a content scanner inspects the extracted files, and the
//! archiver repacks the workspace into a new output archive only when the
//! scan succeeds. The workspace is removed on every exit path.
//!
//! The collaborators are opaque programs reached through a command-line
//! contract; their internal logic is out of scope here.
//!
//! # Examples
//!
//! ```no_run
//! use scangate_core::PipelineConfig;
//! use scangate_core::run_pipeline;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::new(PathBuf::from("input.7z"));
//! let report = run_pipeline(&config)?;
//! println!("Repacked into {}", report.output_archive.display());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod collab;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod workspace;

// Re-export main API types
pub use collab::Archiver;
pub use collab::Scanner;
pub use config::PipelineConfig;
pub use config::resolve_source_archive;
pub use error::CollabExit;
pub use error::PipelineError;
pub use error::Result;
pub use error::Stage;
pub use pipeline::RunFailure;
pub use pipeline::run_pipeline;
pub use report::RunReport;
pub use workspace::Workspace;
