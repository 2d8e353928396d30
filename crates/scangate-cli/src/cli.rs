//! CLI argument parsing using clap.

use clap::Parser;
use scangate_core::config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scangate")]
#[command(author, version)]
#[command(about = "Extract an archive, scan its contents, and repack it on success")]
#[command(long_about = None)]
pub struct Cli {
    /// Path to the source archive (default: the single *.7z file in the
    /// current directory)
    #[arg(value_name = "ARCHIVE")]
    pub archive: Option<PathBuf>,

    /// Temporary directory for extracted contents
    #[arg(long, value_name = "DIR", default_value = config::DEFAULT_WORKSPACE_DIR)]
    pub workspace_dir: PathBuf,

    /// Output archive path
    #[arg(short, long, value_name = "ARCHIVE", default_value = config::DEFAULT_OUTPUT_ARCHIVE)]
    pub output: PathBuf,

    /// Archiver executable used for extraction and packing
    #[arg(long, value_name = "PROGRAM", default_value = config::DEFAULT_ARCHIVER)]
    pub archiver: PathBuf,

    /// Scanner executable run over the extracted contents
    #[arg(long, value_name = "PROGRAM", default_value = config::DEFAULT_SCANNER)]
    pub scanner: PathBuf,

    /// Per-stage timeout in seconds (default: none)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Remove a leftover workspace directory instead of failing
    #[arg(short, long)]
    pub force: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,
}
