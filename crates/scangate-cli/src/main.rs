//! Scangate CLI - extract an archive, scan its contents with an external
//! scanner, and repack it when the scan passes.

mod cli;
mod error;
mod output;

use clap::Parser;
use scangate_core::PipelineConfig;
use scangate_core::PipelineError;
use scangate_core::resolve_source_archive;
use scangate_core::run_pipeline;
use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

/// Exit code used when the process is interrupted by a signal.
const EXIT_INTERRUPTED: i32 = 130;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            let code = err.process_exit_code();
            let stage = err.stage();
            let converted = error::convert_pipeline_error(err, Path::new(""));
            formatter.format_failure(stage, &converted);
            return ExitCode::from(code);
        }
    };

    // The Drop guard inside the pipeline covers normal and error returns;
    // signal delivery tears the process down without unwinding, so removal
    // is attempted here as well. A workspace directory that existed before
    // this run and will not be cleared by --force is never ours to delete:
    // the run refuses it and must leave it intact.
    let workspace = config.workspace_dir.clone();
    let may_remove = signal_may_remove_workspace(workspace.exists(), config.force_clean_workspace);
    let installed = ctrlc::set_handler(move || {
        if may_remove {
            let _ = std::fs::remove_dir_all(&workspace);
        }
        std::process::exit(EXIT_INTERRUPTED);
    });
    if installed.is_err() {
        formatter.format_warning("could not install signal handler; workspace may leak if interrupted");
    }

    match run_pipeline(&config) {
        Ok(report) => {
            let _ = formatter.format_run_result(&report);
            ExitCode::SUCCESS
        }
        Err(failure) => {
            if let Some(warning) = &failure.cleanup_warning {
                formatter.format_warning(warning);
            }
            let code = failure.error.process_exit_code();
            let stage = failure.error.stage();
            let converted = error::convert_pipeline_error(failure.error, &config.source_archive);
            formatter.format_failure(stage, &converted);
            ExitCode::from(code)
        }
    }
}

/// Decides whether an interrupt handler may remove the workspace directory.
///
/// A fresh path belongs to this run. A pre-existing path only becomes ours
/// once `--force` clears it; without `--force` the run refuses it, so the
/// handler must not touch it either.
const fn signal_may_remove_workspace(preexisting: bool, force: bool) -> bool {
    !preexisting || force
}

/// Builds the pipeline configuration from parsed arguments, resolving the
/// source archive from the current directory when none was given.
fn build_config(cli: &cli::Cli) -> Result<PipelineConfig, PipelineError> {
    let source_archive = match &cli.archive {
        Some(path) => path.clone(),
        None => {
            let cwd = env::current_dir().map_err(|e| {
                PipelineError::Source(format!("cannot determine current directory: {e}"))
            })?;
            resolve_source_archive(&cwd)?
        }
    };

    Ok(PipelineConfig {
        source_archive,
        workspace_dir: cli.workspace_dir.clone(),
        output_archive: cli.output.clone(),
        archiver: cli.archiver.clone(),
        scanner: cli.scanner.clone(),
        step_timeout: cli.timeout.map(Duration::from_secs),
        force_clean_workspace: cli.force,
    })
}
