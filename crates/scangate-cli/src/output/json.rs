//! JSON output formatter for machine consumption.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use scangate_core::RunReport;
use scangate_core::Stage;
use serde::Serialize;

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct RunData {
    source_archive: String,
    output_archive: String,
    output_bytes: u64,
    files_scanned: usize,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl From<&RunReport> for RunData {
    fn from(report: &RunReport) -> Self {
        Self {
            source_archive: report.source_archive.display().to_string(),
            output_archive: report.output_archive.display().to_string(),
            output_bytes: report.output_bytes,
            files_scanned: report.files_scanned,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_run_result(&self, report: &RunReport) -> Result<()> {
        let output = JsonOutput::success("run", RunData::from(report));
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn format_failure(&self, stage: Stage, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("run", stage, format!("{error}"));
        if let Ok(rendered) = serde_json::to_string_pretty(&output) {
            println!("{rendered}");
        }
    }

    fn format_warning(&self, message: &str) {
        // Warnings ride along inside the run data; standalone warnings go to
        // stderr so stdout stays valid JSON.
        eprintln!("Warning: {message}");
    }
}
