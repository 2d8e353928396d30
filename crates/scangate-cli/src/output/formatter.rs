//! Output formatter trait for CLI results.

use anyhow::Result;
use scangate_core::RunReport;
use scangate_core::Stage;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of a successful run
    fn format_run_result(&self, report: &RunReport) -> Result<()>;

    /// Format a run failure, attributed to its stage
    fn format_failure(&self, stage: Stage, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            stage: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(
        operation: impl Into<String>,
        stage: Stage,
        error: impl Into<String>,
    ) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            stage: Some(stage.as_str().to_string()),
            data: None,
            error: Some(error.into()),
        }
    }
}
