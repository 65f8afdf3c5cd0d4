//! Structured output writer supporting JSON and human-readable modes.

use crate::cli_style;
use crate::error::LiveryError;
use livery_core_manifest::{BuildReport, Manifest};
use serde::Serialize;

/// Output mode for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Machine-readable result of a build or check
#[derive(Debug, Serialize)]
pub struct BuildSummary {
    pub operation: String,
    pub success: bool,
    pub files_scanned: usize,
    pub items: usize,
    pub digest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl BuildSummary {
    pub fn from_report(operation: &str, report: &BuildReport) -> Self {
        Self {
            operation: operation.to_string(),
            success: true,
            files_scanned: report.files_scanned,
            items: report.manifest.len(),
            digest: report.digest.clone(),
            output: report.output.as_ref().map(|p| p.display().to_string()),
        }
    }
}

/// Machine-readable failure
#[derive(Debug, Serialize)]
pub struct FailureSummary {
    pub success: bool,
    pub category: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// Structured output writer that supports both human-readable and JSON output
#[derive(Debug, Clone)]
pub struct OutputWriter {
    pub mode: OutputMode,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            mode: if json { OutputMode::Json } else { OutputMode::Human },
        }
    }

    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Print the result of a build or check
    pub fn build_result(&self, operation: &str, report: &BuildReport) {
        match self.mode {
            OutputMode::Json => {
                let summary = BuildSummary::from_report(operation, report);
                if let Ok(json) = serde_json::to_string(&summary) {
                    println!("{}", json);
                }
            }
            OutputMode::Human => {
                match &report.output {
                    Some(path) => cli_style::print_success(&format!(
                        "Wrote {} with {} item(s)",
                        path.display(),
                        report.manifest.len()
                    )),
                    None => cli_style::print_success(&format!(
                        "All {} metadata file(s) are valid",
                        report.files_scanned
                    )),
                }
                println!("{}", cli_style::build_summary_table(report));
            }
        }
    }

    /// Print the items of a loaded manifest
    pub fn manifest_listing(&self, manifest: &Manifest) {
        match self.mode {
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(manifest) {
                    println!("{}", json);
                }
            }
            OutputMode::Human => {
                if manifest.is_empty() {
                    cli_style::print_info("Manifest has no items");
                    return;
                }
                println!("{}", cli_style::item_table(manifest));
                if let Some(at) = manifest.generated_at {
                    cli_style::print_info(&format!(
                        "{} item(s), generated {}",
                        manifest.len(),
                        at.to_rfc3339()
                    ));
                }
            }
        }
    }

    /// Print an error
    pub fn error(&self, err: &LiveryError) {
        match self.mode {
            OutputMode::Json => {
                let failure = FailureSummary {
                    success: false,
                    category: err.category().to_string(),
                    error: sanitize_error(&err.to_string()),
                    file: failing_file(err),
                };
                if let Ok(json) = serde_json::to_string(&failure) {
                    eprintln!("{}", json);
                }
            }
            OutputMode::Human => {
                cli_style::print_error(&sanitize_error(&err.to_string()), err.suggestion());
            }
        }
    }
}

fn failing_file(err: &LiveryError) -> Option<String> {
    match err {
        LiveryError::Manifest(e) => e.file().map(|p| p.display().to_string()),
        _ => None,
    }
}

/// Sanitize error messages by collapsing whitespace
pub fn sanitize_error(msg: &str) -> String {
    msg.split_whitespace().collect::<Vec<&str>>().join(" ")
}
