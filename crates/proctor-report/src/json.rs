//! Versioned JSON report documents.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use proctor_core::report::Report;

/// Bumped when the document layout changes incompatibly.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportDocument<'a> {
    format_version: u32,
    generated_at: DateTime<Utc>,
    report: &'a Report,
}

/// Generate the JSON document for a report.
pub fn generate_json(report: &Report) -> Result<String> {
    let doc = ReportDocument {
        format_version: FORMAT_VERSION,
        generated_at: Utc::now(),
        report,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Write a JSON report to a file.
pub fn write_json_report(report: &Report, path: &Path) -> Result<()> {
    let json = generate_json(report)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    Ok(())
}
