//! Machine-readable reports

use anyhow::Result;
use chrono::Local;
use serde_json::{Value, json};
use std::path::Path;

use crate::batch::{BatchReport, DocumentResult};

fn report_metadata(root: &Path) -> Value {
    json!({
        "generated_at": Local::now().to_rfc3339(),
        "evalview_version": env!("CARGO_PKG_VERSION"),
        "root": root.display().to_string(),
    })
}

/// Whole batch: every document plus the merged statistics
pub fn batch(report: &BatchReport, root: &Path) -> Result<String> {
    let value = json!({
        "report_metadata": report_metadata(root),
        "summary": {
            "total": report.total,
            "success": report.success,
            "failed": report.failed,
        },
        "aggregate": report.aggregate,
        "judgement_summary": report.judgement_summary,
        "documents": report.documents,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Cross-document statistics only
pub fn statistics(report: &BatchReport, root: &Path) -> Result<String> {
    let value = json!({
        "report_metadata": report_metadata(root),
        "summary": {
            "total": report.total,
            "success": report.success,
            "failed": report.failed,
        },
        "aggregate": report.aggregate,
        "judgement_summary": report.judgement_summary,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn document(result: &DocumentResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
