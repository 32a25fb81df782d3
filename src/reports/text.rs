//! Line-oriented terminal report
//!
//! Everything renders into a `String` so commands decide where it goes and
//! tests can inspect it. Styling comes from `console`, which drops escapes
//! automatically when stdout is not a terminal.

use console::style;
use serde_json::Value;

use crate::batch::{BatchReport, DocumentResult};
use crate::config::ReportConfig;
use crate::engine::{Content, JudgementSummary, MappedDocument, Metadata, RubricView, Statistics};
use crate::scanner::{FileInfo, readable_size};

const WIDE: usize = 80;
const NARROW: usize = 60;

pub struct TextReport<'a> {
    config: &'a ReportConfig,
}

impl<'a> TextReport<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// Numbered listing of every scanned document, failures included
    pub fn file_list(&self, report: &BatchReport) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", style("📋 Files").bold()));
        for (idx, result) in report.documents.iter().enumerate() {
            let size = result
                .file()
                .map(|file| format!(" {}", style(format!("({})", file.size_readable())).dim()))
                .unwrap_or_default();
            let marker = match result {
                DocumentResult::Mapped(_) => String::new(),
                DocumentResult::Failed(_) => format!(" {}", style("✗ failed").red()),
            };
            out.push_str(&format!(
                "  {} {}{}{}\n",
                style(format!("{}.", idx + 1)).cyan(),
                result.identifier(),
                size,
                marker
            ));
        }
        out
    }

    /// Full view of one document
    pub fn document(&self, result: &DocumentResult) -> String {
        let mut out = String::new();
        out.push_str(&header(&format!("📄 {}", result.identifier())));

        if let Some(file) = result.file() {
            out.push_str(&file_info(file));
        }

        match result {
            DocumentResult::Mapped(entry) => out.push_str(&self.mapped(&entry.document)),
            DocumentResult::Failed(entry) => {
                out.push_str(&format!("{} {}\n", style("✗").red(), style(&entry.error).red()));
            }
        }

        out.push('\n');
        out.push_str(&separator('═', WIDE));
        out
    }

    fn mapped(&self, doc: &MappedDocument) -> String {
        let mut out = String::new();
        out.push_str(&metadata(&doc.metadata));
        out.push_str(&self.content(&doc.content));
        out.push_str(&self.rubrics(&doc.rubrics));
        out.push_str(&statistics(&doc.statistics));
        out
    }

    fn content(&self, content: &Content) -> String {
        if content.is_empty() {
            return String::new();
        }

        let mut out = section("Content");
        for (key, value) in content.iter() {
            out.push_str(&format!("\n{}\n", style(format!("{key}:")).green()));
            match value {
                Value::String(text) => {
                    out.push_str(&format!("  Length: {} chars\n", text.chars().count()));
                    out.push_str(&format!(
                        "  Preview: {}\n",
                        preview(text, self.config.content_preview_chars)
                    ));
                }
                other => out.push_str(&format!("  {other}\n")),
            }
        }
        out
    }

    fn rubrics(&self, rubrics: &[Value]) -> String {
        if rubrics.is_empty() {
            return String::new();
        }

        let mut out = section(&format!("Evaluation ({} rubrics)", rubrics.len()));
        for (idx, rubric) in rubrics.iter().enumerate() {
            let view = RubricView::new(rubric);
            out.push_str(&format!(
                "\n{} {}\n",
                style(format!("[{}]", idx + 1)).cyan(),
                view.label().unwrap_or_else(|| "N/A".to_string())
            ));

            if let Some(sub_label) = view.get("sub_label") {
                out.push_str(&format!("  Sub-label: {}\n", display_scalar(sub_label)));
            }
            if let Some(description) = view.description() {
                out.push_str(&format!(
                    "  Description: {}\n",
                    preview(description, self.config.description_preview_chars)
                ));
            }
            if let Some(weight) = view.get("weight") {
                out.push_str(&format!("  Weight: {}\n", display_scalar(weight)));
            }

            for judgement in view.judgements() {
                let score = judgement
                    .score
                    .map(display_scalar)
                    .unwrap_or_else(|| "N/A".to_string());
                let score = if judgement.passed() {
                    style(score).green()
                } else {
                    style(score).red()
                };
                out.push_str(&format!("  {} score: {}\n", model_title(&judgement.model), score));
                if let Some(reason) = judgement.reason {
                    out.push_str(&format!(
                        "    Reason: {}\n",
                        preview(reason, self.config.reason_preview_chars)
                    ));
                }
            }
        }
        out
    }

    /// Cross-document summary: file totals, rubric totals, label and judgement breakdowns
    pub fn summary(&self, report: &BatchReport) -> String {
        let total_size: u64 = report
            .documents
            .iter()
            .filter_map(|result| result.file().map(|file| file.size))
            .sum();

        let mut out = header("📊 Summary");
        out.push_str(&field("Documents", &report.total.to_string()));
        out.push_str(&field("Loaded", &report.success.to_string()));
        if report.failed > 0 {
            out.push_str(&format!(
                "{} {}\n",
                style("Failed:").red(),
                report.failed
            ));
        }
        out.push_str(&field("Total size", &format!("{:.2} KB", total_size as f64 / 1024.0)));
        out.push_str(&field("Rubrics", &report.aggregate.total_rubrics.to_string()));
        out.push_str(&field("Total weight", &report.aggregate.total_weight.normalize().to_string()));

        let labels = report.aggregate.labels_by_frequency();
        if !labels.is_empty() {
            out.push_str(&format!("\n{}\n", style("Label distribution:").green()));
            for (label, count) in labels {
                out.push_str(&format!("  • {label}: {count}\n"));
            }
        }

        out.push_str(&judgement_table(&report.judgement_summary));
        out
    }
}

fn metadata(metadata: &Metadata) -> String {
    if metadata.is_empty() {
        return String::new();
    }

    let mut out = section("Metadata");
    for (key, value) in metadata.iter() {
        match value {
            Value::Object(entries) => {
                out.push_str(&format!("{}\n", style(format!("{key}:")).green()));
                for (sub_key, sub_value) in entries {
                    out.push_str(&format!("  • {sub_key}: {}\n", display_scalar(sub_value)));
                }
            }
            other => out.push_str(&field(key, &display_scalar(other))),
        }
    }
    out
}

/// Rubric count, weight total and label distribution (sorted by label)
pub fn statistics(stats: &Statistics) -> String {
    let mut out = section("Statistics");
    out.push_str(&field("Rubrics", &stats.total_rubrics.to_string()));
    out.push_str(&field("Total weight", &stats.total_weight.normalize().to_string()));

    if !stats.label_distribution.is_empty() {
        out.push_str(&format!("\n{}\n", style("Label distribution:").green()));
        for (label, count) in &stats.label_distribution {
            out.push_str(&format!("  • {label}: {count}\n"));
        }
    }
    out
}

fn judgement_table(summary: &JudgementSummary) -> String {
    if summary.is_empty() {
        return String::new();
    }

    let mut out = format!("\n{}\n", style("Judgements:").green());
    out.push_str(&format!(
        "  {:<12} {:>7} {:>7} {:>7} {:>9}\n",
        "model", "judged", "scored", "passed", "pass rate"
    ));
    for (model, tally) in summary.iter() {
        let rate = tally
            .pass_rate()
            .map(|rate| format!("{:.1}%", rate * 100.0))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:<12} {:>7} {:>7} {:>7} {:>9}\n",
            model, tally.judged, tally.scored, tally.passed, rate
        ));
    }
    out
}

fn file_info(file: &FileInfo) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", style("File:").blue(), file.name));
    out.push_str(&format!("{} {}\n", style("Path:").blue(), file.path.display()));
    out.push_str(&format!("{} {}\n", style("Size:").blue(), readable_size(file.size)));
    out.push_str(&format!("{} {}\n", style("Modified:").blue(), file.modified_display()));
    out
}

fn header(text: &str) -> String {
    format!(
        "{}{}\n{}",
        separator('═', WIDE),
        style(format!("  {text}")).bold().blue(),
        separator('═', WIDE)
    )
}

fn section(title: &str) -> String {
    format!(
        "\n{}\n{}",
        style(format!("▶ {title}")).bold().yellow(),
        separator('─', NARROW)
    )
}

fn separator(ch: char, width: usize) -> String {
    format!("{}\n", style(ch.to_string().repeat(width)).cyan())
}

fn field(key: &str, value: &str) -> String {
    format!("{} {}\n", style(format!("{key}:")).green(), value)
}

/// Strings print bare, everything else as JSON text
fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// `model1` → `Model1`
fn model_title(model: &str) -> String {
    let mut chars = model.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// First `limit` characters followed by `...` when the text is longer
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
