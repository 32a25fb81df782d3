//! Renderers for mapped documents and batch results

pub mod highlight;
pub mod html;
pub mod json;
pub mod text;

pub use html::HtmlReport;
pub use text::TextReport;

/// Output format for the report-producing commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}
