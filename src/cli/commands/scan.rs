use anyhow::Result;
use clap::Args;
use std::time::Instant;

use super::{Corpus, CorpusArgs};
use crate::cli::Output;
use crate::reports::{ReportFormat, TextReport, json};

#[derive(Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

pub async fn execute(args: ScanArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let start = Instant::now();
    let corpus = Corpus::discover(&args.corpus, custom_config)?;
    if corpus.report_if_empty(output) {
        return Ok(());
    }

    let report = corpus.map_all()?;
    tracing::info!(
        documents = report.total,
        failed = report.failed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Scan complete"
    );

    match args.format {
        ReportFormat::Json => output.emit(&json::batch(&report, corpus.scanner.root())?),
        ReportFormat::Text => {
            output.success(&format!("Found {} JSON files", corpus.files.len()));
            if report.failed > 0 {
                output.warning(&format!("{} files could not be loaded", report.failed));
            }
            for failure in report.failures() {
                output.verbose(&format!(
                    "{}: {}",
                    failure.identifier(),
                    failure.error().unwrap_or_default()
                ));
            }
            output.blank_line();

            let text = TextReport::new(&corpus.config.report);
            output.emit(&text.file_list(&report));
            output.emit(&text.summary(&report));
        }
    }

    Ok(())
}
