use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::{Corpus, CorpusArgs};
use crate::cli::Output;
use crate::reports::HtmlReport;

#[derive(Args)]
pub struct HtmlArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Output file [default: report.html_output]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub async fn execute(args: HtmlArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let corpus = Corpus::discover(&args.corpus, custom_config)?;
    if corpus.report_if_empty(output) {
        return Ok(());
    }

    let report = corpus.map_all()?;
    let target = args
        .output
        .unwrap_or_else(|| corpus.config.report.html_output.clone());

    HtmlReport::new(&corpus.config.report)
        .write(&report, &target)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    output.success(&format!(
        "HTML report for {} documents written to {}",
        report.total,
        target.display()
    ));
    Ok(())
}
