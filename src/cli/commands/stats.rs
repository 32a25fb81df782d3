use anyhow::Result;
use clap::Args;

use super::{Corpus, CorpusArgs};
use crate::cli::Output;
use crate::reports::{ReportFormat, TextReport, json};

#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

pub async fn execute(args: StatsArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let corpus = Corpus::discover(&args.corpus, custom_config)?;
    if args.format == ReportFormat::Text && corpus.report_if_empty(output) {
        return Ok(());
    }

    let report = corpus.map_all()?;
    match args.format {
        ReportFormat::Json => output.emit(&json::statistics(&report, corpus.scanner.root())?),
        ReportFormat::Text => {
            output.emit(&TextReport::new(&corpus.config.report).summary(&report));
        }
    }

    Ok(())
}
