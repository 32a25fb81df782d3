use anyhow::{Result, bail};
use clap::Args;
use std::path::PathBuf;

use super::{Corpus, CorpusArgs};
use crate::batch::SourceDocument;
use crate::cli::Output;
use crate::reports::{ReportFormat, TextReport, json};
use crate::scanner::{FileInfo, load_document};

#[derive(Args)]
pub struct ShowArgs {
    /// 1-based index from the `scan` listing, or a path to a document
    #[arg(value_name = "TARGET")]
    pub target: String,

    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

pub async fn execute(args: ShowArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let corpus = Corpus::discover(&args.corpus, custom_config)?;
    let file = select(&corpus, &args.target)?;
    tracing::debug!("Showing {}", file.path.display());

    let source = SourceDocument {
        identifier: file.relative_path.clone(),
        payload: load_document(&file.path),
        file: Some(file),
    };
    let report = corpus.processor().process(vec![source])?;
    let Some(result) = report.documents.first() else {
        bail!("No result for {}", args.target);
    };

    match args.format {
        ReportFormat::Json => output.emit(&json::document(result)?),
        ReportFormat::Text => output.emit(&TextReport::new(&corpus.config.report).document(result)),
    }

    Ok(())
}

/// Resolve a listing index, a path relative to the root, or any file path
fn select(corpus: &Corpus, target: &str) -> Result<FileInfo> {
    if let Ok(index) = target.parse::<usize>() {
        if index == 0 || index > corpus.files.len() {
            bail!(
                "Invalid selection {index}: expected 1..={} ({} files found)",
                corpus.files.len(),
                corpus.files.len()
            );
        }
        return Ok(corpus.files[index - 1].clone());
    }

    let normalized = target.trim_start_matches("./");
    if let Some(file) = corpus.files.iter().find(|f| f.relative_path == normalized) {
        return Ok(file.clone());
    }

    let path = PathBuf::from(target);
    let candidates = [path.clone(), corpus.scanner.root().join(&path)];
    match candidates.iter().find(|candidate| candidate.is_file()) {
        Some(found) => corpus.scanner.describe(found),
        None => bail!("No document matches {target}"),
    }
}
