use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

use crate::batch::{BatchProcessor, BatchReport};
use crate::cli::Output;
use crate::config::core::cli_overrides;
use crate::config::{ConfigLoader, ExecutionMode, ViewerConfig};
use crate::scanner::{FileInfo, Scanner};

pub mod config;
pub mod html;
pub mod scan;
pub mod serve;
pub mod show;
pub mod stats;
pub mod version;

#[derive(Parser)]
#[command(
    name = "evalview",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect rubric-scored JSON evaluation records",
    long_about = "evalview normalizes heterogeneous JSON evaluation records into metadata, \
                  content and rubrics, and aggregates rubric weights, labels and model \
                  judgements across a corpus."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory, map every document and print a summary
    Scan(scan::ScanArgs),
    /// Show the full view of one document
    Show(show::ShowArgs),
    /// Print cross-document statistics
    Stats(stats::StatsArgs),
    /// Write a self-contained HTML report
    Html(html::HtmlArgs),
    /// Run the upload-and-view web server
    Serve(serve::ServeArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show version information
    Version(version::VersionArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let custom_config = self.config.as_deref();

        match self.command {
            Some(Commands::Scan(args)) => scan::execute(args, custom_config, &output).await,
            Some(Commands::Show(args)) => show::execute(args, custom_config, &output).await,
            Some(Commands::Stats(args)) => stats::execute(args, custom_config, &output).await,
            Some(Commands::Html(args)) => html::execute(args, custom_config, &output).await,
            Some(Commands::Serve(args)) => serve::execute(args, custom_config, &output).await,
            Some(Commands::Config(args)) => config::execute(args, custom_config).await,
            Some(Commands::Version(args)) => version::execute(args).await,
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            return tracing_subscriber::EnvFilter::new("error");
        }
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // A subscriber may already be installed when running inside tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Corpus selection shared by the scanning commands
#[derive(Args, Debug, Clone, Default)]
pub struct CorpusArgs {
    /// Directory holding the JSON documents [default: scanner.root]
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Glob pattern to exclude, relative to the root (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// How documents are mapped
    #[arg(long, value_enum)]
    pub mode: Option<ExecutionMode>,
}

impl CorpusArgs {
    fn overrides(&self) -> Option<serde_json::Value> {
        cli_overrides(&[
            ("scanner", "root", self.root.as_ref().map(|root| json!(root))),
            (
                "scanner",
                "exclude",
                (!self.exclude.is_empty()).then(|| json!(self.exclude)),
            ),
            ("batch", "mode", self.mode.map(|mode| json!(mode))),
        ])
    }

    /// Load configuration with these arguments layered on top
    pub fn settings(&self, custom_config: Option<&str>) -> Result<ViewerConfig> {
        ConfigLoader::load_with(custom_config, self.overrides())?.settings()
    }
}

/// A discovered corpus ready to be mapped
pub struct Corpus {
    pub config: ViewerConfig,
    pub scanner: Scanner,
    pub files: Vec<FileInfo>,
}

impl Corpus {
    pub fn discover(args: &CorpusArgs, custom_config: Option<&str>) -> Result<Self> {
        let config = args.settings(custom_config)?;
        let scanner = Scanner::new(config.scanner.clone())?;
        let files = scanner.discover()?;
        Ok(Self {
            config,
            scanner,
            files,
        })
    }

    pub fn processor(&self) -> BatchProcessor {
        BatchProcessor::new(self.config.mapping.mapper(), self.config.batch.clone())
    }

    /// Load and map every discovered file
    pub fn map_all(&self) -> Result<BatchReport> {
        let sources = self.scanner.load_all(&self.files);
        self.processor().process(sources)
    }

    /// Warn about an empty corpus; returns true when there is nothing to do
    pub fn report_if_empty(&self, output: &Output) -> bool {
        if !self.files.is_empty() {
            return false;
        }
        output.warning("No JSON files found");
        output.info(&format!(
            "Put JSON files in {}",
            self.scanner.root().display()
        ));
        true
    }
}
