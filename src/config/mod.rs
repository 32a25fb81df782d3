//! Configuration management for evalview
//!
//! Configuration is layered with figment (see [`core::ConfigLoader`]) and
//! extracted into the typed [`ViewerConfig`] below. Every section has
//! defaults matching `default-config.toml`, so partial files are fine.

pub mod core;
pub mod formats;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::{CONTENT_FIELDS, METADATA_FIELDS, Mapper};

pub use core::ConfigLoader;
pub use formats::ConfigFormat;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub scanner: ScannerConfig,
    pub mapping: MappingConfig,
    pub batch: BatchConfig,
    pub report: ReportConfig,
    pub server: ServerConfig,
}

/// Corpus discovery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Directory scanned for documents
    pub root: PathBuf,

    /// File extensions treated as documents (case-sensitive, no dot)
    pub extensions: Vec<String>,

    /// Glob patterns, relative to the root, excluded from the scan
    pub exclude: Vec<String>,

    pub follow_symlinks: bool,

    /// Honor .gitignore / .ignore files under the root
    pub respect_gitignore: bool,

    /// Maximum directory depth below the root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./data"),
            extensions: vec!["json".to_string()],
            exclude: vec![],
            follow_symlinks: false,
            respect_gitignore: false,
            max_depth: None,
        }
    }
}

/// Recognized-field lists used by the mapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub metadata_fields: Vec<String>,
    pub content_fields: Vec<String>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            metadata_fields: METADATA_FIELDS.iter().map(|f| f.to_string()).collect(),
            content_fields: CONTENT_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl MappingConfig {
    pub fn mapper(&self) -> Mapper {
        Mapper::new(self.metadata_fields.clone(), self.content_fields.clone())
    }
}

/// Execution mode for batch mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Parallel once the batch is large enough
    #[default]
    Auto,
    Parallel,
    Sequential,
}

/// Batch processing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub mode: ExecutionMode,

    /// Maximum worker threads (0 = no cap)
    pub max_threads: usize,

    /// Percentage of CPU cores to use (1-100)
    pub thread_percentage: u8,

    /// Documents needed before auto mode goes parallel
    pub min_documents_for_parallel: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Auto,
            max_threads: 0,
            thread_percentage: 75,
            min_documents_for_parallel: 32,
        }
    }
}

/// Rendering settings shared by the text and HTML reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    pub content_preview_chars: usize,
    pub description_preview_chars: usize,
    pub reason_preview_chars: usize,
    pub html_output: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "JSON Viewer".to_string(),
            content_preview_chars: 200,
            description_preview_chars: 150,
            reason_preview_chars: 100,
            html_output: PathBuf::from("json_viewer.html"),
        }
    }
}

/// Upload endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ViewerConfig {
    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.scanner.extensions.is_empty() {
            anyhow::bail!("scanner.extensions must list at least one extension");
        }
        if self.batch.thread_percentage == 0 || self.batch.thread_percentage > 100 {
            anyhow::bail!(
                "batch.thread_percentage must be between 1 and 100, got {}",
                self.batch.thread_percentage
            );
        }
        if self.server.port == 0 {
            anyhow::bail!("server.port cannot be 0");
        }
        Ok(())
    }
}
