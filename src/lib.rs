//! # evalview
//!
//! Normalize heterogeneous JSON evaluation records into a fixed shape
//! (metadata, content, rubrics, statistics) and aggregate rubric data across
//! a corpus.
//!
//! ```
//! use evalview::engine::map_document;
//!
//! let doc = serde_json::json!({
//!     "uid": "x1",
//!     "rubrics": [{ "label": "a", "weight": 2 }, { "weight": 1 }]
//! });
//! let mapped = map_document(&doc);
//! assert_eq!(mapped.statistics.total_rubrics, 2);
//! assert_eq!(mapped.statistics.total_weight.to_string(), "3");
//! ```
//!
//! The binary wraps the engine with a directory scanner, terminal/HTML/JSON
//! reports and an upload endpoint.

pub mod batch;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod parallel;
pub mod reports;
pub mod scanner;
pub mod server;

pub use cli::{Cli, Output};
pub use config::ViewerConfig;

/// Result type alias for evalview operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
