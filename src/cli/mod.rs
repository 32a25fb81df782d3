//! Command-line interface for evalview
//!
//! Argument parsing with clap derive; each subcommand lives in its own
//! module under [`commands`] and returns `anyhow::Result`.

pub mod commands;
pub mod output;

pub use commands::Cli;
pub use output::Output;
