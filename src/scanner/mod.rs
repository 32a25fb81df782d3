//! Corpus scanner: finds document files under a root and loads them as
//! `(identifier, parsed JSON)` pairs for the batch processor.

pub mod core;
pub mod types;

// Re-export main types for easier access
pub use core::load_document;
pub use types::{FileInfo, Scanner, readable_size};
