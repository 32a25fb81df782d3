//! Normalization and aggregation engine
//!
//! Pure functions from parsed JSON documents to a fixed reporting shape:
//!
//! - [`flatten`] turns nested objects into dotted-path maps
//! - [`mapper`] extracts metadata, content and rubrics from one document
//! - [`aggregate`] computes per-document statistics and merges them across documents
//! - [`rubric`] gives typed read access to untyped rubric records
//!
//! Nothing here performs I/O or holds shared state, so documents can be
//! mapped on any number of threads and their statistics reduced afterwards.

pub mod aggregate;
pub mod flatten;
pub mod mapper;
pub mod rubric;

// Re-export main types for easier access
pub use aggregate::{
    AggregateStatistics, JudgementSummary, ModelTally, Statistics, calculate_statistics,
    merge_statistics, summarize_judgements,
};
pub use flatten::{Flattened, flatten};
pub use mapper::{
    CONTENT_FIELDS, Content, METADATA_FIELDS, MappedDocument, Mapper, Metadata, extract_rubrics,
    map_document,
};
pub use rubric::{Judgement, RubricView};
