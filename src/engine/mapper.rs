//! Maps one parsed document onto the fixed metadata / content / rubrics /
//! statistics shape.
//!
//! The recognized field lists are a schema by convention: fields outside them
//! are ignored, and fields that are missing or of an unexpected type simply
//! produce a smaller result. Mapping never fails.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::aggregate::{JudgementSummary, Statistics, calculate_statistics, summarize_judgements};
use super::flatten::{Flattened, flatten};

/// Fields reported as document metadata
pub const METADATA_FIELDS: [&str; 7] = [
    "uid",
    "case_id",
    "client_id",
    "type",
    "category",
    "domain",
    "scene",
];

/// Fields reported as document content
pub const CONTENT_FIELDS: [&str; 3] = ["prompt", "example_answer_reference", "system_prompt"];

/// Field holding the rubric list
pub const RUBRICS_FIELD: &str = "rubrics";

/// Recognized metadata fields; object values are stored flattened
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(pub Map<String, Value>);

impl Metadata {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Single-level view with object fields expanded under their field name,
    /// e.g. `scene.env`
    pub fn flattened(&self) -> Flattened {
        flatten(&Value::Object(self.0.clone()), "")
    }
}

/// Recognized content fields, copied verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Content(pub Map<String, Value>);

impl Content {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Normalized view of one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappedDocument {
    pub metadata: Metadata,
    pub content: Content,
    pub rubrics: Vec<Value>,
    pub statistics: Statistics,
    pub judgement_summary: JudgementSummary,
}

/// Document mapper configured with the recognized field lists
#[derive(Debug, Clone, PartialEq)]
pub struct Mapper {
    metadata_fields: Vec<String>,
    content_fields: Vec<String>,
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new(
            METADATA_FIELDS.iter().map(|f| f.to_string()).collect(),
            CONTENT_FIELDS.iter().map(|f| f.to_string()).collect(),
        )
    }
}

impl Mapper {
    pub fn new(metadata_fields: Vec<String>, content_fields: Vec<String>) -> Self {
        Self {
            metadata_fields,
            content_fields,
        }
    }

    /// Map a document into all of its views
    pub fn map_document(&self, doc: &Value) -> MappedDocument {
        let rubrics = extract_rubrics(doc);
        let statistics = calculate_statistics(&rubrics);
        let judgement_summary = summarize_judgements(&rubrics);

        MappedDocument {
            metadata: self.extract_metadata(doc),
            content: self.extract_content(doc),
            rubrics,
            statistics,
            judgement_summary,
        }
    }

    pub fn extract_metadata(&self, doc: &Value) -> Metadata {
        let mut metadata = Map::new();

        for field in &self.metadata_fields {
            let Some(value) = doc.get(field.as_str()) else {
                continue;
            };
            let stored = match value {
                Value::Object(_) => Value::Object(flatten(value, "")),
                other => other.clone(),
            };
            metadata.insert(field.clone(), stored);
        }

        Metadata(metadata)
    }

    pub fn extract_content(&self, doc: &Value) -> Content {
        let content = self
            .content_fields
            .iter()
            .filter_map(|field| {
                doc.get(field.as_str())
                    .map(|value| (field.clone(), value.clone()))
            })
            .collect();

        Content(content)
    }
}

/// The `rubrics` array verbatim, or empty when absent or not an array
pub fn extract_rubrics(doc: &Value) -> Vec<Value> {
    match doc.get(RUBRICS_FIELD) {
        Some(Value::Array(rubrics)) => rubrics.clone(),
        _ => Vec::new(),
    }
}

/// Map a document with the default field lists
pub fn map_document(doc: &Value) -> MappedDocument {
    Mapper::default().map_document(doc)
}
