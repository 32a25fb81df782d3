//! Batch mapping of many documents
//!
//! Documents are mapped independently (in parallel for large batches) and
//! their statistics are reduced only after every result is in. A document
//! that failed to load becomes a failed entry; it never stops the batch.

pub mod types;

use anyhow::Result;
use rayon::prelude::*;

use crate::config::{BatchConfig, ExecutionMode};
use crate::engine::{JudgementSummary, Mapper, Statistics};
use crate::error::decode_document;
use crate::parallel::ExecutionStrategy;

pub use types::{
    BatchReport, DocumentResult, FailedEntry, MappedEntry, SourceDocument, UploadResponse,
    UploadedFile,
};

/// Maps batches of documents with a configured mapper and execution policy
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    mapper: Mapper,
    config: BatchConfig,
}

impl BatchProcessor {
    pub fn new(mapper: Mapper, config: BatchConfig) -> Self {
        Self { mapper, config }
    }

    /// Pick sequential or parallel execution for `document_count` documents
    pub fn strategy_for(&self, document_count: usize) -> ExecutionStrategy {
        let max_workers = ExecutionStrategy::calculate_optimal_workers(
            self.config.max_threads,
            self.config.thread_percentage,
        );

        match self.config.mode {
            ExecutionMode::Sequential => ExecutionStrategy::Sequential,
            ExecutionMode::Parallel => ExecutionStrategy::Parallel {
                workers: max_workers,
            },
            ExecutionMode::Auto => ExecutionStrategy::auto(
                document_count,
                self.config.min_documents_for_parallel,
                max_workers,
            ),
        }
    }

    /// Map every source document and aggregate the successful ones
    pub fn process(&self, sources: Vec<SourceDocument>) -> Result<BatchReport> {
        let strategy = self.strategy_for(sources.len());
        tracing::debug!(
            documents = sources.len(),
            workers = strategy.worker_count(),
            "Mapping batch"
        );

        let documents = strategy.execute(sources, |source, _worker_id| self.map_source(source))?;
        Ok(summarize(documents))
    }

    fn map_source(&self, source: &SourceDocument) -> DocumentResult {
        match &source.payload {
            Ok(document) => DocumentResult::Mapped(MappedEntry {
                identifier: source.identifier.clone(),
                success: true,
                size: source.file.as_ref().map(|file| file.size),
                file: source.file.clone(),
                document: self.mapper.map_document(document),
            }),
            Err(error) => {
                tracing::warn!(
                    identifier = %source.identifier,
                    kind = error.kind(),
                    "Skipping document: {}",
                    error
                );
                DocumentResult::Failed(FailedEntry {
                    identifier: source.identifier.clone(),
                    success: false,
                    file: source.file.clone(),
                    error: error.to_string(),
                })
            }
        }
    }

    /// Handle an upload: skip files not named `*.json`, decode and map the rest
    pub fn process_upload(&self, files: Vec<UploadedFile>) -> Result<UploadResponse> {
        let total = files.len();
        let mut sizes = Vec::new();
        let sources: Vec<SourceDocument> = files
            .into_iter()
            .filter(|file| {
                let keep = file.filename.ends_with(".json");
                if !keep {
                    tracing::debug!("Ignoring non-JSON upload {}", file.filename);
                }
                keep
            })
            .map(|file| {
                sizes.push(file.bytes.len() as u64);
                match decode_document(&file.bytes) {
                    Ok(document) => SourceDocument::parsed(file.filename, document),
                    Err(error) => SourceDocument::failed(file.filename, error),
                }
            })
            .collect();

        let mut report = self.process(sources)?;
        for (result, size) in report.documents.iter_mut().zip(sizes) {
            if let DocumentResult::Mapped(entry) = result {
                entry.size = Some(size);
            }
        }

        Ok(UploadResponse {
            total,
            success: report.success,
            results: report.documents,
            aggregate: report.aggregate,
            judgement_summary: report.judgement_summary,
        })
    }
}

/// Reduce per-document results into a batch report
pub fn summarize(documents: Vec<DocumentResult>) -> BatchReport {
    let mapped: Vec<_> = documents.iter().filter_map(DocumentResult::mapped).collect();

    let aggregate = mapped
        .par_iter()
        .map(|doc| doc.statistics.clone())
        .reduce(Statistics::default, Statistics::merge);
    let judgement_summary = mapped
        .par_iter()
        .map(|doc| doc.judgement_summary.clone())
        .reduce(JudgementSummary::default, JudgementSummary::merge);

    BatchReport {
        total: documents.len(),
        success: mapped.len(),
        failed: documents.len() - mapped.len(),
        aggregate,
        judgement_summary,
        documents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::merge_statistics;
    use crate::error::DocumentError;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn upload(name: &str, body: &str) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            bytes: body.as_bytes().to_vec(),
        }
    }

    fn document(i: usize) -> serde_json::Value {
        json!({
            "uid": format!("u{i}"),
            "rubrics": [
                { "label": format!("l{}", i % 3), "weight": i, "model1_judgement": { "score": i % 2 } },
                { "weight": 0.1 }
            ]
        })
    }

    #[test]
    fn test_truncated_upload_does_not_affect_valid_one() {
        let processor = BatchProcessor::default();
        let response = processor
            .process_upload(vec![
                upload("good.json", r#"{"uid": "x1", "rubrics": [{"label": "a", "weight": 2}]}"#),
                upload("bad.json", r#"{"uid": "x2", "rubrics": [{"label""#),
            ])
            .unwrap();

        assert_eq!(response.total, 2);
        assert_eq!(response.success, 1);
        assert_eq!(response.results.len(), 2);

        let good = &response.results[0];
        assert!(good.is_success());
        assert_eq!(good.identifier(), "good.json");
        assert_eq!(good.mapped().unwrap().statistics.total_weight, Decimal::from(2));

        let bad = &response.results[1];
        assert!(!bad.is_success());
        assert!(!bad.error().unwrap().is_empty());

        assert_eq!(response.aggregate.total_rubrics, 1);
    }

    #[test]
    fn test_upload_skips_non_json_names_but_counts_them() {
        let processor = BatchProcessor::default();
        let response = processor
            .process_upload(vec![
                upload("notes.txt", "{}"),
                upload("case.json", r#"{"uid": "c"}"#),
                upload("case.JSON.bak", "{}"),
                upload("UPPER.JSON", "{}"),
            ])
            .unwrap();

        assert_eq!(response.total, 4);
        assert_eq!(response.success, 1);
        assert_eq!(response.results.len(), 1);
    }

    #[test]
    fn test_upload_response_json_shape() {
        let processor = BatchProcessor::default();
        let body = r#"{"uid": "x1", "rubrics": []}"#;
        let response = processor
            .process_upload(vec![upload("a.json", body), upload("b.json", "{")])
            .unwrap();
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["total"], 2);
        assert_eq!(value["success"], 1);
        assert_eq!(value["results"][0]["identifier"], "a.json");
        assert_eq!(value["results"][0]["success"], true);
        assert_eq!(value["results"][0]["size"], body.len());
        assert_eq!(value["results"][0]["metadata"]["uid"], "x1");
        assert_eq!(value["results"][0]["statistics"]["total_rubrics"], 0);
        assert_eq!(value["results"][1]["success"], false);
        assert!(value["results"][1]["error"].as_str().unwrap().starts_with("JSON decode error"));
        assert!(value["results"][1].get("metadata").is_none());
    }

    #[test]
    fn test_process_reports_failures_alongside_successes() {
        let processor = BatchProcessor::default();
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let report = processor
            .process(vec![
                SourceDocument::parsed("one", document(1)),
                SourceDocument::failed("two", DocumentError::from(io_error)),
                SourceDocument::parsed("three", document(3)),
            ])
            .unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(report.success, 2);
        assert_eq!(report.failed, 1);
        let identifiers: Vec<&str> = report.documents.iter().map(|d| d.identifier()).collect();
        assert_eq!(identifiers, vec!["one", "two", "three"]);
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.documents[1].error(), Some("file read error: denied"));
        assert_eq!(report.aggregate.total_rubrics, 4);
        assert_eq!(report.aggregate.total_weight, Decimal::new(42, 1));
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let sources = || -> Vec<SourceDocument> {
            (0..100)
                .map(|i| SourceDocument::parsed(format!("doc-{i}"), document(i)))
                .collect()
        };

        let sequential = BatchProcessor::new(
            Mapper::default(),
            BatchConfig {
                mode: ExecutionMode::Sequential,
                ..BatchConfig::default()
            },
        )
        .process(sources())
        .unwrap();
        let parallel = BatchProcessor::new(
            Mapper::default(),
            BatchConfig {
                mode: ExecutionMode::Parallel,
                max_threads: 4,
                thread_percentage: 100,
                ..BatchConfig::default()
            },
        )
        .process(sources())
        .unwrap();

        assert_eq!(sequential.aggregate, parallel.aggregate);
        assert_eq!(sequential.judgement_summary, parallel.judgement_summary);
        assert_eq!(sequential.aggregate.total_rubrics, 200);
        assert_eq!(sequential.aggregate.total_weight, Decimal::from(4960));

        let chunked = parallel
            .documents
            .chunks(7)
            .map(|chunk| summarize(chunk.to_vec()).aggregate)
            .collect::<Vec<_>>();
        assert_eq!(merge_statistics(chunked.iter().rev()), sequential.aggregate);

        let seq_ids: Vec<&str> = sequential.documents.iter().map(|d| d.identifier()).collect();
        let par_ids: Vec<&str> = parallel.documents.iter().map(|d| d.identifier()).collect();
        assert_eq!(seq_ids, par_ids);
    }

    #[test]
    fn test_strategy_selection() {
        let auto = BatchProcessor::new(
            Mapper::default(),
            BatchConfig {
                min_documents_for_parallel: 10,
                ..BatchConfig::default()
            },
        );
        assert_eq!(auto.strategy_for(3), ExecutionStrategy::Sequential);

        let sequential = BatchProcessor::new(
            Mapper::default(),
            BatchConfig {
                mode: ExecutionMode::Sequential,
                ..BatchConfig::default()
            },
        );
        assert_eq!(sequential.strategy_for(10_000), ExecutionStrategy::Sequential);
    }

    #[test]
    fn test_empty_batch() {
        let report = BatchProcessor::default().process(Vec::new()).unwrap();
        assert_eq!(report.total, 0);
        assert_eq!(report.aggregate, Statistics::default());
        assert!(report.judgement_summary.is_empty());
    }
}
