use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use globset::{Glob, GlobSetBuilder};
use ignore::WalkBuilder;
use std::borrow::Cow;
use std::path::{Component, Path};

use super::types::{FileInfo, Scanner};
use crate::batch::SourceDocument;
use crate::config::ScannerConfig;
use crate::error::{DocumentError, decode_document};

impl Scanner {
    pub fn new(config: ScannerConfig) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.exclude {
            let glob = Glob::new(pattern)
                .with_context(|| format!("Invalid exclude pattern: {pattern}"))?;
            builder.add(glob);
        }
        let exclude = builder.build().context("Failed to build exclude patterns")?;

        Ok(Self { config, exclude })
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Walk the root and return every document file, sorted by relative path.
    ///
    /// A missing or unreadable root fails the whole scan; errors on individual
    /// entries are logged and skipped.
    pub fn discover(&self) -> Result<Vec<FileInfo>> {
        let root = self.root();
        if !root.exists() {
            anyhow::bail!("Directory {} does not exist", root.display());
        }
        if !root.is_dir() {
            anyhow::bail!("{} is not a directory", root.display());
        }

        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth);
        if self.config.respect_gitignore {
            builder
                .ignore(true)
                .git_ignore(true)
                .git_exclude(true)
                .require_git(false);
        }

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walk error under {}: {}", root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            if !self.has_document_extension(path) {
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(path);
            if self.exclude.is_match(relative) {
                tracing::debug!("Excluded {}", relative.display());
                continue;
            }

            match file_info(path, relative) {
                Ok(info) => files.push(info),
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        tracing::debug!("Discovered {} document files under {}", files.len(), root.display());
        Ok(files)
    }

    fn has_document_extension(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.config
            .extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.') == extension)
    }

    /// Describe a single file, relative to the root when it lies under it
    pub fn describe(&self, path: &Path) -> Result<FileInfo> {
        let relative = path.strip_prefix(self.root()).unwrap_or(path);
        file_info(path, relative)
    }

    /// Read and decode every file; failures stay attached to their document
    pub fn load_all(&self, files: &[FileInfo]) -> Vec<SourceDocument> {
        files
            .iter()
            .map(|file| SourceDocument {
                identifier: file.relative_path.clone(),
                file: Some(file.clone()),
                payload: load_document(&file.path),
            })
            .collect()
    }
}

/// Read and parse one document file
pub fn load_document(path: &Path) -> Result<serde_json::Value, DocumentError> {
    let bytes = std::fs::read(path)?;
    decode_document(&bytes)
}

fn file_info(path: &Path, relative: &Path) -> Result<FileInfo> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?;
    let modified = metadata.modified().ok().map(DateTime::<Local>::from);

    let relative_path = relative
        .components()
        .map(|component| match component {
            Component::RootDir => Cow::Borrowed(""),
            other => other.as_os_str().to_string_lossy(),
        })
        .collect::<Vec<_>>()
        .join("/");
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| relative_path.clone());

    Ok(FileInfo {
        path: path.to_path_buf(),
        relative_path,
        name,
        size: metadata.len(),
        modified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner_for(root: &Path) -> Scanner {
        Scanner::new(ScannerConfig {
            root: root.to_path_buf(),
            ..ScannerConfig::default()
        })
        .unwrap()
    }

    fn corpus() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("sample_2/nested")).unwrap();
        fs::write(root.join("b.json"), r#"{"uid": "b"}"#).unwrap();
        fs::write(root.join("a.JSON"), r#"{"uid": "a"}"#).unwrap();
        fs::write(root.join("notes.txt"), "not a document").unwrap();
        fs::write(root.join("sample_2/case.json"), r#"{"uid": "case"}"#).unwrap();
        fs::write(root.join("sample_2/nested/broken.json"), r#"{"uid": "#).unwrap();
        temp_dir
    }

    #[test]
    fn test_discover_finds_json_recursively_sorted() {
        let temp_dir = corpus();
        let files = scanner_for(temp_dir.path()).discover().unwrap();

        let ids: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(
            ids,
            vec!["b.json", "sample_2/case.json", "sample_2/nested/broken.json"]
        );
        assert_eq!(files[1].name, "case.json");
        assert_eq!(files[0].size, r#"{"uid": "b"}"#.len() as u64);
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let temp_dir = corpus();
        let files = scanner_for(temp_dir.path()).discover().unwrap();
        assert!(files.iter().all(|f| f.name != "a.JSON"));

        let scanner = Scanner::new(ScannerConfig {
            root: temp_dir.path().to_path_buf(),
            extensions: vec!["JSON".to_string()],
            ..ScannerConfig::default()
        })
        .unwrap();
        let upper: Vec<String> = scanner
            .discover()
            .unwrap()
            .into_iter()
            .map(|f| f.relative_path)
            .collect();
        assert_eq!(upper, vec!["a.JSON"]);
    }

    #[test]
    fn test_exclude_patterns() {
        let temp_dir = corpus();
        let scanner = Scanner::new(ScannerConfig {
            root: temp_dir.path().to_path_buf(),
            exclude: vec!["sample_2/nested/**".to_string()],
            ..ScannerConfig::default()
        })
        .unwrap();

        let files = scanner.discover().unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| !f.relative_path.contains("nested")));
    }

    #[test]
    fn test_max_depth_limits_walk() {
        let temp_dir = corpus();
        let scanner = Scanner::new(ScannerConfig {
            root: temp_dir.path().to_path_buf(),
            max_depth: Some(1),
            ..ScannerConfig::default()
        })
        .unwrap();

        let files = scanner.discover().unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = scanner_for(&temp_dir.path().join("missing"));
        let err = scanner.discover().unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let result = Scanner::new(ScannerConfig {
            exclude: vec!["[".to_string()],
            ..ScannerConfig::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_load_all_keeps_failures_per_document() {
        let temp_dir = corpus();
        let scanner = scanner_for(temp_dir.path());
        let files = scanner.discover().unwrap();
        let documents = scanner.load_all(&files);

        assert_eq!(documents.len(), 3);
        assert!(documents[0].payload.is_ok());
        let broken = &documents[2];
        assert_eq!(broken.identifier, "sample_2/nested/broken.json");
        assert!(matches!(broken.payload, Err(DocumentError::Decode(_))));
    }

    #[test]
    fn test_describe_inside_and_outside_root() {
        let temp_dir = corpus();
        let scanner = scanner_for(&temp_dir.path().join("sample_2"));

        let inside = scanner
            .describe(&temp_dir.path().join("sample_2/case.json"))
            .unwrap();
        assert_eq!(inside.relative_path, "case.json");

        let outside_path = temp_dir.path().join("b.json");
        let outside = scanner.describe(&outside_path).unwrap();
        assert_eq!(outside.name, "b.json");
        assert!(outside.relative_path.ends_with("b.json"));
        assert!(scanner.describe(&temp_dir.path().join("gone.json")).is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_document(&temp_dir.path().join("gone.json")).unwrap_err();
        assert!(matches!(err, DocumentError::Io(_)));
    }
}
