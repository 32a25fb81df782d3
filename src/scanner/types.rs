use chrono::{DateTime, Local};
use globset::GlobSet;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::ScannerConfig;

/// A discovered document file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    pub path: PathBuf,
    /// Path relative to the scan root with `/` separators; used as the document identifier
    pub relative_path: String,
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
}

impl FileInfo {
    /// Size as `"{n} B"` up to 1 KiB, `"{n:.2} KB"` above
    pub fn size_readable(&self) -> String {
        readable_size(self.size)
    }

    pub fn modified_display(&self) -> String {
        self.modified
            .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

pub fn readable_size(size: u64) -> String {
    if size > 1024 {
        format!("{:.2} KB", size as f64 / 1024.0)
    } else {
        format!("{size} B")
    }
}

/// Corpus scanner - discovers and loads documents under a root directory
///
/// NOTE: All scanner-related types live here; behavior lives in core.rs.
#[derive(Debug, Clone)]
pub struct Scanner {
    pub(crate) config: ScannerConfig,
    pub(crate) exclude: GlobSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readable_size() {
        assert_eq!(readable_size(0), "0 B");
        assert_eq!(readable_size(1024), "1024 B");
        assert_eq!(readable_size(1536), "1.50 KB");
        assert_eq!(readable_size(10 * 1024 * 1024), "10240.00 KB");
    }

    #[test]
    fn test_modified_display_without_time() {
        let info = FileInfo {
            path: PathBuf::from("data/a.json"),
            relative_path: "a.json".to_string(),
            name: "a.json".to_string(),
            size: 12,
            modified: None,
        };
        assert_eq!(info.modified_display(), "unknown");
        assert_eq!(info.size_readable(), "12 B");
    }
}
