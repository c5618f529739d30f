//! Core data models used throughout Repo Insight.
//!
//! These types represent the remote entries, selected files, skip records,
//! and chunks that flow through the ingestion and retrieval pipeline.

use serde::Serialize;
use std::fmt;

/// Kind of an entry returned by a directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, submodules and anything else the walker ignores.
    Other,
}

/// One entry of a remote directory listing.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Declared size in bytes as reported by the listing.
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RemoteEntry {
    pub fn file(path: &str, size: u64) -> Self {
        Self {
            name: file_name(path).to_string(),
            path: path.to_string(),
            kind: EntryKind::File,
            size,
            url: None,
        }
    }

    pub fn dir(path: &str) -> Self {
        Self {
            name: file_name(path).to_string(),
            path: path.to_string(),
            kind: EntryKind::Dir,
            size: 0,
            url: None,
        }
    }
}

/// Reference to an issue created on the remote host.
#[derive(Debug, Clone, Serialize)]
pub struct IssueRef {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    pub url: String,
}

/// A selected source file with its full content.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub name: String,
    /// Unique within one repository snapshot.
    pub path: String,
    pub content: String,
    /// File extension without the dot (e.g. `"py"`).
    pub language: String,
    /// Repository full name (`owner/repo`).
    pub repo: String,
}

impl FileRecord {
    pub fn new(path: &str, content: String, repo: &str) -> Self {
        let name = file_name(path);
        Self {
            name: name.to_string(),
            path: path.to_string(),
            content,
            language: language_of(name),
            repo: repo.to_string(),
        }
    }
}

/// Why a file was left out of the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipKind {
    TooLarge,
    FetchError { message: String },
}

/// A file the selector saw but did not keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipReason {
    pub path: String,
    #[serde(flatten)]
    pub kind: SkipKind,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SkipKind::TooLarge => write!(f, "{} (too large)", self.path),
            SkipKind::FetchError { message } => write!(f, "{} (error: {})", self.path, message),
        }
    }
}

/// Result of considering one candidate file during the walk.
#[derive(Debug, Clone)]
pub enum Outcome {
    Selected(FileRecord),
    Skipped(SkipReason),
}

/// Provenance attached to every chunk.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkMetadata {
    pub file_name: String,
    pub file_path: String,
    pub language: String,
    pub repo: String,
}

impl From<&FileRecord> for ChunkMetadata {
    fn from(file: &FileRecord) -> Self {
        Self {
            file_name: file.name.clone(),
            file_path: file.path.clone(),
            language: file.language.clone(),
            repo: file.repo.clone(),
        }
    }
}

/// A window of a file's content, ready for embedding.
#[derive(Debug, Clone, Serialize)]
pub struct Chunk {
    pub id: String,
    pub chunk_index: i64,
    /// Character offset of the window within the file content.
    pub start: usize,
    pub text: String,
    pub hash: String,
    pub metadata: ChunkMetadata,
}

/// Last path segment.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Language tag derived from the file extension.
///
/// Mirrors a plain split on `.`: a name without a dot yields the whole name.
pub fn language_of(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_record_derives_name_and_language() {
        let rec = FileRecord::new("src/app.py", "print(1)".into(), "octo/demo");
        assert_eq!(rec.name, "app.py");
        assert_eq!(rec.language, "py");
        assert_eq!(rec.repo, "octo/demo");
    }

    #[test]
    fn test_language_uses_last_extension() {
        assert_eq!(language_of("component.test.tsx"), "tsx");
        assert_eq!(language_of("Makefile"), "Makefile");
    }

    #[test]
    fn test_skip_reason_display() {
        let too_large = SkipReason {
            path: "big.py".into(),
            kind: SkipKind::TooLarge,
        };
        assert_eq!(too_large.to_string(), "big.py (too large)");

        let failed = SkipReason {
            path: "lib/x.rs".into(),
            kind: SkipKind::FetchError {
                message: "404 Not Found".into(),
            },
        };
        assert_eq!(failed.to_string(), "lib/x.rs (error: 404 Not Found)");
    }
}
