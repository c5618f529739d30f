//! In-memory [`RemoteSource`] implementation for testing and offline use.
//!
//! Files are registered by path; directories are implied by path prefixes
//! and listed in registration order. Listing and read failures can be
//! injected per path, and every `list_dir` call is recorded so tests can
//! assert on traversal depth.

use std::sync::RwLock;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::models::{EntryKind, IssueRef, RemoteEntry};

use super::RemoteSource;

struct StoredFile {
    path: String,
    content: String,
    declared_size: Option<u64>,
}

/// In-memory code host.
pub struct InMemorySource {
    files: Vec<StoredFile>,
    failing_lists: Vec<String>,
    failing_reads: Vec<String>,
    list_calls: RwLock<Vec<String>>,
    read_calls: RwLock<Vec<String>>,
    issues: RwLock<Vec<IssueRef>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            failing_lists: Vec::new(),
            failing_reads: Vec::new(),
            list_calls: RwLock::new(Vec::new()),
            read_calls: RwLock::new(Vec::new()),
            issues: RwLock::new(Vec::new()),
        }
    }

    /// Register a file. Its declared size is its byte length.
    pub fn with_file(mut self, path: &str, content: impl Into<String>) -> Self {
        self.files.push(StoredFile {
            path: path.trim_matches('/').to_string(),
            content: content.into(),
            declared_size: None,
        });
        self
    }

    /// Register a file whose listing reports `size` instead of its real length.
    pub fn with_sized_file(mut self, path: &str, content: impl Into<String>, size: u64) -> Self {
        self.files.push(StoredFile {
            path: path.trim_matches('/').to_string(),
            content: content.into(),
            declared_size: Some(size),
        });
        self
    }

    /// Make `list_dir` fail for exactly this directory path.
    pub fn failing_list(mut self, path: &str) -> Self {
        self.failing_lists.push(path.trim_matches('/').to_string());
        self
    }

    /// Make `read_file` fail for exactly this file path.
    pub fn failing_read(mut self, path: &str) -> Self {
        self.failing_reads.push(path.trim_matches('/').to_string());
        self
    }

    /// Paths passed to `list_dir`, in call order.
    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.read().unwrap().clone()
    }

    /// Paths passed to `read_file`, in call order.
    pub fn read_calls(&self) -> Vec<String> {
        self.read_calls.read().unwrap().clone()
    }

    /// Issues created so far.
    pub fn issues(&self) -> Vec<IssueRef> {
        self.issues.read().unwrap().clone()
    }

    fn children(&self, dir: &str) -> Vec<RemoteEntry> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir)
        };

        let mut entries: Vec<RemoteEntry> = Vec::new();
        for f in &self.files {
            let rest = match f.path.strip_prefix(&prefix) {
                Some(r) if !r.is_empty() => r,
                _ => continue,
            };
            let entry = match rest.split_once('/') {
                Some((segment, _)) => RemoteEntry::dir(&format!("{}{}", prefix, segment)),
                None => RemoteEntry::file(
                    &f.path,
                    f.declared_size.unwrap_or(f.content.len() as u64),
                ),
            };
            let seen = entries
                .iter()
                .any(|e| e.path == entry.path && e.kind == entry.kind);
            if !seen {
                entries.push(entry);
            }
        }
        entries
    }
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteSource for InMemorySource {
    async fn list_dir(&self, _repo: &str, path: &str) -> Result<Vec<RemoteEntry>> {
        let path = path.trim_matches('/');
        self.list_calls.write().unwrap().push(path.to_string());

        if self.failing_lists.iter().any(|p| p == path) {
            bail!("listing failed for '{}'", path);
        }

        let entries = self.children(path);
        if entries.is_empty() && !path.is_empty() {
            bail!("Not Found: {}", path);
        }
        Ok(entries)
    }

    async fn read_file(&self, _repo: &str, path: &str) -> Result<String> {
        let path = path.trim_matches('/');
        self.read_calls.write().unwrap().push(path.to_string());

        if self.failing_reads.iter().any(|p| p == path) {
            bail!("read failed for '{}'", path);
        }

        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.content.clone())
            .ok_or_else(|| anyhow::anyhow!("Not Found: {}", path))
    }

    async fn create_issue(&self, repo: &str, title: &str, _body: &str) -> Result<IssueRef> {
        let mut issues = self.issues.write().unwrap();
        let number = issues.len() as u64 + 1;
        let issue = IssueRef {
            id: 1000 + number,
            number,
            title: title.to_string(),
            state: "open".to_string(),
            url: format!("https://github.com/{}/issues/{}", repo, number),
        };
        issues.push(issue.clone());
        Ok(issue)
    }
}
