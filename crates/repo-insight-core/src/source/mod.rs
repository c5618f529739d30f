//! Remote source abstraction for Repo Insight.
//!
//! The [`RemoteSource`] trait is the only way the pipeline reaches a code
//! host. It exposes directory listing, file reads, and issue creation,
//! enabling pluggable backends (GitHub REST, in-memory fixtures).
//!
//! Implementations surface failures as plain errors with a human-readable
//! message; they carry no retry logic of their own. The selector decides
//! what a failure means (skip record, abandoned subtree).

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{IssueRef, RemoteEntry};

/// Abstract code host.
///
/// `repo` is always the repository full name (`owner/name`); `path` is
/// relative to the repository root, with `""` meaning the root itself.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`list_dir`](RemoteSource::list_dir) | Entries directly under a path |
/// | [`read_file`](RemoteSource::read_file) | Decoded text of one file |
/// | [`create_issue`](RemoteSource::create_issue) | Open an issue on the repository |
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// List the entries directly under `path`.
    async fn list_dir(&self, repo: &str, path: &str) -> Result<Vec<RemoteEntry>>;

    /// Read a file as UTF-8 text.
    async fn read_file(&self, repo: &str, path: &str) -> Result<String>;

    /// Create an issue and return its reference.
    async fn create_issue(&self, repo: &str, title: &str, body: &str) -> Result<IssueRef>;
}
