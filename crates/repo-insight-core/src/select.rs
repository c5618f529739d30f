//! Bounded repository walk that selects source files for analysis.
//!
//! The walk is a depth-first, pre-order traversal driven by an explicit
//! stack of directory frames. Every candidate file produces exactly one
//! [`Outcome`]: either the fetched [`FileRecord`] or a [`SkipReason`].
//!
//! # Budgets
//!
//! | Limit | Default | Effect when hit |
//! |-------|---------|-----------------|
//! | `max_files` | 100 | the whole walk stops |
//! | `max_file_size` | 50,000 chars | file recorded as `too_large` |
//! | `max_depth` | 10 | deeper directories are never listed |
//!
//! Remote failures never abort the walk: a failed read becomes a
//! `fetch_error` skip, a failed listing abandons that subtree only.

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::{EntryKind, FileRecord, Outcome, RemoteEntry, SkipKind, SkipReason};
use crate::source::RemoteSource;

/// Extensions accepted when no other list is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "py", "js", "java", "cpp", "c", "go", "rs", "ts", "jsx", "tsx",
];

/// Selection budgets and filters.
#[derive(Debug, Clone)]
pub struct SelectParams {
    pub max_files: usize,
    /// Maximum content length in characters.
    pub max_file_size: usize,
    pub max_depth: usize,
    /// Extensions without the leading dot.
    pub extensions: Vec<String>,
    /// Directories matching any of these are never listed. Empty walks everything.
    pub exclude_globs: Vec<String>,
}

impl Default for SelectParams {
    fn default() -> Self {
        Self {
            max_files: 100,
            max_file_size: 50_000,
            max_depth: 10,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_globs: Vec::new(),
        }
    }
}

/// Ordered outcomes of one walk.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub outcomes: Vec<Outcome>,
}

impl Selection {
    /// Selected files in scan order.
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Selected(f) => Some(f),
            Outcome::Skipped(_) => None,
        })
    }

    /// Skip records in scan order.
    pub fn skipped(&self) -> impl Iterator<Item = &SkipReason> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Skipped(s) => Some(s),
            Outcome::Selected(_) => None,
        })
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    pub fn skip_count(&self) -> usize {
        self.skipped().count()
    }

    /// Split into owned files and skips, both in scan order.
    pub fn into_parts(self) -> (Vec<FileRecord>, Vec<SkipReason>) {
        let mut files = Vec::new();
        let mut skipped = Vec::new();
        for outcome in self.outcomes {
            match outcome {
                Outcome::Selected(f) => files.push(f),
                Outcome::Skipped(s) => skipped.push(s),
            }
        }
        (files, skipped)
    }
}

/// Compact, serializable view of a selection (no file contents).
#[derive(Debug, Clone, Serialize)]
pub struct SelectionSummary {
    pub selected: Vec<String>,
    pub skipped: Vec<SkipReason>,
}

impl From<&Selection> for SelectionSummary {
    fn from(sel: &Selection) -> Self {
        Self {
            selected: sel.files().map(|f| f.path.clone()).collect(),
            skipped: sel.skipped().cloned().collect(),
        }
    }
}

/// One directory whose entries are still being visited.
struct Frame {
    entries: std::vec::IntoIter<RemoteEntry>,
    depth: usize,
}

/// Walk `repo` from `root` and select supported source files.
///
/// `root` is listed at depth 0. A directory found at depth `d` is listed
/// only when `d < max_depth`. Entries are visited in listing order and a
/// directory's subtree is finished before its next sibling is visited.
///
/// # Errors
///
/// Only invalid exclude globs produce an error. Remote failures are
/// absorbed into the returned [`Selection`].
pub async fn select_files(
    source: &dyn RemoteSource,
    repo: &str,
    root: &str,
    params: &SelectParams,
) -> Result<Selection> {
    let excludes = build_globset(&params.exclude_globs)?;
    let suffixes: Vec<String> = params
        .extensions
        .iter()
        .map(|e| format!(".{}", e.trim_start_matches('.')))
        .collect();

    let mut selection = Selection::default();
    let mut selected = 0usize;
    let mut stack: Vec<Frame> = Vec::new();

    if let Some(entries) = list_or_abandon(source, repo, root).await {
        stack.push(Frame {
            entries: entries.into_iter(),
            depth: 0,
        });
    }

    loop {
        let Some(frame) = stack.last_mut() else {
            break;
        };
        let depth = frame.depth;
        let Some(entry) = frame.entries.next() else {
            stack.pop();
            continue;
        };

        if selected >= params.max_files {
            debug!(repo, max_files = params.max_files, "file budget reached");
            break;
        }

        match entry.kind {
            EntryKind::File => {
                if !suffixes.iter().any(|s| entry.name.ends_with(s.as_str())) {
                    continue;
                }
                if excludes.is_match(&entry.path) {
                    continue;
                }
                let outcome = consider_file(source, repo, &entry, params).await;
                if let Outcome::Selected(_) = outcome {
                    selected += 1;
                }
                selection.outcomes.push(outcome);
            }
            EntryKind::Dir => {
                if depth >= params.max_depth || is_excluded_dir(&excludes, &entry.path) {
                    continue;
                }
                if let Some(children) = list_or_abandon(source, repo, &entry.path).await {
                    stack.push(Frame {
                        entries: children.into_iter(),
                        depth: depth + 1,
                    });
                }
            }
            EntryKind::Other => {}
        }
    }

    info!(
        repo,
        selected = selection.file_count(),
        skipped = selection.skip_count(),
        "repository walk finished"
    );
    Ok(selection)
}

/// Decide the outcome for one supported file entry.
async fn consider_file(
    source: &dyn RemoteSource,
    repo: &str,
    entry: &RemoteEntry,
    params: &SelectParams,
) -> Outcome {
    if entry.size > params.max_file_size as u64 {
        debug!(path = %entry.path, size = entry.size, "skipping oversized file");
        return too_large(&entry.path);
    }

    match source.read_file(repo, &entry.path).await {
        Ok(content) => {
            if content.chars().count() > params.max_file_size {
                debug!(path = %entry.path, "fetched content exceeds size cap");
                return too_large(&entry.path);
            }
            Outcome::Selected(FileRecord::new(&entry.path, content, repo))
        }
        Err(e) => {
            debug!(path = %entry.path, error = %e, "file fetch failed");
            Outcome::Skipped(SkipReason {
                path: entry.path.clone(),
                kind: SkipKind::FetchError {
                    message: e.to_string(),
                },
            })
        }
    }
}

fn too_large(path: &str) -> Outcome {
    Outcome::Skipped(SkipReason {
        path: path.to_string(),
        kind: SkipKind::TooLarge,
    })
}

async fn list_or_abandon(
    source: &dyn RemoteSource,
    repo: &str,
    path: &str,
) -> Option<Vec<RemoteEntry>> {
    match source.list_dir(repo, path).await {
        Ok(entries) => Some(entries),
        Err(e) => {
            warn!(repo, path, error = %e, "error accessing path; abandoning subtree");
            None
        }
    }
}

/// Exclude globs are written against file paths, so a directory is probed
/// through a child path as well as its own.
fn is_excluded_dir(excludes: &GlobSet, path: &str) -> bool {
    excludes.is_match(path) || excludes.is_match(format!("{}/_", path))
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
