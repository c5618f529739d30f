//! Overlapping window chunker for source files.
//!
//! Splits file content into windows of at most `chunk_size` characters,
//! where each window repeats the last `chunk_overlap` characters of its
//! predecessor. Window ends prefer natural separators so that a chunk
//! rarely cuts through the middle of a line.
//!
//! Each chunk receives a random UUID plus a SHA-256 hash of its text, and
//! carries the provenance of the file it came from.
//!
//! # Algorithm
//!
//! 1. If the remaining text fits in one window, emit it and stop.
//! 2. Otherwise look for the last `"\n\n"`, then `"\n"`, then `" "` inside
//!    the window but past the overlap region; end the window just after it.
//! 3. With no separator available, cut hard at `chunk_size` characters.
//! 4. Start the next window `chunk_overlap` characters before the end.
//!
//! Windows record their start offset, so dropping the overlapping prefix
//! of every window after the first reproduces the input exactly.
//!
//! # Example
//!
//! ```rust
//! use repo_insight_core::chunk::split_text;
//!
//! let windows = split_text("fn main() {}\n", 1000, 200);
//! assert_eq!(windows.len(), 1);
//! assert_eq!(windows[0].start, 0);
//! ```

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::{Chunk, ChunkMetadata, FileRecord};

/// Preferred window boundaries, strongest first.
const SEPARATORS: &[&str] = &["\n\n", "\n", " "];

/// Window sizing.
#[derive(Debug, Clone)]
pub struct ChunkParams {
    /// Maximum characters per chunk.
    pub chunk_size: usize,
    /// Characters shared with the previous chunk.
    pub chunk_overlap: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// A borrowed window of the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window<'a> {
    /// Offset of the first character, in characters.
    pub start: usize,
    pub text: &'a str,
}

/// Split `text` into overlapping windows.
///
/// # Guarantees
///
/// - Empty text yields no windows.
/// - Every window holds at most `chunk_size` characters.
/// - Consecutive windows share exactly `chunk_overlap` characters
///   (clamped below `chunk_size`).
/// - The first window starts at 0 and the last one ends at the end of text.
pub fn split_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<Window<'_>> {
    // Byte offset of every char boundary, plus the end of text.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = bounds.len() - 1;
    if total == 0 {
        return Vec::new();
    }

    let size = chunk_size.max(1);
    let overlap = chunk_overlap.min(size - 1);

    let mut windows = Vec::new();
    let mut start = 0usize;
    loop {
        let hard_end = (start + size).min(total);
        if hard_end == total {
            windows.push(Window {
                start,
                text: &text[bounds[start]..bounds[total]],
            });
            break;
        }

        let end = natural_break(text, &bounds, start + overlap + 1, hard_end).unwrap_or(hard_end);
        windows.push(Window {
            start,
            text: &text[bounds[start]..bounds[end]],
        });
        start = end - overlap;
    }

    windows
}

/// Char position just after the strongest separator lying in `[lo, hi)`.
fn natural_break(text: &str, bounds: &[usize], lo: usize, hi: usize) -> Option<usize> {
    if lo >= hi {
        return None;
    }
    let region = &text[bounds[lo]..bounds[hi]];
    SEPARATORS.iter().find_map(|sep| {
        let at = region.rfind(sep)?;
        let end_byte = bounds[lo] + at + sep.len();
        bounds.binary_search(&end_byte).ok()
    })
}

/// Chunk one file, attaching its provenance to every chunk.
///
/// Chunk indices are contiguous from 0 within the file.
pub fn chunk_file(file: &FileRecord, params: &ChunkParams) -> Vec<Chunk> {
    let metadata = ChunkMetadata::from(file);
    split_text(&file.content, params.chunk_size, params.chunk_overlap)
        .into_iter()
        .enumerate()
        .map(|(i, w)| make_chunk(i as i64, w, metadata.clone()))
        .collect()
}

/// Chunk every file, in input order.
pub fn chunk_files(files: &[FileRecord], params: &ChunkParams) -> Vec<Chunk> {
    files.iter().flat_map(|f| chunk_file(f, params)).collect()
}

fn make_chunk(index: i64, window: Window<'_>, metadata: ChunkMetadata) -> Chunk {
    let mut hasher = Sha256::new();
    hasher.update(window.text.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    Chunk {
        id: Uuid::new_v4().to_string(),
        chunk_index: index,
        start: window.start,
        text: window.text.to_string(),
        hash,
        metadata,
    }
}
