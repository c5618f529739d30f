//! In-memory vector index over repository chunks.
//!
//! [`build_index`] chunks every selected file, embeds all chunk texts in
//! one [`Embedder::embed_documents`] call, and packs the result into a
//! [`CodeIndex`]. Search is brute-force cosine similarity; ties keep
//! insertion order, so results are deterministic for a given build.
//!
//! A `CodeIndex` is a plain owned value. Callers decide where it lives and
//! when it is replaced.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::chunk::{chunk_files, ChunkParams};
use crate::embedding::{cosine_similarity, Embedder};
use crate::models::{Chunk, FileRecord};

/// Chunks paired with their embedding vectors.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<Chunk>,
    vectors: Vec<Vec<f32>>,
}

/// A search hit borrowed from the index.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a Chunk,
    pub score: f32,
}

impl VectorIndex {
    /// Pair `entries` with `vectors`. Lengths must match.
    pub fn build(entries: Vec<Chunk>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if entries.len() != vectors.len() {
            bail!(
                "Embedding count mismatch: {} chunks but {} vectors",
                entries.len(),
                vectors.len()
            );
        }
        Ok(Self { entries, vectors })
    }

    /// Top `k` entries by cosine similarity to `query`, best first.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk<'_>> {
        let mut scored: Vec<ScoredChunk<'_>> = self
            .entries
            .iter()
            .zip(self.vectors.iter())
            .map(|(chunk, vec)| ScoredChunk {
                chunk,
                score: cosine_similarity(query, vec),
            })
            .collect();

        // sort_by is stable: equal scores stay in insertion order.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.entries
    }
}

/// A built index plus the facts needed to query it correctly.
#[derive(Debug, Clone)]
pub struct CodeIndex {
    /// Repository full name the chunks came from.
    pub repo: String,
    /// Embedding model that produced the vectors.
    pub model: String,
    pub dims: usize,
    pub file_count: usize,
    pub built_at: DateTime<Utc>,
    pub vectors: VectorIndex,
}

impl CodeIndex {
    pub fn chunk_count(&self) -> usize {
        self.vectors.len()
    }
}

/// Chunk, embed and index `files`.
///
/// Embedding failures propagate. An empty file list produces an empty
/// index without calling the embedder.
pub async fn build_index(
    repo: &str,
    files: &[FileRecord],
    embedder: &dyn Embedder,
    params: &ChunkParams,
) -> Result<CodeIndex> {
    let chunks = chunk_files(files, params);

    let vectors = if chunks.is_empty() {
        Vec::new()
    } else {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        embedder.embed_documents(&texts).await?
    };

    tracing::debug!(
        repo,
        files = files.len(),
        chunks = chunks.len(),
        model = embedder.model_name(),
        "Built code index"
    );

    Ok(CodeIndex {
        repo: repo.to_string(),
        model: embedder.model_name().to_string(),
        dims: embedder.dims(),
        file_count: files.len(),
        built_at: Utc::now(),
        vectors: VectorIndex::build(chunks, vectors)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;
    use crate::models::ChunkMetadata;
    use async_trait::async_trait;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            id: text.to_string(),
            chunk_index: 0,
            start: 0,
            text: text.to_string(),
            hash: String::new(),
            metadata: ChunkMetadata {
                file_name: "a.py".into(),
                file_path: "a.py".into(),
                language: "py".into(),
                repo: "o/r".into(),
            },
        }
    }

    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        fn model_name(&self) -> &str {
            "short"
        }
        fn dims(&self) -> usize {
            2
        }
        async fn embed_documents(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0, 0.0]])
        }
    }

    #[test]
    fn test_build_rejects_length_mismatch() {
        let err = VectorIndex::build(vec![chunk("a"), chunk("b")], vec![vec![1.0]]).unwrap_err();
        assert!(err.to_string().contains("mismatch"));
    }

    #[test]
    fn test_search_ranks_by_similarity() {
        let index = VectorIndex::build(
            vec![chunk("x"), chunk("y"), chunk("xy")],
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]],
        )
        .unwrap();
        let hits = index.search(&[0.0, 1.0], 2);
        let ids: Vec<_> = hits.iter().map(|h| h.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["y", "xy"]);
    }

    #[test]
    fn test_search_ties_keep_insertion_order() {
        let index = VectorIndex::build(
            vec![chunk("first"), chunk("second"), chunk("third")],
            vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]],
        )
        .unwrap();
        let hits = index.search(&[1.0, 0.0], 3);
        let ids: Vec<_> = hits.iter().map(|h| h.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_search_k_larger_than_index() {
        let index = VectorIndex::build(vec![chunk("only")], vec![vec![1.0]]).unwrap();
        assert_eq!(index.search(&[1.0], 10).len(), 1);
        assert!(VectorIndex::default().search(&[1.0], 4).is_empty());
    }

    #[tokio::test]
    async fn test_build_index_from_files() {
        let files = vec![
            FileRecord::new("main.py", "def main():\n    serve()\n".into(), "o/r"),
            FileRecord::new("src/app.py", "def serve():\n    pass\n".into(), "o/r"),
        ];
        let embedder = HashingEmbedder::new(32);
        let index = build_index("o/r", &files, &embedder, &ChunkParams::default())
            .await
            .unwrap();

        assert_eq!(index.repo, "o/r");
        assert_eq!(index.model, HashingEmbedder::MODEL_NAME);
        assert_eq!(index.dims, 32);
        assert_eq!(index.file_count, 2);
        assert_eq!(index.chunk_count(), 2);
    }

    #[tokio::test]
    async fn test_build_index_empty_files() {
        let index = build_index("o/r", &[], &ShortEmbedder, &ChunkParams::default())
            .await
            .unwrap();
        assert_eq!(index.chunk_count(), 0);
    }

    #[tokio::test]
    async fn test_build_index_detects_short_embedding_batch() {
        let files = vec![
            FileRecord::new("a.py", "a".into(), "o/r"),
            FileRecord::new("b.py", "b".into(), "o/r"),
        ];
        let err = build_index("o/r", &files, &ShortEmbedder, &ChunkParams::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("mismatch"));
    }
}
