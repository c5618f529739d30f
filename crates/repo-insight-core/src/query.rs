//! Retrieval-augmented question answering over a [`CodeIndex`].
//!
//! The index is owned by the caller and passed in per query. A missing
//! index is an ordinary outcome ([`QueryOutcome::NotInitialized`]), not an
//! error; an empty question or an embedder that does not match the
//! index's model is.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::embedding::Embedder;
use crate::generation::{generate, TextGenerator};
use crate::index::{CodeIndex, ScoredChunk};
use crate::prompts;

/// Message reported when no index has been built yet.
pub const NOT_INITIALIZED: &str = "No vector store initialized. Please process documents first.";

/// Characters of chunk text kept in a source preview.
const PREVIEW_CHARS: usize = 200;

/// A chunk cited in an answer.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRef {
    pub file: String,
    pub path: String,
    /// First 200 characters of the chunk followed by `...`.
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryAnswer {
    pub answer: String,
    pub sources: Vec<SourceRef>,
}

#[derive(Debug, Clone)]
pub enum QueryOutcome {
    NotInitialized,
    Answered(QueryAnswer),
}

/// A chunk returned by [`similar_code`], with full text.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarChunk {
    pub file: String,
    pub path: String,
    pub content: String,
    pub language: String,
    pub score: f32,
}

/// Answer `question` from the `k` chunks most similar to it.
pub async fn query_codebase(
    index: Option<&CodeIndex>,
    question: &str,
    k: usize,
    embedder: &dyn Embedder,
    generator: &dyn TextGenerator,
) -> Result<QueryOutcome> {
    if question.trim().is_empty() {
        bail!("Question is required");
    }
    let Some(index) = index else {
        return Ok(QueryOutcome::NotInitialized);
    };

    let hits = retrieve(index, question, k, embedder).await?;
    let context = hits
        .iter()
        .map(|h| h.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let answer = generate(generator, &prompts::question_answering(&context, question))
        .await
        .into_text("answering question");

    let sources = hits
        .iter()
        .map(|h| SourceRef {
            file: h.chunk.metadata.file_name.clone(),
            path: h.chunk.metadata.file_path.clone(),
            content: preview(&h.chunk.text),
        })
        .collect();

    Ok(QueryOutcome::Answered(QueryAnswer { answer, sources }))
}

/// The `k` chunks most similar to `code`. Empty when there is no index.
pub async fn similar_code(
    index: Option<&CodeIndex>,
    code: &str,
    k: usize,
    embedder: &dyn Embedder,
) -> Result<Vec<SimilarChunk>> {
    if code.trim().is_empty() {
        bail!("Code is required");
    }
    let Some(index) = index else {
        return Ok(Vec::new());
    };

    let hits = retrieve(index, code, k, embedder).await?;
    Ok(hits
        .into_iter()
        .map(|h| SimilarChunk {
            file: h.chunk.metadata.file_name.clone(),
            path: h.chunk.metadata.file_path.clone(),
            content: h.chunk.text.clone(),
            language: h.chunk.metadata.language.clone(),
            score: h.score,
        })
        .collect())
}

async fn retrieve<'a>(
    index: &'a CodeIndex,
    text: &str,
    k: usize,
    embedder: &dyn Embedder,
) -> Result<Vec<ScoredChunk<'a>>> {
    if embedder.model_name() != index.model {
        bail!(
            "Embedding model mismatch: index built with '{}', query uses '{}'",
            index.model,
            embedder.model_name()
        );
    }
    let query_vec = embedder.embed_query(text).await?;
    Ok(index.vectors.search(&query_vec, k))
}

/// First 200 characters plus `...`.
pub fn preview(text: &str) -> String {
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkParams;
    use crate::embedding::HashingEmbedder;
    use crate::index::build_index;
    use crate::models::FileRecord;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: AtomicUsize,
        last_prompt: Mutex<String>,
    }

    #[async_trait]
    impl TextGenerator for Recorder {
        fn model_name(&self) -> &str {
            "recorder"
        }
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = prompt.to_string();
            Ok("It opens a pool.".to_string())
        }
    }

    async fn sample_index() -> CodeIndex {
        let files = vec![
            FileRecord::new(
                "db/pool.py",
                "def open_pool(database_url):\n    return Pool(database_url, size=5)\n".into(),
                "o/r",
            ),
            FileRecord::new(
                "ui/theme.js",
                "export const sidebarColor = 'teal';\nexport const headerFont = 'serif';\n".into(),
                "o/r",
            ),
            FileRecord::new("README.py", "x".repeat(450), "o/r"),
        ];
        build_index("o/r", &files, &HashingEmbedder::default(), &ChunkParams::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_query_before_index_is_not_initialized() {
        let gen = Recorder::default();
        let out = query_codebase(None, "What is this?", 4, &HashingEmbedder::default(), &gen)
            .await
            .unwrap();
        assert!(matches!(out, QueryOutcome::NotInitialized));
        assert_eq!(gen.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_question_is_rejected() {
        let index = sample_index().await;
        let gen = Recorder::default();
        let err = query_codebase(Some(&index), "   ", 4, &HashingEmbedder::default(), &gen)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Question is required");
    }

    #[tokio::test]
    async fn test_answer_cites_most_similar_chunk_first() {
        let index = sample_index().await;
        let gen = Recorder::default();
        let out = query_codebase(
            Some(&index),
            "how does open_pool use the database_url",
            2,
            &HashingEmbedder::default(),
            &gen,
        )
        .await
        .unwrap();

        let QueryOutcome::Answered(answer) = out else {
            panic!("expected an answer");
        };
        assert_eq!(answer.answer, "It opens a pool.");
        assert_eq!(answer.sources.len(), 2);
        assert_eq!(answer.sources[0].path, "db/pool.py");
        assert_eq!(answer.sources[0].file, "pool.py");
        assert!(answer.sources[0].content.ends_with("..."));

        let prompt = gen.last_prompt.lock().unwrap().clone();
        assert!(prompt.contains("def open_pool(database_url):"));
        assert!(prompt.contains("Question: how does open_pool use the database_url"));
    }

    #[tokio::test]
    async fn test_mismatched_embedder_is_an_error() {
        let index = sample_index().await;
        struct Other;
        #[async_trait]
        impl Embedder for Other {
            fn model_name(&self) -> &str {
                "other-model"
            }
            fn dims(&self) -> usize {
                384
            }
            async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
                Ok(texts.iter().map(|_| vec![0.0; 384]).collect())
            }
        }
        let err = query_codebase(Some(&index), "q", 4, &Other, &Recorder::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("mismatch"));
    }

    #[tokio::test]
    async fn test_similar_code_returns_full_content() {
        let index = sample_index().await;
        let hits = similar_code(
            Some(&index),
            "export const sidebarColor",
            3,
            &HashingEmbedder::default(),
        )
        .await
        .unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].path, "ui/theme.js");
        assert_eq!(hits[0].language, "js");
        assert!(hits[0].content.contains("headerFont"));
    }

    #[tokio::test]
    async fn test_similar_code_without_index_is_empty() {
        let hits = similar_code(None, "fn x() {}", 3, &HashingEmbedder::default())
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_preview_truncates_by_chars() {
        assert_eq!(preview("short"), "short...");
        let long = "ü".repeat(300);
        assert_eq!(preview(&long).chars().count(), 203);
    }
}
