//! Text generation trait and degraded-result handling.
//!
//! A [`TextGenerator`] may fail for any reason (quota, network, safety
//! filters). Callers in the pipeline never propagate those failures:
//! [`generate`] captures them as [`Generation::Failed`], and
//! [`Generation::into_text`] renders the failure inline so the user still
//! receives a response.

use anyhow::Result;
use async_trait::async_trait;

use crate::prompts;

/// Text generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier (e.g. `"gemini-1.5-flash"`).
    fn model_name(&self) -> &str;

    /// Complete `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Outcome of one generator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Completed(String),
    Failed { message: String },
}

impl Generation {
    /// Generated text, or `"Error {task}: {message}"` on failure.
    pub fn into_text(self, task: &str) -> String {
        match self {
            Generation::Completed(text) => text,
            Generation::Failed { message } => format!("Error {}: {}", task, message),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Generation::Completed(_))
    }
}

/// Call the generator once, capturing any failure.
pub async fn generate(generator: &dyn TextGenerator, prompt: &str) -> Generation {
    match generator.generate(prompt).await {
        Ok(text) => Generation::Completed(text),
        Err(e) => {
            tracing::warn!(model = generator.model_name(), error = %e, "Generation failed");
            Generation::Failed {
                message: e.to_string(),
            }
        }
    }
}

/// Review `content` under `instructions` with a single generator call.
pub async fn summarize(generator: &dyn TextGenerator, content: &str, instructions: &str) -> Generation {
    generate(generator, &prompts::code_review(content, Some(instructions))).await
}

/// Single-snippet analysis kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetTask {
    CodeReview,
    Documentation,
    BugDetection,
}

impl SnippetTask {
    /// Name stored with persisted analyses.
    pub fn analysis_type(self) -> &'static str {
        match self {
            SnippetTask::CodeReview => "code_review",
            SnippetTask::Documentation => "documentation",
            SnippetTask::BugDetection => "bug_detection",
        }
    }

    /// Phrase used in degraded results.
    pub fn error_label(self) -> &'static str {
        match self {
            SnippetTask::CodeReview => "generating code review",
            SnippetTask::Documentation => "generating documentation",
            SnippetTask::BugDetection => "detecting bugs",
        }
    }

    pub fn prompt(self, code: &str, context: Option<&str>) -> String {
        match self {
            SnippetTask::CodeReview => prompts::code_review(code, context),
            SnippetTask::Documentation => prompts::documentation(code),
            SnippetTask::BugDetection => prompts::bug_detection(code),
        }
    }

    /// Run the task; failures come back as inline error text.
    pub async fn run(
        self,
        generator: &dyn TextGenerator,
        code: &str,
        context: Option<&str>,
    ) -> String {
        generate(generator, &self.prompt(code, context))
            .await
            .into_text(self.error_label())
    }
}
