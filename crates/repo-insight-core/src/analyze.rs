//! Whole-repository analysis.
//!
//! Runs the full pipeline for one repository: select files, sample a
//! bounded context, build a fresh [`CodeIndex`] for later questions, and
//! ask the generator for a structured analysis. The result is wrapped in
//! a markdown header reporting coverage.
//!
//! Nothing is stored here. The caller receives the index inside the
//! [`RepositoryReport`] and decides whether to keep it.

use anyhow::Result;
use serde::Serialize;

use crate::chunk::ChunkParams;
use crate::embedding::Embedder;
use crate::generation::{summarize, TextGenerator};
use crate::index::{build_index, CodeIndex};
use crate::models::SkipReason;
use crate::prompts;
use crate::repo::RepoRef;
use crate::sample::{sample_files, SampleParams};
use crate::select::{select_files, SelectParams};
use crate::source::RemoteSource;

/// Returned when the walk finds nothing eligible.
pub const NO_FILES_MESSAGE: &str = "No supported source files found in repository.";

/// Skip records listed in the report footer.
const MAX_LISTED_SKIPS: usize = 10;

/// Collaborators the pipeline calls out to.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub source: &'a dyn RemoteSource,
    pub generator: &'a dyn TextGenerator,
    pub embedder: &'a dyn Embedder,
}

/// Budgets for every pipeline stage.
#[derive(Debug, Clone, Default)]
pub struct AnalysisParams {
    pub select: SelectParams,
    pub sample: SampleParams,
    pub chunk: ChunkParams,
}

/// Outcome of [`analyze_repository`].
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryReport {
    pub repo: RepoRef,
    pub analysis_text: String,
    pub files_analyzed: usize,
    pub files_skipped: usize,
    pub samples_used: usize,
    pub skipped: Vec<SkipReason>,
    #[serde(skip)]
    pub index: Option<CodeIndex>,
}

/// Analyze `repo` end to end.
///
/// With zero eligible files the report carries [`NO_FILES_MESSAGE`] and
/// neither the embedder nor the generator is called. Generation failures
/// appear inline in `analysis_text`; embedding failures propagate.
pub async fn analyze_repository(
    services: Services<'_>,
    repo: &RepoRef,
    params: &AnalysisParams,
) -> Result<RepositoryReport> {
    let selection = select_files(services.source, &repo.full_name, "", &params.select).await?;
    let (files, skipped) = selection.into_parts();

    if files.is_empty() {
        return Ok(RepositoryReport {
            repo: repo.clone(),
            analysis_text: NO_FILES_MESSAGE.to_string(),
            files_analyzed: 0,
            files_skipped: skipped.len(),
            samples_used: 0,
            skipped,
            index: None,
        });
    }

    let index = build_index(&repo.full_name, &files, services.embedder, &params.chunk).await?;

    let sample = sample_files(&files, &params.sample);
    let instructions = prompts::repository_analysis(
        &repo.full_name,
        &sample.summary_text(),
        files.len(),
        sample.samples.len(),
        &sample.blob,
    );
    let generated = summarize(services.generator, &sample.blob, &instructions)
        .await
        .into_text("generating code review");

    let analysis_text = render_report(
        &repo.full_name,
        files.len(),
        &skipped,
        sample.samples.len(),
        &generated,
    );
    let samples_used = sample.samples.len();

    Ok(RepositoryReport {
        repo: repo.clone(),
        analysis_text,
        files_analyzed: files.len(),
        files_skipped: skipped.len(),
        samples_used,
        skipped,
        index: Some(index),
    })
}

fn render_report(
    full_name: &str,
    analyzed: usize,
    skipped: &[SkipReason],
    samples: usize,
    generated: &str,
) -> String {
    let skipped_list = if skipped.is_empty() {
        "None".to_string()
    } else {
        skipped
            .iter()
            .take(MAX_LISTED_SKIPS)
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "# Repository Analysis: {full_name}\n\n\
         **Files Analyzed:** {analyzed} files\n\
         **Files Skipped:** {} files\n\
         **Sample Files Used:** {samples} files\n\n\
         {generated}\n\n\
         ---\n\
         ### Skipped Files\n\
         {skipped_list}\n",
        skipped.len()
    )
}
