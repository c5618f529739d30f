//! Prompt templates sent to the text generator.

/// Review a snippet, optionally under extra context or instructions.
pub fn code_review(code: &str, context: Option<&str>) -> String {
    let context = context
        .filter(|c| !c.trim().is_empty())
        .map(|c| format!("Context: {}\n\n", c))
        .unwrap_or_default();

    format!(
        "Please review the following code and provide constructive feedback:\n\n\
         {context}Code:\n```\n{code}\n```\n\n\
         Please provide:\n\
         1. Code quality assessment\n\
         2. Potential bugs or issues\n\
         3. Performance improvements\n\
         4. Security concerns\n\
         5. Best practices suggestions\n\n\
         Be concise but thorough."
    )
}

pub fn documentation(code: &str) -> String {
    format!(
        "Please generate comprehensive documentation for the following code:\n\n\
         Code:\n```\n{code}\n```\n\n\
         Include:\n\
         1. Function/class descriptions\n\
         2. Parameter explanations\n\
         3. Return value descriptions\n\
         4. Usage examples\n\
         5. Any important notes\n\n\
         Format the documentation in markdown."
    )
}

pub fn bug_detection(code: &str) -> String {
    format!(
        "Analyze the following code for potential bugs, errors, or issues:\n\n\
         Code:\n```\n{code}\n```\n\n\
         Please identify:\n\
         1. Syntax errors\n\
         2. Logical errors\n\
         3. Runtime errors\n\
         4. Potential edge cases\n\
         5. Security vulnerabilities\n\n\
         For each issue found, provide:\n\
         - Description of the issue\n\
         - Potential impact\n\
         - Suggested fix"
    )
}

/// Instructions for the whole-repository analysis.
///
/// `structure` is the per-language summary over every selected file and
/// `samples` the excerpt blob.
pub fn repository_analysis(
    full_name: &str,
    structure: &str,
    total_files: usize,
    sample_count: usize,
    samples: &str,
) -> String {
    format!(
        "Analyze this repository: {full_name}\n\n\
         Repository Structure:\n{structure}\n\n\
         Total files analyzed: {total_files}\n\
         Sample files provided: {sample_count}\n\n\
         Sample Code:\n{samples}\n\n\
         Provide a CONCISE analysis with the following structure:\n\n\
         ## 1. Overview\n\
         Brief description of the project's purpose and tech stack.\n\n\
         ## 2. Code Quality (3-4 bullet points)\n\
         - Key strengths\n\
         - Main areas for improvement\n\n\
         ## 3. Architecture (3-4 bullet points)\n\
         - Overall structure\n\
         - Design patterns used\n\
         - Potential issues\n\n\
         ## 4. Security Concerns (2-3 bullet points)\n\
         - Critical security issues if any\n\
         - Recommendations\n\n\
         ## 5. Quick Wins (3-4 actionable items)\n\
         - Immediate improvements that can be made\n\n\
         Keep each section concise and actionable. Use bullet points, not paragraphs."
    )
}

/// Answer `question` from retrieved `context` only.
pub fn question_answering(context: &str, question: &str) -> String {
    format!(
        "Use the following pieces of context to answer the question at the end. \
         If you don't know the answer, just say that you don't know, \
         don't try to make up an answer.\n\n\
         {context}\n\n\
         Question: {question}\n\
         Helpful Answer:"
    )
}
