//! Bounded prompt context built from a selection.
//!
//! Files are grouped by language in first-appearance order and the first
//! few of each language (scan order, not relevance) are excerpted into a
//! single delimited blob. The summary counts every selected file so the
//! report reflects true coverage while the prompt stays small.

use serde::Serialize;

use crate::models::FileRecord;

/// Separator placed between excerpts in the blob.
pub const EXCERPT_DELIMITER: &str = "\n\n---\n\n";

/// Sampling budgets.
#[derive(Debug, Clone)]
pub struct SampleParams {
    pub per_language: usize,
    pub total: usize,
    /// Characters kept from the start of each sampled file.
    pub excerpt_chars: usize,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            per_language: 2,
            total: 10,
            excerpt_chars: 2000,
        }
    }
}

/// Number of selected files for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageCount {
    pub language: String,
    pub files: usize,
}

/// The sampled context for one analysis request.
#[derive(Debug, Clone)]
pub struct ContextSample<'a> {
    pub blob: String,
    /// Counts over all input files, in first-appearance order.
    pub summary: Vec<LanguageCount>,
    pub samples: Vec<&'a FileRecord>,
}

impl ContextSample<'_> {
    /// True when there was nothing to sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `- py: 3 files` lines, one per language.
    pub fn summary_text(&self) -> String {
        self.summary
            .iter()
            .map(|c| format!("- {}: {} files", c.language, c.files))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Sample `files` into a bounded context.
pub fn sample_files<'a>(files: &'a [FileRecord], params: &SampleParams) -> ContextSample<'a> {
    let mut groups: Vec<(&str, Vec<&FileRecord>)> = Vec::new();
    for file in files {
        let slot = groups.iter().position(|(lang, _)| *lang == file.language);
        match slot {
            Some(i) => groups[i].1.push(file),
            None => groups.push((file.language.as_str(), vec![file])),
        }
    }

    let summary = groups
        .iter()
        .map(|(lang, members)| LanguageCount {
            language: lang.to_string(),
            files: members.len(),
        })
        .collect();

    let mut samples: Vec<&FileRecord> = groups
        .iter()
        .flat_map(|(_, members)| members.iter().take(params.per_language).copied())
        .collect();
    samples.truncate(params.total);

    let blob = samples
        .iter()
        .map(|f| {
            format!(
                "File: {}\nLanguage: {}\n\n{}",
                f.path,
                f.language,
                excerpt(&f.content, params.excerpt_chars)
            )
        })
        .collect::<Vec<_>>()
        .join(EXCERPT_DELIMITER);

    ContextSample {
        blob,
        summary,
        samples,
    }
}

/// First `max_chars` characters of `text`.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, content: &str) -> FileRecord {
        FileRecord::new(path, content.to_string(), "o/r")
    }

    #[test]
    fn test_empty_input() {
        let sample = sample_files(&[], &SampleParams::default());
        assert!(sample.is_empty());
        assert_eq!(sample.blob, "");
        assert!(sample.summary.is_empty());
        assert_eq!(sample.summary_text(), "");
    }

    #[test]
    fn test_two_python_files() {
        let files = vec![file("main.py", "print('a')"), file("src/app.py", "print('b')")];
        let sample = sample_files(&files, &SampleParams::default());

        assert_eq!(sample.samples.len(), 2);
        assert_eq!(
            sample.summary,
            vec![LanguageCount {
                language: "py".into(),
                files: 2
            }]
        );
        assert_eq!(
            sample.blob,
            "File: main.py\nLanguage: py\n\nprint('a')\n\n---\n\nFile: src/app.py\nLanguage: py\n\nprint('b')"
        );
    }

    #[test]
    fn test_per_language_cap_and_true_counts() {
        let mut files = Vec::new();
        for lang in ["py", "js", "go"] {
            for i in 0..4 {
                files.push(file(&format!("f{}.{}", i, lang), "x"));
            }
        }
        let sample = sample_files(&files, &SampleParams::default());

        assert_eq!(sample.samples.len(), 6);
        for c in &sample.summary {
            assert_eq!(c.files, 4);
        }
        let sampled: Vec<_> = sample.samples.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            sampled,
            vec!["f0.py", "f1.py", "f0.js", "f1.js", "f0.go", "f1.go"]
        );
    }

    #[test]
    fn test_total_cap_across_many_languages() {
        let langs = ["py", "js", "go", "rs", "ts", "c", "cpp", "java"];
        let mut files = Vec::new();
        for lang in langs {
            for i in 0..3 {
                files.push(file(&format!("m{}.{}", i, lang), "x"));
            }
        }
        let sample = sample_files(&files, &SampleParams::default());

        assert_eq!(sample.samples.len(), 10.min(2 * langs.len()));
        assert_eq!(sample.summary.len(), langs.len());
        assert!(sample.summary.iter().all(|c| c.files == 3));
        // Languages past the cap contribute nothing.
        assert!(sample.samples.iter().all(|f| f.language != "java"));
    }

    #[test]
    fn test_scan_order_not_ranked() {
        let files = vec![
            file("z.py", "1"),
            file("a.js", "2"),
            file("b.py", "3"),
            file("c.py", "4"),
        ];
        let sample = sample_files(&files, &SampleParams::default());
        let sampled: Vec<_> = sample.samples.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(sampled, vec!["z.py", "b.py", "a.js"]);
        assert_eq!(sample.summary_text(), "- py: 3 files\n- js: 1 files");
    }

    #[test]
    fn test_excerpt_truncates_by_chars() {
        let files = vec![file("long.rs", &"é".repeat(2500))];
        let sample = sample_files(&files, &SampleParams::default());
        let body = sample.blob.split("\n\n").nth(1).unwrap();
        assert_eq!(body.chars().count(), 2000);
    }

    #[test]
    fn test_excerpt_short_text_unchanged() {
        assert_eq!(excerpt("abc", 10), "abc");
        assert_eq!(excerpt("abcdef", 3), "abc");
        assert_eq!(excerpt("", 3), "");
    }
}
