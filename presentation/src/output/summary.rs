//! Completion Summarizer
//!
//! Produces the single authoritative end-of-run report.

use super::style::Palette;
use prism_domain::{ErrorCategory, FileOutputResult, RunResult};
use std::path::PathBuf;

/// One failed target or file write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryError {
    /// Config key for a query failure, file path for a write failure
    pub model_key: String,
    pub message: String,
    pub category: Option<ErrorCategory>,
    /// First remediation hint from the classifier
    pub suggestion: Option<String>,
}

/// Counts and locations describing a finished run
#[derive(Debug, Clone, Default)]
pub struct SummaryInput {
    pub total_models: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub errors: Vec<SummaryError>,
    pub run_name: String,
    pub output_directory: Option<PathBuf>,
    pub total_execution_time_ms: u64,
    /// `(written, failed)` when the write phase ran
    pub files: Option<(usize, usize)>,
}

impl SummaryInput {
    pub fn from_run(
        run: &RunResult,
        writes: Option<&FileOutputResult>,
        run_name: impl Into<String>,
    ) -> Self {
        let query_errors = run.failed().map(|record| SummaryError {
            model_key: record.config_key.clone(),
            message: record
                .error_message
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string()),
            category: record.error_category,
            suggestion: record.error_suggestions.first().cloned(),
        });
        let write_errors = writes.into_iter().flat_map(|w| w.failed()).map(|detail| {
            SummaryError {
                model_key: detail.file_path.display().to_string(),
                message: detail
                    .error
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
                category: detail.error_category,
                suggestion: detail.error_suggestions.first().cloned(),
            }
        });
        let errors = query_errors.chain(write_errors).collect();

        let write_ms = writes.map_or(0, |w| w.timing.duration_ms);
        Self {
            total_models: run.total(),
            success_count: run.success_count(),
            failure_count: run.failure_count(),
            errors,
            run_name: run_name.into(),
            output_directory: writes.map(|w| w.output_directory.clone()),
            total_execution_time_ms: run.timing.duration_ms + write_ms,
            files: writes.map(|w| (w.succeeded_writes, w.failed_writes)),
        }
    }
}

/// Rendered summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub summary_text: String,
    /// One entry per failed query or write, its suggestion on a second
    /// line; `None` when nothing failed
    pub error_details: Option<Vec<String>>,
}

pub struct CompletionSummarizer {
    palette: Palette,
}

impl CompletionSummarizer {
    pub fn new(use_colors: bool) -> Self {
        Self {
            palette: Palette::new(use_colors),
        }
    }

    pub fn summarize(&self, input: &SummaryInput) -> Summary {
        let p = &self.palette;
        let mut lines = Vec::new();

        let failed_files = input.files.map_or(0, |(_, failed)| failed);
        let title = if input.failure_count == 0 && failed_files == 0 && input.total_models > 0 {
            p.ok(&format!("Run complete: {}", input.run_name))
        } else if input.success_count == 0 {
            p.err(&format!("Run failed: {}", input.run_name))
        } else {
            p.warn(&format!("Run finished with errors: {}", input.run_name))
        };
        lines.push(title);

        lines.push(format!(
            "  Models:  {} total, {} succeeded, {} failed",
            input.total_models,
            p.ok(&input.success_count.to_string()),
            if input.failure_count > 0 {
                p.err(&input.failure_count.to_string())
            } else {
                input.failure_count.to_string()
            }
        ));
        if let Some((written, failed)) = input.files {
            lines.push(format!("  Files:   {} written, {} failed", written, failed));
        }
        lines.push(format!(
            "  Time:    {}",
            format_duration(input.total_execution_time_ms)
        ));
        let location = input
            .output_directory
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "(nothing written)".to_string());
        lines.push(format!("  Output:  {}", location));

        let error_details = (input.failure_count > 0 || !input.errors.is_empty()).then(|| {
            input
                .errors
                .iter()
                .map(|e| {
                    let mut line = match e.category {
                        Some(category) => format!(
                            "{} [{}]: {}",
                            e.model_key,
                            p.err(category.label()),
                            e.message
                        ),
                        None => format!("{}: {}", e.model_key, e.message),
                    };
                    if let Some(suggestion) = &e.suggestion {
                        line.push_str(&format!("\n    Suggestion: {}", suggestion));
                    }
                    line
                })
                .collect()
        });

        Summary {
            summary_text: lines.join("\n"),
            error_details,
        }
    }
}

fn format_duration(ms: u64) -> String {
    if ms < 1_000 {
        format!("{}ms", ms)
    } else {
        format!("{:.2}s", ms as f64 / 1_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use prism_domain::{FileWriteDetail, PrismError, QueryStatusRecord, Timing};

    fn input(failures: usize) -> SummaryInput {
        SummaryInput {
            total_models: 3,
            success_count: 3 - failures,
            failure_count: failures,
            errors: (0..failures)
                .map(|i| SummaryError {
                    model_key: format!("openai:m{}", i),
                    message: "Rate limit exceeded".to_string(),
                    category: (i == 0).then_some(ErrorCategory::Api),
                    suggestion: None,
                })
                .collect(),
            run_name: "run-20240101-120000".to_string(),
            output_directory: Some(PathBuf::from("out/run-20240101-120000")),
            total_execution_time_ms: 1_234,
            files: Some((3, 0)),
        }
    }

    #[test]
    fn test_success_summary_has_no_error_details() {
        let summary = CompletionSummarizer::new(false).summarize(&input(0));
        assert!(summary.error_details.is_none());
        assert!(summary.summary_text.starts_with("Run complete: run-20240101-120000"));
        assert!(summary.summary_text.contains("3 total, 3 succeeded, 0 failed"));
        assert!(summary.summary_text.contains("1.23s"));
        assert!(summary.summary_text.contains("out/run-20240101-120000"));
    }

    #[test]
    fn test_failures_are_detailed() {
        let summary = CompletionSummarizer::new(false).summarize(&input(2));
        let details = summary.error_details.unwrap();
        assert_eq!(
            details,
            vec![
                "openai:m0 [ApiError]: Rate limit exceeded".to_string(),
                "openai:m1: Rate limit exceeded".to_string(),
            ]
        );
        assert!(summary.summary_text.starts_with("Run finished with errors"));
    }

    #[test]
    fn test_empty_run() {
        let summary = CompletionSummarizer::new(false).summarize(&SummaryInput {
            run_name: "r".to_string(),
            ..Default::default()
        });
        assert!(summary.summary_text.starts_with("Run failed: r"));
        assert!(summary.summary_text.contains("(nothing written)"));
        assert!(summary.error_details.is_none());
    }

    #[test]
    fn test_from_run() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut ok = QueryStatusRecord::pending("a:ok");
        ok.start(t0).unwrap();
        ok.succeed(t0).unwrap();
        let mut bad = QueryStatusRecord::pending("a:bad");
        bad.start(t0).unwrap();
        bad.fail(t0, "boom", ErrorCategory::Network).unwrap();

        let run = RunResult {
            responses: Vec::new(),
            statuses: vec![ok, bad],
            timing: Timing::instant(t0),
        };
        let input = SummaryInput::from_run(&run, None, "r");

        assert_eq!(input.total_models, 2);
        assert_eq!(input.failure_count, 1);
        assert_eq!(
            input.errors,
            vec![SummaryError {
                model_key: "a:bad".to_string(),
                message: "boom".to_string(),
                category: Some(ErrorCategory::Network),
                suggestion: None,
            }]
        );
        assert!(input.files.is_none());
    }

    #[test]
    fn test_first_suggestion_follows_each_error() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut bad = QueryStatusRecord::pending("openai:gpt-4o");
        bad.start(t0).unwrap();
        let error = PrismError::api("Invalid API key")
            .with_suggestion("Check the OPENAI_API_KEY environment variable")
            .with_suggestion("Regenerate the key in the provider console");
        bad.fail_classified(t0, &error).unwrap();
        let run = RunResult {
            responses: Vec::new(),
            statuses: vec![bad],
            timing: Timing::instant(t0),
        };

        let summary =
            CompletionSummarizer::new(false).summarize(&SummaryInput::from_run(&run, None, "r"));

        assert_eq!(
            summary.error_details.unwrap(),
            vec![
                "openai:gpt-4o [ApiError]: Invalid API key\n    \
                 Suggestion: Check the OPENAI_API_KEY environment variable"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_write_failures_are_listed() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut ok = QueryStatusRecord::pending("openai:gpt-4o");
        ok.start(t0).unwrap();
        ok.succeed(t0).unwrap();
        let run = RunResult {
            responses: Vec::new(),
            statuses: vec![ok],
            timing: Timing::instant(t0),
        };

        let path = PathBuf::from("out/r/openai-gpt-4o.md");
        let mut detail = FileWriteDetail::pending("openai:gpt-4o", "openai-gpt-4o.md", &path, t0);
        let error = PrismError::permission("Permission denied (EACCES)")
            .with_suggestion("Choose a directory you own with --output-dir");
        detail.fail_classified(t0, &error);
        let writes = FileOutputResult {
            output_directory: PathBuf::from("out/r"),
            files: vec![detail],
            succeeded_writes: 0,
            failed_writes: 1,
            timing: Timing::instant(t0),
        };

        let input = SummaryInput::from_run(&run, Some(&writes), "r");
        assert_eq!(input.failure_count, 0);
        assert_eq!(
            input.errors,
            vec![SummaryError {
                model_key: path.display().to_string(),
                message: "Permission denied (EACCES)".to_string(),
                category: Some(ErrorCategory::Permission),
                suggestion: Some("Choose a directory you own with --output-dir".to_string()),
            }]
        );

        let summary = CompletionSummarizer::new(false).summarize(&input);
        assert!(summary.summary_text.starts_with("Run finished with errors: r"));
        assert!(summary.summary_text.contains("0 written, 1 failed"));
        let details = summary.error_details.unwrap();
        assert_eq!(details.len(), 1);
        assert!(details[0].starts_with(&format!(
            "{} [PermissionError]: Permission denied (EACCES)",
            path.display()
        )));
        assert!(details[0].ends_with("Suggestion: Choose a directory you own with --output-dir"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(850), "850ms");
        assert_eq!(format_duration(61_500), "61.50s");
    }
}
