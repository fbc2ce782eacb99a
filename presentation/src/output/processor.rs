//! Output Processor
//!
//! Turns a run's responses into file artifacts, the run directory path and
//! the console report. Performs no I/O.

use super::console::ConsoleFormatter;
use super::filename::{FilenameAllocator, response_filename};
use super::markdown::render_response;
use super::style::Palette;
use chrono::{DateTime, Utc};
use prism_domain::{FileArtifact, LlmResponse};
use std::path::PathBuf;

/// Options controlling artifact and report generation
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub include_metadata: bool,
    /// Prefix grouped responses' filenames with the group name
    pub group_prefix: bool,
    /// Base directory for the run directory; `.` when unset
    pub output_directory: Option<PathBuf>,
    /// Run directory name; derived from the generation time when unset
    pub run_name: Option<String>,
    pub use_table: bool,
    pub use_colors: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            include_metadata: true,
            group_prefix: true,
            output_directory: None,
            run_name: None,
            use_table: false,
            use_colors: false,
        }
    }
}

/// Everything the write phase and the console need from one run
#[derive(Debug, Clone)]
pub struct ProcessedOutput {
    pub files: Vec<FileArtifact>,
    pub run_name: String,
    pub directory_path: PathBuf,
    pub console_output: String,
}

/// Default run name for a generation time: `run-YYYYMMDD-HHMMSS`
pub fn default_run_name(at: DateTime<Utc>) -> String {
    at.format("run-%Y%m%d-%H%M%S").to_string()
}

pub struct OutputProcessor {
    options: ProcessOptions,
}

impl OutputProcessor {
    pub fn new(options: ProcessOptions) -> Self {
        Self { options }
    }

    /// Run name and directory, known before any response arrives
    pub fn run_location(&self, generated_at: DateTime<Utc>) -> (String, PathBuf) {
        let run_name = self
            .options
            .run_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| default_run_name(generated_at));
        let directory = self
            .options
            .output_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(&run_name);
        (run_name, directory)
    }

    pub fn process(&self, responses: &[LlmResponse], generated_at: DateTime<Utc>) -> ProcessedOutput {
        let (run_name, directory_path) = self.run_location(generated_at);

        let mut names = FilenameAllocator::new();
        let files = responses
            .iter()
            .map(|response| {
                let filename = names.claim(response_filename(response, self.options.group_prefix));
                let content =
                    render_response(response, generated_at, self.options.include_metadata);
                FileArtifact::new(filename, content, &response.config_key)
            })
            .collect();

        let console_output =
            ConsoleFormatter::new(self.options.use_table, Palette::new(self.options.use_colors))
                .format(responses);

        ProcessedOutput {
            files,
            run_name,
            directory_path,
            console_output,
        }
    }
}
