//! Presentation-level configuration
//!
//! Output settings resolved from the config file, then overridden by CLI
//! flags.

use crate::cli::commands::Cli;
use crate::output::processor::ProcessOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base directory for run directories
    pub directory: Option<PathBuf>,
    pub include_metadata: bool,
    pub group_prefix: bool,
    pub use_table: bool,
    /// Enable colored terminal output
    pub color: bool,
    /// Abort the write phase on the first failed file
    pub throw_on_error: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            include_metadata: true,
            group_prefix: true,
            use_table: false,
            color: true,
            throw_on_error: false,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// Apply CLI overrides. Flags only ever switch a setting away from its
    /// default, so an absent flag keeps the file value.
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(dir) = &cli.output_dir {
            self.directory = Some(dir.clone());
        }
        if cli.no_metadata {
            self.include_metadata = false;
        }
        if cli.no_group_prefix {
            self.group_prefix = false;
        }
        if cli.table {
            self.use_table = true;
        }
        if cli.no_color {
            self.color = false;
        }
        if cli.fail_fast {
            self.throw_on_error = true;
        }
        if cli.quiet {
            self.show_progress = false;
        }
        self
    }

    pub fn to_process_options(&self, run_name: Option<String>) -> ProcessOptions {
        ProcessOptions {
            include_metadata: self.include_metadata,
            group_prefix: self.group_prefix,
            output_directory: self.directory.clone(),
            run_name,
            use_table: self.use_table,
            use_colors: self.color,
        }
    }
}
