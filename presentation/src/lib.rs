//! Presentation layer for llm-prism
//!
//! This crate contains the CLI definition, output processing, the
//! completion summary and progress reporters.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use config::OutputConfig;
pub use output::Palette;
pub use output::console::ConsoleFormatter;
pub use output::error::render_error;
pub use output::processor::{OutputProcessor, ProcessOptions, ProcessedOutput};
pub use output::summary::{CompletionSummarizer, Summary, SummaryError, SummaryInput};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
