//! Prompt domain
//!
//! The prompt sent to every target, optionally enriched with context files.

mod content;

pub use content::{ContextFile, PromptContent};
