//! Domain layer for llm-prism
//!
//! This crate contains the core value objects and pure logic of a run.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Run
//!
//! One invocation of the pipeline: a prompt is sent to every selected
//! [`ModelTarget`], each target gets a [`QueryStatusRecord`] and exactly one
//! [`LlmResponse`], and the responses become [`FileArtifact`]s written into
//! a single run directory.
//!
//! ## Error taxonomy
//!
//! Failures at any boundary are classified into a [`PrismError`] carrying an
//! [`ErrorCategory`] and remediation suggestions (see [`error::classify`]).

pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod prompt;
pub mod query;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, ConfiguredModel, ModelGroup, ModelsConfig, Severity};
pub use core::{
    string::{sanitize_filename_component, truncate},
    target::{GroupInfo, ModelTarget, config_key, split_config_key},
    timing::{Timing, elapsed_ms},
};
pub use error::{
    ClassifyContext, ErrorCategory, ErrorKind, Failure, OsErrorCode, OsFailure, PrismError,
    classify,
};
pub use output::{
    artifact::FileArtifact,
    write::{FileOutputResult, FileWriteDetail, WriteStatus},
};
pub use prompt::{ContextFile, PromptContent};
pub use query::{
    response::{LlmResponse, ResponseMetadata, TokenUsage},
    run::RunResult,
    status::{QueryStatus, QueryStatusRecord, StatusTransitionError},
};
