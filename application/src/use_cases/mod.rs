//! Use cases
//!
//! Application-level operations that orchestrate domain logic:
//! select targets, fan the prompt out, persist the results.

pub mod run_query;
pub mod select_models;
pub mod write_output;
