//! Configuration value objects for the domain layer
//!
//! These describe the configured model catalogue in a serialization-free
//! form. The infrastructure layer parses TOML into these types.

mod models;
pub mod validation;

pub use models::{ConfiguredModel, ModelGroup, ModelsConfig};
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
