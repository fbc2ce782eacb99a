//! File artifact value object

use serde::{Deserialize, Serialize};

/// A file to be written: name relative to the run directory plus content.
///
/// Derived deterministically from one [`LlmResponse`](crate::LlmResponse);
/// holds no disk resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileArtifact {
    pub filename: String,
    pub content: String,
    /// Config key of the response this artifact was derived from
    pub model_key: String,
}

impl FileArtifact {
    pub fn new(
        filename: impl Into<String>,
        content: impl Into<String>,
        model_key: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            model_key: model_key.into(),
        }
    }
}
