//! Prompt content assembly

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A context file loaded from disk and appended to the prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFile {
    pub path: PathBuf,
    pub content: String,
}

impl ContextFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Language hint for the fenced code block, taken from the extension
    fn fence_language(&self) -> &str {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
    }
}

/// The user prompt as it will be sent to providers (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptContent {
    prompt: String,
    context_files: Vec<PathBuf>,
    rendered: String,
}

impl PromptContent {
    /// Try to create a prompt, returning None if it is empty or whitespace
    pub fn try_new(prompt: impl Into<String>) -> Option<Self> {
        Self::try_with_context(prompt, &[])
    }

    /// Try to create a prompt enriched with context files
    pub fn try_with_context(prompt: impl Into<String>, files: &[ContextFile]) -> Option<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return None;
        }
        let rendered = render(&prompt, files);
        Some(Self {
            prompt,
            context_files: files.iter().map(|f| f.path.clone()).collect(),
            rendered,
        })
    }

    /// The prompt exactly as typed by the user
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The full text sent to providers
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    pub fn context_files(&self) -> impl Iterator<Item = &Path> {
        self.context_files.iter().map(PathBuf::as_path)
    }
}

fn render(prompt: &str, files: &[ContextFile]) -> String {
    if files.is_empty() {
        return prompt.to_string();
    }

    let mut out = String::from(prompt);
    out.push_str("\n\n---\nContext files:\n");
    for file in files {
        out.push_str(&format!(
            "\n### File: {}\n```{}\n{}\n```\n",
            file.path.display(),
            file.fence_language(),
            file.content.trim_end_matches('\n')
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prompt_rejected() {
        assert!(PromptContent::try_new("").is_none());
        assert!(PromptContent::try_new("  \n ").is_none());
    }

    #[test]
    fn test_prompt_without_context_is_verbatim() {
        let prompt = PromptContent::try_new("What is Rust?").unwrap();
        assert_eq!(prompt.rendered(), "What is Rust?");
        assert_eq!(prompt.context_files().count(), 0);
    }

    #[test]
    fn test_context_files_are_fenced() {
        let files = [ContextFile::new("src/main.rs", "fn main() {}\n")];
        let prompt = PromptContent::try_with_context("Review this", &files).unwrap();
        assert_eq!(
            prompt.rendered(),
            "Review this\n\n---\nContext files:\n\n### File: src/main.rs\n```rs\nfn main() {}\n```\n"
        );
        assert_eq!(prompt.prompt(), "Review this");
    }
}
