//! Response file naming

use prism_domain::{LlmResponse, sanitize_filename_component};
use std::collections::HashMap;
use tracing::warn;

/// Base filename for one response: `[{group}-]{provider}-{model_id}.md`
pub fn response_filename(response: &LlmResponse, group_prefix: bool) -> String {
    let base = format!(
        "{}-{}",
        sanitize_filename_component(&response.provider),
        sanitize_filename_component(&response.model_id)
    );
    match response.group.as_ref() {
        Some(group) if group_prefix && !group.name.is_empty() => {
            format!("{}-{}.md", sanitize_filename_component(&group.name), base)
        }
        _ => format!("{}.md", base),
    }
}

/// Hands out unique filenames within one run.
///
/// The first claim of a name keeps it; later claims get `-2`, `-3`, ...
/// before the extension.
#[derive(Debug, Default)]
pub struct FilenameAllocator {
    seen: HashMap<String, usize>,
}

impl FilenameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, name: String) -> String {
        let count = self.seen.entry(name.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            return name;
        }

        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) => (stem.to_string(), format!(".{}", ext)),
            None => (name.clone(), String::new()),
        };
        let mut n = *count;
        loop {
            let candidate = format!("{}-{}{}", stem, n, ext);
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(candidate.clone(), 1);
                warn!("Filename {} already used in this run, writing {}", name, candidate);
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_domain::{GroupInfo, ModelTarget};

    fn response(provider: &str, model: &str, group: Option<&str>) -> LlmResponse {
        let mut target = ModelTarget::new(provider, model);
        if let Some(g) = group {
            target = target.with_group(GroupInfo::new(g));
        }
        LlmResponse::success(&target, "ok")
    }

    #[test]
    fn test_plain_filename() {
        assert_eq!(
            response_filename(&response("openai", "gpt-4o", None), true),
            "openai-gpt-4o.md"
        );
    }

    #[test]
    fn test_illegal_characters_are_not_collapsed() {
        assert_eq!(
            response_filename(&response("open.ai", "gpt*4<>?\"", None), true),
            "open_ai-gpt_4____.md"
        );
        assert_eq!(
            response_filename(&response("local", "llama3.1:8b", None), true),
            "local-llama3_1_8b.md"
        );
    }

    #[test]
    fn test_group_prefix() {
        let grouped = response("openai", "gpt-4o", Some("code review"));
        assert_eq!(
            response_filename(&grouped, true),
            "code_review-openai-gpt-4o.md"
        );
        assert_eq!(response_filename(&grouped, false), "openai-gpt-4o.md");
    }

    #[test]
    fn test_allocator_disambiguates() {
        let mut names = FilenameAllocator::new();
        assert_eq!(names.claim("a-b.md".into()), "a-b.md");
        assert_eq!(names.claim("a-b.md".into()), "a-b-2.md");
        assert_eq!(names.claim("a-b.md".into()), "a-b-3.md");
        assert_eq!(names.claim("c.md".into()), "c.md");
    }

    #[test]
    fn test_allocator_skips_names_already_taken() {
        let mut names = FilenameAllocator::new();
        assert_eq!(names.claim("x-2.md".into()), "x-2.md");
        assert_eq!(names.claim("x.md".into()), "x.md");
        assert_eq!(names.claim("x.md".into()), "x-3.md");
    }
}
