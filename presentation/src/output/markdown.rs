//! Markdown rendering of a single response

use chrono::{DateTime, SecondsFormat, Utc};
use prism_domain::LlmResponse;
use std::fmt::Write;

/// Render one response as a markdown document.
///
/// Errors replace the `## Response` section entirely. Metadata is rendered
/// as canonical JSON (sorted keys) so reruns diff cleanly.
pub fn render_response(
    response: &LlmResponse,
    generated_at: DateTime<Utc>,
    include_metadata: bool,
) -> String {
    let mut out = String::new();

    match &response.group {
        Some(group) => {
            let _ = writeln!(out, "# {} ({} group)", response.config_key, group.name);
        }
        None => {
            let _ = writeln!(out, "# {}", response.config_key);
        }
    }
    out.push('\n');
    let _ = writeln!(
        out,
        "Generated: {}",
        generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    );

    if let Some(group) = &response.group {
        let _ = writeln!(out, "Group: {}", group.name);
        if include_metadata && let Some(prompt) = &response.system_prompt {
            let _ = writeln!(out, "System Prompt: \"{}\"", prompt);
        }
    }

    match &response.error {
        Some(error) => {
            let _ = write!(out, "\n## Error\n\n{}\n", error);
        }
        None => {
            let _ = write!(out, "\n## Response\n\n{}\n", response.text);
        }
    }

    if include_metadata && let Some(metadata) = &response.metadata {
        let _ = write!(
            out,
            "\n## Metadata\n\n```json\n{}\n```\n",
            metadata.to_canonical_json()
        );
    }

    out
}
