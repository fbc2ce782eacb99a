//! User-facing rendering of classified errors

use super::style::Palette;
use prism_domain::PrismError;
use std::error::Error as _;

/// Render an error with its category, cause chain, suggestions and examples.
pub fn render_error(error: &PrismError, palette: Palette) -> String {
    let mut lines = vec![format!(
        "{} {}",
        palette.err(&format!("{}:", error.category().label())),
        error.message()
    )];

    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if text != error.message() {
            lines.push(palette.dim(&format!("  caused by: {}", text)));
        }
        source = cause.source();
    }

    if !error.suggestions().is_empty() {
        lines.push(String::new());
        lines.push(palette.heading("Suggestions:"));
        lines.extend(error.suggestions().iter().map(|s| format!("  - {}", s)));
    }

    if !error.examples().is_empty() {
        lines.push(String::new());
        lines.push(palette.heading("Examples:"));
        lines.extend(error.examples().iter().map(|e| format!("  {}", e)));
    }

    lines.join("\n")
}
