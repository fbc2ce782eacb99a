//! Console report of a run's responses

use super::style::Palette;
use prism_domain::LlmResponse;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const NO_RESULTS: &str = "No results to display.";

/// Default preview width of the response column in table mode
const PREVIEW_WIDTH: usize = 60;

/// Formats responses for the terminal
pub struct ConsoleFormatter {
    use_table: bool,
    palette: Palette,
    preview_width: usize,
}

impl ConsoleFormatter {
    pub fn new(use_table: bool, palette: Palette) -> Self {
        Self {
            use_table,
            palette,
            preview_width: PREVIEW_WIDTH,
        }
    }

    pub fn with_preview_width(mut self, width: usize) -> Self {
        self.preview_width = width.max(4);
        self
    }

    pub fn format(&self, responses: &[LlmResponse]) -> String {
        if responses.is_empty() {
            return NO_RESULTS.to_string();
        }
        if self.use_table {
            self.table(responses)
        } else {
            self.sections(responses)
        }
    }

    /// Every response in full, one section each
    fn sections(&self, responses: &[LlmResponse]) -> String {
        let mut out = String::new();
        for response in responses {
            let title = format!("=== {} ===", response.config_key);
            match &response.error {
                None => {
                    out.push_str(&self.palette.heading(&title));
                    out.push('\n');
                    out.push_str(response.text.trim_end());
                }
                Some(error) => {
                    out.push_str(&self.palette.err(&title));
                    out.push('\n');
                    out.push_str(&format!("Error: {}", error));
                }
            }
            out.push_str("\n\n");
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
        out
    }

    /// One row per response with a one-line preview
    fn table(&self, responses: &[LlmResponse]) -> String {
        let rows: Vec<[String; 3]> = responses
            .iter()
            .map(|r| {
                let (status, body) = match &r.error {
                    None => ("ok", r.text.as_str()),
                    Some(error) => ("error", error.as_str()),
                };
                [
                    r.config_key.clone(),
                    status.to_string(),
                    fit(&one_line(body), self.preview_width),
                ]
            })
            .collect();

        let header = ["Model", "Status", "Response"];
        let mut widths = header.map(UnicodeWidthStr::width);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.width());
            }
        }

        let mut out = String::new();
        let header_line = join_row(&header.map(str::to_string), &widths);
        out.push_str(&self.palette.heading(&header_line));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        out.push('\n');
        for (row, response) in rows.iter().zip(responses) {
            let line = join_row(row, &widths);
            if response.is_success() {
                out.push_str(&line);
            } else {
                out.push_str(&self.palette.err(&line));
            }
            out.push('\n');
        }
        out
    }
}

fn join_row(cells: &[String; 3], widths: &[usize; 3]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.width());
    format!("{}{}", cell, " ".repeat(fill))
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `width` display columns, marking the cut with `...`.
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let budget = width.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_domain::ModelTarget;

    fn responses() -> Vec<LlmResponse> {
        vec![
            LlmResponse::success(&ModelTarget::new("openai", "gpt-4o"), "Line one.\nLine two."),
            LlmResponse::failure(
                &ModelTarget::new("anthropic", "claude"),
                "Rate limit exceeded",
            ),
        ]
    }

    #[test]
    fn test_empty() {
        let formatter = ConsoleFormatter::new(true, Palette::plain());
        assert_eq!(formatter.format(&[]), "No results to display.");
        let formatter = ConsoleFormatter::new(false, Palette::plain());
        assert_eq!(formatter.format(&[]), NO_RESULTS);
    }

    #[test]
    fn test_sections_show_full_text() {
        let out = ConsoleFormatter::new(false, Palette::plain()).format(&responses());
        assert!(out.contains("=== openai:gpt-4o ===\nLine one.\nLine two.\n"));
        assert!(out.contains("=== anthropic:claude ===\nError: Rate limit exceeded\n"));
    }

    #[test]
    fn test_table_rows_align() {
        let out = ConsoleFormatter::new(true, Palette::plain()).format(&responses());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Model"));
        assert!(lines[2].contains("Line one. Line two."));
        assert!(lines[3].contains("error"));
        let bar = lines[0].find('|').unwrap();
        assert_eq!(lines[2].find('|').unwrap(), bar);
        assert_eq!(lines[3].find('|').unwrap(), bar);
    }

    #[test]
    fn test_table_truncates_preview() {
        let long = LlmResponse::success(&ModelTarget::new("a", "b"), "word ".repeat(100));
        let out = ConsoleFormatter::new(true, Palette::plain())
            .with_preview_width(20)
            .format(&[long]);
        let row = out.lines().nth(2).unwrap();
        assert!(row.ends_with("..."));
        assert!(row.width() < 60);
    }

    #[test]
    fn test_fit_respects_wide_characters() {
        let cut = fit("日本語のテキストです", 9);
        assert!(cut.width() <= 9);
        assert!(cut.ends_with("..."));
        assert_eq!(fit("short", 9), "short");
    }
}
