use colored::{ColoredString, Colorize};

/// Applies terminal colors only when enabled
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.enabled {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint(text, |s| s.cyan().bold())
    }

    pub fn ok(&self, text: &str) -> String {
        self.paint(text, |s| s.green())
    }

    pub fn warn(&self, text: &str) -> String {
        self.paint(text, |s| s.yellow())
    }

    pub fn err(&self, text: &str) -> String {
        self.paint(text, |s| s.red().bold())
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, |s| s.dimmed())
    }
}
