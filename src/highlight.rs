//! Syntax highlighting for generated code using syntect.

use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Cached syntax highlighting resources.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Highlighter using the named bundled theme. Unknown names fall back to
    /// the default theme.
    pub fn with_theme(theme_name: &str) -> Self {
        let theme_set = ThemeSet::load_defaults();
        let theme_name = if theme_set.themes.contains_key(theme_name) {
            theme_name.to_string()
        } else {
            tracing::warn!("Unknown theme {theme_name}, using {DEFAULT_THEME}");
            DEFAULT_THEME.to_string()
        };
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set,
            theme_name,
        }
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Highlight JavaScript/JSX code and return styled spans.
    pub fn highlight_js<'a>(&self, code: &'a str) -> Vec<(Style, &'a str)> {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension("js")
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self.theme() else {
            return vec![(Style::default(), code)];
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut result = Vec::new();

        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => result.extend(ranges),
                Err(e) => {
                    // Fallback to plain text on error
                    tracing::debug!("highlighting failed: {e}");
                    result.push((Style::default(), line));
                }
            }
        }

        result
    }

    /// Render code with 24-bit terminal colour escapes, resetting at the end.
    pub fn terminal(&self, code: &str) -> String {
        let spans = self.highlight_js(code);
        let mut out = as_24_bit_terminal_escaped(&spans, false);
        out.push_str("\x1b[0m");
        out
    }
}
