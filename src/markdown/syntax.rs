//! syntect highlighting for fenced and inline code
//!
//! Output is class-based, so fragments stay theme independent and the
//! exported document carries the colors via [`SyntaxHighlighter::theme_css`].

use crate::error::{Error, Result};
use log::debug;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::html_escape;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Used for dark documents when the configured theme is missing.
pub const DEFAULT_DARK_THEME: &str = "base16-ocean.dark";

pub const DEFAULT_LIGHT_THEME: &str = "InspiredGitHub";

pub const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Class style used for every generated span.
const CLASS_STYLE: ClassStyle = ClassStyle::Spaced;

/// Loaded syntect sets. Read-only once built; share it via [`get_highlighter`].
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        debug!(
            "Loaded {} syntaxes and {} themes",
            syntax_set.syntaxes().len(),
            theme_set.themes.len()
        );
        Self {
            syntax_set,
            theme_set,
        }
    }

    /// `name`, else the default for the mode, else [`FALLBACK_THEME`].
    pub fn theme_by_name_or_mode(&self, name: &str, dark_mode: bool) -> Option<&Theme> {
        let mode_default = if dark_mode {
            DEFAULT_DARK_THEME
        } else {
            DEFAULT_LIGHT_THEME
        };
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.get(mode_default))
            .or_else(|| self.theme_set.themes.get(FALLBACK_THEME))
    }

    /// Highlight `code` as `language` into class-annotated HTML spans.
    ///
    /// The output contains no wrapping `<pre>`/`<code>` element. Unknown
    /// languages yield HTML-escaped plain text.
    pub fn highlight_to_html(&self, code: &str, language: &str) -> Result<String> {
        let Some(syntax) = self.find_syntax_for_language(language) else {
            debug!("Unknown fence language {:?}, emitting plain text", language);
            return Ok(html_escape(code));
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| Error::Render(format!("Failed to highlight {}: {}", language, e)))?;
        }
        Ok(generator.finalize())
    }

    /// Stylesheet for the spans produced by [`Self::highlight_to_html`].
    pub fn theme_css(&self, theme_name: &str, dark_mode: bool) -> Result<String> {
        let theme = self
            .theme_by_name_or_mode(theme_name, dark_mode)
            .ok_or_else(|| Error::Render(format!("Unknown syntax theme: {}", theme_name)))?;
        css_for_theme_with_class_style(theme, CLASS_STYLE)
            .map_err(|e| Error::Render(format!("Failed to build syntax CSS: {}", e)))
    }

    /// Resolve a fence language tag by file extension or syntax name.
    fn find_syntax_for_language(&self, language: &str) -> Option<&SyntaxReference> {
        if language.is_empty() {
            return None;
        }
        let lower = language.to_lowercase();
        let token = match lower.as_str() {
            "csharp" | "c#" => "cs",
            "golang" => "go",
            "shell" | "zsh" | "console" => "sh",
            "make" => "Makefile",
            other => other,
        };
        self.syntax_set.find_syntax_by_token(token)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Highlighter Instance
// ─────────────────────────────────────────────────────────────────────────────

use std::sync::OnceLock;

static HIGHLIGHTER: OnceLock<SyntaxHighlighter> = OnceLock::new();

/// Highlighter shared by every renderer, loaded on first use.
pub fn get_highlighter() -> &'static SyntaxHighlighter {
    HIGHLIGHTER.get_or_init(SyntaxHighlighter::new)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
