//! Export format and document wrapping options

use crate::config::{Settings, Theme};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Export Format
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Standalone HTML file with embedded styles
    #[default]
    HtmlFile,
    /// PDF document (not implemented)
    Pdf,
}

impl ExportFormat {
    /// Extension used for a default output path.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::HtmlFile => "html",
            ExportFormat::Pdf => "pdf",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Options
// ─────────────────────────────────────────────────────────────────────────────

/// Options controlling document export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Document title; falls back to the front matter `title`, then a generic one
    pub title: Option<String>,
    /// Embed the stylesheet for highlighted code
    pub include_syntax_css: bool,
    /// Place the table of contents above the body
    pub include_toc: bool,
    pub theme: Theme,
    /// syntect theme used for the code stylesheet
    pub syntax_theme: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            title: None,
            include_syntax_css: true,
            include_toc: false,
            theme: Theme::default(),
            syntax_theme: String::from("InspiredGitHub"),
        }
    }
}

impl ExportOptions {
    /// Options following the user's appearance settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            theme: settings.theme,
            syntax_theme: settings.syntax_theme.clone(),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_toc(mut self, include_toc: bool) -> Self {
        self.include_toc = include_toc;
        self
    }
}
