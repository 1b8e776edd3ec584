//! Persisted user settings
//!
//! Everything here round-trips through `config.json`; unknown or missing
//! keys fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::markdown::RendererOptions;

/// Color theme for exported documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    /// syntect theme used for code in exported documents
    pub syntax_theme: String,

    /// Markdown extensions enabled for rendering and export
    pub renderer: RendererOptions,

    /// Write snapshots of unsaved documents to the auto-save directory
    pub auto_save: bool,

    /// Most recently opened or saved files, newest first
    pub recent_files: Vec<PathBuf>,
    pub max_recent_files: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            syntax_theme: String::from("InspiredGitHub"),
            renderer: RendererOptions::default(),
            auto_save: true,
            recent_files: Vec::new(),
            max_recent_files: 10,
        }
    }
}

impl Settings {
    /// Upper bound for `max_recent_files`.
    pub const MAX_RECENT_FILES: usize = 100;

    /// Move `path` to the front of the recent list, trimming the tail.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Drop recent files that no longer exist on disk and return the rest.
    pub fn existing_recent_files(&mut self) -> &[PathBuf] {
        self.recent_files.retain(|p| p.exists());
        &self.recent_files
    }

    /// Clamp hand-edited values back into range.
    pub fn sanitize(&mut self) {
        self.max_recent_files = match self.max_recent_files {
            0 => Settings::default().max_recent_files,
            n => n.min(Self::MAX_RECENT_FILES),
        };
        self.recent_files.truncate(self.max_recent_files);

        if self.renderer.code_css_class.trim().is_empty() {
            self.renderer.code_css_class = RendererOptions::default().code_css_class;
        }
    }

    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
