//! Document file handling
//!
//! `FileManager` tracks the document currently being edited and owns the
//! user settings, so opened and saved files land in the recent list and
//! auto-save follows the configured switch.

use crate::config::{get_autosave_dir, Settings};
use crate::error::{Error, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// File extensions recognized as markdown documents.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd", "mkdn", "mdx"];

/// Check whether a path carries one of the markdown extensions (case-insensitive).
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Basic facts about the current file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// State of the document being edited.
#[derive(Debug, Default)]
pub struct FileManager {
    current_file: Option<PathBuf>,
    is_modified: bool,
    auto_save_content: String,
    settings: Settings,
}

impl FileManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Forget the current file and start an untitled document.
    pub fn new_file(&mut self) {
        self.current_file = None;
        self.is_modified = false;
        self.auto_save_content.clear();
    }

    /// Read a markdown file and make it the current file.
    pub fn open_file(&mut self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        if !is_markdown_file(path) {
            return Err(Error::NotMarkdown(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        self.current_file = Some(path.to_path_buf());
        self.is_modified = false;
        self.settings.add_recent_file(path.to_path_buf());
        info!("Opened {}", path.display());
        Ok(content)
    }

    /// Write `content` to `path`, or to the current file when `path` is `None`.
    ///
    /// Missing parent directories are created. On success the written path
    /// becomes the current file, joins the recent list and the document is
    /// marked clean.
    pub fn save_file(&mut self, content: &str, path: Option<&Path>) -> Result<PathBuf> {
        let target = match path {
            Some(p) => p.to_path_buf(),
            None => self.current_file.clone().ok_or(Error::NoFilePath)?,
        };

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::FileWrite {
                path: target.clone(),
                source,
            })?;
        }

        fs::write(&target, content).map_err(|source| Error::FileWrite {
            path: target.clone(),
            source,
        })?;

        self.current_file = Some(target.clone());
        self.is_modified = false;
        self.settings.add_recent_file(target.clone());
        info!("Saved {}", target.display());
        Ok(target)
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.is_modified = modified;
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Remember the text that the next auto-save should write.
    pub fn set_auto_save_content(&mut self, content: impl Into<String>) {
        self.auto_save_content = content.into();
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Snapshot unsaved changes into the auto-save directory.
    pub fn auto_save(&self) -> Option<PathBuf> {
        match get_autosave_dir() {
            Ok(dir) => self.auto_save_to(&dir),
            Err(e) => {
                warn!("Auto-save skipped: {}", e);
                None
            }
        }
    }

    /// Write a snapshot of unsaved changes into `dir`.
    ///
    /// Returns the snapshot path, or `None` when auto-save is switched off,
    /// there is nothing to save, or the write failed (failures are logged).
    pub fn auto_save_to(&self, dir: &Path) -> Option<PathBuf> {
        if !self.settings.auto_save || !self.is_modified || self.auto_save_content.is_empty() {
            return None;
        }

        let stem = self
            .current_file
            .as_deref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");
        let target = dir.join(format!("{}_autosave.md", stem));

        let written = fs::create_dir_all(dir).and_then(|_| fs::write(&target, &self.auto_save_content));
        match written {
            Ok(()) => {
                debug!("Auto-saved to {}", target.display());
                Some(target)
            }
            Err(e) => {
                warn!("Auto-save to {} failed: {}", target.display(), e);
                None
            }
        }
    }

    /// Name, size and modification time of the current file, if it exists.
    pub fn file_info(&self) -> Option<FileInfo> {
        let path = self.current_file.as_ref()?;
        let metadata = fs::metadata(path).ok()?;
        Some(FileInfo {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.clone(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
