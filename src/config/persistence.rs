//! Loading and saving `config.json`
//!
//! The file lives in the platform config directory (`~/.config/mdpress` on
//! Linux, `%APPDATA%\mdpress` on Windows, `~/Library/Application Support/mdpress`
//! on macOS). A missing, empty or corrupt file means default settings.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "mdpress";

const CONFIG_FILE_NAME: &str = "config.json";

/// Written first, then renamed over the real file.
const CONFIG_TEMP_NAME: &str = "config.json.bak";

pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Where auto-save snapshots go (`~/.mdpress/autosave`).
pub fn get_autosave_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(format!(".{}", APP_NAME)).join("autosave"))
        .ok_or(Error::ConfigDirNotFound)
}

/// Settings from the default location, or defaults with a warning.
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

pub fn load_config_from(config_path: &Path) -> Result<Settings> {
    if !config_path.exists() {
        debug!("No config at {}, using defaults", config_path.display());
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(config_path).map_err(|e| Error::ConfigLoad {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| Error::ConfigParse {
        message: format!("{}: {}", config_path.display(), e),
        source: Some(Box::new(e)),
    })?;

    debug!("Loaded configuration from {}", config_path.display());
    Ok(settings)
}

pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(settings, &get_config_file_path()?)
}

/// Write `settings` next to `config_path` and rename it into place.
pub fn save_config_to(settings: &Settings, config_path: &Path) -> Result<()> {
    let save_error = |path: &Path, e: Box<dyn std::error::Error + Send + Sync>| Error::ConfigSave {
        path: path.to_path_buf(),
        source: e,
    };

    let config_dir = config_path.parent().ok_or(Error::ConfigDirNotFound)?;
    fs::create_dir_all(config_dir).map_err(|e| save_error(config_dir, Box::new(e)))?;

    let json =
        serde_json::to_string_pretty(settings).map_err(|e| save_error(config_path, Box::new(e)))?;

    let temp_path = config_dir.join(CONFIG_TEMP_NAME);
    fs::write(&temp_path, json).map_err(|e| save_error(&temp_path, Box::new(e)))?;
    fs::rename(&temp_path, config_path).map_err(|e| save_error(config_path, Box::new(e)))?;

    info!("Configuration saved to {}", config_path.display());
    Ok(())
}

/// [`save_config`] that only logs failures. Returns whether it succeeded.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use tempfile::TempDir;

    fn config_path(dir: &TempDir) -> PathBuf {
        dir.path().join(APP_NAME).join(CONFIG_FILE_NAME)
    }

    #[test]
    fn test_get_config_file_path() {
        if let Ok(path) = get_config_file_path() {
            assert!(path.to_string_lossy().contains(APP_NAME));
            assert!(path.to_string_lossy().ends_with(CONFIG_FILE_NAME));
        }
    }

    #[test]
    fn test_autosave_dir_under_home() {
        if let Ok(dir) = get_autosave_dir() {
            assert!(dir.ends_with(".mdpress/autosave"));
        }
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = load_config_from(&config_path(&dir)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = config_path(&dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "  \n").unwrap();
        assert_eq!(load_config_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_corrupted_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = config_path(&dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ invalid json }").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = config_path(&dir);
        let mut original = Settings {
            theme: Theme::Dark,
            ..Settings::default()
        };
        original.renderer.keys = false;
        original.add_recent_file(PathBuf::from("/notes/a.md"));

        save_config_to(&original, &path).unwrap();
        assert!(path.exists());
        assert!(!path.with_file_name(CONFIG_TEMP_NAME).exists());

        assert_eq!(load_config_from(&path).unwrap(), original);
    }

    #[test]
    fn test_load_sanitizes_values() {
        let dir = TempDir::new().unwrap();
        let path = config_path(&dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"max_recent_files": 1000}"#).unwrap();

        let settings = load_config_from(&path).unwrap();
        assert_eq!(settings.max_recent_files, Settings::MAX_RECENT_FILES);
    }

    #[test]
    fn test_load_config_graceful_fallback() {
        let settings = load_config();
        assert!(settings.max_recent_files >= 1);
    }
}
