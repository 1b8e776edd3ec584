//! Error type shared by the file, config, render and export layers
//!
//! `extract`, `render` and `approximate` never return these; they degrade.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    FileNotFound(PathBuf),

    /// Path lacks one of the markdown extensions
    NotMarkdown(PathBuf),

    FileRead { path: PathBuf, source: io::Error },

    FileWrite { path: PathBuf, source: io::Error },

    /// Save without a path while no file is open
    NoFilePath,

    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// `config.json` (or other JSON) did not deserialize
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Neither a config nor a home directory could be resolved
    ConfigDirNotFound,

    /// Highlighter or formatter failure inside the renderer
    Render(String),

    /// Export format that is known but has no backend
    ExportUnsupported(&'static str),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
            Error::NotMarkdown(path) => write!(f, "Not a markdown file: {}", path.display()),
            Error::FileRead { path, source } => {
                write!(f, "Error opening file '{}': {}", path.display(), source)
            }
            Error::FileWrite { path, source } => {
                write!(f, "Error saving file '{}': {}", path.display(), source)
            }
            Error::NoFilePath => write!(f, "No file path specified"),
            Error::ConfigLoad { path, source } => {
                write!(f, "Cannot read config '{}': {}", path.display(), source)
            }
            Error::ConfigSave { path, source } => {
                write!(f, "Cannot write config '{}': {}", path.display(), source)
            }
            Error::ConfigParse { message, .. } => write!(f, "Invalid config: {}", message),
            Error::ConfigDirNotFound => write!(f, "No config directory available"),
            Error::Render(msg) => write!(f, "{}", msg),
            Error::ExportUnsupported(format) => {
                write!(f, "{} export is not implemented", format.to_uppercase())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileRead { source, .. } | Error::FileWrite { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } | Error::ConfigSave { source, .. } => {
                Some(source.as_ref())
            }
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::FileNotFound(_)
            | Error::NotMarkdown(_)
            | Error::NoFilePath
            | Error::ConfigDirNotFound
            | Error::Render(_)
            | Error::ExportUnsupported(_) => None,
        }
    }
}

pub trait ResultExt<T> {
    /// Log the error as a warning and fall back to `default`.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_display_file_not_found() {
        let err = Error::FileNotFound(PathBuf::from("missing.md"));
        assert_eq!(err.to_string(), "File not found: missing.md");
    }

    #[test]
    fn test_display_not_markdown() {
        let err = Error::NotMarkdown(PathBuf::from("notes.txt"));
        assert_eq!(err.to_string(), "Not a markdown file: notes.txt");
    }

    #[test]
    fn test_display_file_write() {
        let err = Error::FileWrite {
            path: PathBuf::from("/ro/out.md"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Error saving file '/ro/out.md': denied");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_display_export_unsupported() {
        let err = Error::ExportUnsupported("pdf");
        assert_eq!(err.to_string(), "PDF export is not implemented");
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_result: std::result::Result<String, _> = serde_json::from_str("invalid json");
        let err = Error::from(json_result.unwrap_err());
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_source_none_for_simple_variants() {
        assert!(Error::ConfigDirNotFound.source().is_none());
        assert!(Error::Render("boom".to_string()).source().is_none());
        assert!(Error::NoFilePath.source().is_none());
    }

    #[test]
    fn test_unwrap_or_warn_default() {
        let ok: Result<i32> = Ok(42);
        assert_eq!(ok.unwrap_or_warn_default(0, "ctx"), 42);

        let err: Result<i32> = Err(Error::NoFilePath);
        assert_eq!(err.unwrap_or_warn_default(0, "ctx"), 0);
    }
}
