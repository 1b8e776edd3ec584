//! Markdown file validation, the current document, recent files and auto-save

mod manager;

pub use manager::{is_markdown_file, FileInfo, FileManager, MARKDOWN_EXTENSIONS};
