//! mdpress - Markdown processing core
//!
//! Front matter extraction, markdown to HTML rendering with a fixed extension
//! set, and a lossy HTML to markdown approximation, plus the file, settings
//! and export collaborators built around them.

pub mod config;
pub mod error;
pub mod export;
pub mod files;
pub mod markdown;

pub use error::{Error, Result};
pub use markdown::{
    approximate, extract, render_to_html, FrontMatter, MarkdownRenderer, Metadata, Rendered,
    RendererOptions,
};
