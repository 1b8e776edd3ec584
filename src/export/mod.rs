//! Export of markdown documents as standalone files
//!
//! HTML is written in full. PDF is accepted as a format but reported as
//! [`crate::Error::ExportUnsupported`].

pub mod html;
pub mod options;

pub use html::{export_markdown, export_to_file, generate_html_document};
pub use options::{ExportFormat, ExportOptions};
