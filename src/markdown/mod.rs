//! Markdown processing module
//!
//! This module provides the text-processing core: front matter extraction,
//! markdown to HTML rendering with a fixed extension set (built on comrak and
//! syntect), and a lossy HTML to markdown approximation.
//!
//! # Features
//! - Front matter detection with YAML parsing and a permissive fallback
//! - GitHub Flavored Markdown: tables, task lists, strikethrough, autolinks
//! - Superscript, highlight (`==x==`) and keystroke (`++ctrl+c++`) spans
//! - Syntax highlighting for fenced and inline code
//! - Custom fences (mermaid diagrams pass through untouched)
//! - Table of contents as a side output of each conversion
//!
//! # Example
//! ```ignore
//! use mdpress::markdown::{approximate, extract, MarkdownRenderer};
//!
//! let source = "---\ntitle: Notes\n---\n# Hello\n\n- [x] done";
//! let metadata = extract(source);
//! let html = MarkdownRenderer::new().render(source);
//! let markdown = approximate(&html);
//! ```

pub mod approximate;
pub mod extensions;
pub mod front_matter;
pub mod renderer;
pub mod stats;
pub mod syntax;

pub use approximate::approximate;
pub use extensions::{default_fences, CustomFence, FenceFormatter, FenceRegistry};
pub use front_matter::{extract, parse_front_matter, split_front_matter, FrontMatter, Metadata};
pub use renderer::{default_renderer, render_to_html, MarkdownRenderer, Rendered, RendererOptions};
pub use stats::TextStats;

/// HTML-escape a string.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("Hello"), "Hello");
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_pipeline_extract_render_approximate() {
        let source = "---\ntitle: Notes\n---\n## Agenda\n\n- [ ] todo\n";
        assert_eq!(extract(source)["title"], "Notes");

        let html = render_to_html(source);
        assert!(html.contains("Agenda"));
        assert!(!html.contains("title: Notes"));

        let back = approximate(&html);
        assert!(back.contains("## "));
        assert!(back.contains("Agenda"));
    }
}
