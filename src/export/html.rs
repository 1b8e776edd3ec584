//! Standalone HTML documents with inlined theme and code CSS

use crate::config::Theme;
use crate::error::{Error, Result};
use crate::export::options::{ExportFormat, ExportOptions};
use crate::markdown::syntax::get_highlighter;
use crate::markdown::{extract, html_escape, MarkdownRenderer};
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

/// Title used when neither the options nor the front matter provide one.
const DEFAULT_TITLE: &str = "Exported Document";

/// Loads mermaid and renders every `div.mermaid` on page load.
const MERMAID_SCRIPT: &str = r#"<script type="module">
import mermaid from "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs";
mermaid.initialize({ startOnLoad: true });
</script>"#;

// ─────────────────────────────────────────────────────────────────────────────
// Document Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Wrap a rendered HTML fragment into a complete document.
///
/// The mermaid loader is only included when the fragment holds a diagram.
pub fn generate_html_document(fragment: &str, options: &ExportOptions) -> String {
    let title = options.title.as_deref().unwrap_or(DEFAULT_TITLE);

    let syntax_css = if options.include_syntax_css {
        get_highlighter()
            .theme_css(&options.syntax_theme, options.theme.is_dark())
            .unwrap_or_else(|e| {
                warn!("Skipping code stylesheet: {}", e);
                String::new()
            })
    } else {
        String::new()
    };

    let scripts = if contains_mermaid(fragment) {
        MERMAID_SCRIPT
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="mdpress">
    <title>{title}</title>
    <style>
{base_css}
{theme_css}
{syntax_css}
    </style>
</head>
<body>
    <article class="markdown-body">
{body}
    </article>
{scripts}
</body>
</html>"#,
        title = html_escape(title),
        base_css = BASE_CSS,
        theme_css = theme_css(options.theme),
        syntax_css = syntax_css,
        body = fragment,
        scripts = scripts,
    )
}

/// Render markdown and wrap it into a complete document.
///
/// Without an explicit title the front matter `title` is used.
pub fn export_markdown(
    source: &str,
    renderer: &MarkdownRenderer,
    options: &ExportOptions,
) -> Result<String> {
    if options.format == ExportFormat::Pdf {
        return Err(Error::ExportUnsupported("pdf"));
    }

    let rendered = renderer.render_with_toc(source);
    let body = if options.include_toc && !rendered.toc.is_empty() {
        format!("{}\n{}", rendered.toc, rendered.html)
    } else {
        rendered.html
    };

    let mut options = options.clone();
    if options.title.is_none() {
        options.title = extract(source).remove("title");
    }
    debug!("Exporting document titled {:?}", options.title);

    Ok(generate_html_document(&body, &options))
}

/// Export markdown source to a file in the requested format.
pub fn export_to_file(
    source: &str,
    renderer: &MarkdownRenderer,
    output_path: &Path,
    options: &ExportOptions,
) -> Result<()> {
    let html = export_markdown(source, renderer, options)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::FileWrite {
            path: output_path.to_path_buf(),
            source,
        })?;
    }
    fs::write(output_path, html).map_err(|source| Error::FileWrite {
        path: output_path.to_path_buf(),
        source,
    })?;

    info!("Exported HTML to {}", output_path.display());
    Ok(())
}

fn contains_mermaid(fragment: &str) -> bool {
    fragment.contains(r#"<div class="mermaid">"#)
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Layout and typography shared by both themes.
const BASE_CSS: &str = r#"
*, *::before, *::after { box-sizing: border-box; }

body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    font-size: 16px;
    line-height: 1.6;
}

.markdown-body {
    max-width: 800px;
    margin: 0 auto;
    padding: 20px;
}

.markdown-body h1, .markdown-body h2, .markdown-body h3,
.markdown-body h4, .markdown-body h5, .markdown-body h6 {
    margin: 24px 0 16px;
    font-weight: 600;
    line-height: 1.25;
}

.markdown-body h1, .markdown-body h2 { border-bottom: 1px solid; padding-bottom: 0.3em; }
.markdown-body p, .markdown-body ul, .markdown-body ol, .markdown-body table { margin: 0 0 16px; }
.markdown-body ul, .markdown-body ol { padding-left: 2em; }
.markdown-body ul.contains-task-list { list-style-type: none; padding-left: 1em; }
.markdown-body blockquote { margin: 0 0 16px; padding: 0 1em; border-left: 4px solid; }

.markdown-body code, .markdown-body kbd {
    font-family: 'JetBrains Mono', 'Fira Code', Consolas, monospace;
    font-size: 0.9em;
}
.markdown-body code { padding: 0.2em 0.4em; border-radius: 4px; }
.markdown-body pre { padding: 16px; overflow: auto; border-radius: 6px; line-height: 1.45; }
.markdown-body pre code { padding: 0; background: transparent; }

.markdown-body table { border-collapse: collapse; }
.markdown-body th, .markdown-body td { padding: 6px 12px; border: 1px solid; }
.markdown-body img { max-width: 100%; }
.markdown-body hr { height: 2px; margin: 24px 0; border: none; }

.markdown-body kbd.key, .markdown-body kbd.keys > kbd {
    padding: 0.1em 0.4em;
    border: 1px solid;
    border-radius: 3px;
}
.markdown-body mark { padding: 0 0.15em; }
.markdown-body .toc { margin-bottom: 24px; }
.markdown-body .mermaid { text-align: center; }
"#;

/// Colors for the selected theme.
fn theme_css(theme: Theme) -> String {
    let (bg, text, border, link, code_bg, mark_bg) = match theme {
        Theme::Light => ("#ffffff", "#333333", "#d0d7de", "#0969da", "#f6f8fa", "#fff3a3"),
        Theme::Dark => ("#1e1e1e", "#d4d4d4", "#3c3c3c", "#4fc1ff", "#2d2d2d", "#6b5a00"),
    };

    format!(
        r#"
:root {{ color-scheme: {scheme}; }}
body {{ background-color: {bg}; color: {text}; }}
.markdown-body h1, .markdown-body h2, .markdown-body blockquote,
.markdown-body th, .markdown-body td, .markdown-body kbd {{ border-color: {border}; }}
.markdown-body hr {{ background-color: {border}; }}
.markdown-body a {{ color: {link}; }}
.markdown-body code, .markdown-body pre, .markdown-body kbd {{ background-color: {code_bg}; }}
.markdown-body mark {{ background-color: {mark_bg}; color: inherit; }}
"#,
        scheme = if theme.is_dark() { "dark" } else { "light" },
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_html_document() {
        let options = ExportOptions::default().with_title("Test Doc");
        let html = generate_html_document("<h1>Test</h1>", &options);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test Doc</title>"));
        assert!(html.contains("<article class=\"markdown-body\">"));
        assert!(html.contains("<h1>Test</h1>"));
        assert!(!html.contains("mermaid.esm"));
    }

    #[test]
    fn test_title_is_escaped() {
        let options = ExportOptions::default().with_title("<A & B>");
        let html = generate_html_document("", &options);
        assert!(html.contains("<title>&lt;A &amp; B&gt;</title>"));
    }

    #[test]
    fn test_mermaid_script_only_with_diagram() {
        let options = ExportOptions::default();
        let html = generate_html_document(r#"<div class="mermaid">graph TD</div>"#, &options);
        assert!(html.contains("mermaid.initialize"));
    }

    #[test]
    fn test_theme_css() {
        assert!(theme_css(Theme::Light).contains("color-scheme: light"));
        assert!(theme_css(Theme::Dark).contains("color-scheme: dark"));
    }

    #[test]
    fn test_syntax_css_toggle() {
        let mut options = ExportOptions::default();
        options.include_syntax_css = false;
        let without = generate_html_document("", &options);
        options.include_syntax_css = true;
        let with = generate_html_document("", &options);
        assert!(with.len() > without.len());
    }

    #[test]
    fn test_export_markdown_uses_front_matter_title() {
        let renderer = MarkdownRenderer::new();
        let html = export_markdown(
            "---\ntitle: Weekly Notes\n---\n# Hi\n",
            &renderer,
            &ExportOptions::default(),
        )
        .unwrap();
        assert!(html.contains("<title>Weekly Notes</title>"));
        assert!(!html.contains("title: Weekly Notes"));
    }

    #[test]
    fn test_export_markdown_with_toc() {
        let renderer = MarkdownRenderer::new();
        let options = ExportOptions::default().with_toc(true);
        let html = export_markdown("# One\n\n## Two\n", &renderer, &options).unwrap();
        assert!(html.contains(r#"<div class="toc">"#));
        assert!(html.contains("href=\"#two\""));
    }

    #[test]
    fn test_export_pdf_unsupported() {
        let renderer = MarkdownRenderer::new();
        let options = ExportOptions::default().with_format(ExportFormat::Pdf);
        let err = export_markdown("# x", &renderer, &options).unwrap_err();
        assert!(matches!(err, Error::ExportUnsupported("pdf")));
    }

    #[test]
    fn test_export_to_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out").join("doc.html");
        let renderer = MarkdownRenderer::new();

        export_to_file("**bold**", &renderer, &output, &ExportOptions::default()).unwrap();
        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("<strong>bold</strong>"));
    }
}
