//! Markdown to HTML rendering using comrak
//!
//! This module wraps comrak's parser and HTML formatter with a fixed set of
//! extensions chosen at construction time. Each call parses into a fresh
//! arena, so no state survives from one conversion to the next: the table of
//! contents is derived from the same AST the fragment is rendered from and is
//! returned alongside it rather than kept on the renderer.

use comrak::{
    format_html,
    nodes::{Ast, AstNode, NodeCodeBlock, NodeHtmlBlock, NodeValue},
    parse_document, Anchorizer, Arena, Options,
};
use std::cell::RefCell;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::OnceLock;

use super::extensions::{
    default_fences, fence_language, parse_inline_hilite, split_inline_spans, FenceRegistry,
    InlinePiece, InlineSpans,
};
use super::front_matter::split_front_matter;
use super::html_escape;
use super::syntax::get_highlighter;
use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for markdown rendering.
///
/// Established once when the renderer is built; never changed per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Enable superscript (^text^)
    pub superscript: bool,
    /// Enable footnotes
    pub footnotes: bool,
    /// Enable highlight spans (==text==)
    pub mark: bool,
    /// Enable keystroke spans (++ctrl+c++)
    pub keys: bool,
    /// Highlight inline code written as `#!lang code`
    pub inline_hilite: bool,
    /// Highlight fenced and indented code blocks with syntect
    pub highlight_code: bool,
    /// Generate GitHub-style heading anchors
    pub header_ids: bool,
    /// Skip a leading `---` front matter block, detected exactly as `extract` does
    pub strip_front_matter: bool,
    /// Escape a small set of dangerous raw HTML tags (GFM tagfilter)
    pub tagfilter: bool,
    /// CSS class wrapped around highlighted code blocks
    pub code_css_class: String,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            superscript: true,
            footnotes: true,
            mark: true,
            keys: true,
            inline_hilite: true,
            highlight_code: true,
            header_ids: true,
            strip_front_matter: true,
            tagfilter: false,
            code_css_class: "highlight".to_string(),
        }
    }
}

impl RendererOptions {
    /// Convert to comrak Options.
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        // Extension options
        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.superscript = self.superscript;
        options.extension.footnotes = self.footnotes;
        options.extension.tagfilter = self.tagfilter;
        options.extension.header_ids = self.header_ids.then(String::new);

        // Extension output is spliced in as raw HTML nodes
        options.render.unsafe_ = true;

        options
    }

    fn inline_spans(&self) -> InlineSpans {
        InlineSpans {
            mark: self.mark,
            keys: self.keys,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendered Output
// ─────────────────────────────────────────────────────────────────────────────

/// Result of one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// The HTML fragment
    pub html: String,
    /// Table of contents for this fragment (empty when there are no headings)
    pub toc: String,
}

/// A heading collected for the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TocEntry {
    level: u8,
    id: String,
    text: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Converts markdown to HTML fragments with a fixed extension set.
///
/// The renderer is immutable after construction and can be shared across
/// threads by reference.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: RendererOptions,
    fences: FenceRegistry,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Renderer with default options and the stock fence registry.
    pub fn new() -> Self {
        Self::with_options(RendererOptions::default())
    }

    pub fn with_options(options: RendererOptions) -> Self {
        Self::with_registry(options, default_fences())
    }

    pub fn with_registry(options: RendererOptions, fences: FenceRegistry) -> Self {
        debug!(
            "Building markdown renderer with custom fences: {:?}",
            fences.names().collect::<Vec<_>>()
        );
        Self { options, fences }
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    pub fn fences(&self) -> &FenceRegistry {
        &self.fences
    }

    /// Render markdown to an HTML fragment.
    ///
    /// Never fails: an internal error produces a fragment holding a visible
    /// error paragraph instead.
    pub fn render(&self, source: &str) -> String {
        self.render_with_toc(source).html
    }

    /// Render markdown and return the table of contents with the fragment.
    pub fn render_with_toc(&self, source: &str) -> Rendered {
        match self.try_render(source) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!("Markdown conversion failed: {}", e);
                Rendered {
                    html: error_fragment(&e),
                    toc: String::new(),
                }
            }
        }
    }

    /// Fallible conversion used by [`Self::render`] and [`Self::render_with_toc`].
    pub fn try_render(&self, source: &str) -> Result<Rendered> {
        let body = if self.options.strip_front_matter {
            split_front_matter(source).1
        } else {
            source
        };

        let arena = Arena::new();
        let options = self.options.to_comrak_options();
        let root = parse_document(&arena, body, &options);

        self.apply_extensions(&arena, root)?;
        let toc = render_toc(&collect_headings(root));

        let mut output = Vec::with_capacity(source.len() * 2);
        format_html(root, &options, &mut output)
            .map_err(|e| Error::Render(format!("Failed to format HTML: {}", e)))?;
        let html = String::from_utf8(output)
            .map_err(|e| Error::Render(format!("Rendered HTML is not UTF-8: {}", e)))?;

        Ok(Rendered { html, toc })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AST Rewrites
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace nodes handled by our extensions with raw HTML nodes.
    ///
    /// Inline content under an image is left alone: alt text is written as
    /// plain text and would show the generated tags.
    fn apply_extensions<'a>(
        &self,
        arena: &'a Arena<AstNode<'a>>,
        root: &'a AstNode<'a>,
    ) -> Result<()> {
        let spans = self.options.inline_spans();
        let nodes: Vec<&'a AstNode<'a>> = root.descendants().collect();

        for node in nodes {
            let rewrite = {
                let ast = node.data.borrow();
                match &ast.value {
                    NodeValue::CodeBlock(block) => {
                        self.render_code_block(block)?.map(Rewrite::Replace)
                    }
                    NodeValue::Code(code) if self.options.inline_hilite && !in_image(node) => {
                        self.render_inline_code(&code.literal)?.map(Rewrite::Replace)
                    }
                    NodeValue::Text(text) if !in_image(node) => {
                        split_inline_spans(text, spans).map(Rewrite::Splice)
                    }
                    _ => None,
                }
            };

            match rewrite {
                Some(Rewrite::Replace(value)) => node.data.borrow_mut().value = value,
                Some(Rewrite::Splice(pieces)) => splice_pieces(arena, node, pieces),
                None => {}
            }
        }

        Ok(())
    }

    fn render_code_block(&self, block: &NodeCodeBlock) -> Result<Option<NodeValue>> {
        let language = fence_language(&block.info);

        let html = match self.fences.get(language) {
            Some(fence) if block.fenced => {
                debug!("Formatting custom fence: {}", fence.name);
                fence.format(strip_final_newline(&block.literal), language)
            }
            _ if self.options.highlight_code => {
                let code = get_highlighter().highlight_to_html(&block.literal, language)?;
                let code_attr = if language.is_empty() {
                    String::new()
                } else {
                    format!(" class=\"language-{}\"", html_escape(language))
                };
                format!(
                    "<div class=\"{}\"><pre><code{}>{}</code></pre></div>",
                    html_escape(&self.options.code_css_class),
                    code_attr,
                    code
                )
            }
            _ => return Ok(None),
        };

        Ok(Some(NodeValue::HtmlBlock(NodeHtmlBlock {
            block_type: 0,
            literal: html,
        })))
    }

    fn render_inline_code(&self, literal: &str) -> Result<Option<NodeValue>> {
        let Some((language, code)) = parse_inline_hilite(literal) else {
            return Ok(None);
        };
        let highlighted = get_highlighter().highlight_to_html(code, language)?;
        Ok(Some(NodeValue::HtmlInline(format!(
            "<code class=\"{}\">{}</code>",
            html_escape(&self.options.code_css_class),
            highlighted
        ))))
    }
}

/// How a node is rewritten by [`MarkdownRenderer::apply_extensions`].
enum Rewrite {
    Replace(NodeValue),
    Splice(Vec<InlinePiece>),
}

fn in_image<'a>(node: &'a AstNode<'a>) -> bool {
    node.ancestors()
        .skip(1)
        .any(|ancestor| matches!(ancestor.data.borrow().value, NodeValue::Image(_)))
}

/// Replace a text node with the pieces of its rewritten run, in order.
fn splice_pieces<'a>(
    arena: &'a Arena<AstNode<'a>>,
    node: &'a AstNode<'a>,
    pieces: Vec<InlinePiece>,
) {
    let start = node.data.borrow().sourcepos.start;
    for piece in pieces {
        let value = match piece {
            InlinePiece::Text(text) => NodeValue::Text(text),
            InlinePiece::Html(html) => NodeValue::HtmlInline(html),
        };
        let sibling = arena.alloc(AstNode::new(RefCell::new(Ast::new(value, start))));
        node.insert_before(sibling);
    }
    node.detach();
}

// ─────────────────────────────────────────────────────────────────────────────
// Table of Contents
// ─────────────────────────────────────────────────────────────────────────────

/// Collect headings in document order with the ids comrak assigns them.
fn collect_headings<'a>(root: &'a AstNode<'a>) -> Vec<TocEntry> {
    let mut anchorizer = Anchorizer::new();
    let mut entries = Vec::new();

    for node in root.descendants() {
        let level = match &node.data.borrow().value {
            NodeValue::Heading(heading) => heading.level,
            _ => continue,
        };
        let mut text = String::new();
        collect_text(node, &mut text);
        let id = anchorizer.anchorize(text.clone());
        entries.push(TocEntry { level, id, text });
    }

    entries
}

/// Same text gathering comrak uses to derive heading anchors.
fn collect_text<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => output.push_str(text),
        NodeValue::Code(code) => output.push_str(&code.literal),
        NodeValue::LineBreak | NodeValue::SoftBreak => output.push(' '),
        _ => {
            for child in node.children() {
                collect_text(child, output);
            }
        }
    }
}

/// Render nested `<ul>` lists; an empty string when there are no headings.
fn render_toc(entries: &[TocEntry]) -> String {
    let Some(first) = entries.first() else {
        return String::new();
    };

    let mut out = String::from("<div class=\"toc\">\n<ul>\n");
    let mut levels = vec![first.level];

    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            let top = levels.last().copied().unwrap_or(entry.level);
            if entry.level > top {
                out.push_str("\n<ul>\n");
                levels.push(entry.level);
            } else {
                out.push_str("</li>\n");
                while levels.len() > 1 && levels[levels.len() - 2] >= entry.level {
                    levels.pop();
                    out.push_str("</ul>\n</li>\n");
                }
                if let Some(top) = levels.last_mut() {
                    *top = entry.level;
                }
            }
        }
        let _ = write!(
            out,
            "<li><a href=\"#{}\">{}</a>",
            html_escape(&entry.id),
            html_escape(&entry.text)
        );
    }

    out.push_str("</li>\n");
    for _ in 1..levels.len() {
        out.push_str("</ul>\n</li>\n");
    }
    out.push_str("</ul>\n</div>\n");
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn strip_final_newline(source: &str) -> &str {
    source
        .strip_suffix('\n')
        .map(|s| s.strip_suffix('\r').unwrap_or(s))
        .unwrap_or(source)
}

/// Fragment shown in place of the document when conversion fails.
fn error_fragment(error: &Error) -> String {
    format!(
        "<p>Error processing markdown: {}</p>",
        html_escape(&error.to_string())
    )
}

/// Process-wide renderer with default options.
static DEFAULT_RENDERER: OnceLock<MarkdownRenderer> = OnceLock::new();

/// Get or create the shared default renderer.
pub fn default_renderer() -> &'static MarkdownRenderer {
    DEFAULT_RENDERER.get_or_init(MarkdownRenderer::new)
}

/// Render markdown with the shared default renderer.
pub fn render_to_html(source: &str) -> String {
    default_renderer().render(source)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
