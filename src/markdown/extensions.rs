//! Renderer extensions layered on top of comrak
//!
//! comrak covers tables, strikethrough, autolinks, task lists and superscript.
//! This module adds what it lacks:
//!
//! - **Custom fences**: a registry mapping a fence language tag to a formatter
//!   that receives the raw fence body, e.g. `mermaid` diagrams passed through
//!   untouched for a client-side renderer.
//! - **Highlight spans**: `==marked==` becomes `<mark>marked</mark>`.
//! - **Keystroke spans**: `++ctrl+alt+del++` becomes nested `<kbd>` elements.
//! - **Inline hilite**: `` `#!python print()` `` becomes highlighted inline code.

use std::fmt;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Fences
// ─────────────────────────────────────────────────────────────────────────────

/// Formats the body of a custom fence into HTML.
///
/// Receives the fence's raw source, its declared language tag, and the CSS
/// class registered for it.
pub trait FenceFormatter: Send + Sync {
    fn format(&self, source: &str, language: &str, css_class: &str) -> String;
}

impl<F> FenceFormatter for F
where
    F: Fn(&str, &str, &str) -> String + Send + Sync,
{
    fn format(&self, source: &str, language: &str, css_class: &str) -> String {
        self(source, language, css_class)
    }
}

/// Wraps the fence body in a `<div>` carrying the fence class, verbatim.
pub fn format_passthrough_div(source: &str, _language: &str, css_class: &str) -> String {
    format!("<div class=\"{}\">{}</div>", css_class, source)
}

/// A registered custom fence.
#[derive(Clone)]
pub struct CustomFence {
    /// Language tag that selects this fence (matched case-insensitively)
    pub name: String,
    /// CSS class handed to the formatter
    pub css_class: String,
    formatter: Arc<dyn FenceFormatter>,
}

impl CustomFence {
    pub fn new(
        name: impl Into<String>,
        css_class: impl Into<String>,
        formatter: impl FenceFormatter + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            css_class: css_class.into(),
            formatter: Arc::new(formatter),
        }
    }

    /// Run the formatter on a fence body.
    pub fn format(&self, source: &str, language: &str) -> String {
        self.formatter.format(source, language, &self.css_class)
    }
}

impl fmt::Debug for CustomFence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomFence")
            .field("name", &self.name)
            .field("css_class", &self.css_class)
            .finish_non_exhaustive()
    }
}

/// Ordered registry of custom fences, keyed by language tag.
///
/// Built once and shared read-only by the renderer. Later registrations for
/// the same tag replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct FenceRegistry {
    fences: Vec<CustomFence>,
}

impl FenceRegistry {
    /// An empty registry (every fence is treated as code).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a fence, replacing any existing entry with the same tag.
    pub fn register(mut self, fence: CustomFence) -> Self {
        self.fences
            .retain(|existing| !existing.name.eq_ignore_ascii_case(&fence.name));
        self.fences.push(fence);
        self
    }

    /// Look up the fence for a language tag.
    pub fn get(&self, language: &str) -> Option<&CustomFence> {
        self.fences
            .iter()
            .find(|fence| fence.name.eq_ignore_ascii_case(language))
    }

    /// Registered tags, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fences.iter().map(|fence| fence.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fences.is_empty()
    }
}

/// The stock registry: `mermaid` fences pass through as `<div class="mermaid">`.
pub fn default_fences() -> FenceRegistry {
    FenceRegistry::empty().register(CustomFence::new(
        "mermaid",
        "mermaid",
        format_passthrough_div,
    ))
}

/// Language tag of a fence info string (first whitespace-separated word).
pub fn fence_language(info: &str) -> &str {
    info.split_whitespace().next().unwrap_or("")
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Spans
// ─────────────────────────────────────────────────────────────────────────────

/// Which inline span syntaxes to rewrite in text runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineSpans {
    pub mark: bool,
    pub keys: bool,
}

impl InlineSpans {
    fn any(&self) -> bool {
        self.mark || self.keys
    }
}

/// A piece of a rewritten text run.
///
/// `Text` stays plain text in the AST so heading anchors and alt text still
/// see it; `Html` is spliced in as raw inline HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlinePiece {
    Text(String),
    Html(String),
}

/// Split a plain text run around `==mark==` and `++keys++` spans.
///
/// Returns `None` when the text contains no span, so the caller can leave
/// the node alone.
pub fn split_inline_spans(text: &str, spans: InlineSpans) -> Option<Vec<InlinePiece>> {
    if !spans.any() {
        return None;
    }

    let mut pieces = Vec::new();
    let mut rest = text;

    while let Some((start, end, span)) = next_span(rest, spans) {
        if start > 0 {
            pieces.push(InlinePiece::Text(rest[..start].to_string()));
        }
        pieces.extend(span);
        rest = &rest[end..];
    }

    if pieces.is_empty() {
        return None;
    }
    if !rest.is_empty() {
        pieces.push(InlinePiece::Text(rest.to_string()));
    }
    Some(pieces)
}

type SpanRenderer = fn(&str) -> Option<Vec<InlinePiece>>;

/// Find the earliest complete span in `text`: (start, end, pieces).
fn next_span(text: &str, spans: InlineSpans) -> Option<(usize, usize, Vec<InlinePiece>)> {
    let mut best: Option<(usize, usize, Vec<InlinePiece>)> = None;

    let candidates: [(bool, &str, SpanRenderer); 2] = [
        (spans.mark, "==", render_mark),
        (spans.keys, "++", render_keys),
    ];

    for (enabled, marker, render) in candidates {
        if !enabled {
            continue;
        }
        let mut search_from = 0;
        while let Some(open) = text[search_from..].find(marker).map(|i| search_from + i) {
            let inner_start = open + marker.len();
            let Some(close) = text[inner_start..].find(marker).map(|i| inner_start + i) else {
                break;
            };
            match render(&text[inner_start..close]) {
                Some(pieces) => {
                    if best.as_ref().map_or(true, |(start, _, _)| open < *start) {
                        best = Some((open, close + marker.len(), pieces));
                    }
                    break;
                }
                None => search_from = open + 1,
            }
        }
    }

    best
}

fn render_mark(inner: &str) -> Option<Vec<InlinePiece>> {
    if inner.is_empty() || inner.trim() != inner {
        return None;
    }
    Some(vec![
        InlinePiece::Html("<mark>".to_string()),
        InlinePiece::Text(inner.to_string()),
        InlinePiece::Html("</mark>".to_string()),
    ])
}

/// Key names are word characters and hyphens only, joined by `+`.
fn is_key_name(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn render_keys(inner: &str) -> Option<Vec<InlinePiece>> {
    let keys: Vec<&str> = inner.split('+').collect();
    if !keys.iter().all(|key| is_key_name(key)) {
        return None;
    }

    let mut pieces = Vec::with_capacity(keys.len() * 2 + 1);
    let mut open = String::from("<kbd class=\"keys\">");
    for key in keys {
        open.push_str(&format!("<kbd class=\"key-{}\">", key.to_ascii_lowercase()));
        pieces.push(InlinePiece::Html(std::mem::take(&mut open)));
        pieces.push(InlinePiece::Text(key_label(key)));
        open.push_str("</kbd>+");
    }
    open.truncate(open.len() - 1);
    open.push_str("</kbd>");
    pieces.push(InlinePiece::Html(open));
    Some(pieces)
}

/// Display label for a key: known names get their conventional spelling.
fn key_label(key: &str) -> String {
    let label = match key.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => "Ctrl",
        "alt" => "Alt",
        "shift" => "Shift",
        "cmd" | "command" => "Cmd",
        "meta" | "super" => "Meta",
        "del" | "delete" => "Del",
        "enter" | "return" => "Enter",
        "esc" | "escape" => "Esc",
        "tab" => "Tab",
        "space" => "Space",
        "backspace" => "Backspace",
        "up" => "Up",
        "down" => "Down",
        "left" => "Left",
        "right" => "Right",
        _ => {
            let mut chars = key.chars();
            return match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            };
        }
    };
    label.to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Hilite
// ─────────────────────────────────────────────────────────────────────────────

/// Split inline code of the form `#!lang code` into (lang, code).
pub fn parse_inline_hilite(literal: &str) -> Option<(&str, &str)> {
    let rest = literal.strip_prefix("#!")?;
    let (language, code) = rest.split_once(' ')?;
    if language.is_empty()
        || !language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '_'))
    {
        return None;
    }
    Some((language, code))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
