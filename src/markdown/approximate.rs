//! Approximate HTML to markdown conversion
//!
//! A lossy fallback used when the rich-text side of the editor hands back
//! HTML. It applies a fixed list of substitutions in order and tidies blank
//! lines. It is not a parser and gives no round-trip guarantee.
//!
//! # Known limitations
//!
//! - Nested or overlapping tags of the same kind pair up with the nearest
//!   closing tag, so the inner structure is lost.
//! - `<img>` is only converted when `src` comes before `alt`.
//! - `<a>` needs a double-quoted `href`.
//! - Tags without a rule (lists, tables, blockquotes, ...) are left as-is.

use regex::Regex;
use std::sync::OnceLock;

/// Substitution rules, applied in this order.
const RULES: &[(&str, &str)] = &[
    (r"<h1\b[^>]*>(.*?)</h1>", "# ${1}"),
    (r"<h2\b[^>]*>(.*?)</h2>", "## ${1}"),
    (r"<h3\b[^>]*>(.*?)</h3>", "### ${1}"),
    (r"<h4\b[^>]*>(.*?)</h4>", "#### ${1}"),
    (r"<h5\b[^>]*>(.*?)</h5>", "##### ${1}"),
    (r"<h6\b[^>]*>(.*?)</h6>", "###### ${1}"),
    (r"<strong\b[^>]*>(.*?)</strong>", "**${1}**"),
    (r"<b\b[^>]*>(.*?)</b>", "**${1}**"),
    (r"<em\b[^>]*>(.*?)</em>", "*${1}*"),
    (r"<i\b[^>]*>(.*?)</i>", "*${1}*"),
    (r"<code\b[^>]*>(.*?)</code>", "`${1}`"),
    (r#"<a\b[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#, "[${2}](${1})"),
    (r#"<img\b[^>]*src="([^"]*)"[^>]*alt="([^"]*)"[^>]*/?>"#, "![${2}](${1})"),
    (r"<br\b[^>]*/?>", "\n"),
    (r"<p\b[^>]*>", "\n"),
    (r"</p>", "\n"),
    (r"<div\b[^>]*>", ""),
    (r"</div>", ""),
];

fn compiled_rules() -> &'static [(Regex, &'static str)] {
    static COMPILED: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|(pattern, replacement)| {
                // Case-insensitive, `.` spans newlines
                let regex = Regex::new(&format!("(?is){}", pattern))
                    .expect("Substitution patterns are valid regexes");
                (regex, *replacement)
            })
            .collect()
    })
}

fn blank_run() -> &'static Regex {
    static BLANK_RUN: OnceLock<Regex> = OnceLock::new();
    BLANK_RUN.get_or_init(|| {
        Regex::new(r"\n\s*\n\s*\n").expect("Blank-run pattern is a valid regex")
    })
}

/// Convert simple HTML into approximate markdown.
///
/// Never fails; unrecognized markup is passed through unchanged.
pub fn approximate(html: &str) -> String {
    let mut text = html.to_string();
    for (pattern, replacement) in compiled_rules() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }

    // A single pass can leave a new run behind where matches abutted
    let blank_run = blank_run();
    while blank_run.is_match(&text) {
        text = blank_run.replace_all(&text, "\n\n").into_owned();
    }

    text.trim().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        assert_eq!(compiled_rules().len(), RULES.len());
    }

    #[test]
    fn test_headings() {
        assert_eq!(approximate("<h2>Title</h2>"), "## Title");
        assert_eq!(approximate("<H1 class=\"x\">Big</H1>"), "# Big");
        assert_eq!(approximate("<h6>Small</h6>"), "###### Small");
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(
            approximate("<strong>a</strong> <b>b</b> <em>c</em> <i>d</i> <code>e</code>"),
            "**a** **b** *c* *d* `e`"
        );
    }

    #[test]
    fn test_link_and_image() {
        assert_eq!(
            approximate("<a href=\"https://x.org\" title=\"t\">site</a>"),
            "[site](https://x.org)"
        );
        assert_eq!(
            approximate("<img src=\"cat.png\" alt=\"A cat\" />"),
            "![A cat](cat.png)"
        );
    }

    #[test]
    fn test_img_with_alt_first_is_left_alone() {
        let html = "<img alt=\"A cat\" src=\"cat.png\">";
        assert_eq!(approximate(html), html);
    }

    #[test]
    fn test_br_is_not_bold() {
        assert_eq!(approximate("a<br>b<br/>c</b>"), "a\nb\nc</b>");
    }

    #[test]
    fn test_paragraphs_collapse_to_one_blank_line() {
        let md = approximate("<p>a</p><p>b</p>");
        assert_eq!(md, "a\n\nb");
        assert!(!md.contains("\n\n\n"));
    }

    #[test]
    fn test_many_blank_lines_collapse() {
        assert_eq!(approximate("<p>a</p>\n\n\n\n<p>b</p>"), "a\n\nb");
    }

    #[test]
    fn test_divs_removed() {
        assert_eq!(approximate("<div class=\"c\"><div>x</div></div>"), "x");
    }

    #[test]
    fn test_multiline_inner_text() {
        assert_eq!(approximate("<strong>two\nlines</strong>"), "**two\nlines**");
    }

    #[test]
    fn test_unknown_tags_pass_through() {
        assert_eq!(approximate("<ul><li>x</li></ul>"), "<ul><li>x</li></ul>");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(approximate(""), "");
    }

    #[test]
    fn test_approximate_of_rendered_markdown_does_not_fail() {
        let html = crate::markdown::render_to_html(
            "# Title\n\nSome **bold** text with [a link](https://x.org).\n\n- [ ] task\n",
        );
        let md = approximate(&html);
        assert!(md.contains("**bold**"));
        assert!(md.contains("[a link](https://x.org)"));
    }
}
