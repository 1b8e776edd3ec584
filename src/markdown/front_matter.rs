//! Front matter extraction
//!
//! Detects an optional metadata block at the very start of a document:
//!
//! ```text
//! ---
//! title: Notes
//! author: someone
//! ---
//! # Body starts here
//! ```
//!
//! The block body is parsed as YAML first. When that fails (or the YAML is
//! not a mapping), every `key: value` line is split on its first colon
//! instead. Extraction never fails: malformed blocks degrade to partial or
//! empty metadata.

use log::debug;
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Marker line that opens and closes the front matter block.
pub const FRONT_MATTER_DELIMITER: &str = "---";

/// Document metadata. Values are always strings.
pub type Metadata = BTreeMap<String, String>;

// ─────────────────────────────────────────────────────────────────────────────
// Tagged Result
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of front matter detection, tagged by how the body was parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontMatter {
    /// The block body was a valid YAML mapping
    Structured(Metadata),
    /// YAML parsing failed; lines were split on the first `:`
    Permissive(Metadata),
    /// No front matter block at the start of the document
    Absent,
}

impl FrontMatter {
    /// Collapse to a plain mapping (empty when absent).
    pub fn into_metadata(self) -> Metadata {
        match self {
            FrontMatter::Structured(map) | FrontMatter::Permissive(map) => map,
            FrontMatter::Absent => Metadata::new(),
        }
    }

    /// Whether a block was found at all.
    pub fn is_present(&self) -> bool {
        !matches!(self, FrontMatter::Absent)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Extract metadata from the front matter of `source`.
///
/// Returns an empty mapping when the document does not start with a `---`
/// line or the block is never closed. The source itself is not modified.
pub fn extract(source: &str) -> Metadata {
    parse_front_matter(source).into_metadata()
}

/// Detect and parse the front matter block, keeping the parse tier.
pub fn parse_front_matter(source: &str) -> FrontMatter {
    let Some((block, _)) = locate_block(source) else {
        return FrontMatter::Absent;
    };

    if block.trim().is_empty() {
        return FrontMatter::Absent;
    }

    match parse_structured(block) {
        Some(map) => FrontMatter::Structured(map),
        None => FrontMatter::Permissive(parse_permissive(block)),
    }
}

/// Split `source` into the raw front matter body (if any) and the rest.
///
/// The returned body slice excludes both delimiter lines. When there is no
/// front matter, the whole source is returned as the body.
pub fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    match locate_block(source) {
        Some((block, rest)) => (Some(block), rest),
        None => (None, source),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Location
// ─────────────────────────────────────────────────────────────────────────────

/// Whether a line (without its terminator) is a delimiter line.
fn is_delimiter(line: &str) -> bool {
    line.trim_end() == FRONT_MATTER_DELIMITER
}

/// Find the block body and the remainder following the closing delimiter.
fn locate_block(source: &str) -> Option<(&str, &str)> {
    let first_end = source.find('\n')?;
    if !is_delimiter(&source[..first_end]) {
        return None;
    }

    let body_start = first_end + 1;
    let mut line_start = body_start;

    while line_start <= source.len() {
        let line_end = source[line_start..]
            .find('\n')
            .map(|i| line_start + i)
            .unwrap_or(source.len());

        if is_delimiter(&source[line_start..line_end]) {
            // Drop the newline that precedes the closing delimiter
            let body_end = line_start.saturating_sub(1).max(body_start);
            let rest_start = (line_end + 1).min(source.len());
            return Some((&source[body_start..body_end], &source[rest_start..]));
        }

        if line_end == source.len() {
            break;
        }
        line_start = line_end + 1;
    }

    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing Tiers
// ─────────────────────────────────────────────────────────────────────────────

/// Parse the block as a YAML mapping. `None` on any failure.
fn parse_structured(block: &str) -> Option<Metadata> {
    let value: Value = match serde_yaml::from_str(block) {
        Ok(value) => value,
        Err(e) => {
            debug!("Front matter is not valid YAML, falling back: {}", e);
            return None;
        }
    };

    let Value::Mapping(mapping) = value else {
        debug!("Front matter YAML is not a mapping, falling back");
        return None;
    };

    let mut metadata = Metadata::new();
    for (key, value) in mapping {
        if let Some(key) = scalar_to_string(&key) {
            metadata.insert(key, value_to_string(value));
        }
    }
    Some(metadata)
}

/// Split each line on its first `:`; lines without one are ignored.
fn parse_permissive(block: &str) -> Metadata {
    block
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Values stay strings; nested structures are re-serialized as YAML text.
fn value_to_string(value: Value) -> String {
    if let Some(s) = scalar_to_string(&value) {
        return s;
    }
    serde_yaml::to_string(&value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_block() {
        let metadata = extract("---\nkey: value\n---\nbody");
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.get("key").map(String::as_str), Some("value"));
    }

    #[test]
    fn test_extract_empty_source() {
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_no_front_matter_when_not_first_line() {
        assert!(extract("# Title\n---\nkey: value\n---\n").is_empty());
        assert!(extract("\n---\nkey: value\n---\n").is_empty());
        assert!(extract("plain text with key: value").is_empty());
    }

    #[test]
    fn test_unclosed_block_is_absent() {
        assert_eq!(
            parse_front_matter("---\nkey: value\nno closing marker"),
            FrontMatter::Absent
        );
    }

    #[test]
    fn test_closing_delimiter_at_end_of_input() {
        let metadata = extract("---\ntitle: Notes\n---");
        assert_eq!(metadata.get("title").map(String::as_str), Some("Notes"));
    }

    #[test]
    fn test_structured_parse_stringifies_scalars() {
        let source = "---\ntitle: Report\ncount: 3\ndraft: true\nempty:\n---\n";
        match parse_front_matter(source) {
            FrontMatter::Structured(map) => {
                assert_eq!(map["title"], "Report");
                assert_eq!(map["count"], "3");
                assert_eq!(map["draft"], "true");
                assert_eq!(map["empty"], "");
            }
            other => panic!("expected structured front matter, got {:?}", other),
        }
    }

    #[test]
    fn test_permissive_fallback_on_invalid_yaml() {
        // A second colon-space inside a plain scalar is invalid YAML
        let source = "---\ntitle: Hello: World\n  bad indent: x\n---\nbody";
        match parse_front_matter(source) {
            FrontMatter::Permissive(map) => {
                assert_eq!(map["title"], "Hello: World");
                assert_eq!(map["bad indent"], "x");
            }
            other => panic!("expected permissive front matter, got {:?}", other),
        }
    }

    #[test]
    fn test_permissive_ignores_lines_without_colon() {
        let source = "---\n- just a list item\n---\n";
        let metadata = extract(source);
        assert!(metadata.is_empty());
        assert!(matches!(
            parse_front_matter(source),
            FrontMatter::Permissive(_)
        ));
    }

    #[test]
    fn test_empty_block_is_absent() {
        assert_eq!(parse_front_matter("---\n\n---\nbody"), FrontMatter::Absent);
    }

    #[test]
    fn test_crlf_and_trailing_whitespace_on_delimiters() {
        let metadata = extract("---  \r\nauthor: me\r\n---\r\nbody");
        assert_eq!(metadata.get("author").map(String::as_str), Some("me"));
    }

    #[test]
    fn test_nested_values_are_kept_as_text() {
        let metadata = extract("---\ntags:\n  - rust\n  - markdown\n---\n");
        let tags = &metadata["tags"];
        assert!(tags.contains("rust"));
        assert!(tags.contains("markdown"));
    }

    #[test]
    fn test_split_front_matter() {
        let (block, body) = split_front_matter("---\na: 1\nb: 2\n---\n# Body\n");
        assert_eq!(block, Some("a: 1\nb: 2"));
        assert_eq!(body, "# Body\n");

        let (block, body) = split_front_matter("# No metadata");
        assert_eq!(block, None);
        assert_eq!(body, "# No metadata");
    }

    #[test]
    fn test_extract_does_not_consume_source() {
        let source = "---\nk: v\n---\ntext";
        let _ = extract(source);
        assert!(source.starts_with("---"));
    }
}
