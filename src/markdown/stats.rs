//! Document statistics
//!
//! Word and character counts shown in the editor's status bar and the
//! word-count dialog.

use super::front_matter::split_front_matter;

/// Counts for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    /// Whitespace-separated words
    pub words: usize,
    /// Characters including whitespace
    pub characters: usize,
    /// Characters excluding whitespace
    pub characters_no_spaces: usize,
    /// Lines (an empty document has one)
    pub lines: usize,
    /// Non-blank blocks separated by blank lines
    pub paragraphs: usize,
}

impl TextStats {
    /// Count everything in `text`, front matter included.
    pub fn from_text(text: &str) -> Self {
        let mut paragraphs = 0;
        let mut in_paragraph = false;
        for line in text.lines() {
            let blank = line.trim().is_empty();
            if !blank && !in_paragraph {
                paragraphs += 1;
            }
            in_paragraph = !blank;
        }

        Self {
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
            characters_no_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
            lines: text.matches('\n').count() + 1,
            paragraphs,
        }
    }

    /// Count only the document body, skipping a leading front matter block.
    pub fn from_document(source: &str) -> Self {
        let (_, body) = split_front_matter(source);
        Self::from_text(body)
    }

    /// Status bar text, e.g. `"Words: 12 | Characters: 80"`.
    pub fn format_compact(&self) -> String {
        format!("Words: {} | Characters: {}", self.words, self.characters)
    }

    /// Multi-line summary for the word count dialog.
    pub fn format_detailed(&self) -> String {
        format!(
            "Words: {}\nCharacters: {}\nCharacters (no spaces): {}\nLines: {}\nParagraphs: {}",
            self.words, self.characters, self.characters_no_spaces, self.lines, self.paragraphs
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
