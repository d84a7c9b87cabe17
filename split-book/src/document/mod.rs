//! The loaded text document and its line-level queries.

pub mod loader;

pub use loader::read_document;

/// An immutable plain-text document, kept both whole and split into lines.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    lines: Vec<String>,
}

impl Document {
    /// Create a document from decoded text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = text.lines().map(str::to_string).collect();
        Self { text, lines }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total character count (Unicode scalar values).
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Total word count (whitespace separated).
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether the line at `index` is empty or whitespace-only.
    ///
    /// Out-of-range indices count as blank.
    pub fn is_blank(&self, index: usize) -> bool {
        self.lines
            .get(index)
            .map(|line| line.trim().is_empty())
            .unwrap_or(true)
    }

    /// Whether the line at `index` is isolated by blank lines (or document edges).
    pub fn is_standalone(&self, index: usize) -> bool {
        if index >= self.lines.len() {
            return false;
        }
        let before_blank = index == 0 || self.is_blank(index - 1);
        let after_blank = self.is_blank(index + 1);
        before_blank && after_blank
    }

    /// Lines `[start, end)` joined with newlines and trimmed.
    pub fn slice_text(&self, start: usize, end: usize) -> String {
        let end = end.min(self.lines.len());
        if start >= end {
            return String::new();
        }
        self.lines[start..end].join("\n").trim().to_string()
    }
}
