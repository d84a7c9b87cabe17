//! Structure detection: find section boundaries and pick an extraction strategy.
//!
//! Strategies are tried in a fixed order, first applicable wins:
//! 1. Anchored titles, when a reference title list is supplied
//! 2. Chapter/part heading patterns
//! 3. Fixed-size page chunks, for large documents
//! 4. Paragraph-group chunks, for larger documents still
//!
//! When a title list is supplied it is authoritative: failing to resolve
//! enough titles is an error rather than a reason to fall back.

mod anchored;
mod chunking;
pub mod pattern;
pub mod titles;

use crate::document::Document;
use crate::error::{Result, SplitError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use pattern::survey;

/// Minimum number of reference titles that must resolve.
pub const DEFAULT_MIN_RESOLVED_TITLES: usize = 5;
/// Characters per synthetic page.
pub const DEFAULT_PAGE_CHUNK_CHARS: usize = 2000;
/// Documents above this many characters may be page-chunked.
pub const DEFAULT_PAGE_CHUNK_THRESHOLD: usize = 100_000;
/// Paragraphs per synthetic group.
pub const DEFAULT_PARAGRAPH_GROUP_SIZE: usize = 10;
/// Documents above this many characters may be paragraph-chunked.
pub const DEFAULT_PARAGRAPH_CHUNK_THRESHOLD: usize = 200_000;

/// How anchored-title markers are ordered in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingPolicy {
    /// Reference table-of-contents order
    #[default]
    Canonical,
    /// Order of first appearance in the text
    Positional,
}

/// The strategy used to find boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionStrategy {
    AnchoredTitle,
    PatternChapter,
    PageChunk,
    ParagraphGroup,
}

impl ExtractionStrategy {
    /// Chunk strategies cut at arbitrary points rather than at headings.
    pub fn is_synthetic(&self) -> bool {
        matches!(
            self,
            ExtractionStrategy::PageChunk | ExtractionStrategy::ParagraphGroup
        )
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtractionStrategy::AnchoredTitle => "anchored-title",
            ExtractionStrategy::PatternChapter => "pattern-based chapter",
            ExtractionStrategy::PageChunk => "fixed-size page chunk",
            ExtractionStrategy::ParagraphGroup => "paragraph-group chunk",
        };
        f.write_str(name)
    }
}

/// A section begins with `title` at line `line`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryMarker {
    pub title: String,
    /// Zero-based line index into the document
    pub line: usize,
    /// Number recovered from a chapter heading, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u32>,
}

impl BoundaryMarker {
    pub fn new(title: impl Into<String>, line: usize) -> Self {
        Self {
            title: title.into(),
            line,
            ordinal: None,
        }
    }

    pub fn with_ordinal(mut self, ordinal: Option<u32>) -> Self {
        self.ordinal = ordinal;
        self
    }
}

/// Tuning knobs for detection.
#[derive(Debug, Clone)]
pub struct DetectOptions {
    /// Lines before this index are never boundary candidates
    pub scan_offset_lines: usize,
    pub ordering: OrderingPolicy,
    pub min_resolved_titles: usize,
    /// Zero disables page chunking
    pub page_chunk_chars: usize,
    pub page_chunk_threshold_chars: usize,
    /// Zero disables paragraph chunking
    pub paragraph_group_size: usize,
    pub paragraph_chunk_threshold_chars: usize,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            scan_offset_lines: 0,
            ordering: OrderingPolicy::default(),
            min_resolved_titles: DEFAULT_MIN_RESOLVED_TITLES,
            page_chunk_chars: DEFAULT_PAGE_CHUNK_CHARS,
            page_chunk_threshold_chars: DEFAULT_PAGE_CHUNK_THRESHOLD,
            paragraph_group_size: DEFAULT_PARAGRAPH_GROUP_SIZE,
            paragraph_chunk_threshold_chars: DEFAULT_PARAGRAPH_CHUNK_THRESHOLD,
        }
    }
}

/// Outcome of structure detection.
#[derive(Debug, Clone)]
pub struct Detection {
    pub strategy: ExtractionStrategy,
    /// Human-readable detail, e.g. the pattern or chunk size used
    pub detail: String,
    /// Markers in final output order
    pub markers: Vec<BoundaryMarker>,
    /// Reference titles with no qualifying occurrence
    pub missing_titles: Vec<String>,
}

/// Detect section boundaries in `document`.
///
/// An empty `known_titles` slice means no reference table of contents. When
/// too few known titles resolve, chapter patterns and chunking are tried next.
pub fn detect(
    document: &Document,
    known_titles: &[String],
    options: &DetectOptions,
) -> Result<Detection> {
    let mut anchored_reason = None;
    if !known_titles.is_empty() {
        match anchored::detect_anchored(document, known_titles, options) {
            Ok(detection) => return Ok(detection),
            Err(SplitError::InsufficientStructure { reason }) => {
                log::warn!("{}; trying chapter patterns instead", reason);
                anchored_reason = Some(reason);
            }
            Err(e) => return Err(e),
        }
    }

    if let Some(detection) = pattern::detect_pattern(document, options.scan_offset_lines) {
        return Ok(detection);
    }

    if let Some(detection) = chunking::detect_chunks(document, options) {
        return Ok(detection);
    }

    let fallback = format!(
        "no chapter pattern found and document ({} characters) is below the chunking thresholds",
        document.char_count()
    );
    Err(SplitError::InsufficientStructure {
        reason: match anchored_reason {
            Some(reason) => format!("{}; {}", reason, fallback),
            None => fallback,
        },
    })
}
