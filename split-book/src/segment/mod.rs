//! Slicing a document into ordered sections at boundary markers.

pub mod naming;
pub mod writer;

use crate::detect::BoundaryMarker;
use crate::document::Document;
use crate::error::SplitError;
use serde::Serialize;
use std::collections::BTreeSet;

pub use writer::SectionWriter;

/// Sections below this many words are presumed false-positive markers.
pub const DEFAULT_MIN_SECTION_WORDS: usize = 50;

/// A contiguous run of document lines with its output identity.
#[derive(Debug, Clone)]
pub struct Section {
    /// 1-based position in the output, after filtering
    pub ordinal: usize,
    pub title: String,
    /// First line (inclusive)
    pub start: usize,
    /// Last line (exclusive)
    pub end: usize,
    /// Trimmed text of lines `[start, end)`
    pub text: String,
}

impl Section {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Output file name, e.g. `03_The_Double_Brain.txt`.
    pub fn file_name(&self, extension: &str) -> String {
        naming::section_file_name(self.ordinal, &self.title, extension)
    }
}

/// A section dropped for being too short.
#[derive(Debug, Clone, Serialize)]
pub struct DroppedSection {
    pub title: String,
    pub line: usize,
    pub words: usize,
}

/// Result of segmentation: the accepted sections and the ones filtered out.
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    pub sections: Vec<Section>,
    pub dropped: Vec<DroppedSection>,
}

/// Slice `document` at `markers`, keeping marker order in the output.
///
/// Each section runs from its marker to the nearest later marker in the
/// document (or the end), so sections never overlap even when the output
/// order differs from the textual order.
pub fn segment(document: &Document, markers: &[BoundaryMarker], min_words: usize) -> Segmentation {
    let starts: BTreeSet<usize> = markers.iter().map(|m| m.line).collect();
    let mut segmentation = Segmentation::default();

    for marker in markers {
        let end = starts
            .range(marker.line + 1..)
            .next()
            .copied()
            .unwrap_or(document.line_count());
        let text = document.slice_text(marker.line, end);
        let words = text.split_whitespace().count();

        if words < min_words {
            log::debug!(
                "{}",
                SplitError::DegenerateSection {
                    title: marker.title.clone(),
                    words,
                    min_words,
                }
            );
            segmentation.dropped.push(DroppedSection {
                title: marker.title.clone(),
                line: marker.line,
                words,
            });
            continue;
        }

        segmentation.sections.push(Section {
            ordinal: segmentation.sections.len() + 1,
            title: marker.title.clone(),
            start: marker.line,
            end,
            text,
        });
    }

    segmentation
}
