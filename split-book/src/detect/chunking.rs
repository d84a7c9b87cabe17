//! Synthetic boundaries for documents with no recognizable structure.

use super::{BoundaryMarker, DetectOptions, Detection, ExtractionStrategy};
use crate::document::Document;

/// Pick page or paragraph chunking based on document size, if either applies.
pub fn detect_chunks(document: &Document, options: &DetectOptions) -> Option<Detection> {
    let size = document.char_count();

    if options.page_chunk_chars > 0 && size > options.page_chunk_threshold_chars {
        return Some(Detection {
            strategy: ExtractionStrategy::PageChunk,
            detail: format!("{} characters per page", options.page_chunk_chars),
            markers: page_markers(document, options.page_chunk_chars),
            missing_titles: Vec::new(),
        });
    }

    if options.paragraph_group_size > 0 && size > options.paragraph_chunk_threshold_chars {
        return Some(Detection {
            strategy: ExtractionStrategy::ParagraphGroup,
            detail: format!("{} paragraphs per part", options.paragraph_group_size),
            markers: paragraph_markers(document, options.paragraph_group_size),
            missing_titles: Vec::new(),
        });
    }

    None
}

fn part_title(n: usize) -> String {
    format!("Part {}", n)
}

/// One marker per run of lines totalling at least `page_chars` characters.
///
/// Pages always break on line boundaries.
fn page_markers(document: &Document, page_chars: usize) -> Vec<BoundaryMarker> {
    let mut markers = Vec::new();
    let mut accumulated = 0;

    for (i, line) in document.lines().iter().enumerate() {
        if markers.is_empty() || accumulated >= page_chars {
            markers.push(BoundaryMarker::new(part_title(markers.len() + 1), i));
            accumulated = 0;
        }
        accumulated += line.chars().count() + 1;
    }

    markers
}

/// One marker at the first line of every `group_size` paragraphs.
fn paragraph_markers(document: &Document, group_size: usize) -> Vec<BoundaryMarker> {
    let paragraph_starts: Vec<usize> = (0..document.line_count())
        .filter(|&i| !document.is_blank(i) && (i == 0 || document.is_blank(i - 1)))
        .collect();

    paragraph_starts
        .iter()
        .step_by(group_size)
        .enumerate()
        .map(|(n, &line)| BoundaryMarker::new(part_title(n + 1), line))
        .collect()
}
