//! Anchored-title detection against a reference table of contents.

use super::{BoundaryMarker, DetectOptions, Detection, ExtractionStrategy, OrderingPolicy};
use crate::document::Document;
use crate::error::{Result, SplitError};
use std::collections::{HashMap, HashSet};

/// Locate each known title as a standalone line and order the results.
pub fn detect_anchored(
    document: &Document,
    known_titles: &[String],
    options: &DetectOptions,
) -> Result<Detection> {
    let positions = find_title_lines(document, known_titles, options.scan_offset_lines);

    let mut missing_titles = Vec::new();
    let mut markers = Vec::new();
    let mut seen = HashSet::new();

    for title in known_titles {
        if !seen.insert(title.as_str()) {
            continue;
        }
        match positions.get(title.as_str()) {
            Some(&line) => markers.push(BoundaryMarker::new(title.clone(), line)),
            None => {
                log::warn!("{}", SplitError::TitleNotFound { title: title.clone() });
                missing_titles.push(title.clone());
            }
        }
    }

    if options.ordering == OrderingPolicy::Positional {
        markers.sort_by_key(|m| m.line);
    }

    let required = options.min_resolved_titles.min(seen.len());
    log::info!(
        "Resolved {} of {} reference titles",
        markers.len(),
        seen.len()
    );

    if markers.len() < required {
        return Err(SplitError::InsufficientStructure {
            reason: format!(
                "only {} of {} reference titles found (need at least {})",
                markers.len(),
                seen.len(),
                required
            ),
        });
    }

    let detail = match options.ordering {
        OrderingPolicy::Canonical => "canonical order",
        OrderingPolicy::Positional => "positional order",
    };

    Ok(Detection {
        strategy: ExtractionStrategy::AnchoredTitle,
        detail: detail.to_string(),
        markers,
        missing_titles,
    })
}

/// First standalone occurrence of each title at or after `scan_offset`.
fn find_title_lines<'a>(
    document: &Document,
    known_titles: &'a [String],
    scan_offset: usize,
) -> HashMap<&'a str, usize> {
    let wanted: HashSet<&str> = known_titles.iter().map(String::as_str).collect();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for (i, line) in document.lines().iter().enumerate().skip(scan_offset) {
        let trimmed = line.trim();
        let Some(&title) = wanted.get(trimmed) else {
            continue;
        };
        if positions.contains_key(title) {
            continue;
        }
        if document.is_standalone(i) {
            log::debug!("Found section '{}' at line {}", title, i);
            positions.insert(title, i);
        }
    }

    positions
}
