//! Chapter heading patterns for documents without a reference title list.

use super::{BoundaryMarker, Detection, ExtractionStrategy};
use crate::document::Document;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Headings longer than this are treated as prose, not structure.
const MAX_HEADING_LEN: usize = 80;

/// A pattern qualifies when splitting on it yields more than this many fragments.
const MIN_FRAGMENTS: usize = 2;

/// Number of example headings kept per pattern in a survey.
const SURVEY_EXAMPLES: usize = 5;

/// A named heading pattern.
pub struct ChapterPattern {
    pub name: &'static str,
    regex: Regex,
}

impl ChapterPattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("chapter pattern should compile"),
        }
    }

    /// Whether `line` is a heading for this pattern.
    pub fn matches(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.chars().count() <= MAX_HEADING_LEN && self.regex.is_match(trimmed)
    }
}

/// Heading patterns in priority order; the first that qualifies wins.
pub static CHAPTER_PATTERNS: Lazy<Vec<ChapterPattern>> = Lazy::new(|| {
    vec![
        ChapterPattern::new("Chapter N", r"^(?i:chapter)\s+\d+\b"),
        ChapterPattern::new("Chapter Roman", r"^(?i:chapter)\s+[IVXLC]+\b"),
        ChapterPattern::new("Part N", r"^(?i:part)\s+\d+\b"),
        ChapterPattern::new("Part Roman", r"^(?i:part)\s+[IVXLC]+\b"),
        ChapterPattern::new("Book N", r"^(?i:book)\s+\d+\b"),
        ChapterPattern::new("Section N", r"^(?i:section)\s+\d+\b"),
    ]
});

static ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s(\d+|[IVXLC]+)\b").expect("ordinal pattern should compile"));

/// How a single pattern fares against a document.
#[derive(Debug, Clone)]
pub struct PatternSurvey {
    pub name: &'static str,
    pub matches: usize,
    pub fragments: usize,
    pub examples: Vec<String>,
}

impl PatternSurvey {
    pub fn qualifies(&self) -> bool {
        self.fragments > MIN_FRAGMENTS
    }
}

/// Try each pattern in order and build markers from the first that qualifies.
pub fn detect_pattern(document: &Document, scan_offset: usize) -> Option<Detection> {
    for pattern in CHAPTER_PATTERNS.iter() {
        let lines = heading_lines(document, pattern, scan_offset);
        let fragments = count_fragments(document, &lines, scan_offset);
        log::debug!(
            "Pattern '{}': {} headings, {} fragments",
            pattern.name,
            lines.len(),
            fragments
        );

        if fragments <= MIN_FRAGMENTS {
            continue;
        }

        let markers = lines
            .into_iter()
            .map(|i| {
                let title = document.lines()[i].trim().to_string();
                let ordinal = parse_ordinal(&title);
                BoundaryMarker::new(title, i).with_ordinal(ordinal)
            })
            .collect();

        return Some(Detection {
            strategy: ExtractionStrategy::PatternChapter,
            detail: pattern.name.to_string(),
            markers,
            missing_titles: Vec::new(),
        });
    }

    None
}

/// Report match counts for every pattern, for the `analyze` command.
pub fn survey(document: &Document) -> Vec<PatternSurvey> {
    CHAPTER_PATTERNS
        .iter()
        .map(|pattern| {
            let lines = heading_lines(document, pattern, 0);
            PatternSurvey {
                name: pattern.name,
                matches: lines.len(),
                fragments: count_fragments(document, &lines, 0),
                examples: lines
                    .iter()
                    .take(SURVEY_EXAMPLES)
                    .map(|&i| document.lines()[i].trim().to_string())
                    .collect(),
            }
        })
        .collect()
}

/// Indices of heading lines, first occurrence per distinct heading.
fn heading_lines(document: &Document, pattern: &ChapterPattern, scan_offset: usize) -> Vec<usize> {
    let mut seen = HashSet::new();
    document
        .lines()
        .iter()
        .enumerate()
        .skip(scan_offset)
        .filter(|(_, line)| pattern.matches(line))
        .filter(|(_, line)| seen.insert(line.trim().to_string()))
        .map(|(i, _)| i)
        .collect()
}

/// Count fragments the way splitting the text on the headings would:
/// a non-blank preamble, each heading, and each non-blank body.
fn count_fragments(document: &Document, headings: &[usize], scan_offset: usize) -> usize {
    let Some(&first) = headings.first() else {
        return 0;
    };

    let mut fragments = 0;
    if !document.slice_text(scan_offset, first).is_empty() {
        fragments += 1;
    }

    for (n, &start) in headings.iter().enumerate() {
        let end = headings
            .get(n + 1)
            .copied()
            .unwrap_or(document.line_count());
        fragments += 1;
        if !document.slice_text(start + 1, end).is_empty() {
            fragments += 1;
        }
    }

    fragments
}

/// Recover the number from a heading like "Chapter 12" or "PART IV".
fn parse_ordinal(heading: &str) -> Option<u32> {
    let token = ORDINAL.captures(heading)?.get(1)?.as_str();
    token.parse().ok().or_else(|| roman_to_number(token))
}

fn roman_to_number(roman: &str) -> Option<u32> {
    let values: Vec<u32> = roman
        .chars()
        .map(|c| match c {
            'I' => Some(1),
            'V' => Some(5),
            'X' => Some(10),
            'L' => Some(50),
            'C' => Some(100),
            _ => None,
        })
        .collect::<Option<_>>()?;

    let mut total = 0;
    for (i, &value) in values.iter().enumerate() {
        match values.get(i + 1) {
            Some(&next) if next > value => total -= value as i64,
            _ => total += value as i64,
        }
    }

    u32::try_from(total).ok().filter(|&n| n > 0)
}
