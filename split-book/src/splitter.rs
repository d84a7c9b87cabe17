//! The split pipeline: detect, segment, write, report.

use crate::detect::{self, DetectOptions};
use crate::document::Document;
use crate::error::{Result, SplitError};
use crate::report::{RunReport, WrittenSection};
use crate::segment::{self, SectionWriter};
use chrono::Utc;
use std::path::PathBuf;

/// Everything a split run needs besides the document and titles.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub detect: DetectOptions,
    pub min_section_words: usize,
    pub output_dir: PathBuf,
    pub extension: String,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            detect: DetectOptions::default(),
            min_section_words: segment::DEFAULT_MIN_SECTION_WORDS,
            output_dir: PathBuf::from("chapters"),
            extension: segment::naming::DEFAULT_EXTENSION.to_string(),
        }
    }
}

/// Split `document` into section files under `options.output_dir`.
///
/// Nothing is written unless detection succeeds and at least one section
/// survives the word-count filter.
pub fn split_book(
    document: &Document,
    known_titles: &[String],
    options: &SplitOptions,
) -> Result<RunReport> {
    let detection = detect::detect(document, known_titles, &options.detect)?;
    log::info!(
        "Using strategy: {} ({}), {} markers",
        detection.strategy,
        detection.detail,
        detection.markers.len()
    );

    // Chunks only drop when empty, so chunked output covers the whole text
    let min_words = if detection.strategy.is_synthetic() {
        1
    } else {
        options.min_section_words
    };
    let segmentation = segment::segment(document, &detection.markers, min_words);
    for dropped in &segmentation.dropped {
        log::info!(
            "Skipping '{}' - too short ({} words)",
            dropped.title,
            dropped.words
        );
    }

    if segmentation.sections.is_empty() {
        return Err(SplitError::InsufficientStructure {
            reason: format!(
                "all {} candidate sections were shorter than {} words",
                segmentation.dropped.len(),
                min_words
            ),
        });
    }

    let writer = SectionWriter::new(&options.output_dir, options.extension.as_str());
    let paths = writer.write_all(&segmentation.sections)?;

    let sections = segmentation
        .sections
        .iter()
        .zip(paths)
        .map(|(section, file)| WrittenSection {
            ordinal: section.ordinal,
            title: section.title.clone(),
            file,
            words: section.word_count(),
            start_line: section.start,
            end_line: section.end,
        })
        .collect();

    Ok(RunReport {
        input: None,
        strategy: detection.strategy,
        strategy_detail: detection.detail,
        resolved: detection.markers,
        missing_titles: detection.missing_titles,
        dropped: segmentation.dropped,
        sections,
        generated_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::ExtractionStrategy;
    use std::fs;
    use tempfile::TempDir;

    fn body(seed: &str, words: usize) -> String {
        (0..words)
            .map(|i| format!("{}{}", seed, i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn options_for(dir: &TempDir) -> SplitOptions {
        SplitOptions {
            output_dir: dir.path().join("out"),
            ..SplitOptions::default()
        }
    }

    fn output_files(dir: &TempDir) -> Vec<String> {
        let out = dir.path().join("out");
        if !out.exists() {
            return Vec::new();
        }
        let mut names: Vec<String> = fs::read_dir(out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_every_title_reconstructs_document() {
        let names = ["Preface", "Introduction", "Consciousness", "Hypnosis", "Afterword"];
        let mut text = String::new();
        for name in names {
            text.push_str(&format!("{}\n\n{}\n\n", name, body(&name.to_lowercase(), 70)));
        }
        let doc = Document::new(text.clone());
        let temp_dir = TempDir::new().unwrap();

        let report = split_book(&doc, &titles(&names), &options_for(&temp_dir)).unwrap();
        assert_eq!(report.section_count(), names.len());

        let rebuilt: String = report
            .sections
            .iter()
            .map(|s| fs::read_to_string(&s.file).unwrap())
            .collect::<Vec<_>>()
            .join(" ");
        let normalize = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(normalize(&rebuilt), normalize(&text));
    }

    #[test]
    fn test_canonical_file_order() {
        let mut text = String::new();
        for name in ["Chapter Two", "Preface", "Chapter One"] {
            text.push_str(&format!("{}\n\n{}\n\n", name, body("w", 55)));
        }
        let doc = Document::new(text);
        let temp_dir = TempDir::new().unwrap();

        split_book(
            &doc,
            &titles(&["Preface", "Chapter One", "Chapter Two"]),
            &options_for(&temp_dir),
        )
        .unwrap();

        assert_eq!(
            output_files(&temp_dir),
            vec!["01_Preface.txt", "02_Chapter_One.txt", "03_Chapter_Two.txt"]
        );
        let first = fs::read_to_string(temp_dir.path().join("out/01_Preface.txt")).unwrap();
        assert!(first.starts_with("Preface\n"));
    }

    #[test]
    fn test_toc_block_skipped_with_offset() {
        let names = ["Preface", "Introduction", "Consciousness", "Hypnosis", "Afterword"];
        let mut text = String::from("Contents\n\n");
        for name in names {
            text.push_str(&format!("{}\n\n", name));
        }
        let toc_lines = text.lines().count();
        for name in names {
            text.push_str(&format!("{}\n\n{}\n\n", name, body("x", 60)));
        }
        let doc = Document::new(text);
        let temp_dir = TempDir::new().unwrap();

        let mut options = options_for(&temp_dir);
        options.detect.scan_offset_lines = toc_lines;
        let report = split_book(&doc, &titles(&names), &options).unwrap();

        assert_eq!(report.section_count(), 5);
        assert!(report.resolved.iter().all(|m| m.line >= toc_lines));
        assert!(report.dropped.is_empty());
    }

    #[test]
    fn test_pattern_chapters_without_titles() {
        let text = format!(
            "Chapter 1\n\n{}\n\nChapter 2\n\n{}\n\nChapter 3\n\n{}\n",
            body("a", 60),
            body("b", 60),
            body("c", 60)
        );
        let doc = Document::new(text);
        let temp_dir = TempDir::new().unwrap();

        let report = split_book(&doc, &[], &options_for(&temp_dir)).unwrap();
        assert_eq!(report.strategy, ExtractionStrategy::PatternChapter);
        assert_eq!(
            output_files(&temp_dir),
            vec!["01_Chapter_1.txt", "02_Chapter_2.txt", "03_Chapter_3.txt"]
        );
        let second = fs::read_to_string(temp_dir.path().join("out/02_Chapter_2.txt")).unwrap();
        assert!(second.starts_with("Chapter 2"));
        assert!(second.ends_with("b59"));
    }

    #[test]
    fn test_page_chunks_keep_short_final_page() {
        let mut text = String::new();
        for i in 0..10 {
            text.push_str(&format!("{}\n\n", body(&format!("p{}x", i), 100)));
        }
        text.push_str("The end.\n");
        let doc = Document::new(text.clone());
        let temp_dir = TempDir::new().unwrap();

        let mut options = options_for(&temp_dir);
        options.detect.page_chunk_chars = 300;
        options.detect.page_chunk_threshold_chars = 1000;
        let report = split_book(&doc, &[], &options).unwrap();

        assert_eq!(report.strategy, ExtractionStrategy::PageChunk);
        assert!(report.dropped.is_empty());
        let rebuilt: String = report
            .sections
            .iter()
            .map(|s| fs::read_to_string(&s.file).unwrap())
            .collect::<Vec<_>>()
            .join(" ");
        let normalize = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(normalize(&rebuilt), normalize(&text));
        assert!(rebuilt.ends_with("The end."));
    }

    #[test]
    fn test_no_structure_writes_nothing() {
        let doc = Document::new(format!("A small note.\n\n{}\n", body("n", 300)));
        let temp_dir = TempDir::new().unwrap();

        let err = split_book(&doc, &[], &options_for(&temp_dir)).unwrap_err();
        assert!(matches!(err, SplitError::InsufficientStructure { .. }));
        assert!(output_files(&temp_dir).is_empty());
    }

    #[test]
    fn test_too_few_titles_writes_nothing() {
        let known: Vec<String> = (1..=21).map(|i| format!("Heading {}", i)).collect();
        let mut text = String::new();
        for i in 1..=3 {
            text.push_str(&format!("Heading {}\n\n{}\n\n", i, body("h", 60)));
        }
        let doc = Document::new(text);
        let temp_dir = TempDir::new().unwrap();

        let err = split_book(&doc, &known, &options_for(&temp_dir)).unwrap_err();
        assert!(matches!(err, SplitError::InsufficientStructure { .. }));
        assert!(output_files(&temp_dir).is_empty());
    }

    #[test]
    fn test_short_section_compacts_ordinals() {
        let names = ["One", "Two", "Three", "Four", "Five"];
        let mut text = String::new();
        for name in names {
            let words = if name == "Three" { 10 } else { 60 };
            text.push_str(&format!("{}\n\n{}\n\n", name, body("s", words)));
        }
        let doc = Document::new(text);
        let temp_dir = TempDir::new().unwrap();

        let report = split_book(&doc, &titles(&names), &options_for(&temp_dir)).unwrap();
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(
            output_files(&temp_dir),
            vec!["01_One.txt", "02_Two.txt", "03_Four.txt", "04_Five.txt"]
        );
    }
}
