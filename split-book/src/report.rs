//! Run-level report: what was found, dropped and written.

use crate::detect::{BoundaryMarker, ExtractionStrategy};
use crate::segment::DroppedSection;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// One section file written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct WrittenSection {
    pub ordinal: usize,
    pub title: String,
    pub file: PathBuf,
    pub words: usize,
    /// Zero-based line range `[start_line, end_line)` in the source
    pub start_line: usize,
    pub end_line: usize,
}

/// Summary of a completed split.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: Option<PathBuf>,
    pub strategy: ExtractionStrategy,
    pub strategy_detail: String,
    /// Markers in output order
    pub resolved: Vec<BoundaryMarker>,
    pub missing_titles: Vec<String>,
    pub dropped: Vec<DroppedSection>,
    pub sections: Vec<WrittenSection>,
    pub generated_at: DateTime<Utc>,
}

impl RunReport {
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn total_words(&self) -> usize {
        self.sections.iter().map(|s| s.words).sum()
    }

    /// Human-readable summary, one fact per line.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Strategy: {} ({})",
            self.strategy, self.strategy_detail
        )];
        lines.push(format!("Markers resolved: {}", self.resolved.len()));
        for title in &self.missing_titles {
            lines.push(format!("  not found: {}", title));
        }
        for dropped in &self.dropped {
            lines.push(format!(
                "  skipped (too short): {} ({} words)",
                dropped.title, dropped.words
            ));
        }
        lines.push(format!(
            "Sections written: {} (~{} words)",
            self.section_count(),
            self.total_words()
        ));
        lines.join("\n")
    }

    /// Save the report as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).context("Failed to write report JSON")?;
        Ok(())
    }
}
