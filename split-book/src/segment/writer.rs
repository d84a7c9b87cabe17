//! Persisting accepted sections, one file each.

use super::Section;
use crate::error::{Result, SplitError};
use std::fs;
use std::path::PathBuf;

/// Writes sections into a destination directory.
pub struct SectionWriter {
    output_dir: PathBuf,
    extension: String,
}

impl SectionWriter {
    pub fn new(output_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: extension.into(),
        }
    }

    /// Path a section will be written to.
    pub fn path_for(&self, section: &Section) -> PathBuf {
        self.output_dir.join(section.file_name(&self.extension))
    }

    /// Write every section in order, stopping at the first failure.
    ///
    /// Files written before a failure are left in place; the error reports
    /// how many made it to disk.
    pub fn write_all(&self, sections: &[Section]) -> Result<Vec<PathBuf>> {
        let total = sections.len();

        fs::create_dir_all(&self.output_dir).map_err(|source| SplitError::WriteFailure {
            path: self.output_dir.clone(),
            written: 0,
            total,
            source,
        })?;

        let mut written = Vec::with_capacity(total);
        for section in sections {
            let path = self.path_for(section);
            fs::write(&path, &section.text).map_err(|source| SplitError::WriteFailure {
                path: path.clone(),
                written: written.len(),
                total,
                source,
            })?;

            log::info!(
                "Created: {} ({} words)",
                path.file_name().unwrap_or_default().to_string_lossy(),
                section.word_count()
            );
            written.push(path);
        }

        Ok(written)
    }
}
