//! split-book configuration management.

use crate::detect::{self, DetectOptions, OrderingPolicy};
use crate::segment;
use crate::splitter::SplitOptions;
use crate::tts::TtsOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Directory section files are written to
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,

    /// Extension for section files
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Sections with fewer words are dropped
    #[serde(default = "default_min_section_words")]
    pub min_section_words: usize,

    /// Lines to skip before looking for headings (e.g. a table of contents)
    #[serde(default)]
    pub scan_offset_lines: usize,

    /// Output order for titles from a reference list
    #[serde(default)]
    pub ordering: OrderingPolicy,

    /// Fewest reference titles that must be found
    #[serde(default = "default_min_resolved_titles")]
    pub min_resolved_titles: usize,

    /// Characters per page when page-chunking (0 disables)
    #[serde(default = "default_page_chunk_chars")]
    pub page_chunk_chars: usize,

    /// Page-chunk only documents longer than this
    #[serde(default = "default_page_chunk_threshold_chars")]
    pub page_chunk_threshold_chars: usize,

    /// Paragraphs per part when paragraph-chunking (0 disables)
    #[serde(default = "default_paragraph_group_size")]
    pub paragraph_group_size: usize,

    /// Paragraph-chunk only documents longer than this
    #[serde(default = "default_paragraph_chunk_threshold_chars")]
    pub paragraph_chunk_threshold_chars: usize,

    /// TTS voice identifier
    #[serde(default = "default_voice")]
    pub voice: String,

    /// TTS speed multiplier (0.5-2.0)
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Directory audio files are written to
    #[serde(default = "default_audio_directory")]
    pub audio_directory: PathBuf,

    /// Python interpreter used to run the TTS tool
    #[serde(default = "default_python")]
    pub python: String,
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("chapters")
}

fn default_extension() -> String {
    segment::naming::DEFAULT_EXTENSION.to_string()
}

fn default_min_section_words() -> usize {
    segment::DEFAULT_MIN_SECTION_WORDS
}

fn default_min_resolved_titles() -> usize {
    detect::DEFAULT_MIN_RESOLVED_TITLES
}

fn default_page_chunk_chars() -> usize {
    detect::DEFAULT_PAGE_CHUNK_CHARS
}

fn default_page_chunk_threshold_chars() -> usize {
    detect::DEFAULT_PAGE_CHUNK_THRESHOLD
}

fn default_paragraph_group_size() -> usize {
    detect::DEFAULT_PARAGRAPH_GROUP_SIZE
}

fn default_paragraph_chunk_threshold_chars() -> usize {
    detect::DEFAULT_PARAGRAPH_CHUNK_THRESHOLD
}

fn default_voice() -> String {
    crate::tts::DEFAULT_VOICE.to_string()
}

fn default_speed() -> f32 {
    crate::tts::DEFAULT_SPEED
}

fn default_audio_directory() -> PathBuf {
    PathBuf::from("audio_output")
}

fn default_python() -> String {
    "python".to_string()
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            extension: default_extension(),
            min_section_words: default_min_section_words(),
            scan_offset_lines: 0,
            ordering: OrderingPolicy::default(),
            min_resolved_titles: default_min_resolved_titles(),
            page_chunk_chars: default_page_chunk_chars(),
            page_chunk_threshold_chars: default_page_chunk_threshold_chars(),
            paragraph_group_size: default_paragraph_group_size(),
            paragraph_chunk_threshold_chars: default_paragraph_chunk_threshold_chars(),
            voice: default_voice(),
            speed: default_speed(),
            audio_directory: default_audio_directory(),
            python: default_python(),
        }
    }
}

impl SplitConfig {
    /// Get the config file path: ~/.config/cli-programs/split-book.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home
            .join(".config")
            .join("cli-programs")
            .join("split-book.toml"))
    }

    /// Load config from a specific file, returning defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: SplitConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Detection options derived from this config.
    pub fn detect_options(&self) -> DetectOptions {
        DetectOptions {
            scan_offset_lines: self.scan_offset_lines,
            ordering: self.ordering,
            min_resolved_titles: self.min_resolved_titles,
            page_chunk_chars: self.page_chunk_chars,
            page_chunk_threshold_chars: self.page_chunk_threshold_chars,
            paragraph_group_size: self.paragraph_group_size,
            paragraph_chunk_threshold_chars: self.paragraph_chunk_threshold_chars,
        }
    }

    /// Split options derived from this config.
    pub fn split_options(&self) -> SplitOptions {
        SplitOptions {
            detect: self.detect_options(),
            min_section_words: self.min_section_words,
            output_dir: self.output_directory.clone(),
            extension: self.extension.clone(),
        }
    }

    /// TTS options derived from this config.
    pub fn tts_options(&self) -> TtsOptions {
        TtsOptions::new()
            .with_voice(self.voice.clone())
            .with_speed(self.speed)
    }
}
