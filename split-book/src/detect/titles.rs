//! Reference title lists (a known table of contents).

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a title list: one title per line, blank lines and `# ` comments skipped.
///
/// Only a lone `#` or `#` followed by whitespace starts a comment, so titles
/// such as `#1 Rule` survive. Titles are trimmed, and repeated titles keep
/// their first position.
pub fn parse_titles(content: &str) -> Vec<String> {
    dedup(content.lines().filter(|line| !is_comment(line)))
}

fn is_comment(line: &str) -> bool {
    line.trim()
        .strip_prefix('#')
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn dedup<'a>(titles: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    titles
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .filter(|title| seen.insert(title.to_string()))
        .map(str::to_string)
        .collect()
}

/// Load a title list file.
pub fn load_titles(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read title list: {}", path.display()))?;
    Ok(parse_titles(&content))
}

/// Merge titles from a file with titles given on the command line.
///
/// File titles come first; duplicates are dropped.
pub fn merge_titles(from_file: Vec<String>, extra: &[String]) -> Vec<String> {
    dedup(from_file.iter().chain(extra).map(String::as_str))
}
