//! Filesystem-safe names for section files.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default extension for section files.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Slug used when a title has no usable characters.
const FALLBACK_SLUG: &str = "section";

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s-]").expect("slug pattern should compile"));

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s-]+").expect("separator pattern should compile"));

/// Turn a title into a filesystem-safe slug.
///
/// Keeps letters, digits, whitespace and hyphens, then collapses each run of
/// whitespace/hyphens into a single underscore.
pub fn slugify(title: &str) -> String {
    let cleaned = DISALLOWED.replace_all(title, "");
    let trimmed = cleaned.trim_matches(|c: char| c.is_whitespace() || c == '-');
    let slug = SEPARATORS.replace_all(trimmed, "_");
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.into_owned()
    }
}

/// `{ordinal:02}_{slug}.{extension}`
pub fn section_file_name(ordinal: usize, title: &str, extension: &str) -> String {
    format!("{:02}_{}.{}", ordinal, slugify(title), extension)
}
