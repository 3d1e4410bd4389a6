// src/input.rs
// =============================================================================
// Builds the ordered URL list for the CLI.
//
// URLs come from an optional file (one per line) followed by the positional
// arguments. Order is kept and duplicates are not removed: every entry gets
// its own report line.
// =============================================================================

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

// Parses a URL list file
//
// Blank lines and lines starting with '#' are skipped; everything else is
// trimmed and kept as-is (validation happens later, per URL).
pub fn parse_url_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_string())
        .collect()
}

pub fn load_url_file(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read URL list {}", path.display()))?;
    Ok(parse_url_list(&contents))
}

/// File entries first, then positional ones
pub fn collect_urls(file: Option<&Path>, positional: &[String]) -> Result<Vec<String>> {
    let mut urls = match file {
        Some(path) => load_url_file(path)?,
        None => Vec::new(),
    };
    urls.extend(positional.iter().cloned());
    Ok(urls)
}
