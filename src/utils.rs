//! General utility functions for aimdb
//!
//! This module contains common helper functions used across the library.

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};

/// Format a file size in human-readable form (B, KB, MB, GB)
pub fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} B", size)
    }
}

/// Create a case-insensitive glob matcher for record and table names
///
/// Plain text without wildcards becomes `*text*` (substring search).
pub fn create_glob_matcher(pattern: &str) -> Result<GlobMatcher> {
    let pattern = if !pattern.contains('*') && !pattern.contains('?') {
        format!("*{}*", pattern)
    } else {
        pattern.to_string()
    };

    let glob = GlobBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .with_context(|| format!("Invalid pattern: {}", pattern))?;
    Ok(glob.compile_matcher())
}

/// Check if a name matches the optional filter
pub fn matches_filter(name: &str, matcher: Option<&GlobMatcher>) -> bool {
    match matcher {
        Some(m) => m.is_match(name),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_glob_matcher() {
        let m = create_glob_matcher("sword").unwrap();
        assert!(matches_filter("SWORD_OF_DOOM", Some(&m)));
        assert!(!matches_filter("shield", Some(&m)));

        let m = create_glob_matcher("gun_?").unwrap();
        assert!(matches_filter("GUN_1", Some(&m)));
        assert!(!matches_filter("gun_12", Some(&m)));

        assert!(matches_filter("anything", None));
    }
}
