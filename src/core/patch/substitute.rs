//! Literal substitution: replace every marker occurrence in each candidate file.

use crate::defaults;
use crate::error::{Error, Result};
use crate::utils::io;
use serde::Serialize;
use std::path::Path;

use super::scan::{collect_candidates, relative_path};

// ============================================================================
// Types
// ============================================================================

/// What to look for, where, and what to put in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSpec {
    /// File patterns deciding which files are candidates.
    pub patterns: Vec<String>,
    /// Literal text searched for.
    pub marker: String,
    /// Literal text written in place of every marker occurrence.
    pub replacement: String,
}

impl PatchSpec {
    /// Build a spec, rejecting an empty marker and blank patterns.
    pub fn new(
        patterns: Vec<String>,
        marker: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        let marker = marker.into();
        if marker.is_empty() {
            return Err(Error::validation_invalid_argument(
                "marker",
                "Marker must not be empty",
                None,
            ));
        }

        if patterns.is_empty() {
            return Err(Error::validation_invalid_argument(
                "extensions",
                "At least one file pattern is required",
                None,
            ));
        }

        if let Some(blank) = patterns.iter().find(|p| p.trim().is_empty()) {
            return Err(Error::validation_invalid_argument(
                "extensions",
                "File patterns must not be blank",
                Some(blank.clone()),
            ));
        }

        Ok(PatchSpec {
            patterns,
            marker,
            replacement: replacement.into(),
        })
    }

    /// True when a second run would find new markers in already-patched text.
    pub fn replacement_contains_marker(&self) -> bool {
        self.replacement.contains(&self.marker)
    }
}

impl Default for PatchSpec {
    fn default() -> Self {
        PatchSpec {
            patterns: defaults::default_extensions(),
            marker: defaults::default_marker(),
            replacement: defaults::default_replacement(),
        }
    }
}

/// A file whose content contains the marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEdit {
    /// File path relative to root.
    pub file: String,
    /// Number of marker occurrences replaced.
    pub replacements: usize,
}

/// The full result of a patch run.
#[derive(Debug, Clone, Serialize)]
pub struct PatchResult {
    /// Root directory that was walked.
    pub root: String,
    /// Literal text searched for.
    pub marker: String,
    /// Literal text written in its place.
    pub replacement: String,
    /// Number of candidate files read.
    pub scanned: usize,
    /// Files containing the marker, in processing order.
    pub edits: Vec<FileEdit>,
    /// Total marker occurrences across all edits.
    pub total_replacements: usize,
    /// Number of files with at least one occurrence.
    pub total_files: usize,
    /// Whether changes were written to disk.
    pub applied: bool,
}

// ============================================================================
// Substitution
// ============================================================================

/// Count non-overlapping occurrences, scanning left to right the same way
/// `str::replace` does.
pub fn count_occurrences(text: &str, marker: &str) -> usize {
    if marker.is_empty() {
        return 0;
    }
    text.matches(marker).count()
}

/// Patch a single file, returning the number of replacements.
///
/// Files without the marker are read but never rewritten. With `write = false`
/// the count is reported and the file is left alone.
pub fn patch_file(path: &Path, spec: &PatchSpec, write: bool) -> Result<usize> {
    let bytes = io::read_bytes(path, &format!("read {}", path.display()))?;
    let content = String::from_utf8(bytes)
        .map_err(|e| Error::patch_decode_failed(path.display().to_string(), e.to_string()))?;

    let count = count_occurrences(&content, &spec.marker);
    if count == 0 || !write {
        return Ok(count);
    }

    let patched = content.replace(&spec.marker, &spec.replacement);
    io::write_file(path, &patched, &format!("write {}", path.display()))?;

    Ok(count)
}

/// Walk `root` and patch every candidate file in sorted order.
///
/// Stops at the first error; files patched before it stay patched.
pub fn patch_tree(spec: &PatchSpec, root: &Path, write: bool) -> Result<PatchResult> {
    if spec.replacement_contains_marker() {
        log_status!(
            "patch",
            "Warning: replacement '{}' contains marker '{}', repeated runs will keep rewriting",
            spec.replacement,
            spec.marker
        );
    }

    let candidates = collect_candidates(root, &spec.patterns)?;
    let mut edits = Vec::new();

    for path in &candidates {
        let replacements = patch_file(path, spec, write)?;
        if replacements == 0 {
            continue;
        }

        let file = relative_path(path, root);
        if write {
            log_status!("patch", "Rewrote {} ({} replacements)", file, replacements);
        } else {
            log_status!("patch", "Would rewrite {} ({} replacements)", file, replacements);
        }
        edits.push(FileEdit { file, replacements });
    }

    let total_replacements = edits.iter().map(|e| e.replacements).sum();
    let total_files = edits.len();

    log_status!(
        "patch",
        "{} of {} candidate files contain '{}'",
        total_files,
        candidates.len(),
        spec.marker
    );

    Ok(PatchResult {
        root: root.display().to_string(),
        marker: spec.marker.clone(),
        replacement: spec.replacement.clone(),
        scanned: candidates.len(),
        edits,
        total_replacements,
        total_files,
        applied: write,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn zen_spec() -> PatchSpec {
        PatchSpec::default()
    }

    #[test]
    fn default_spec_targets_front_end_sources() {
        let spec = zen_spec();
        assert_eq!(spec.patterns, vec!["*.tsx", "*.ts", "*.jsx", "*.js", "*.mdx"]);
        assert_eq!(spec.marker, "zen.");
        assert_eq!(spec.replacement, "zen-");
        assert!(!spec.replacement_contains_marker());
    }

    #[test]
    fn new_rejects_empty_marker() {
        let err = PatchSpec::new(vec!["*.ts".to_string()], "", "x").unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
        assert_eq!(err.details["field"], "marker");
    }

    #[test]
    fn new_rejects_blank_pattern() {
        let err = PatchSpec::new(vec!["*.ts".to_string(), "  ".to_string()], "a", "b").unwrap_err();
        assert_eq!(err.details["field"], "extensions");
    }

    #[test]
    fn new_rejects_empty_pattern_set() {
        assert!(PatchSpec::new(Vec::new(), "a", "b").is_err());
    }

    #[test]
    fn new_allows_empty_replacement() {
        let spec = PatchSpec::new(vec!["*.ts".to_string()], "zen.", "").unwrap();
        assert_eq!(spec.replacement, "");
    }

    #[test]
    fn replacement_containing_marker_is_flagged() {
        let spec = PatchSpec::new(vec!["*.ts".to_string()], "a", "aa").unwrap();
        assert!(spec.replacement_contains_marker());
    }

    #[test]
    fn count_occurrences_is_non_overlapping() {
        assert_eq!(count_occurrences("zen.theme zen.color zen.", "zen."), 3);
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("nothing here", "zen."), 0);
        assert_eq!(count_occurrences("abc", ""), 0);
    }

    #[test]
    fn patch_file_rewrites_every_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.tsx");
        fs::write(&path, "zen.a zen.b\nzen.c\n").unwrap();

        let count = patch_file(&path, &zen_spec(), true).unwrap();

        assert_eq!(count, 3);
        assert_eq!(fs::read_to_string(&path).unwrap(), "zen-a zen-b\nzen-c\n");
    }

    #[test]
    fn patch_file_preserves_crlf_and_surrounding_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.ts");
        fs::write(&path, "\u{feff}// zen.x\r\nconst a = 1;\r\n").unwrap();

        patch_file(&path, &zen_spec(), true).unwrap();

        assert_eq!(
            fs::read(&path).unwrap(),
            "\u{feff}// zen-x\r\nconst a = 1;\r\n".as_bytes()
        );
    }

    #[test]
    fn patch_file_reports_decode_failure_with_hint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.js");
        fs::write(&path, [0xffu8, 0xd8, b'z', b'e', b'n', b'.']).unwrap();

        let err = patch_file(&path, &zen_spec(), true).unwrap_err();

        assert_eq!(err.code.as_str(), "patch.decode_failed");
        assert_eq!(err.details["file"], path.display().to_string());
        assert!(err.hints[0].message.contains("--ext"));
    }

    #[test]
    fn patch_file_dry_run_leaves_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.tsx");
        fs::write(&path, "zen.theme").unwrap();

        let count = patch_file(&path, &zen_spec(), false).unwrap();

        assert_eq!(count, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "zen.theme");
    }

    #[test]
    fn patch_tree_reports_edits_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("app")).unwrap();
        fs::write(root.join("app/widget.tsx"), "zen.theme zen.theme").unwrap();
        fs::write(root.join("app/plain.ts"), "no marker").unwrap();

        let result = patch_tree(&zen_spec(), root, true).unwrap();

        assert!(result.applied);
        assert_eq!(result.scanned, 2);
        assert_eq!(result.total_files, 1);
        assert_eq!(result.total_replacements, 2);
        assert_eq!(
            result.edits,
            vec![FileEdit {
                file: "app/widget.tsx".to_string(),
                replacements: 2,
            }]
        );
    }

    #[test]
    fn patch_tree_stops_at_first_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.ts"), "zen.first").unwrap();
        fs::write(root.join("b.ts"), [0xffu8, 0xfe, 0xfd]).unwrap();
        fs::write(root.join("c.ts"), "zen.last").unwrap();

        let err = patch_tree(&zen_spec(), root, true).unwrap_err();

        assert_eq!(err.code.as_str(), "patch.decode_failed");
        assert_eq!(fs::read_to_string(root.join("a.ts")).unwrap(), "zen-first");
        assert_eq!(fs::read_to_string(root.join("c.ts")).unwrap(), "zen.last");
    }

    #[test]
    fn patch_tree_ignores_undecodable_non_candidates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("logo.png"), [0xffu8, 0xd8, 0xff]).unwrap();
        fs::write(dir.path().join("a.js"), "zen.x").unwrap();

        let result = patch_tree(&zen_spec(), dir.path(), true).unwrap();
        assert_eq!(result.total_files, 1);
    }
}
