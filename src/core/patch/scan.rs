//! Candidate discovery: walk the root and keep files whose name matches a pattern.

use crate::error::{Error, Result};
use glob_match::glob_match;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Collect every candidate file below `root`, deduplicated and sorted.
///
/// A file matched by several patterns appears once. Symlinked directories are
/// not descended into; symlinks to regular files are kept. Subdirectories that
/// cannot be listed for lack of permission are skipped with a warning.
pub fn collect_candidates(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::patch_root_not_found(root.display().to_string()));
    }

    let mut found = BTreeSet::new();
    walk_recursive(root, root, patterns, &mut found)?;
    Ok(found.into_iter().collect())
}

fn walk_recursive(
    dir: &Path,
    root: &Path,
    patterns: &[String],
    found: &mut BTreeSet<PathBuf>,
) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::PermissionDenied && dir != root => {
            log_status!(
                "patch",
                "Warning: skipping unreadable directory {}",
                relative_path(dir, root)
            );
            return Ok(());
        }
        Err(e) => {
            return Err(Error::internal_io(
                e.to_string(),
                Some(format!("read dir {}", dir.display())),
            ))
        }
    };

    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read dir {}", dir.display())))
        })?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("stat {}", path.display())))
        })?;

        if file_type.is_dir() {
            walk_recursive(&path, root, patterns, found)?;
            continue;
        }

        let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
        if is_file && matches_any(&relative_path(&path, root), patterns) {
            found.insert(path);
        }
    }

    Ok(())
}

/// Path relative to `root`, joined with `/` on every platform.
pub fn relative_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Test a root-relative path against the pattern set.
///
/// Patterns without `/` match the file name only (`*.ts` never matches
/// `widget.tsx`). Patterns with `/` match the relative path, anchored at the
/// root or at any directory below it.
pub fn matches_any(relative: &str, patterns: &[String]) -> bool {
    let name = relative.rsplit('/').next().unwrap_or(relative);

    patterns.iter().any(|pattern| {
        if pattern.contains('/') {
            glob_match(pattern, relative) || glob_match(&format!("**/{}", pattern), relative)
        } else {
            glob_match(pattern, name)
        }
    })
}
